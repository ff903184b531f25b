// ==========================================
// 生猪运输排程仿真 - 逐日仿真器
// ==========================================
// 职责: 驱动逐日状态机, 唯一的运行状态写入方
// 日内阶段:
//   PREPARE_DAY → SELECT_ELIGIBLE → BUILD_ROUTES → ENFORCE_CAPACITY
//   → COMMIT → SUMMARIZE (+ 物流周结算)
// 红线: 同输入同配置必得同输出; 日与日严格串行
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::farm::ProductionSite;
use crate::domain::route::{DeliveryEvent, RejectedRoute, Route};
use crate::domain::scenario::Scenario;
use crate::domain::slaughterhouse::{IntakeConstraint, ProcessingSite};
use crate::domain::types::DayPhase;
use crate::domain::vehicle::{Vehicle, VehicleUsage};
use crate::engine::biology::GrowthModel;
use crate::engine::economics::{amortized_fixed_share, EconomicsCalculator};
use crate::engine::eligibility::EligibilityEngine;
use crate::engine::error::{SimulationError, SimulationResult};
use crate::engine::intake::{IntakeDecision, IntakeGate};
use crate::engine::metrics::{DaySummary, RunKpis};
use crate::engine::router::{RouteBudget, RouteBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// 运行状态
// ==========================================

/// 车辆 + 运行期工时计数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetEntry {
    pub vehicle: Vehicle,
    pub usage: VehicleUsage,
}

/// 单次仿真的完整可变状态 (每次运行独立一份)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub production_sites: Vec<ProductionSite>,
    pub processing_sites: Vec<ProcessingSite>,
    pub fleet: Vec<FleetEntry>,
    pub events: Vec<DeliveryEvent>,
    pub rejected: Vec<RejectedRoute>,
    pub day_summaries: Vec<DaySummary>,
}

impl SimulationState {
    /// 由场景克隆初始状态, 所有实体按 ID 排序
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let mut scenario = scenario.clone();
        scenario.sort_by_id();
        Self {
            production_sites: scenario.production_sites,
            processing_sites: scenario.processing_sites,
            fleet: scenario
                .vehicles
                .into_iter()
                .map(|vehicle| FleetEntry {
                    vehicle,
                    usage: VehicleUsage::default(),
                })
                .collect(),
            events: Vec::new(),
            rejected: Vec::new(),
            day_summaries: Vec::new(),
        }
    }

    fn site_index(&self, site_id: &str) -> Option<usize> {
        self.production_sites.iter().position(|s| s.site_id == site_id)
    }

    fn plant_index(&self, site_id: &str) -> Option<usize> {
        self.processing_sites.iter().position(|p| p.site_id == site_id)
    }

    fn fleet_index(&self, vehicle_id: &str) -> Option<usize> {
        self.fleet.iter().position(|f| f.vehicle.vehicle_id == vehicle_id)
    }
}

/// 仿真结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub run_id: Uuid,
    pub config: SimulationConfig,
    pub events: Vec<DeliveryEvent>,
    pub day_summaries: Vec<DaySummary>,
    pub rejected: Vec<RejectedRoute>,
    pub kpis: RunKpis,
    pub final_production_sites: Vec<ProductionSite>,
    pub final_processing_sites: Vec<ProcessingSite>,
}

/// 单日路线构建结果
struct DayPlan {
    accepted: Vec<Route>,
    rejected: u32,
}

// ==========================================
// DaySimulator - 逐日仿真器
// ==========================================
#[derive(Debug, Clone)]
pub struct DaySimulator {
    config: SimulationConfig,
    growth: GrowthModel,
    eligibility: EligibilityEngine,
    router: RouteBuilder,
    intake: IntakeGate,
    economics: EconomicsCalculator,
}

impl DaySimulator {
    /// 创建仿真器 (配置非法时拒绝)
    pub fn new(config: SimulationConfig, growth: GrowthModel) -> SimulationResult<Self> {
        config.validate()?;
        Ok(Self {
            eligibility: EligibilityEngine::new(&config),
            router: RouteBuilder::new(&config),
            intake: IntakeGate::new(),
            economics: EconomicsCalculator::new(config.penalty_rate_policy, config.penalty_basis),
            growth,
            config,
        })
    }

    /// 使用场景自带的年龄表创建仿真器
    pub fn for_scenario(config: SimulationConfig, scenario: &Scenario) -> SimulationResult<Self> {
        let growth = GrowthModel::new(
            scenario.weight_table.clone(),
            scenario.consumption_table.clone(),
        );
        Self::new(config, growth)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// 执行完整仿真
    ///
    /// # 返回
    /// - Ok(SimulationOutcome): 交付事件 + 日汇总 + KPI
    /// - Err: 场景校验失败或运行期状态不一致
    #[instrument(skip_all, fields(horizon_days = self.config.horizon_days))]
    pub fn run(&self, scenario: &Scenario) -> SimulationResult<SimulationOutcome> {
        scenario.validate()?;

        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            farms = scenario.production_sites.len(),
            slaughterhouses = scenario.processing_sites.len(),
            vehicles = scenario.vehicles.len(),
            "开始仿真"
        );

        let mut state = SimulationState::from_scenario(scenario);
        for day in 0..self.config.horizon() {
            self.step_day(&mut state, day)?;
        }

        let kpis = RunKpis::compute(&state.events, &state.day_summaries);
        info!(
            %run_id,
            routes = kpis.num_routes,
            pigs = kpis.total_pigs_delivered,
            net_profit = kpis.net_profit,
            "仿真完成"
        );

        Ok(SimulationOutcome {
            run_id,
            config: self.config.clone(),
            events: state.events,
            day_summaries: state.day_summaries,
            rejected: state.rejected,
            kpis,
            final_production_sites: state.production_sites,
            final_processing_sites: state.processing_sites,
        })
    }

    /// 推进一个仿真日
    #[instrument(skip(self, state))]
    pub fn step_day(&self, state: &mut SimulationState, day: u32) -> SimulationResult<()> {
        // ==========================================
        // 步骤1: PREPARE_DAY - 生长推进 + 计数重置
        // ==========================================
        debug!(phase = %DayPhase::PrepareDay, "步骤1: 推进生长并重置日计数");
        let feed_consumed_kg = self.prepare_day(state, day)?;

        // ==========================================
        // 步骤2: SELECT_ELIGIBLE - 准入筛选
        // ==========================================
        debug!(phase = %DayPhase::SelectEligible, "步骤2: 筛选可服务养殖场");
        let eligible = self.eligibility.select(&state.production_sites, day);
        debug!(eligible = eligible.len(), "准入筛选完成");

        // ==========================================
        // 步骤3/4: BUILD_ROUTES + ENFORCE_CAPACITY
        // ==========================================
        debug!(phase = %DayPhase::BuildRoutes, "步骤3: 构建路线并校验接收能力");
        let plan = self.build_routes(state, day, eligible);
        debug!(
            phase = %DayPhase::EnforceCapacity,
            accepted = plan.accepted.len(),
            rejected = plan.rejected,
            "步骤4: 接收能力校验完成"
        );

        // ==========================================
        // 步骤5: COMMIT - 写回状态并生成交付事件
        // ==========================================
        debug!(phase = %DayPhase::Commit, "步骤5: 提交路线");
        self.commit(state, day, &plan.accepted)?;

        // ==========================================
        // 步骤6: SUMMARIZE - 日汇总 (+ 周结算)
        // ==========================================
        debug!(phase = %DayPhase::Summarize, "步骤6: 日汇总");
        let plant_utilization_pct = Self::plant_utilization_pct(&state.processing_sites);
        state.day_summaries.push(
            DaySummary::from_events(
                day,
                self.config.plan_date(day),
                &state.events,
                plan.rejected,
                feed_consumed_kg,
                0.0,
            )
            .with_plant_utilization(plant_utilization_pct),
        );

        if self.config.is_week_end(day) {
            self.settle_week(state, day);
        }

        info!(
            day,
            routes = plan.accepted.len(),
            rejected = plan.rejected,
            "仿真日完成"
        );
        Ok(())
    }

    /// 屠宰场日终平均利用率 (百分比, 无屠宰场时为 0)
    fn plant_utilization_pct(plants: &[ProcessingSite]) -> f64 {
        if plants.is_empty() {
            return 0.0;
        }
        let total: f64 = plants.iter().map(|p| p.utilization_ratio()).sum();
        total / plants.len() as f64 * 100.0
    }

    /// PREPARE_DAY
    ///
    /// # 返回
    /// 当日全部养殖场采食总量 (kg)
    fn prepare_day(&self, state: &mut SimulationState, day: u32) -> SimulationResult<f64> {
        let mut feed_consumed_kg = 0.0;
        for site in state.production_sites.iter_mut() {
            self.growth.apply(site, 1.0)?;
            feed_consumed_kg += GrowthModel::daily_feed_kg(site);
        }

        for plant in state.processing_sites.iter_mut() {
            plant.reset_daily_intake();
        }

        let week_start = self.config.is_week_start(day);
        for entry in state.fleet.iter_mut() {
            if week_start {
                entry.usage.reset_week();
            } else {
                entry.usage.reset_day();
            }
        }
        if week_start {
            debug!(day, week = self.config.week_of(day), "新物流周开始, 重置周工时");
        }
        Ok(feed_consumed_kg)
    }

    /// BUILD_ROUTES + ENFORCE_CAPACITY
    ///
    /// # 规则
    /// - 车辆按 vehicle_id 顺序, 每辆车在工时允许时反复请求路线
    /// - 路线构建时装车头数已按目的屠宰场剩余能力裁剪, 闸门做整车兜底校验
    /// - 接收: 候选池移除路线内养殖场, 预留屠宰场能力, 记车辆工时
    /// - 拒收: 养殖场留在候选池, 该车辆当日不再尝试该屠宰场
    fn build_routes(&self, state: &mut SimulationState, day: u32, eligible: Vec<usize>) -> DayPlan {
        let SimulationState {
            production_sites,
            processing_sites,
            fleet,
            rejected,
            ..
        } = state;

        let mut pool = eligible;
        let mut plan = DayPlan {
            accepted: Vec::new(),
            rejected: 0,
        };

        for entry in fleet.iter_mut() {
            let mut excluded: HashSet<String> = HashSet::new();

            loop {
                if pool.is_empty() {
                    break;
                }
                let hours = entry
                    .usage
                    .remaining_hours(&entry.vehicle, self.config.max_hours_per_day);
                if hours <= 0.0 {
                    break;
                }

                let candidates: Vec<&ProductionSite> =
                    pool.iter().map(|&idx| &production_sites[idx]).collect();
                let destinations: Vec<&ProcessingSite> = processing_sites
                    .iter()
                    .filter(|p| p.remaining_capacity() > 0.0 && !excluded.contains(&p.site_id))
                    .collect();
                let budget = RouteBudget {
                    capacity_kg: entry.vehicle.capacity_kg,
                    hours,
                };

                let route = match self.router.build(&candidates, &destinations, &entry.vehicle, budget) {
                    Some(route) => route,
                    None => break,
                };

                let plant = match processing_sites
                    .iter_mut()
                    .find(|p| p.site_id == route.destination_id)
                {
                    Some(plant) => plant,
                    None => break,
                };

                match self.intake.check(day, plant, &route) {
                    IntakeDecision::Accepted => {
                        plant.receive(route.total_pigs(), route.total_weight_kg());
                        entry.usage.record_route(route.time_hours);
                        pool.retain(|&idx| !route.visits(&production_sites[idx].site_id));
                        debug!(
                            vehicle_id = %route.vehicle_id,
                            destination_id = %route.destination_id,
                            stops = route.stops.len(),
                            pigs = route.total_pigs(),
                            hours = route.time_hours,
                            "路线接收"
                        );
                        plan.accepted.push(route);
                    }
                    IntakeDecision::Rejected(record) => {
                        excluded.insert(record.destination_id.clone());
                        rejected.push(record);
                        plan.rejected += 1;
                    }
                }
            }
        }

        plan
    }

    /// COMMIT
    fn commit(&self, state: &mut SimulationState, day: u32, routes: &[Route]) -> SimulationResult<()> {
        let base = state.events.iter().filter(|e| e.day == day).count();

        for (offset, route) in routes.iter().enumerate() {
            for stop in &route.stops {
                let idx = state.site_index(&stop.site_id).ok_or_else(|| {
                    SimulationError::InconsistentState(format!("路线引用未知养殖场 {}", stop.site_id))
                })?;
                let site = &mut state.production_sites[idx];
                if stop.pigs > site.inventory_pigs {
                    warn!(site_id = %site.site_id, pigs = stop.pigs, inventory = site.inventory_pigs, "装运头数超过存栏");
                }
                site.inventory_pigs = site.inventory_pigs.saturating_sub(stop.pigs);
                site.last_visit_day = Some(day);
            }

            let plant_idx = state.plant_index(&route.destination_id).ok_or_else(|| {
                SimulationError::InconsistentState(format!(
                    "路线引用未知屠宰场 {}",
                    route.destination_id
                ))
            })?;
            let fleet_idx = state.fleet_index(&route.vehicle_id).ok_or_else(|| {
                SimulationError::InconsistentState(format!("路线引用未知车辆 {}", route.vehicle_id))
            })?;
            let plant = &state.processing_sites[plant_idx];
            let vehicle = &state.fleet[fleet_idx].vehicle;

            // 固定成本分摊在周结算时写入
            let eco = self.economics.evaluate(route, plant, vehicle, 0.0);
            let delivered_weight_kg = route.total_weight_kg();
            let capacity_utilization_pct = if vehicle.capacity_kg > 0.0 {
                delivered_weight_kg / vehicle.capacity_kg * 100.0
            } else {
                0.0
            };

            state.events.push(DeliveryEvent {
                day,
                plan_date: self.config.plan_date(day),
                route_id: format!("day{}_r{}", day, base + offset),
                vehicle_id: vehicle.vehicle_id.clone(),
                vehicle_category: vehicle.category.clone(),
                destination_id: plant.site_id.clone(),
                destination_name: plant.name.clone(),
                stops: route.stops.clone(),
                pigs_delivered: route.total_pigs(),
                delivered_weight_kg,
                avg_weight_kg: route.avg_weight_kg(),
                distance_km: route.distance_km,
                time_hours: route.time_hours,
                capacity_utilization_pct,
                revenue: eco.revenue,
                penalty_rate: eco.penalty_rate,
                penalty: eco.penalty,
                transport_cost: eco.transport_cost,
                fixed_cost_share: eco.fixed_cost_share,
                profit: eco.profit,
            });
        }
        Ok(())
    }

    /// 物流周结算
    ///
    /// # 规则
    /// - 有路线车辆: 周固定成本按本周趟数均摊, 写入对应交付事件
    /// - 无路线车辆: 周固定成本记为空闲固定成本, 计入结算日汇总
    /// - 重算本周全部日汇总
    fn settle_week(&self, state: &mut SimulationState, day: u32) {
        let week = self.config.week_of(day);
        let mut idle_fixed_cost = 0.0;

        for entry in &state.fleet {
            let routes = entry.usage.routes_this_week;
            if routes == 0 {
                idle_fixed_cost += entry.vehicle.fixed_weekly_cost;
                continue;
            }
            let share = amortized_fixed_share(entry.vehicle.fixed_weekly_cost, routes);
            for event in state.events.iter_mut().filter(|e| {
                e.vehicle_id == entry.vehicle.vehicle_id && self.config.week_of(e.day) == week
            }) {
                event.apply_fixed_cost_share(share);
            }
        }

        for summary in state
            .day_summaries
            .iter_mut()
            .filter(|s| self.config.week_of(s.day) == week)
        {
            let idle = if summary.day == day {
                idle_fixed_cost
            } else {
                summary.idle_fixed_cost
            };
            *summary = DaySummary::from_events(
                summary.day,
                summary.plan_date,
                &state.events,
                summary.rejected_routes,
                summary.feed_consumed_kg,
                idle,
            )
            .with_plant_utilization(summary.plant_utilization_pct);
        }

        debug!(week, day, idle_fixed_cost, "物流周结算完成");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::IntakeUnit;

    fn scenario() -> Scenario {
        Scenario {
            production_sites: vec![
                ProductionSite::new("F1", "Granja 1", 41.90, 2.20, 100, 110.0, 5.0, 24.0, 1.4, 2.5, 100),
                ProductionSite::new("F2", "Granja 2", 41.95, 2.25, 80, 108.0, 5.0, 24.0, 1.4, 2.5, 100),
            ],
            processing_sites: vec![ProcessingSite::new(
                "S1",
                "Escorxador",
                41.85,
                2.15,
                1_000.0,
                IntakeUnit::Head,
                1.8,
                vec![],
            )],
            vehicles: vec![Vehicle::new("T1", "standard", 20_000.0, 1.2, 40.0, 700.0)],
            weight_table: None,
            consumption_table: None,
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            horizon_days: 0,
            ..Default::default()
        };
        assert!(matches!(
            DaySimulator::new(config, GrowthModel::default()),
            Err(SimulationError::Config(_))
        ));
    }

    #[test]
    fn test_first_day_delivers_both_farms() {
        let config = SimulationConfig {
            horizon_days: 1,
            ..Default::default()
        };
        let sim = DaySimulator::new(config, GrowthModel::default()).unwrap();
        let outcome = sim.run(&scenario()).unwrap();

        assert_eq!(outcome.events.len(), 1);
        let event = &outcome.events[0];
        assert_eq!(event.route_id, "day0_r0");
        assert_eq!(event.pigs_delivered, 180);
        // 单日仿真: 周结算发生在最后一天, 固定成本全额分摊
        assert!((event.fixed_cost_share - 700.0).abs() < 1e-9);
        assert_eq!(outcome.day_summaries.len(), 1);
        // 180 头 / 1000 头日接收能力
        assert!((outcome.day_summaries[0].plant_utilization_pct - 18.0).abs() < 1e-9);
        assert!(outcome
            .final_production_sites
            .iter()
            .all(|s| s.inventory_pigs == 0 && s.last_visit_day == Some(0)));
    }

    #[test]
    fn test_idle_vehicle_fixed_cost() {
        let mut s = scenario();
        s.vehicles.push(Vehicle::new("T2", "standard", 20_000.0, 1.2, 40.0, 300.0));
        let config = SimulationConfig {
            horizon_days: 1,
            ..Default::default()
        };
        let outcome = DaySimulator::new(config, GrowthModel::default())
            .unwrap()
            .run(&s)
            .unwrap();
        assert_eq!(outcome.day_summaries[0].idle_fixed_cost, 300.0);
        assert!((outcome.kpis.total_fixed_cost - 1000.0).abs() < 1e-9);
    }
}
