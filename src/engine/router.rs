// ==========================================
// 生猪运输排程仿真 - 路线构建引擎
// ==========================================
// 职责: 贪心最近可行法构建单车单趟路线 (1..=max_stops 个养殖场)
// 输入: 候选养殖场池 + 可用屠宰场 + 车辆 + 剩余预算
// 输出: 0 或 1 条 Route
// 红线: 完全确定性, 每一处选择都有按 ID 的平局规则
// 红线: 装车头数同时受目的屠宰场剩余日接收能力约束
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::farm::ProductionSite;
use crate::domain::route::{Route, RouteStop};
use crate::domain::slaughterhouse::{IntakeConstraint, ProcessingSite};
use crate::domain::types::IntakeUnit;
use crate::domain::vehicle::Vehicle;
use crate::engine::eligibility::seed_order;
use crate::engine::geo::{haversine_km, tour_distance_km};
use std::cmp::Ordering;
use tracing::{instrument, trace};

/// 单趟路线可用预算
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteBudget {
    pub capacity_kg: f64,
    pub hours: f64, // min(日剩余, 周剩余)
}

// ==========================================
// RouteBuilder - 路线构建引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    speed_kmh: f64,
    service_hours_per_stop: f64,
    max_stops: usize,
}

/// 构建中的路线
struct Draft<'a> {
    destination: &'a ProcessingSite,
    sites: Vec<&'a ProductionSite>,
    stops: Vec<RouteStop>,
    distance_km: f64,
    remaining_kg: f64,
    intake_left: f64, // 目的屠宰场剩余接收能力 (按能力单位)
}

impl<'a> Draft<'a> {
    fn path_with(&self, extra: Option<&ProductionSite>) -> Vec<(f64, f64)> {
        self.sites
            .iter()
            .map(|s| s.location())
            .chain(extra.map(|s| s.location()))
            .collect()
    }

    /// 本站还能装多少头 (载重 + 接收能力)
    fn pickup(&self, site: &ProductionSite) -> u32 {
        RouteBuilder::pickup(site, self.remaining_kg).min(RouteBuilder::intake_limit(
            self.destination,
            self.intake_left,
            site.avg_weight_kg,
        ))
    }

    fn push_stop(&mut self, site: &'a ProductionSite, pigs: u32, distance_km: f64) {
        let weight_kg = pigs as f64 * site.avg_weight_kg;
        self.remaining_kg -= weight_kg;
        self.intake_left -= match self.destination.capacity_unit {
            IntakeUnit::Head => pigs as f64,
            IntakeUnit::Kilograms => weight_kg,
        };
        self.distance_km = distance_km;
        self.stops.push(RouteStop {
            site_id: site.site_id.clone(),
            pigs,
            avg_weight_kg: site.avg_weight_kg,
        });
        self.sites.push(site);
    }

    fn has_room(&self) -> bool {
        self.remaining_kg > 0.0 && self.intake_left > 0.0
    }
}

/// 浮点头数向下取整并截断到 u32
fn whole_pigs(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= u32::MAX as f64 {
        u32::MAX
    } else {
        value.floor() as u32
    }
}

impl RouteBuilder {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            speed_kmh: config.speed_kmh,
            service_hours_per_stop: config.service_hours_per_stop,
            max_stops: config.max_stops_per_route,
        }
    }

    /// 路线耗时 = 行驶 + 装车服务
    pub fn route_hours(&self, distance_km: f64, stops: usize) -> f64 {
        distance_km / self.speed_kmh + stops as f64 * self.service_hours_per_stop
    }

    /// 单站可装头数
    ///
    /// min(存栏, 单次出栏上限, floor(剩余载重 / 平均体重))
    pub fn pickup(site: &ProductionSite, remaining_kg: f64) -> u32 {
        if site.avg_weight_kg <= 0.0 || remaining_kg <= 0.0 {
            return 0;
        }
        site.available_for_visit()
            .min(whole_pigs(remaining_kg / site.avg_weight_kg))
    }

    /// 目的屠宰场剩余接收能力可容纳的头数
    ///
    /// # 规则
    /// - 按头计: floor(剩余头数)
    /// - 按公斤计: floor(剩余公斤 / 平均体重), 并保证头数 × 体重不超过剩余公斤
    pub fn intake_limit(destination: &ProcessingSite, intake_left: f64, avg_weight_kg: f64) -> u32 {
        match destination.capacity_unit {
            IntakeUnit::Head => whole_pigs(intake_left),
            IntakeUnit::Kilograms => {
                if avg_weight_kg <= 0.0 {
                    return 0;
                }
                let pigs = whole_pigs(intake_left / avg_weight_kg);
                if pigs > 0 && pigs as f64 * avg_weight_kg > intake_left {
                    pigs - 1
                } else {
                    pigs
                }
            }
        }
    }

    /// 距种子最近的屠宰场 (平局取 ID 最小)
    pub fn nearest_destination<'a>(
        seed: &ProductionSite,
        destinations: &[&'a ProcessingSite],
    ) -> Option<&'a ProcessingSite> {
        destinations
            .iter()
            .copied()
            .map(|plant| (haversine_km(seed.location(), plant.location()), plant))
            .min_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.site_id.cmp(&b.site_id)))
            .map(|(_, plant)| plant)
    }

    /// 构建一条路线
    ///
    /// # 参数
    /// - `pool`: 候选养殖场 (未被本日其它路线占用)
    /// - `destinations`: 仍有剩余接收能力且未被排除的屠宰场
    /// - `vehicle`: 车辆
    /// - `budget`: 剩余载重与工时
    ///
    /// # 返回
    /// - Some(Route): 至少 1 站的可行路线
    /// - None: 无可行路线 (车辆空闲)
    #[instrument(level = "debug", skip_all, fields(
        vehicle_id = %vehicle.vehicle_id,
        pool = pool.len(),
        destinations = destinations.len()
    ))]
    pub fn build(
        &self,
        pool: &[&ProductionSite],
        destinations: &[&ProcessingSite],
        vehicle: &Vehicle,
        budget: RouteBudget,
    ) -> Option<Route> {
        if pool.is_empty() || destinations.is_empty() || self.max_stops == 0 {
            return None;
        }

        let mut seeds: Vec<&ProductionSite> = pool.to_vec();
        seeds.sort_by(|a, b| seed_order(a, b));

        // 1) 依次尝试种子, 直到得到可行的单站路线
        let mut draft = seeds
            .iter()
            .copied()
            .find_map(|seed| self.seed_draft(seed, destinations, budget))?;

        // 2) 逐站追加边际距离最小的养殖场
        while draft.stops.len() < self.max_stops && draft.has_room() {
            match self.best_addition(&draft, &seeds, budget) {
                Some((site, pigs, distance_km)) => {
                    trace!(site_id = %site.site_id, pigs, distance_km, "追加停靠点");
                    draft.push_stop(site, pigs, distance_km);
                }
                None => break,
            }
        }

        let time_hours = self.route_hours(draft.distance_km, draft.stops.len());
        Some(Route {
            vehicle_id: vehicle.vehicle_id.clone(),
            destination_id: draft.destination.site_id.clone(),
            stops: draft.stops,
            distance_km: draft.distance_km,
            time_hours,
        })
    }

    fn seed_draft<'a>(
        &self,
        seed: &'a ProductionSite,
        destinations: &[&'a ProcessingSite],
        budget: RouteBudget,
    ) -> Option<Draft<'a>> {
        let destination = Self::nearest_destination(seed, destinations)?;
        let mut draft = Draft {
            destination,
            sites: Vec::new(),
            stops: Vec::new(),
            distance_km: 0.0,
            remaining_kg: budget.capacity_kg,
            intake_left: destination.remaining_capacity(),
        };
        let pigs = draft.pickup(seed);
        if pigs == 0 {
            return None;
        }
        let distance_km = tour_distance_km(destination.location(), &[seed.location()]);
        if self.route_hours(distance_km, 1) > budget.hours {
            return None;
        }
        draft.push_stop(seed, pigs, distance_km);
        Some(draft)
    }

    /// 选出边际距离最小的可行追加站 (平局取 ID 最小)
    fn best_addition<'a>(
        &self,
        draft: &Draft<'a>,
        candidates: &[&'a ProductionSite],
        budget: RouteBudget,
    ) -> Option<(&'a ProductionSite, u32, f64)> {
        let next_stops = draft.stops.len() + 1;
        let mut best: Option<(&'a ProductionSite, u32, f64, f64)> = None;

        for &site in candidates {
            if draft.sites.iter().any(|s| s.site_id == site.site_id) {
                continue;
            }
            let pigs = draft.pickup(site);
            if pigs == 0 {
                continue;
            }
            let path = draft.path_with(Some(site));
            let distance_km = tour_distance_km(draft.destination.location(), &path);
            if self.route_hours(distance_km, next_stops) > budget.hours {
                continue;
            }
            let marginal = distance_km - draft.distance_km;
            let better = match &best {
                None => true,
                Some((current, _, _, current_marginal)) => {
                    match marginal.total_cmp(current_marginal) {
                        Ordering::Less => true,
                        Ordering::Equal => site.site_id < current.site_id,
                        Ordering::Greater => false,
                    }
                }
            };
            if better {
                best = Some((site, pigs, distance_km, marginal));
            }
        }

        best.map(|(site, pigs, distance_km, _)| (site, pigs, distance_km))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::IntakeUnit;

    fn farm(id: &str, lat: f64, lon: f64, pigs: u32, weight: f64) -> ProductionSite {
        ProductionSite::new(id, id, lat, lon, pigs, weight, 5.0, 24.0, 1.4, 2.5, 1_000)
    }

    fn plant(id: &str, lat: f64, lon: f64) -> ProcessingSite {
        ProcessingSite::new(id, id, lat, lon, 10_000.0, IntakeUnit::Head, 1.8, vec![])
    }

    fn truck(capacity_kg: f64) -> Vehicle {
        Vehicle::new("T1", "standard", capacity_kg, 1.2, 40.0, 700.0)
    }

    fn budget(capacity_kg: f64) -> RouteBudget {
        RouteBudget {
            capacity_kg,
            hours: 8.0,
        }
    }

    #[test]
    fn test_pickup_respects_all_limits() {
        let mut f = farm("F1", 41.9, 2.2, 300, 100.0);
        f.max_pigs_per_visit = 120;
        assert_eq!(RouteBuilder::pickup(&f, 20_000.0), 120);
        assert_eq!(RouteBuilder::pickup(&f, 5_050.0), 50);
        assert_eq!(RouteBuilder::pickup(&f, 99.0), 0);
    }

    #[test]
    fn test_seed_is_largest_inventory() {
        let builder = RouteBuilder::new(&SimulationConfig::default());
        let a = farm("F1", 41.90, 2.20, 100, 100.0);
        let b = farm("F2", 41.91, 2.21, 400, 100.0);
        let p = plant("S1", 41.95, 2.25);
        let route = builder
            .build(&[&a, &b], &[&p], &truck(10_000.0), budget(10_000.0))
            .unwrap();
        assert_eq!(route.stops[0].site_id, "F2");
        assert_eq!(route.stops.len(), 1); // 载重已满
    }

    #[test]
    fn test_nearest_destination_with_id_tiebreak() {
        let seed = farm("F1", 41.0, 2.0, 100, 100.0);
        let near = plant("S2", 41.1, 2.0);
        let twin = plant("S1", 41.1, 2.0);
        let far = plant("S0", 42.0, 2.0);
        let chosen = RouteBuilder::nearest_destination(&seed, &[&near, &far, &twin]).unwrap();
        assert_eq!(chosen.site_id, "S1");
    }

    #[test]
    fn test_appends_nearest_and_caps_stops() {
        let builder = RouteBuilder::new(&SimulationConfig::default());
        let sites = vec![
            farm("F1", 41.90, 2.20, 50, 100.0),
            farm("F2", 41.92, 2.20, 40, 100.0),
            farm("F3", 41.94, 2.20, 30, 100.0),
            farm("F4", 41.96, 2.20, 20, 100.0),
        ];
        let pool: Vec<&ProductionSite> = sites.iter().collect();
        let p = plant("S1", 41.80, 2.20);
        let route = builder
            .build(&pool, &[&p], &truck(50_000.0), budget(50_000.0))
            .unwrap();
        let ids: Vec<&str> = route.site_ids().collect();
        assert_eq!(ids, vec!["F1", "F2", "F3"]);
        assert_eq!(route.total_pigs(), 120);
        assert!(route.time_hours <= 8.0);
    }

    #[test]
    fn test_hour_budget_limits_route() {
        let builder = RouteBuilder::new(&SimulationConfig::default());
        let f = farm("F1", 45.0, 2.0, 50, 100.0); // 约 445 km 单程
        let p = plant("S1", 41.0, 2.0);
        assert!(builder
            .build(&[&f], &[&p], &truck(20_000.0), budget(20_000.0))
            .is_none());
    }

    #[test]
    fn test_pickup_capped_by_destination_intake() {
        let builder = RouteBuilder::new(&SimulationConfig::default());
        let big = farm("F1", 41.90, 2.20, 150, 100.0);
        let small = farm("F2", 41.91, 2.20, 50, 100.0);
        let mut p = plant("S1", 41.80, 2.20);
        p.daily_capacity = 100.0;

        let route = builder
            .build(&[&big, &small], &[&p], &truck(50_000.0), budget(50_000.0))
            .unwrap();
        // 种子装满剩余接收能力后不再追加
        assert_eq!(route.stops.len(), 1);
        assert_eq!(route.stops[0].site_id, "F1");
        assert_eq!(route.total_pigs(), 100);

        p.receive(70, 7_000.0);
        let route = builder
            .build(&[&big, &small], &[&p], &truck(50_000.0), budget(50_000.0))
            .unwrap();
        assert_eq!(route.total_pigs(), 30);
    }

    #[test]
    fn test_intake_limit_in_kilograms() {
        let mut p = plant("S1", 41.80, 2.20);
        p.capacity_unit = IntakeUnit::Kilograms;
        assert_eq!(RouteBuilder::intake_limit(&p, 1_050.0, 100.0), 10);
        assert_eq!(RouteBuilder::intake_limit(&p, 99.0, 100.0), 0);
        p.capacity_unit = IntakeUnit::Head;
        assert_eq!(RouteBuilder::intake_limit(&p, 7.5, 100.0), 7);
    }

    #[test]
    fn test_full_destination_yields_none() {
        let builder = RouteBuilder::new(&SimulationConfig::default());
        let f = farm("F1", 41.90, 2.20, 50, 100.0);
        let mut p = plant("S1", 41.80, 2.20);
        p.daily_capacity = 40.0;
        p.receive(40, 4_000.0);
        assert!(builder
            .build(&[&f], &[&p], &truck(20_000.0), budget(20_000.0))
            .is_none());
    }

    #[test]
    fn test_empty_inputs_yield_none() {
        let builder = RouteBuilder::new(&SimulationConfig::default());
        let f = farm("F1", 41.9, 2.2, 50, 100.0);
        assert!(builder.build(&[&f], &[], &truck(1_000.0), budget(1_000.0)).is_none());
        let p = plant("S1", 41.8, 2.2);
        assert!(builder.build(&[], &[&p], &truck(1_000.0), budget(1_000.0)).is_none());
    }
}
