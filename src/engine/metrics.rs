// ==========================================
// 生猪运输排程仿真 - 指标汇总
// ==========================================
// 职责: 日汇总 (DaySummary) 与全程 KPI (RunKpis)
// 输入: 交付事件日志 + 日汇总
// ==========================================

use crate::domain::route::DeliveryEvent;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DaySummary - 单日汇总 (每个仿真日一行, 含空闲日)
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DaySummary {
    pub day: u32,
    pub plan_date: Option<NaiveDate>,
    pub routes: u32,
    pub rejected_routes: u32,
    pub pigs_delivered: u32,
    pub delivered_weight_kg: f64,
    pub distance_km: f64,
    pub time_hours: f64,
    pub revenue: f64,
    pub penalty: f64,
    pub transport_cost: f64,
    pub fixed_cost: f64,      // 路线分摊 + 空闲车辆固定成本
    pub idle_fixed_cost: f64, // 本周无路线车辆的固定成本 (记在周末日)
    pub profit: f64,
    pub feed_consumed_kg: f64,
    pub plant_utilization_pct: f64, // 屠宰场日接收能力平均利用率
}

/// 每日 KPI 行 (daily_kpis.csv)
pub type DayKpis = DaySummary;

impl DaySummary {
    /// 由当日交付事件汇总
    ///
    /// # 参数
    /// - `events`: 当日交付事件
    /// - `rejected_routes`: 当日被拒收路线数
    /// - `feed_consumed_kg`: 当日全部养殖场采食量
    /// - `idle_fixed_cost`: 记到当日的空闲车辆固定成本
    pub fn from_events(
        day: u32,
        plan_date: Option<NaiveDate>,
        events: &[DeliveryEvent],
        rejected_routes: u32,
        feed_consumed_kg: f64,
        idle_fixed_cost: f64,
    ) -> Self {
        let mut summary = DaySummary {
            day,
            plan_date,
            rejected_routes,
            feed_consumed_kg,
            idle_fixed_cost,
            ..Default::default()
        };
        for event in events.iter().filter(|e| e.day == day) {
            summary.routes += 1;
            summary.pigs_delivered += event.pigs_delivered;
            summary.delivered_weight_kg += event.delivered_weight_kg;
            summary.distance_km += event.distance_km;
            summary.time_hours += event.time_hours;
            summary.revenue += event.revenue;
            summary.penalty += event.penalty;
            summary.transport_cost += event.transport_cost;
            summary.fixed_cost += event.fixed_cost_share;
        }
        summary.fixed_cost += idle_fixed_cost;
        summary.profit =
            summary.revenue - summary.penalty - summary.transport_cost - summary.fixed_cost;
        summary
    }

    /// 记录日终屠宰场平均利用率 (百分比)
    pub fn with_plant_utilization(mut self, plant_utilization_pct: f64) -> Self {
        self.plant_utilization_pct = plant_utilization_pct;
        self
    }
}

// ==========================================
// RunKpis - 全程 KPI
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunKpis {
    pub total_pigs_delivered: u64,
    pub total_weight_kg: f64,
    pub total_distance_km: f64,
    pub total_time_hours: f64,
    pub total_revenue: f64,
    pub total_penalty: f64,
    pub total_transport_cost: f64,
    pub total_fixed_cost: f64,
    pub net_profit: f64,
    pub num_routes: u32,
    pub rejected_routes: u32,
    pub avg_pigs_per_route: f64,
    pub avg_distance_per_route_km: f64,
    pub avg_time_per_route_h: f64,
    pub avg_weight_kg: f64,   // 按头数加权
    pub cost_per_kg: f64,     // (运输 + 固定) / 交付公斤
    pub avg_capacity_utilization_pct: f64,
    pub avg_plant_utilization_pct: f64,
    pub total_feed_consumed_kg: f64,
}

impl RunKpis {
    /// 计算全程 KPI
    ///
    /// 成本与利润取自日汇总 (已含空闲固定成本), 运量取自事件
    pub fn compute(events: &[DeliveryEvent], summaries: &[DaySummary]) -> Self {
        let mut kpis = RunKpis {
            num_routes: events.len() as u32,
            ..Default::default()
        };

        let mut weighted_weight = 0.0;
        let mut utilization = 0.0;
        for event in events {
            kpis.total_pigs_delivered += event.pigs_delivered as u64;
            kpis.total_weight_kg += event.delivered_weight_kg;
            kpis.total_distance_km += event.distance_km;
            kpis.total_time_hours += event.time_hours;
            kpis.total_revenue += event.revenue;
            kpis.total_penalty += event.penalty;
            kpis.total_transport_cost += event.transport_cost;
            weighted_weight += event.avg_weight_kg * event.pigs_delivered as f64;
            utilization += event.capacity_utilization_pct;
        }

        for summary in summaries {
            kpis.total_fixed_cost += summary.fixed_cost;
            kpis.rejected_routes += summary.rejected_routes;
            kpis.total_feed_consumed_kg += summary.feed_consumed_kg;
            kpis.avg_plant_utilization_pct += summary.plant_utilization_pct;
        }
        if !summaries.is_empty() {
            kpis.avg_plant_utilization_pct /= summaries.len() as f64;
        }

        kpis.net_profit = kpis.total_revenue
            - kpis.total_penalty
            - kpis.total_transport_cost
            - kpis.total_fixed_cost;

        if kpis.num_routes > 0 {
            let n = kpis.num_routes as f64;
            kpis.avg_pigs_per_route = kpis.total_pigs_delivered as f64 / n;
            kpis.avg_distance_per_route_km = kpis.total_distance_km / n;
            kpis.avg_time_per_route_h = kpis.total_time_hours / n;
            kpis.avg_capacity_utilization_pct = utilization / n;
        }
        if kpis.total_pigs_delivered > 0 {
            kpis.avg_weight_kg = weighted_weight / kpis.total_pigs_delivered as f64;
        }
        if kpis.total_weight_kg > 0.0 {
            kpis.cost_per_kg =
                (kpis.total_transport_cost + kpis.total_fixed_cost) / kpis.total_weight_kg;
        }
        kpis
    }
}
