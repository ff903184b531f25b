// ==========================================
// 生猪运输排程仿真 - 路线与交付记录
// ==========================================
// Route: 单日临时对象, 只在当日构建/提交
// DeliveryEvent: 已提交路线的输出记录
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// RouteStop - 路线停靠点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub site_id: String,
    pub pigs: u32,
    pub avg_weight_kg: f64, // 装车时的平均体重
}

impl RouteStop {
    pub fn weight_kg(&self) -> f64 {
        self.pigs as f64 * self.avg_weight_kg
    }
}

// ==========================================
// Route - 单车单趟路线
// ==========================================
// 距离: 屠宰场 → 养殖场1 → ... → 养殖场N → 屠宰场
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub vehicle_id: String,
    pub destination_id: String,
    pub stops: Vec<RouteStop>,
    pub distance_km: f64,
    pub time_hours: f64, // 行驶 + 装车服务
}

impl Route {
    pub fn total_pigs(&self) -> u32 {
        self.stops.iter().map(|s| s.pigs).sum()
    }

    pub fn total_weight_kg(&self) -> f64 {
        self.stops.iter().map(RouteStop::weight_kg).sum()
    }

    /// 交付时的平均体重 (按头数加权)
    pub fn avg_weight_kg(&self) -> f64 {
        let pigs = self.total_pigs();
        if pigs == 0 {
            return 0.0;
        }
        self.total_weight_kg() / pigs as f64
    }

    pub fn site_ids(&self) -> impl Iterator<Item = &str> {
        self.stops.iter().map(|s| s.site_id.as_str())
    }

    pub fn visits(&self, site_id: &str) -> bool {
        self.stops.iter().any(|s| s.site_id == site_id)
    }
}

// ==========================================
// DeliveryEvent - 交付事件 (输出日志)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEvent {
    // ===== 时间与标识 =====
    pub day: u32,
    pub plan_date: Option<NaiveDate>,
    pub route_id: String,

    // ===== 车辆与目的地 =====
    pub vehicle_id: String,
    pub vehicle_category: String,
    pub destination_id: String,
    pub destination_name: String,

    // ===== 装运 =====
    pub stops: Vec<RouteStop>,
    pub pigs_delivered: u32,
    pub delivered_weight_kg: f64,
    pub avg_weight_kg: f64,
    pub distance_km: f64,
    pub time_hours: f64,
    pub capacity_utilization_pct: f64,

    // ===== 经济 =====
    pub revenue: f64,
    pub penalty_rate: f64,
    pub penalty: f64,
    pub transport_cost: f64,
    pub fixed_cost_share: f64,
    pub profit: f64,
}

impl DeliveryEvent {
    /// 以新的固定成本分摊重算利润
    pub fn apply_fixed_cost_share(&mut self, share: f64) {
        self.fixed_cost_share = share;
        self.profit = self.revenue - self.penalty - self.transport_cost - share;
    }
}

// ==========================================
// RejectedRoute - 被屠宰场能力拒收的路线
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRoute {
    pub day: u32,
    pub vehicle_id: String,
    pub destination_id: String,
    pub site_ids: Vec<String>,
    pub pigs: u32,
    pub weight_kg: f64,
    pub remaining_capacity: f64,
    pub reason: String,
}
