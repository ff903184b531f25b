// ==========================================
// 生猪运输排程仿真 - 仿真参数
// ==========================================
// 职责: 仿真核心的全部可调参数 + 合法性校验
// 红线: 非法配置在仿真开始前拒绝
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::types::{PenaltyBasis, PenaltyRatePolicy};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// 默认仿真天数 (工作日)
pub const DEFAULT_HORIZON_DAYS: i64 = 10;
/// 默认单趟最多停靠养殖场数
pub const DEFAULT_MAX_STOPS_PER_ROUTE: usize = 3;
/// 默认车辆日工作时长上限 (小时)
pub const DEFAULT_MAX_HOURS_PER_DAY: f64 = 8.0;
/// 默认平均车速 (km/h)
pub const DEFAULT_SPEED_KMH: f64 = 60.0;
/// 默认单站装车服务时长 (小时)
pub const DEFAULT_SERVICE_HOURS_PER_STOP: f64 = 0.5;
/// 物流周长度 (天)
pub const DEFAULT_REVISIT_INTERVAL_DAYS: u32 = 7;

// ==========================================
// SimulationConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // ===== 仿真窗口 =====
    pub horizon_days: i64,
    pub start_date: Option<NaiveDate>,

    // ===== 路线约束 =====
    pub max_stops_per_route: usize,
    pub max_hours_per_day: f64,
    pub speed_kmh: f64,
    pub service_hours_per_stop: f64,

    // ===== 准入 =====
    pub revisit_interval_days: u32,
    pub min_deliverable_pigs: u32,
    pub min_market_weight_kg: Option<f64>,

    // ===== 经济 =====
    pub penalty_rate_policy: PenaltyRatePolicy,
    pub penalty_basis: PenaltyBasis,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            start_date: None,
            max_stops_per_route: DEFAULT_MAX_STOPS_PER_ROUTE,
            max_hours_per_day: DEFAULT_MAX_HOURS_PER_DAY,
            speed_kmh: DEFAULT_SPEED_KMH,
            service_hours_per_stop: DEFAULT_SERVICE_HOURS_PER_STOP,
            revisit_interval_days: DEFAULT_REVISIT_INTERVAL_DAYS,
            min_deliverable_pigs: 1,
            min_market_weight_kg: None,
            penalty_rate_policy: PenaltyRatePolicy::default(),
            penalty_basis: PenaltyBasis::default(),
        }
    }
}

impl SimulationConfig {
    /// 校验配置
    ///
    /// # 规则
    /// - horizon_days >= 1
    /// - max_stops_per_route >= 1
    /// - max_hours_per_day > 0, speed_kmh > 0
    /// - service_hours_per_stop >= 0
    /// - revisit_interval_days >= 1
    /// - min_market_weight_kg (若有) 非负有限
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_days <= 0 {
            return Err(ConfigError::InvalidHorizon(self.horizon_days));
        }
        if self.max_stops_per_route == 0 {
            return Err(ConfigError::invalid("max_stops_per_route", "必须 >= 1"));
        }
        if !(self.max_hours_per_day.is_finite() && self.max_hours_per_day > 0.0) {
            return Err(ConfigError::invalid(
                "max_hours_per_day",
                format!("必须 > 0, 实际 {}", self.max_hours_per_day),
            ));
        }
        if !(self.speed_kmh.is_finite() && self.speed_kmh > 0.0) {
            return Err(ConfigError::invalid(
                "speed_kmh",
                format!("必须 > 0, 实际 {}", self.speed_kmh),
            ));
        }
        if !(self.service_hours_per_stop.is_finite() && self.service_hours_per_stop >= 0.0) {
            return Err(ConfigError::invalid(
                "service_hours_per_stop",
                format!("必须 >= 0, 实际 {}", self.service_hours_per_stop),
            ));
        }
        if self.revisit_interval_days == 0 {
            return Err(ConfigError::invalid("revisit_interval_days", "必须 >= 1"));
        }
        if let Some(w) = self.min_market_weight_kg {
            if !(w.is_finite() && w >= 0.0) {
                return Err(ConfigError::invalid(
                    "min_market_weight_kg",
                    format!("必须为非负有限值, 实际 {}", w),
                ));
            }
        }
        Ok(())
    }

    /// 已校验的仿真天数
    pub fn horizon(&self) -> u32 {
        self.horizon_days.clamp(0, u32::MAX as i64) as u32
    }

    /// 仿真日对应的日历日期 (配置了 start_date 时)
    pub fn plan_date(&self, day: u32) -> Option<NaiveDate> {
        self.start_date
            .map(|start| start + Duration::days(day as i64))
    }

    /// 仿真日所属物流周
    pub fn week_of(&self, day: u32) -> u32 {
        day / self.revisit_interval_days.max(1)
    }

    /// 是否物流周第一天
    pub fn is_week_start(&self, day: u32) -> bool {
        day % self.revisit_interval_days.max(1) == 0
    }

    /// 是否需要在该日结束后做周结算 (周末或仿真最后一天)
    pub fn is_week_end(&self, day: u32) -> bool {
        (day + 1) % self.revisit_interval_days.max(1) == 0 || day + 1 >= self.horizon()
    }
}
