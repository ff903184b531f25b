// ==========================================
// 生猪运输排程仿真 - 运输车辆领域模型
// ==========================================
// 说明: 日工作时长上限来自仿真配置 (默认 8 小时)
// 周固定成本按周计一次, 与出车次数无关
// ==========================================

use crate::domain::error::{check_non_negative, ValidationError};
use serde::{Deserialize, Serialize};

// ==========================================
// Vehicle - 运输车辆
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: String,
    pub category: String,          // 车型
    pub capacity_kg: f64,          // 载重 (kg)
    pub cost_per_km: f64,          // 每公里可变成本
    pub max_hours_per_week: f64,   // 周工作时长上限
    pub fixed_weekly_cost: f64,    // 周固定成本
}

impl Vehicle {
    pub fn new(
        vehicle_id: impl Into<String>,
        category: impl Into<String>,
        capacity_kg: f64,
        cost_per_km: f64,
        max_hours_per_week: f64,
        fixed_weekly_cost: f64,
    ) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            category: category.into(),
            capacity_kg,
            cost_per_km,
            max_hours_per_week,
            fixed_weekly_cost,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        const ENTITY: &str = "车辆";
        if self.vehicle_id.trim().is_empty() {
            return Err(ValidationError::EmptyId { entity: ENTITY });
        }
        check_non_negative(ENTITY, &self.vehicle_id, "capacity_kg", self.capacity_kg)?;
        check_non_negative(ENTITY, &self.vehicle_id, "cost_per_km", self.cost_per_km)?;
        check_non_negative(
            ENTITY,
            &self.vehicle_id,
            "max_hours_per_week",
            self.max_hours_per_week,
        )?;
        check_non_negative(
            ENTITY,
            &self.vehicle_id,
            "fixed_weekly_cost",
            self.fixed_weekly_cost,
        )?;
        Ok(())
    }
}

// ==========================================
// VehicleUsage - 车辆运行期用量 (仿真器独占)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleUsage {
    pub hours_today: f64,
    pub hours_this_week: f64,
    pub routes_this_week: u32,
}

impl VehicleUsage {
    /// 剩余可用工时 = min(日剩余, 周剩余)
    pub fn remaining_hours(&self, vehicle: &Vehicle, max_hours_per_day: f64) -> f64 {
        let daily = max_hours_per_day - self.hours_today;
        let weekly = vehicle.max_hours_per_week - self.hours_this_week;
        daily.min(weekly).max(0.0)
    }

    pub fn record_route(&mut self, hours: f64) {
        self.hours_today += hours;
        self.hours_this_week += hours;
        self.routes_this_week += 1;
    }

    pub fn reset_day(&mut self) {
        self.hours_today = 0.0;
    }

    pub fn reset_week(&mut self) {
        self.hours_today = 0.0;
        self.hours_this_week = 0.0;
        self.routes_this_week = 0;
    }
}
