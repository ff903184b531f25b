// ==========================================
// 生猪运输排程仿真 - 养殖场领域模型
// ==========================================
// 红线: 已访问的养殖场在一个物流周内不可再次入选
// ==========================================

use crate::domain::error::{check_coordinates, check_non_negative, ValidationError};
use serde::{Deserialize, Serialize};

// ==========================================
// ProductionSite - 养殖场
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionSite {
    // ===== 主数据 =====
    pub site_id: String,                 // 养殖场ID (唯一)
    pub name: String,                    // 名称
    pub lat: f64,                        // 纬度
    pub lon: f64,                        // 经度

    // ===== 存栏与生长 =====
    pub inventory_pigs: u32,             // 当前存栏 (头)
    pub avg_weight_kg: f64,              // 当前平均体重 (kg)
    pub growth_rate_kg_per_week: f64,    // 周增重 (无年龄表时使用)
    pub age_weeks: f64,                  // 日龄 (周)
    pub price_per_kg: f64,               // 养殖场报价 (仅记录)
    pub consumption_kg_per_day: f64,     // 单头日采食量 (kg)
    pub max_pigs_per_visit: u32,         // 单次最大出栏头数

    // ===== 运行期状态 (仿真器独占写入) =====
    pub last_visit_day: Option<u32>,     // 上次被访问的仿真日
}

impl ProductionSite {
    /// 创建养殖场 (运行期状态为空)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        site_id: impl Into<String>,
        name: impl Into<String>,
        lat: f64,
        lon: f64,
        inventory_pigs: u32,
        avg_weight_kg: f64,
        growth_rate_kg_per_week: f64,
        age_weeks: f64,
        price_per_kg: f64,
        consumption_kg_per_day: f64,
        max_pigs_per_visit: u32,
    ) -> Self {
        Self {
            site_id: site_id.into(),
            name: name.into(),
            lat,
            lon,
            inventory_pigs,
            avg_weight_kg,
            growth_rate_kg_per_week,
            age_weeks,
            price_per_kg,
            consumption_kg_per_day,
            max_pigs_per_visit,
            last_visit_day: None,
        }
    }

    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// 字段校验
    pub fn validate(&self) -> Result<(), ValidationError> {
        const ENTITY: &str = "养殖场";
        if self.site_id.trim().is_empty() {
            return Err(ValidationError::EmptyId { entity: ENTITY });
        }
        check_coordinates(ENTITY, &self.site_id, self.lat, self.lon)?;
        check_non_negative(ENTITY, &self.site_id, "avg_weight_kg", self.avg_weight_kg)?;
        check_non_negative(
            ENTITY,
            &self.site_id,
            "growth_rate_kg_per_week",
            self.growth_rate_kg_per_week,
        )?;
        check_non_negative(ENTITY, &self.site_id, "age_weeks", self.age_weeks)?;
        check_non_negative(ENTITY, &self.site_id, "price_per_kg", self.price_per_kg)?;
        check_non_negative(
            ENTITY,
            &self.site_id,
            "consumption_kg_per_day",
            self.consumption_kg_per_day,
        )?;
        if self.max_pigs_per_visit == 0 {
            return Err(ValidationError::field(
                ENTITY,
                &self.site_id,
                "max_pigs_per_visit",
                "必须大于 0",
            ));
        }
        Ok(())
    }

    /// 是否处于再访问封锁期
    ///
    /// # 规则
    /// - 从未访问 → 不封锁
    /// - 否则 day - last_visit_day < revisit_interval_days → 封锁
    pub fn is_blocked_on(&self, day: u32, revisit_interval_days: u32) -> bool {
        match self.last_visit_day {
            None => false,
            Some(last) => day.saturating_sub(last) < revisit_interval_days,
        }
    }

    /// 本次访问可装运头数 (不考虑车辆容量)
    pub fn available_for_visit(&self) -> u32 {
        self.inventory_pigs.min(self.max_pigs_per_visit)
    }
}
