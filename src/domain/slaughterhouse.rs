// ==========================================
// 生猪运输排程仿真 - 屠宰场领域模型
// ==========================================
// 红线: 日接收能力约束, 整车接收或整车拒收 (不允许部分接收)
// 红线: 罚金档位不重叠且按体重单调排序
// ==========================================

use crate::domain::error::{check_coordinates, check_non_negative, ValidationError};
use crate::domain::types::IntakeUnit;
use serde::{Deserialize, Serialize};

// ==========================================
// PenaltyTier - 体重罚金档位
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyTier {
    pub min_kg: f64,
    pub min_inclusive: bool,
    pub max_kg: f64,       // 可为 f64::INFINITY
    pub max_inclusive: bool,
    pub min_rate: f64,
    pub max_rate: f64,
}

impl PenaltyTier {
    /// 半开区间 [min_kg, max_kg)
    pub fn half_open(min_kg: f64, max_kg: f64, min_rate: f64, max_rate: f64) -> Self {
        Self {
            min_kg,
            min_inclusive: true,
            max_kg,
            max_inclusive: false,
            min_rate,
            max_rate,
        }
    }

    /// 单一费率档位
    pub fn flat(
        min_kg: f64,
        min_inclusive: bool,
        max_kg: f64,
        max_inclusive: bool,
        rate: f64,
    ) -> Self {
        Self {
            min_kg,
            min_inclusive,
            max_kg,
            max_inclusive,
            min_rate: rate,
            max_rate: rate,
        }
    }

    /// 体重是否落在本档位
    pub fn contains(&self, weight_kg: f64) -> bool {
        let above_min = if self.min_inclusive {
            weight_kg >= self.min_kg
        } else {
            weight_kg > self.min_kg
        };
        let below_max = if self.max_inclusive {
            weight_kg <= self.max_kg
        } else {
            weight_kg < self.max_kg
        };
        above_min && below_max
    }

    /// 本档位是否严格位于 previous 之后 (不重叠)
    fn follows(&self, previous: &PenaltyTier) -> bool {
        if previous.max_kg < self.min_kg {
            return true;
        }
        previous.max_kg == self.min_kg && !(previous.max_inclusive && self.min_inclusive)
    }

    /// 由源数据的嵌套理想区间生成档位
    ///
    /// # 规则 (源数据列 penalty_15_* / penalty_20_*)
    /// - 体重 < p20_min 或 > p20_max → 20%
    /// - 体重在 [p20_min, p15_min) 或 (p15_max, p20_max] → 15%
    /// - 体重在 [p15_min, p15_max] → 无罚金 (不生成档位)
    pub fn from_legacy_bands(
        p15_min: f64,
        p15_max: f64,
        p20_min: f64,
        p20_max: f64,
    ) -> Result<Vec<PenaltyTier>, String> {
        let ordered = p20_min <= p15_min && p15_min <= p15_max && p15_max <= p20_max;
        if !ordered || ![p15_min, p15_max, p20_min, p20_max].iter().all(|v| v.is_finite()) {
            return Err(format!(
                "需满足 penalty_20_min <= penalty_15_min <= penalty_15_max <= penalty_20_max, 实际 {} / {} / {} / {}",
                p20_min, p15_min, p15_max, p20_max
            ));
        }

        let mut tiers = Vec::with_capacity(4);
        if p20_min > 0.0 {
            tiers.push(PenaltyTier::flat(0.0, true, p20_min, false, 0.20));
        }
        if p15_min > p20_min {
            tiers.push(PenaltyTier::flat(p20_min, true, p15_min, false, 0.15));
        }
        if p20_max > p15_max {
            tiers.push(PenaltyTier::flat(p15_max, false, p20_max, true, 0.15));
        }
        tiers.push(PenaltyTier::flat(p20_max, false, f64::INFINITY, false, 0.20));
        Ok(tiers)
    }
}

// ==========================================
// ProcessingSite - 屠宰场
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingSite {
    // ===== 主数据 =====
    pub site_id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,

    // ===== 能力与价格 =====
    pub daily_capacity: f64,            // 日接收能力
    pub capacity_unit: IntakeUnit,      // 能力单位 (头/公斤)
    pub price_per_kg: f64,              // 收购价 (每公斤活重)
    pub penalty_tiers: Vec<PenaltyTier>,

    // ===== 运行期状态 (仿真器独占写入) =====
    pub received_today_pigs: u32,
    pub received_today_kg: f64,
}

impl ProcessingSite {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        site_id: impl Into<String>,
        name: impl Into<String>,
        lat: f64,
        lon: f64,
        daily_capacity: f64,
        capacity_unit: IntakeUnit,
        price_per_kg: f64,
        penalty_tiers: Vec<PenaltyTier>,
    ) -> Self {
        Self {
            site_id: site_id.into(),
            name: name.into(),
            lat,
            lon,
            daily_capacity,
            capacity_unit,
            price_per_kg,
            penalty_tiers,
            received_today_pigs: 0,
            received_today_kg: 0.0,
        }
    }

    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// 字段校验 (含档位重叠检查)
    pub fn validate(&self) -> Result<(), ValidationError> {
        const ENTITY: &str = "屠宰场";
        if self.site_id.trim().is_empty() {
            return Err(ValidationError::EmptyId { entity: ENTITY });
        }
        check_coordinates(ENTITY, &self.site_id, self.lat, self.lon)?;
        check_non_negative(ENTITY, &self.site_id, "daily_capacity", self.daily_capacity)?;
        check_non_negative(ENTITY, &self.site_id, "price_per_kg", self.price_per_kg)?;

        for (index, tier) in self.penalty_tiers.iter().enumerate() {
            let range_ok = tier.min_kg < tier.max_kg
                || (tier.min_kg == tier.max_kg && tier.min_inclusive && tier.max_inclusive);
            if tier.min_kg.is_nan() || tier.max_kg.is_nan() || !range_ok {
                return Err(ValidationError::field(
                    ENTITY,
                    &self.site_id,
                    "penalty_tiers",
                    format!("档位 {} 体重区间非法 [{}, {}]", index, tier.min_kg, tier.max_kg),
                ));
            }
            check_non_negative(ENTITY, &self.site_id, "penalty_tiers.min_rate", tier.min_rate)?;
            check_non_negative(ENTITY, &self.site_id, "penalty_tiers.max_rate", tier.max_rate)?;
            if tier.min_rate > tier.max_rate {
                return Err(ValidationError::field(
                    ENTITY,
                    &self.site_id,
                    "penalty_tiers",
                    format!("档位 {} min_rate > max_rate", index),
                ));
            }
            if index > 0 && !tier.follows(&self.penalty_tiers[index - 1]) {
                return Err(ValidationError::OverlappingTiers {
                    id: self.site_id.clone(),
                    index,
                });
            }
        }
        Ok(())
    }

    /// 查找体重所在档位 (无匹配返回 None, 即无罚金)
    pub fn tier_for_weight(&self, weight_kg: f64) -> Option<&PenaltyTier> {
        self.penalty_tiers.iter().find(|tier| tier.contains(weight_kg))
    }

    /// 已接收量 (按能力单位)
    pub fn received_today(&self) -> f64 {
        match self.capacity_unit {
            IntakeUnit::Head => self.received_today_pigs as f64,
            IntakeUnit::Kilograms => self.received_today_kg,
        }
    }

    /// 重置日接收计数
    pub fn reset_daily_intake(&mut self) {
        self.received_today_pigs = 0;
        self.received_today_kg = 0.0;
    }

    /// 记录一次接收
    pub fn receive(&mut self, pigs: u32, weight_kg: f64) {
        self.received_today_pigs += pigs;
        self.received_today_kg += weight_kg;
    }
}

// ==========================================
// Trait: IntakeConstraint
// ==========================================
// 用途: 日接收能力约束检查接口
pub trait IntakeConstraint {
    /// 检查整车是否可接收
    fn can_accept(&self, pigs: u32, weight_kg: f64) -> bool;

    /// 计算剩余能力 (按能力单位)
    fn remaining_capacity(&self) -> f64;

    /// 计算能力利用率 (0.0 - 1.0)
    fn utilization_ratio(&self) -> f64;
}

impl IntakeConstraint for ProcessingSite {
    /// 检查是否可接收
    ///
    /// # 返回
    /// - `true`: 接收后不超过 daily_capacity
    /// - `false`: 会超过 daily_capacity (整车拒收)
    fn can_accept(&self, pigs: u32, weight_kg: f64) -> bool {
        let load = match self.capacity_unit {
            IntakeUnit::Head => pigs as f64,
            IntakeUnit::Kilograms => weight_kg,
        };
        self.received_today() + load <= self.daily_capacity
    }

    fn remaining_capacity(&self) -> f64 {
        (self.daily_capacity - self.received_today()).max(0.0)
    }

    fn utilization_ratio(&self) -> f64 {
        if self.daily_capacity <= 0.0 {
            return 0.0;
        }
        self.received_today() / self.daily_capacity
    }
}
