// ==========================================
// 生猪运输排程仿真 - 领域类型定义
// ==========================================
// 职责: 跨模块共享的枚举类型
// 序列化格式: snake_case (与配置文件一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 屠宰场日接收能力单位 (Intake Unit)
// ==========================================
// 源数据 capacity_per_day 以头数计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeUnit {
    #[default]
    Head,      // 头数
    Kilograms, // 活重公斤
}

impl fmt::Display for IntakeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntakeUnit::Head => write!(f, "head"),
            IntakeUnit::Kilograms => write!(f, "kg"),
        }
    }
}

impl FromStr for IntakeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "head" | "heads" | "pigs" => Ok(IntakeUnit::Head),
            "kg" | "kilograms" => Ok(IntakeUnit::Kilograms),
            other => Err(format!("unknown intake unit '{}'", other)),
        }
    }
}

// ==========================================
// 罚金费率取值策略 (Penalty Rate Policy)
// ==========================================
// 每个罚金档位配置了 min/max 两个费率,
// 整个运行期间只能使用同一种取值策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyRatePolicy {
    Minimum,
    #[default]
    Midpoint,
    Maximum,
}

impl PenaltyRatePolicy {
    /// 从档位的费率区间取出单一费率
    pub fn resolve(&self, min_rate: f64, max_rate: f64) -> f64 {
        match self {
            PenaltyRatePolicy::Minimum => min_rate,
            PenaltyRatePolicy::Midpoint => (min_rate + max_rate) / 2.0,
            PenaltyRatePolicy::Maximum => max_rate,
        }
    }
}

impl fmt::Display for PenaltyRatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyRatePolicy::Minimum => write!(f, "minimum"),
            PenaltyRatePolicy::Midpoint => write!(f, "midpoint"),
            PenaltyRatePolicy::Maximum => write!(f, "maximum"),
        }
    }
}

impl FromStr for PenaltyRatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimum" | "min" => Ok(PenaltyRatePolicy::Minimum),
            "midpoint" | "mid" => Ok(PenaltyRatePolicy::Midpoint),
            "maximum" | "max" => Ok(PenaltyRatePolicy::Maximum),
            other => Err(format!("unknown penalty rate policy '{}'", other)),
        }
    }
}

// ==========================================
// 罚金计算基准 (Penalty Basis)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyBasis {
    #[default]
    PerKilogram,     // 罚金 = 交付重量 × 费率
    RevenueFraction, // 罚金 = 收入 × 费率 (源数据的百分比语义)
}

impl fmt::Display for PenaltyBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyBasis::PerKilogram => write!(f, "per_kg"),
            PenaltyBasis::RevenueFraction => write!(f, "revenue_fraction"),
        }
    }
}

impl FromStr for PenaltyBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_kg" | "per_kilogram" => Ok(PenaltyBasis::PerKilogram),
            "revenue_fraction" | "fraction" => Ok(PenaltyBasis::RevenueFraction),
            other => Err(format!("unknown penalty basis '{}'", other)),
        }
    }
}

// ==========================================
// 单日仿真阶段 (Day Phase)
// ==========================================
// 顺序: PrepareDay → SelectEligible → BuildRoutes → EnforceCapacity → Commit → Summarize
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayPhase {
    PrepareDay,
    SelectEligible,
    BuildRoutes,
    EnforceCapacity,
    Commit,
    Summarize,
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayPhase::PrepareDay => write!(f, "PREPARE_DAY"),
            DayPhase::SelectEligible => write!(f, "SELECT_ELIGIBLE"),
            DayPhase::BuildRoutes => write!(f, "BUILD_ROUTES"),
            DayPhase::EnforceCapacity => write!(f, "ENFORCE_CAPACITY"),
            DayPhase::Commit => write!(f, "COMMIT"),
            DayPhase::Summarize => write!(f, "SUMMARIZE"),
        }
    }
}
