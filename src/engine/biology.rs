// ==========================================
// 生猪运输排程仿真 - 生长模型
// ==========================================
// 职责: 根据日龄推进体重与采食量
// 输入: 养殖场当前状态 + 经过天数
// 输出: 新平均体重 + 新单头日采食量 + 新日龄
// 红线: 纯函数, 拒绝负的经过时间, 体重单调不减
// ==========================================

use crate::domain::age_table::AgeTable;
use crate::domain::farm::ProductionSite;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BiologyError {
    #[error("经过天数非法: {0} (必须为非负有限值)")]
    NegativeElapsed(f64),
}

/// 生长推进结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthUpdate {
    pub avg_weight_kg: f64,
    pub consumption_kg_per_day: f64,
    pub age_weeks: f64,
}

// ==========================================
// GrowthModel - 生长模型
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct GrowthModel {
    weight_table: Option<AgeTable>,
    consumption_table: Option<AgeTable>,
}

impl GrowthModel {
    pub fn new(weight_table: Option<AgeTable>, consumption_table: Option<AgeTable>) -> Self {
        Self {
            weight_table,
            consumption_table,
        }
    }

    /// 周增重 (kg/周)
    ///
    /// # 规则
    /// - 有体重表: 取当前日龄档位的斜率, 末档之后保持末档斜率
    /// - 无体重表: 使用养殖场自身 growth_rate_kg_per_week
    /// - 负值截断为 0 (体重单调不减)
    fn weekly_gain(&self, site: &ProductionSite, age_weeks: f64) -> f64 {
        let gain = match &self.weight_table {
            Some(table) => table.weekly_slope(age_weeks),
            None => site.growth_rate_kg_per_week,
        };
        gain.max(0.0)
    }

    /// 推进生长状态 (不修改养殖场)
    ///
    /// # 参数
    /// - `site`: 养殖场当前状态
    /// - `days_elapsed`: 经过天数 (允许小数, 必须 >= 0)
    ///
    /// # 返回
    /// - days_elapsed == 0: 原样返回当前体重/采食量
    /// - 否则按天积分后的新状态
    pub fn advance(
        &self,
        site: &ProductionSite,
        days_elapsed: f64,
    ) -> Result<GrowthUpdate, BiologyError> {
        if !days_elapsed.is_finite() || days_elapsed < 0.0 {
            return Err(BiologyError::NegativeElapsed(days_elapsed));
        }

        if days_elapsed == 0.0 {
            return Ok(GrowthUpdate {
                avg_weight_kg: site.avg_weight_kg,
                consumption_kg_per_day: site.consumption_kg_per_day,
                age_weeks: site.age_weeks,
            });
        }

        // 日龄由起点 + 已积分天数计算, 避免逐步累加的浮点漂移
        let mut weight = site.avg_weight_kg;
        let mut elapsed = 0.0;
        while elapsed < days_elapsed {
            let step = (days_elapsed - elapsed).min(1.0);
            let age = site.age_weeks + elapsed / 7.0;
            weight += self.weekly_gain(site, age) * step / 7.0;
            elapsed += step;
        }
        let age = site.age_weeks + days_elapsed / 7.0;

        let consumption = match &self.consumption_table {
            Some(table) => table.lookup(age).max(0.0),
            None => site.consumption_kg_per_day,
        };

        Ok(GrowthUpdate {
            avg_weight_kg: weight,
            consumption_kg_per_day: consumption,
            age_weeks: age,
        })
    }

    /// 推进并写回养殖场
    pub fn apply(
        &self,
        site: &mut ProductionSite,
        days_elapsed: f64,
    ) -> Result<GrowthUpdate, BiologyError> {
        let update = self.advance(site, days_elapsed)?;
        site.avg_weight_kg = update.avg_weight_kg;
        site.consumption_kg_per_day = update.consumption_kg_per_day;
        site.age_weeks = update.age_weeks;
        Ok(update)
    }

    /// 养殖场日采食总量 (kg)
    pub fn daily_feed_kg(site: &ProductionSite) -> f64 {
        site.inventory_pigs as f64 * site.consumption_kg_per_day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> ProductionSite {
        ProductionSite::new("F001", "Granja", 41.9, 2.2, 100, 100.0, 7.0, 22.0, 1.4, 2.5, 100)
    }

    fn tables() -> GrowthModel {
        let weight = AgeTable::from_pairs("weight", &[(20.0, 90.0), (22.0, 100.0), (24.0, 114.0)])
            .unwrap();
        let consumption =
            AgeTable::from_pairs("consumption", &[(20.0, 2.4), (23.0, 2.8), (25.0, 3.1)]).unwrap();
        GrowthModel::new(Some(weight), Some(consumption))
    }

    #[test]
    fn test_zero_elapsed_is_idempotent() {
        let model = tables();
        let s = site();
        let first = model.advance(&s, 0.0).unwrap();
        let second = model.advance(&s, 0.0).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.avg_weight_kg, s.avg_weight_kg);
        assert_eq!(first.consumption_kg_per_day, s.consumption_kg_per_day);
    }

    #[test]
    fn test_negative_elapsed_rejected() {
        let model = GrowthModel::default();
        assert_eq!(
            model.advance(&site(), -1.0),
            Err(BiologyError::NegativeElapsed(-1.0))
        );
        assert!(model.advance(&site(), f64::NAN).is_err());
    }

    #[test]
    fn test_fallback_uses_site_growth_rate() {
        let model = GrowthModel::default();
        let update = model.advance(&site(), 7.0).unwrap();
        assert!((update.avg_weight_kg - 107.0).abs() < 1e-9);
        assert!((update.age_weeks - 23.0).abs() < 1e-9);
        assert_eq!(update.consumption_kg_per_day, 2.5);
    }

    #[test]
    fn test_table_slope_and_consumption_lookup() {
        let model = tables();
        // 22 周档位斜率 = (114-100)/2 = 7 kg/周
        let update = model.advance(&site(), 7.0).unwrap();
        assert!((update.avg_weight_kg - 107.0).abs() < 1e-9);
        assert_eq!(update.consumption_kg_per_day, 2.8); // 23 周档位
    }

    #[test]
    fn test_beyond_table_holds_last_rate() {
        let model = tables();
        let mut s = site();
        s.age_weeks = 40.0;
        let update = model.advance(&s, 7.0).unwrap();
        assert!((update.avg_weight_kg - 107.0).abs() < 1e-9);
        assert_eq!(update.consumption_kg_per_day, 3.1);
    }

    #[test]
    fn test_weight_never_decreases() {
        let weight = AgeTable::from_pairs("weight", &[(20.0, 100.0), (22.0, 90.0)]).unwrap();
        let model = GrowthModel::new(Some(weight), None);
        let update = model.advance(&site(), 3.0).unwrap();
        assert_eq!(update.avg_weight_kg, 100.0);
    }

    #[test]
    fn test_apply_writes_back() {
        let model = GrowthModel::default();
        let mut s = site();
        model.apply(&mut s, 1.0).unwrap();
        assert!((s.avg_weight_kg - 101.0).abs() < 1e-9);
        assert_eq!(GrowthModel::daily_feed_kg(&s), 250.0);
    }
}
