// ==========================================
// 生猪运输排程仿真 - 准入判定引擎
// ==========================================
// 职责: 筛选当日可服务的养殖场
// 规则:
// 1) 存栏 >= min_deliverable_pigs (存栏为 0 一律排除)
// 2) 不在物流周封锁期内
// 3) (可选) 平均体重 >= min_market_weight_kg
// 输出顺序: 存栏降序, 同存栏按 site_id 升序
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::farm::ProductionSite;
use std::cmp::Ordering;

/// 准入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    NoInventory,
    BelowThreshold,
    VisitedThisWeek,
    Underweight,
}

// ==========================================
// EligibilityEngine - 无状态引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    min_deliverable_pigs: u32,
    revisit_interval_days: u32,
    min_market_weight_kg: Option<f64>,
}

impl EligibilityEngine {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            min_deliverable_pigs: config.min_deliverable_pigs,
            revisit_interval_days: config.revisit_interval_days,
            min_market_weight_kg: config.min_market_weight_kg,
        }
    }

    /// 单个养殖场准入判定
    pub fn evaluate(&self, site: &ProductionSite, day: u32) -> Eligibility {
        if site.inventory_pigs == 0 {
            return Eligibility::NoInventory;
        }
        if site.inventory_pigs < self.min_deliverable_pigs {
            return Eligibility::BelowThreshold;
        }
        if site.is_blocked_on(day, self.revisit_interval_days) {
            return Eligibility::VisitedThisWeek;
        }
        if let Some(min_weight) = self.min_market_weight_kg {
            if site.avg_weight_kg < min_weight {
                return Eligibility::Underweight;
            }
        }
        Eligibility::Eligible
    }

    /// 筛选当日可服务养殖场 (返回下标, 已排序)
    pub fn select(&self, sites: &[ProductionSite], day: u32) -> Vec<usize> {
        let mut eligible: Vec<usize> = sites
            .iter()
            .enumerate()
            .filter(|(_, site)| self.evaluate(site, day) == Eligibility::Eligible)
            .map(|(idx, _)| idx)
            .collect();
        eligible.sort_by(|&a, &b| seed_order(&sites[a], &sites[b]));
        eligible
    }
}

/// 种子顺序: 存栏降序, 再按 site_id 升序
pub fn seed_order(a: &ProductionSite, b: &ProductionSite) -> Ordering {
    b.inventory_pigs
        .cmp(&a.inventory_pigs)
        .then_with(|| a.site_id.cmp(&b.site_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm(id: &str, pigs: u32) -> ProductionSite {
        ProductionSite::new(id, id, 41.9, 2.2, pigs, 110.0, 5.0, 24.0, 1.4, 2.5, 200)
    }

    #[test]
    fn test_threshold_boundary() {
        let config = SimulationConfig {
            min_deliverable_pigs: 50,
            ..Default::default()
        };
        let engine = EligibilityEngine::new(&config);
        assert_eq!(engine.evaluate(&farm("F1", 50), 0), Eligibility::Eligible);
        assert_eq!(engine.evaluate(&farm("F1", 49), 0), Eligibility::BelowThreshold);
        assert_eq!(engine.evaluate(&farm("F1", 0), 0), Eligibility::NoInventory);
    }

    #[test]
    fn test_visited_this_week_excluded() {
        let engine = EligibilityEngine::new(&SimulationConfig::default());
        let mut f = farm("F1", 100);
        f.last_visit_day = Some(1);
        assert_eq!(engine.evaluate(&f, 7), Eligibility::VisitedThisWeek);
        assert_eq!(engine.evaluate(&f, 8), Eligibility::Eligible);
    }

    #[test]
    fn test_min_market_weight() {
        let config = SimulationConfig {
            min_market_weight_kg: Some(115.0),
            ..Default::default()
        };
        let engine = EligibilityEngine::new(&config);
        assert_eq!(engine.evaluate(&farm("F1", 100), 0), Eligibility::Underweight);
    }

    #[test]
    fn test_select_orders_by_inventory_then_id() {
        let engine = EligibilityEngine::new(&SimulationConfig::default());
        let sites = vec![farm("F3", 100), farm("F1", 100), farm("F2", 300), farm("F4", 0)];
        let order = engine.select(&sites, 0);
        let ids: Vec<&str> = order.iter().map(|&i| sites[i].site_id.as_str()).collect();
        assert_eq!(ids, vec!["F2", "F1", "F3"]);
    }
}
