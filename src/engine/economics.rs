// ==========================================
// 生猪运输排程仿真 - 经济核算
// ==========================================
// 职责: 单条路线的收入、罚金、运输成本、固定成本分摊、利润
// 红线: 纯函数, 不读写仿真状态
// ==========================================
// 利润 = 收入 - 罚金 - 可变运输成本 - 周固定成本分摊
// ==========================================

use crate::domain::route::Route;
use crate::domain::slaughterhouse::ProcessingSite;
use crate::domain::types::{PenaltyBasis, PenaltyRatePolicy};
use crate::domain::vehicle::Vehicle;
use serde::{Deserialize, Serialize};

/// 单条路线经济结果
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteEconomics {
    pub revenue: f64,
    pub penalty_rate: f64,
    pub penalty: f64,
    pub transport_cost: f64,
    pub fixed_cost_share: f64,
    pub profit: f64,
}

// ==========================================
// EconomicsCalculator
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct EconomicsCalculator {
    rate_policy: PenaltyRatePolicy,
    basis: PenaltyBasis,
}

impl EconomicsCalculator {
    pub fn new(rate_policy: PenaltyRatePolicy, basis: PenaltyBasis) -> Self {
        Self { rate_policy, basis }
    }

    /// 罚金费率: 平均体重所在档位的费率, 不在任何档位时为 0
    pub fn penalty_rate(&self, destination: &ProcessingSite, avg_weight_kg: f64) -> f64 {
        destination
            .tier_for_weight(avg_weight_kg)
            .map(|tier| self.rate_policy.resolve(tier.min_rate, tier.max_rate))
            .unwrap_or(0.0)
    }

    /// 核算单条路线
    ///
    /// # 参数
    /// - `route`: 已被接收的路线
    /// - `destination`: 目的屠宰场 (价格与罚金档位)
    /// - `vehicle`: 车辆 (每公里成本)
    /// - `fixed_cost_share`: 本趟分摊的周固定成本 (周结算前可为 0)
    pub fn evaluate(
        &self,
        route: &Route,
        destination: &ProcessingSite,
        vehicle: &Vehicle,
        fixed_cost_share: f64,
    ) -> RouteEconomics {
        let delivered_kg = route.total_weight_kg();
        let revenue = delivered_kg * destination.price_per_kg;
        let penalty_rate = self.penalty_rate(destination, route.avg_weight_kg());
        let penalty = match self.basis {
            PenaltyBasis::PerKilogram => delivered_kg * penalty_rate,
            PenaltyBasis::RevenueFraction => revenue * penalty_rate,
        };
        let transport_cost = route.distance_km * vehicle.cost_per_km;

        RouteEconomics {
            revenue,
            penalty_rate,
            penalty,
            transport_cost,
            fixed_cost_share,
            profit: revenue - penalty - transport_cost - fixed_cost_share,
        }
    }
}

/// 周固定成本按趟均摊 (0 趟时不分摊)
pub fn amortized_fixed_share(fixed_weekly_cost: f64, routes_this_week: u32) -> f64 {
    if routes_this_week == 0 {
        0.0
    } else {
        fixed_weekly_cost / routes_this_week as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::route::RouteStop;
    use crate::domain::slaughterhouse::PenaltyTier;
    use crate::domain::types::IntakeUnit;

    fn route(pigs: u32, weight: f64, distance_km: f64) -> Route {
        Route {
            vehicle_id: "T1".to_string(),
            destination_id: "S1".to_string(),
            stops: vec![RouteStop {
                site_id: "F1".to_string(),
                pigs,
                avg_weight_kg: weight,
            }],
            distance_km,
            time_hours: 1.0,
        }
    }

    fn plant(tiers: Vec<PenaltyTier>) -> ProcessingSite {
        ProcessingSite::new("S1", "Escorxador", 41.0, 2.0, 1_000.0, IntakeUnit::Head, 2.0, tiers)
    }

    #[test]
    fn test_worked_example() {
        // 5 头 × 100 kg = 500 kg, 单价 2.00, 罚金 0.10/kg, 40 km × 1.5, 周固定 500 / 5 趟
        let calc = EconomicsCalculator::new(PenaltyRatePolicy::Midpoint, PenaltyBasis::PerKilogram);
        let dest = plant(vec![PenaltyTier::half_open(90.0, 105.0, 0.10, 0.10)]);
        let truck = Vehicle::new("T1", "standard", 20_000.0, 1.5, 40.0, 500.0);
        let share = amortized_fixed_share(truck.fixed_weekly_cost, 5);
        let eco = calc.evaluate(&route(5, 100.0, 40.0), &dest, &truck, share);

        assert!((eco.revenue - 1000.0).abs() < 1e-9);
        assert!((eco.penalty - 50.0).abs() < 1e-9);
        assert!((eco.transport_cost - 60.0).abs() < 1e-9);
        assert!((eco.fixed_cost_share - 100.0).abs() < 1e-9);
        assert!((eco.profit - 790.0).abs() < 1e-9);
    }

    #[test]
    fn test_outside_tiers_has_no_penalty() {
        let calc = EconomicsCalculator::default();
        let dest = plant(vec![PenaltyTier::half_open(0.0, 95.0, 0.15, 0.25)]);
        assert_eq!(calc.penalty_rate(&dest, 110.0), 0.0);
        assert!((calc.penalty_rate(&dest, 90.0) - 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_revenue_fraction_basis() {
        let calc = EconomicsCalculator::new(PenaltyRatePolicy::Maximum, PenaltyBasis::RevenueFraction);
        let dest = plant(vec![PenaltyTier::half_open(0.0, 105.0, 0.10, 0.20)]);
        let truck = Vehicle::new("T1", "standard", 20_000.0, 1.0, 40.0, 0.0);
        let eco = calc.evaluate(&route(5, 100.0, 10.0), &dest, &truck, 0.0);
        assert!((eco.penalty - 200.0).abs() < 1e-9); // 1000 × 20%
        assert!((eco.profit - 790.0).abs() < 1e-9);
    }

    #[test]
    fn test_amortized_share_zero_routes() {
        assert_eq!(amortized_fixed_share(700.0, 0), 0.0);
        assert!((amortized_fixed_share(700.0, 4) - 175.0).abs() < 1e-12);
    }
}
