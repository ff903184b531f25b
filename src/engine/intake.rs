// ==========================================
// 生猪运输排程仿真 - 屠宰场接收闸门
// ==========================================
// 职责: 候选路线对目的屠宰场日接收能力的判定
// 红线: 整车接收或整车拒收, 不做部分装卸
// ==========================================

use crate::domain::route::{RejectedRoute, Route};
use crate::domain::slaughterhouse::{IntakeConstraint, ProcessingSite};
use tracing::debug;

/// 拒收原因: 超出剩余日接收能力
pub const REASON_CAPACITY_LIMIT: &str = "CAPACITY_LIMIT_EXCEEDED";

/// 接收判定结果
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeDecision {
    Accepted,
    Rejected(RejectedRoute),
}

// ==========================================
// IntakeGate - 无状态闸门
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct IntakeGate {}

impl IntakeGate {
    pub fn new() -> Self {
        Self {}
    }

    /// 判定路线能否被目的屠宰场接收
    ///
    /// # 参数
    /// - `day`: 仿真日
    /// - `destination`: 目的屠宰场 (只读, 预留由调用方在接收后完成)
    /// - `route`: 候选路线
    pub fn check(&self, day: u32, destination: &ProcessingSite, route: &Route) -> IntakeDecision {
        let pigs = route.total_pigs();
        let weight_kg = route.total_weight_kg();

        if destination.can_accept(pigs, weight_kg) {
            return IntakeDecision::Accepted;
        }

        let remaining = destination.remaining_capacity();
        debug!(
            day,
            vehicle_id = %route.vehicle_id,
            destination_id = %destination.site_id,
            pigs,
            weight_kg,
            remaining,
            "路线超出剩余接收能力, 整车拒收"
        );
        IntakeDecision::Rejected(RejectedRoute {
            day,
            vehicle_id: route.vehicle_id.clone(),
            destination_id: destination.site_id.clone(),
            site_ids: route.site_ids().map(str::to_string).collect(),
            pigs,
            weight_kg,
            remaining_capacity: remaining,
            reason: REASON_CAPACITY_LIMIT.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::route::RouteStop;
    use crate::domain::types::IntakeUnit;

    fn route(pigs: u32) -> Route {
        Route {
            vehicle_id: "T1".to_string(),
            destination_id: "S1".to_string(),
            stops: vec![RouteStop {
                site_id: "F1".to_string(),
                pigs,
                avg_weight_kg: 110.0,
            }],
            distance_km: 40.0,
            time_hours: 1.2,
        }
    }

    #[test]
    fn test_accept_up_to_capacity() {
        let gate = IntakeGate::new();
        let mut plant = ProcessingSite::new("S1", "Escorxador", 41.0, 2.0, 100.0, IntakeUnit::Head, 1.8, vec![]);
        assert_eq!(gate.check(0, &plant, &route(100)), IntakeDecision::Accepted);
        plant.receive(60, 6_600.0);
        assert_eq!(gate.check(0, &plant, &route(40)), IntakeDecision::Accepted);
    }

    #[test]
    fn test_reject_in_full() {
        let gate = IntakeGate::new();
        let mut plant = ProcessingSite::new("S1", "Escorxador", 41.0, 2.0, 100.0, IntakeUnit::Head, 1.8, vec![]);
        plant.receive(60, 6_600.0);
        match gate.check(3, &plant, &route(41)) {
            IntakeDecision::Rejected(rejected) => {
                assert_eq!(rejected.day, 3);
                assert_eq!(rejected.pigs, 41);
                assert_eq!(rejected.remaining_capacity, 40.0);
                assert_eq!(rejected.site_ids, vec!["F1".to_string()]);
                assert_eq!(rejected.reason, REASON_CAPACITY_LIMIT);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_kilogram_capacity() {
        let gate = IntakeGate::new();
        let plant = ProcessingSite::new("S1", "Escorxador", 41.0, 2.0, 5_000.0, IntakeUnit::Kilograms, 1.8, vec![]);
        assert_eq!(gate.check(0, &plant, &route(45)), IntakeDecision::Accepted); // 4950 kg
        assert!(matches!(gate.check(0, &plant, &route(46)), IntakeDecision::Rejected(_)));
    }
}
