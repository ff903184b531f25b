// ==========================================
// 端到端场景测试
// ==========================================
// 测试目标: 三养殖场 + 一屠宰场 + 一车辆, 单日仿真
// 覆盖范围: 贪心最近可行路线、载重不足时的拆分、经济核算
// ==========================================

mod helpers;

use helpers::{config_with_horizon, FarmBuilder, PlantBuilder, ScenarioBuilder, VehicleBuilder};
use pig_logistics::domain::{PenaltyTier, Scenario};
use pig_logistics::engine::DaySimulator;
use pig_logistics::logging;

fn three_farms(truck_capacity_kg: f64) -> Scenario {
    logging::init_test();
    ScenarioBuilder::new()
        .farm(FarmBuilder::new("F1").at(41.86, 2.16).inventory(50).build())
        .farm(FarmBuilder::new("F2").at(41.87, 2.17).inventory(40).build())
        .farm(FarmBuilder::new("F3").at(41.88, 2.18).inventory(30).build())
        .plant(
            PlantBuilder::new("S1")
                .at(41.85, 2.15)
                .price(2.0)
                .tiers(vec![PenaltyTier::half_open(0.0, 100.0, 0.10, 0.10)])
                .build(),
        )
        .vehicle(
            VehicleBuilder::new("T1")
                .capacity_kg(truck_capacity_kg)
                .cost_per_km(1.5)
                .fixed_weekly_cost(500.0)
                .build(),
        )
        .build()
}

#[test]
fn test_single_three_stop_route_when_budgets_fit() {
    let scenario = three_farms(20_000.0);
    let outcome = DaySimulator::for_scenario(config_with_horizon(1), &scenario)
        .unwrap()
        .run(&scenario)
        .unwrap();

    assert_eq!(outcome.events.len(), 1);
    let event = &outcome.events[0];
    let ids: Vec<&str> = event.stops.iter().map(|s| s.site_id.as_str()).collect();
    assert_eq!(ids, vec!["F1", "F2", "F3"]);
    assert_eq!(event.pigs_delivered, 120);
    assert!(event.time_hours <= 8.0);

    // 110 kg 不在罚金档位内
    assert_eq!(event.penalty, 0.0);
    assert!((event.revenue - event.delivered_weight_kg * 2.0).abs() < 1e-6);
    assert!((event.transport_cost - event.distance_km * 1.5).abs() < 1e-9);
    // 单趟承担整周固定成本
    assert!((event.fixed_cost_share - 500.0).abs() < 1e-9);

    assert!(outcome
        .final_production_sites
        .iter()
        .all(|s| s.inventory_pigs == 0));
}

#[test]
fn test_capacity_shortfall_splits_into_greedy_routes() {
    // 9000 kg: F1 50 头 (~5500 kg) + F2 部分装车, F3 留给第二趟
    let scenario = three_farms(9_000.0);
    let outcome = DaySimulator::for_scenario(config_with_horizon(1), &scenario)
        .unwrap()
        .run(&scenario)
        .unwrap();

    assert_eq!(outcome.events.len(), 2);
    let first: Vec<&str> = outcome.events[0].stops.iter().map(|s| s.site_id.as_str()).collect();
    assert_eq!(first, vec!["F1", "F2"]);
    assert!(outcome.events[0].delivered_weight_kg <= 9_000.0);

    let second: Vec<&str> = outcome.events[1].stops.iter().map(|s| s.site_id.as_str()).collect();
    assert_eq!(second, vec!["F3"]);

    // 两趟平摊周固定成本
    for event in &outcome.events {
        assert!((event.fixed_cost_share - 250.0).abs() < 1e-9);
    }

    let f2 = outcome
        .final_production_sites
        .iter()
        .find(|s| s.site_id == "F2")
        .unwrap();
    assert!(f2.inventory_pigs > 0);
    assert_eq!(f2.last_visit_day, Some(0));
}
