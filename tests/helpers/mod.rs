// ==========================================
// 集成测试共享辅助模块
// ==========================================

#![allow(dead_code)]

pub mod scenario_builder;

pub use scenario_builder::{
    config_with_horizon, FarmBuilder, PlantBuilder, ScenarioBuilder, VehicleBuilder,
};
