// ==========================================
// 生猪运输排程仿真 - 配置层
// ==========================================
// 职责: 仿真参数管理, 默认值 + JSON 覆写
// ==========================================

pub mod config_manager;
pub mod error;
pub mod simulation_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::ConfigError;
pub use simulation_config::SimulationConfig;
