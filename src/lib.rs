// ==========================================
// 生猪运输排程仿真 - 核心库
// ==========================================
// 系统定位: 养殖场 → 屠宰场 逐日运输排程与经济核算
// 技术栈: Rust + tokio + csv/calamine
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 生长/路线/仿真/经济
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - 结果表
pub mod exporter;

// 配置层 - 仿真参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DayPhase, IntakeUnit, PenaltyBasis, PenaltyRatePolicy};

// 领域实体
pub use domain::{
    AgeTable, DeliveryEvent, PenaltyTier, ProcessingSite, ProductionSite, Route, RouteStop,
    Scenario, Vehicle,
};

// 配置
pub use config::{ConfigManager, SimulationConfig};

// 引擎
pub use engine::{
    DaySimulator, DaySummary, EconomicsCalculator, GrowthModel, ParameterSearch, RouteBuilder,
    RunKpis, SimulationError, SimulationOutcome,
};

// 导入
pub use importer::{ImportError, ScenarioLoader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "生猪运输排程仿真";
