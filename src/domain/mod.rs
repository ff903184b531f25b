// ==========================================
// 生猪运输排程仿真 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、字段校验
// 红线: 不含文件读写逻辑, 不含引擎逻辑
// ==========================================

pub mod age_table;
pub mod error;
pub mod farm;
pub mod route;
pub mod scenario;
pub mod slaughterhouse;
pub mod types;
pub mod vehicle;

// 重导出核心类型
pub use age_table::{AgeBracket, AgeTable};
pub use error::ValidationError;
pub use farm::ProductionSite;
pub use route::{DeliveryEvent, RejectedRoute, Route, RouteStop};
pub use scenario::Scenario;
pub use slaughterhouse::{IntakeConstraint, PenaltyTier, ProcessingSite};
pub use types::{DayPhase, IntakeUnit, PenaltyBasis, PenaltyRatePolicy};
pub use vehicle::{Vehicle, VehicleUsage};
