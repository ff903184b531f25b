// ==========================================
// 生猪运输排程仿真 - 引擎层
// ==========================================
// 职责: 生长模型、准入、路线构建、接收能力、经济核算、逐日仿真
// 红线: 引擎不做 I/O; 仿真器是运行状态的唯一写入方
// ==========================================

pub mod biology;
pub mod economics;
pub mod eligibility;
pub mod error;
pub mod geo;
pub mod intake;
pub mod metrics;
pub mod optimizer;
pub mod router;
pub mod simulator;

// 重导出核心引擎
pub use biology::{BiologyError, GrowthModel, GrowthUpdate};
pub use economics::{amortized_fixed_share, EconomicsCalculator, RouteEconomics};
pub use eligibility::{Eligibility, EligibilityEngine};
pub use error::{SimulationError, SimulationResult};
pub use geo::{haversine_km, tour_distance_km};
pub use intake::{IntakeDecision, IntakeGate, REASON_CAPACITY_LIMIT};
pub use metrics::{DayKpis, DaySummary, RunKpis};
pub use optimizer::{CandidateResult, ParameterSearch, SearchCandidate, SearchReport};
pub use router::{RouteBudget, RouteBuilder};
pub use simulator::{DaySimulator, FleetEntry, SimulationOutcome, SimulationState};
