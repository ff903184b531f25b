// ==========================================
// 生猪运输排程仿真 - 导入层
// ==========================================
// 职责: 外部表格 → 强类型场景
// 支持: Excel (.xlsx), CSV
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod scenario_loader;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, RawTable, UniversalFileParser};
pub use scenario_loader::ScenarioLoader;
