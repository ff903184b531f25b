// ==========================================
// 生猪运输排程仿真 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 规则: 行级错误必须带 表名 + 行号 + 记录ID
// ==========================================

use crate::domain::error::ValidationError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("数据目录 {dir} 中缺少表 {table}")]
    MissingTable { table: String, dir: String },

    // ===== 数据映射错误 =====
    #[error("表 {table} 缺少必需列: {column}")]
    MissingColumn { table: String, column: String },

    #[error("表 {table} 行 {row} (记录 {record}): 字段 {field} 为空")]
    MissingField {
        table: String,
        row: usize,
        record: String,
        field: String,
    },

    #[error("表 {table} 行 {row} (记录 {record}): 字段 {field} 无法解析 '{value}': {message}")]
    TypeConversionError {
        table: String,
        row: usize,
        record: String,
        field: String,
        value: String,
        message: String,
    },

    #[error("表 {table} 行 {row} (记录 {record}): {message}")]
    FieldMappingError {
        table: String,
        row: usize,
        record: String,
        message: String,
    },

    // ===== 数据质量错误 =====
    #[error("表 {table} 行 {row} (记录 {record}) 校验失败: {source}")]
    InvalidRecord {
        table: String,
        row: usize,
        record: String,
        #[source]
        source: ValidationError,
    },

    #[error("表 {0} 没有数据行")]
    EmptyTable(String),

    #[error("场景校验失败: {0}")]
    Validation(#[from] ValidationError),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
