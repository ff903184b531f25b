// ==========================================
// 生猪运输排程仿真 - 配置错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("仿真天数必须 >= 1, 实际 {0}")]
    InvalidHorizon(i64),

    #[error("配置值非法 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ParseError {
        key: String,
        value: String,
        message: String,
    },

    #[error("配置文件读取失败: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("配置文件 JSON 解析失败: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
