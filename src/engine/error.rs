// ==========================================
// 生猪运输排程仿真 - 引擎层错误类型
// ==========================================

use crate::config::ConfigError;
use crate::domain::error::ValidationError;
use crate::engine::biology::BiologyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("配置非法: {0}")]
    Config(#[from] ConfigError),

    #[error("场景校验失败: {0}")]
    Validation(#[from] ValidationError),

    #[error("生长模型错误: {0}")]
    Biology(#[from] BiologyError),

    #[error("状态不一致: {0}")]
    InconsistentState(String),

    #[error("并行任务失败: {0}")]
    Task(String),
}

pub type SimulationResult<T> = Result<T, SimulationError>;
