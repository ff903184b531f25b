// ==========================================
// 生猪运输排程仿真 - 领域校验错误
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 实体字段校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{entity} {id}: 字段 {field} 非法 ({message})")]
    InvalidField {
        entity: &'static str,
        id: String,
        field: &'static str,
        message: String,
    },

    #[error("{entity} ID 为空")]
    EmptyId { entity: &'static str },

    #[error("{entity} ID 重复: {id}")]
    DuplicateId { entity: &'static str, id: String },

    #[error("屠宰场 {id}: 罚金档位 {index} 与前一档位重叠或顺序错误")]
    OverlappingTiers { id: String, index: usize },

    #[error("年龄表 {table}: {message}")]
    InvalidAgeTable { table: String, message: String },
}

impl ValidationError {
    pub(crate) fn field(
        entity: &'static str,
        id: &str,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        ValidationError::InvalidField {
            entity,
            id: id.to_string(),
            field,
            message: message.into(),
        }
    }
}

/// 校验有限且非负的数值字段
pub(crate) fn check_non_negative(
    entity: &'static str,
    id: &str,
    field: &'static str,
    value: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::field(
            entity,
            id,
            field,
            format!("期望非负有限值, 实际 {}", value),
        ));
    }
    Ok(())
}

/// 校验经纬度
pub(crate) fn check_coordinates(
    entity: &'static str,
    id: &str,
    lat: f64,
    lon: f64,
) -> Result<(), ValidationError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::field(entity, id, "lat", format!("纬度越界: {}", lat)));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(ValidationError::field(entity, id, "lon", format!("经度越界: {}", lon)));
    }
    Ok(())
}
