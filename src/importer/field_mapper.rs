// ==========================================
// 生猪运输排程仿真 - 字段映射器
// ==========================================
// 职责: 原始记录 → 强类型实体 + 类型转换 + 实体校验
// 规则: 任一行非法即整体失败 (fail fast), 错误带表名/行号/记录ID
// ==========================================

use crate::domain::age_table::AgeTable;
use crate::domain::farm::ProductionSite;
use crate::domain::slaughterhouse::{PenaltyTier, ProcessingSite};
use crate::domain::types::IntakeUnit;
use crate::domain::vehicle::Vehicle;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRecord, RawTable};
use std::str::FromStr;

pub const FARMS_TABLE: &str = "farms";
pub const SLAUGHTERHOUSES_TABLE: &str = "slaughterhouses";
pub const TRANSPORTS_TABLE: &str = "transports";

const FARM_COLUMNS: [&str; 11] = [
    "farm_id",
    "name",
    "lat",
    "lon",
    "inventory_pigs",
    "avg_weight_kg",
    "growth_rate_kg_per_week",
    "age_weeks",
    "price_per_kg",
    "consumption_pigs",
    "capacity",
];

const SLAUGHTERHOUSE_COLUMNS: [&str; 6] = [
    "slaughterhouse_id",
    "name",
    "lat",
    "lon",
    "capacity_per_day",
    "price_per_kg",
];

const LEGACY_TIER_COLUMNS: [&str; 4] = [
    "penalty_15_min",
    "penalty_15_max",
    "penalty_20_min",
    "penalty_20_max",
];

const TRANSPORT_COLUMNS: [&str; 6] = [
    "transport_id",
    "type",
    "capacity_tons",
    "cost_per_km",
    "max_hours_per_week",
    "fixed_weekly_cost",
];

// ==========================================
// 行级读取上下文
// ==========================================
struct RowReader<'a> {
    table: &'a str,
    record: &'a RawRecord,
    id: String,
}

impl<'a> RowReader<'a> {
    fn new(table: &'a str, record: &'a RawRecord, id_column: &str) -> ImportResult<Self> {
        let id = record
            .get(id_column)
            .map(str::to_string)
            .ok_or_else(|| ImportError::MissingField {
                table: table.to_string(),
                row: record.row,
                record: "-".to_string(),
                field: id_column.to_string(),
            })?;
        Ok(Self { table, record, id })
    }

    fn string(&self, field: &str) -> ImportResult<String> {
        self.record
            .get(field)
            .map(str::to_string)
            .ok_or_else(|| ImportError::MissingField {
                table: self.table.to_string(),
                row: self.record.row,
                record: self.id.clone(),
                field: field.to_string(),
            })
    }

    fn parse<T>(&self, field: &str) -> ImportResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.string(field)?;
        raw.parse::<T>()
            .map_err(|e| self.conversion_error(field, &raw, e.to_string()))
    }

    fn parse_optional<T>(&self, field: &str) -> ImportResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.record.get(field) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| self.conversion_error(field, raw, e.to_string())),
        }
    }

    /// 解析头数: 允许 "120" 或 "120.0", 拒绝负数与小数
    fn count(&self, field: &str) -> ImportResult<u32> {
        let value: f64 = self.parse(field)?;
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(self.conversion_error(
                field,
                &value.to_string(),
                "期望非负整数".to_string(),
            ));
        }
        Ok(value as u32)
    }

    fn conversion_error(&self, field: &str, value: &str, message: String) -> ImportError {
        ImportError::TypeConversionError {
            table: self.table.to_string(),
            row: self.record.row,
            record: self.id.clone(),
            field: field.to_string(),
            value: value.to_string(),
            message,
        }
    }

    fn mapping_error(&self, message: impl Into<String>) -> ImportError {
        ImportError::FieldMappingError {
            table: self.table.to_string(),
            row: self.record.row,
            record: self.id.clone(),
            message: message.into(),
        }
    }

    fn invalid(&self, source: crate::domain::error::ValidationError) -> ImportError {
        ImportError::InvalidRecord {
            table: self.table.to_string(),
            row: self.record.row,
            record: self.id.clone(),
            source,
        }
    }
}

fn require_columns(table: &str, raw: &RawTable, columns: &[&str]) -> ImportResult<()> {
    for column in columns {
        if !raw.headers.iter().any(|h| h == column) {
            return Err(ImportError::MissingColumn {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

// ==========================================
// FieldMapper
// ==========================================
pub struct FieldMapper;

impl FieldMapper {
    // ===== 养殖场 =====

    pub fn map_production_sites(&self, raw: &RawTable) -> ImportResult<Vec<ProductionSite>> {
        require_columns(FARMS_TABLE, raw, &FARM_COLUMNS)?;
        raw.records
            .iter()
            .map(|record| self.map_production_site(record))
            .collect()
    }

    pub fn map_production_site(&self, record: &RawRecord) -> ImportResult<ProductionSite> {
        let row = RowReader::new(FARMS_TABLE, record, "farm_id")?;
        let site = ProductionSite::new(
            row.id.clone(),
            row.string("name")?,
            row.parse("lat")?,
            row.parse("lon")?,
            row.count("inventory_pigs")?,
            row.parse("avg_weight_kg")?,
            row.parse("growth_rate_kg_per_week")?,
            row.parse("age_weeks")?,
            row.parse("price_per_kg")?,
            row.parse("consumption_pigs")?,
            row.count("capacity")?,
        );
        site.validate().map_err(|e| row.invalid(e))?;
        Ok(site)
    }

    // ===== 屠宰场 =====

    pub fn map_processing_sites(&self, raw: &RawTable) -> ImportResult<Vec<ProcessingSite>> {
        require_columns(SLAUGHTERHOUSES_TABLE, raw, &SLAUGHTERHOUSE_COLUMNS)?;
        let generic = raw.headers.iter().any(|h| h == "tier_1_min_kg");
        let legacy = LEGACY_TIER_COLUMNS
            .iter()
            .all(|c| raw.headers.iter().any(|h| h == c));
        if !generic && !legacy {
            return Err(ImportError::MissingColumn {
                table: SLAUGHTERHOUSES_TABLE.to_string(),
                column: "tier_1_min_kg | penalty_15_min".to_string(),
            });
        }
        raw.records
            .iter()
            .map(|record| self.map_processing_site(record))
            .collect()
    }

    pub fn map_processing_site(&self, record: &RawRecord) -> ImportResult<ProcessingSite> {
        let row = RowReader::new(SLAUGHTERHOUSES_TABLE, record, "slaughterhouse_id")?;
        let capacity_unit = row
            .parse_optional::<IntakeUnit>("capacity_unit")?
            .unwrap_or_default();
        let tiers = if record.has_column("tier_1_min_kg") {
            self.generic_tiers(&row)?
        } else {
            PenaltyTier::from_legacy_bands(
                row.parse("penalty_15_min")?,
                row.parse("penalty_15_max")?,
                row.parse("penalty_20_min")?,
                row.parse("penalty_20_max")?,
            )
            .map_err(|message| row.mapping_error(message))?
        };

        let plant = ProcessingSite::new(
            row.id.clone(),
            row.string("name")?,
            row.parse("lat")?,
            row.parse("lon")?,
            row.parse("capacity_per_day")?,
            capacity_unit,
            row.parse("price_per_kg")?,
            tiers,
        );
        plant.validate().map_err(|e| row.invalid(e))?;
        Ok(plant)
    }

    /// tier_{n}_min_kg / tier_{n}_max_kg / tier_{n}_rate_min / tier_{n}_rate_max
    ///
    /// 区间为 [min, max); max 为空表示无上限; 整组为空的档位跳过
    fn generic_tiers(&self, row: &RowReader<'_>) -> ImportResult<Vec<PenaltyTier>> {
        let mut tiers = Vec::new();
        let mut n = 1;
        while row.record.has_column(&format!("tier_{}_min_kg", n)) {
            let min_key = format!("tier_{}_min_kg", n);
            let max_key = format!("tier_{}_max_kg", n);
            let rate_min_key = format!("tier_{}_rate_min", n);
            let rate_max_key = format!("tier_{}_rate_max", n);

            let min_kg: Option<f64> = row.parse_optional(&min_key)?;
            let max_kg: Option<f64> = row.parse_optional(&max_key)?;
            let rate_min: Option<f64> = row.parse_optional(&rate_min_key)?;
            let rate_max: Option<f64> = row.parse_optional(&rate_max_key)?;

            match (min_kg, rate_min) {
                (None, None) if max_kg.is_none() && rate_max.is_none() => {}
                (Some(min_kg), Some(rate_min)) => {
                    tiers.push(PenaltyTier::half_open(
                        min_kg,
                        max_kg.unwrap_or(f64::INFINITY),
                        rate_min,
                        rate_max.unwrap_or(rate_min),
                    ));
                }
                _ => {
                    return Err(row.mapping_error(format!(
                        "罚金档位 {} 不完整: 需要 {} 与 {}",
                        n, min_key, rate_min_key
                    )))
                }
            }
            n += 1;
        }
        Ok(tiers)
    }

    // ===== 车辆 =====

    pub fn map_vehicles(&self, raw: &RawTable) -> ImportResult<Vec<Vehicle>> {
        require_columns(TRANSPORTS_TABLE, raw, &TRANSPORT_COLUMNS)?;
        raw.records
            .iter()
            .map(|record| self.map_vehicle(record))
            .collect()
    }

    /// capacity_tons 换算为公斤 (×1000)
    pub fn map_vehicle(&self, record: &RawRecord) -> ImportResult<Vehicle> {
        let row = RowReader::new(TRANSPORTS_TABLE, record, "transport_id")?;
        let capacity_tons: f64 = row.parse("capacity_tons")?;
        let vehicle = Vehicle::new(
            row.id.clone(),
            row.string("type")?,
            capacity_tons * 1000.0,
            row.parse("cost_per_km")?,
            row.parse("max_hours_per_week")?,
            row.parse("fixed_weekly_cost")?,
        );
        vehicle.validate().map_err(|e| row.invalid(e))?;
        Ok(vehicle)
    }

    // ===== 年龄表 =====

    /// 年龄表: 第一列为周龄 (表头含 "age"), "mean" 列为数值, sd 列忽略
    pub fn map_age_table(&self, name: &str, raw: &RawTable) -> ImportResult<AgeTable> {
        let age_column = raw
            .headers
            .iter()
            .find(|h| h.to_lowercase().contains("age"))
            .ok_or_else(|| ImportError::MissingColumn {
                table: name.to_string(),
                column: "age of pigs in week".to_string(),
            })?;
        let mean_column = raw
            .headers
            .iter()
            .find(|h| h.trim().eq_ignore_ascii_case("mean"))
            .ok_or_else(|| ImportError::MissingColumn {
                table: name.to_string(),
                column: "mean".to_string(),
            })?;

        if raw.records.is_empty() {
            return Err(ImportError::EmptyTable(name.to_string()));
        }

        let mut pairs = Vec::with_capacity(raw.records.len());
        for record in &raw.records {
            let age_raw = record.get(age_column).unwrap_or("");
            let row = RowReader {
                table: name,
                record,
                id: age_raw.to_string(),
            };
            let age: f64 = row.parse(age_column)?;
            let mean: f64 = row.parse(mean_column)?;
            pairs.push((age, mean));
        }

        Ok(AgeTable::from_pairs(name, &pairs)?)
    }
}
