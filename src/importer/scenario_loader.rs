// ==========================================
// 生猪运输排程仿真 - 场景加载器
// ==========================================
// 职责: 从数据目录读取全部输入表, 组装并校验 Scenario
// 必需: farms / slaughterhouses / transports
// 可选: weight / consumption 年龄表 (缺失时生长模型退回养殖场自身增重)
// 文件名: <表名>.csv|.xlsx, 也接受 "<表名> 1.csv" 形式, 忽略大小写
// ==========================================

use crate::domain::age_table::AgeTable;
use crate::domain::scenario::Scenario;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{
    FieldMapper, FARMS_TABLE, SLAUGHTERHOUSES_TABLE, TRANSPORTS_TABLE,
};
use crate::importer::file_parser::{RawTable, UniversalFileParser};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

pub const WEIGHT_TABLE: &str = "weight";
pub const CONSUMPTION_TABLE: &str = "consumption";

// ==========================================
// ScenarioLoader
// ==========================================
pub struct ScenarioLoader {
    data_dir: PathBuf,
    parser: UniversalFileParser,
    mapper: FieldMapper,
}

impl ScenarioLoader {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            parser: UniversalFileParser,
            mapper: FieldMapper,
        }
    }

    /// 加载完整场景
    ///
    /// # 返回
    /// - Ok(Scenario): 已按 ID 排序并通过校验
    /// - Err(ImportError): 首个非法文件/行 (fail fast)
    #[instrument(skip(self), fields(data_dir = %self.data_dir.display()))]
    pub fn load(&self) -> ImportResult<Scenario> {
        let farms = self.required_table(FARMS_TABLE)?;
        let production_sites = self.mapper.map_production_sites(&farms)?;

        let slaughterhouses = self.required_table(SLAUGHTERHOUSES_TABLE)?;
        let processing_sites = self.mapper.map_processing_sites(&slaughterhouses)?;

        let transports = self.required_table(TRANSPORTS_TABLE)?;
        let vehicles = self.mapper.map_vehicles(&transports)?;

        let weight_table = self.optional_age_table(WEIGHT_TABLE)?;
        let consumption_table = self.optional_age_table(CONSUMPTION_TABLE)?;

        let mut scenario = Scenario {
            production_sites,
            processing_sites,
            vehicles,
            weight_table,
            consumption_table,
        };
        scenario.validate()?;
        scenario.sort_by_id();

        info!(
            farms = scenario.production_sites.len(),
            slaughterhouses = scenario.processing_sites.len(),
            vehicles = scenario.vehicles.len(),
            weight_table = scenario.weight_table.is_some(),
            consumption_table = scenario.consumption_table.is_some(),
            "场景加载完成"
        );
        Ok(scenario)
    }

    /// 在数据目录中定位表文件
    pub fn locate(&self, table: &str) -> Option<PathBuf> {
        let entries = std::fs::read_dir(&self.data_dir).ok()?;
        let mut matches: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_lowercase())
                    .unwrap_or_default();
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.trim().to_lowercase())
                    .unwrap_or_default();
                (ext == "csv" || ext == "xlsx")
                    && (stem == table || stem == format!("{} 1", table))
            })
            .collect();
        matches.sort();
        matches.into_iter().next()
    }

    fn required_table(&self, table: &str) -> ImportResult<RawTable> {
        let path = self.locate(table).ok_or_else(|| ImportError::MissingTable {
            table: table.to_string(),
            dir: self.data_dir.display().to_string(),
        })?;
        let raw = self.parser.parse(&path)?;
        if raw.records.is_empty() {
            return Err(ImportError::EmptyTable(table.to_string()));
        }
        info!(table, path = %path.display(), rows = raw.records.len(), "读取输入表");
        Ok(raw)
    }

    fn optional_age_table(&self, table: &str) -> ImportResult<Option<AgeTable>> {
        match self.locate(table) {
            None => {
                warn!(table, "未找到年龄表, 使用养殖场自身增重参数");
                Ok(None)
            }
            Some(path) => {
                let raw = self.parser.parse(&path)?;
                let age_table = self.mapper.map_age_table(table, &raw)?;
                info!(
                    table = age_table.name(),
                    brackets = age_table.brackets().len(),
                    path = %path.display(),
                    "读取年龄表"
                );
                Ok(Some(age_table))
            }
        }
    }
}
