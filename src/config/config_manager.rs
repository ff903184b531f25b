// ==========================================
// 生猪运输排程仿真 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: 内存 key-value 表 (可由 JSON 文件加载)
// 规则: 未配置的键使用 SimulationConfig 默认值
// ==========================================

use crate::config::error::ConfigError;
use crate::config::simulation_config::SimulationConfig;
use crate::domain::types::{PenaltyBasis, PenaltyRatePolicy};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<String, String>,
}

impl ConfigManager {
    /// 创建空的 ConfigManager (全部使用默认值)
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文件加载
    ///
    /// # 格式
    /// 扁平对象, 例如 {"horizon_days": 10, "penalty_rate_policy": "midpoint"}
    /// null 值视为未配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let manager = Self::from_json_str(&raw)?;
        info!(
            path = %path.as_ref().display(),
            keys = manager.values.len(),
            "配置文件加载完成"
        );
        Ok(manager)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let object: BTreeMap<String, Value> = serde_json::from_str(raw)?;
        let mut values = HashMap::new();
        for (key, value) in object {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                other => other.to_string(),
            };
            values.insert(key, text);
        }
        Ok(Self { values })
    }

    /// 覆写单个配置项
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(&str): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 获取所有配置的快照（JSON格式, 按键排序）
    ///
    /// # 用途
    /// - 在仿真输出中记录运行参数, 便于复现
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let ordered: BTreeMap<&String, &String> = self.values.iter().collect();
        Ok(serde_json::to_string(&ordered)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - 恢复的配置项数量
    pub fn restore_config_from_snapshot(&mut self, snapshot_json: &str) -> Result<usize, ConfigError> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;
        let count = config_map.len();
        self.values.extend(config_map);
        Ok(count)
    }

    /// 读取并解析单个配置, 缺省时返回 default
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::ParseError {
                key: key.to_string(),
                value: raw.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// 读取可选配置 (空字符串视为未配置)
    fn parse_optional<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key).map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|e| ConfigError::ParseError {
                key: key.to_string(),
                value: raw.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// 组装并校验仿真参数
    pub fn build_simulation_config(&self) -> Result<SimulationConfig, ConfigError> {
        let defaults = SimulationConfig::default();
        let config = SimulationConfig {
            horizon_days: self.parse_or(config_keys::HORIZON_DAYS, defaults.horizon_days)?,
            start_date: self.parse_optional::<NaiveDate>(config_keys::START_DATE)?,
            max_stops_per_route: self
                .parse_or(config_keys::MAX_STOPS_PER_ROUTE, defaults.max_stops_per_route)?,
            max_hours_per_day: self
                .parse_or(config_keys::MAX_HOURS_PER_DAY, defaults.max_hours_per_day)?,
            speed_kmh: self.parse_or(config_keys::SPEED_KMH, defaults.speed_kmh)?,
            service_hours_per_stop: self.parse_or(
                config_keys::SERVICE_HOURS_PER_STOP,
                defaults.service_hours_per_stop,
            )?,
            revisit_interval_days: self.parse_or(
                config_keys::REVISIT_INTERVAL_DAYS,
                defaults.revisit_interval_days,
            )?,
            min_deliverable_pigs: self
                .parse_or(config_keys::MIN_DELIVERABLE_PIGS, defaults.min_deliverable_pigs)?,
            min_market_weight_kg: self.parse_optional::<f64>(config_keys::MIN_MARKET_WEIGHT_KG)?,
            penalty_rate_policy: self.parse_or::<PenaltyRatePolicy>(
                config_keys::PENALTY_RATE_POLICY,
                defaults.penalty_rate_policy,
            )?,
            penalty_basis: self
                .parse_or::<PenaltyBasis>(config_keys::PENALTY_BASIS, defaults.penalty_basis)?,
        };

        config.validate()?;
        debug!(?config, "仿真参数组装完成");
        Ok(config)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 仿真窗口
    pub const HORIZON_DAYS: &str = "horizon_days";
    pub const START_DATE: &str = "start_date";

    // 路线约束
    pub const MAX_STOPS_PER_ROUTE: &str = "max_stops_per_route";
    pub const MAX_HOURS_PER_DAY: &str = "max_hours_per_day";
    pub const SPEED_KMH: &str = "speed_kmh";
    pub const SERVICE_HOURS_PER_STOP: &str = "service_hours_per_stop";

    // 准入
    pub const REVISIT_INTERVAL_DAYS: &str = "revisit_interval_days";
    pub const MIN_DELIVERABLE_PIGS: &str = "min_deliverable_pigs";
    pub const MIN_MARKET_WEIGHT_KG: &str = "min_market_weight_kg";

    // 经济
    pub const PENALTY_RATE_POLICY: &str = "penalty_rate_policy";
    pub const PENALTY_BASIS: &str = "penalty_basis";
}
