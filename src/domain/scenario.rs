// ==========================================
// 生猪运输排程仿真 - 仿真输入场景
// ==========================================
// 职责: 打包一次仿真所需的全部输入实体
// 说明: 每次运行克隆一份独立状态, 场景本身不被修改
// ==========================================

use crate::domain::age_table::AgeTable;
use crate::domain::error::ValidationError;
use crate::domain::farm::ProductionSite;
use crate::domain::slaughterhouse::ProcessingSite;
use crate::domain::vehicle::Vehicle;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub production_sites: Vec<ProductionSite>,
    pub processing_sites: Vec<ProcessingSite>,
    pub vehicles: Vec<Vehicle>,
    pub weight_table: Option<AgeTable>,
    pub consumption_table: Option<AgeTable>,
}

impl Scenario {
    /// 校验全部实体并检查 ID 唯一性
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for site in &self.production_sites {
            site.validate()?;
            if !seen.insert(site.site_id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    entity: "养殖场",
                    id: site.site_id.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for plant in &self.processing_sites {
            plant.validate()?;
            if !seen.insert(plant.site_id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    entity: "屠宰场",
                    id: plant.site_id.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for vehicle in &self.vehicles {
            vehicle.validate()?;
            if !seen.insert(vehicle.vehicle_id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    entity: "车辆",
                    id: vehicle.vehicle_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// 所有实体按 ID 排序 (确定性迭代顺序)
    pub fn sort_by_id(&mut self) {
        self.production_sites.sort_by(|a, b| a.site_id.cmp(&b.site_id));
        self.processing_sites.sort_by(|a, b| a.site_id.cmp(&b.site_id));
        self.vehicles.sort_by(|a, b| a.vehicle_id.cmp(&b.vehicle_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::IntakeUnit;

    #[test]
    fn test_duplicate_farm_rejected() {
        let farm = ProductionSite::new("F1", "a", 41.0, 2.0, 10, 100.0, 5.0, 20.0, 1.0, 2.0, 10);
        let scenario = Scenario {
            production_sites: vec![farm.clone(), farm],
            ..Default::default()
        };
        assert!(matches!(
            scenario.validate(),
            Err(ValidationError::DuplicateId { entity: "养殖场", .. })
        ));
    }

    #[test]
    fn test_sort_by_id() {
        let mut scenario = Scenario {
            processing_sites: vec![
                ProcessingSite::new("S2", "b", 41.0, 2.0, 10.0, IntakeUnit::Head, 1.0, vec![]),
                ProcessingSite::new("S1", "a", 41.0, 2.0, 10.0, IntakeUnit::Head, 1.0, vec![]),
            ],
            vehicles: vec![
                Vehicle::new("T2", "x", 1.0, 1.0, 1.0, 1.0),
                Vehicle::new("T1", "x", 1.0, 1.0, 1.0, 1.0),
            ],
            ..Default::default()
        };
        scenario.sort_by_id();
        assert_eq!(scenario.processing_sites[0].site_id, "S1");
        assert_eq!(scenario.vehicles[0].vehicle_id, "T1");
    }
}
