// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use pig_logistics::config::SimulationConfig;
use pig_logistics::domain::{
    AgeTable, IntakeUnit, PenaltyTier, ProcessingSite, ProductionSite, Scenario, Vehicle,
};

// ==========================================
// ProductionSite 构建器
// ==========================================

pub struct FarmBuilder {
    site: ProductionSite,
}

impl FarmBuilder {
    pub fn new(site_id: &str) -> Self {
        Self {
            site: ProductionSite::new(
                site_id,
                format!("Granja {}", site_id),
                41.90,
                2.20,
                100,
                110.0,
                0.0,
                24.0,
                1.4,
                2.5,
                100,
            ),
        }
    }

    pub fn at(mut self, lat: f64, lon: f64) -> Self {
        self.site.lat = lat;
        self.site.lon = lon;
        self
    }

    pub fn inventory(mut self, pigs: u32) -> Self {
        self.site.inventory_pigs = pigs;
        self
    }

    pub fn weight(mut self, kg: f64) -> Self {
        self.site.avg_weight_kg = kg;
        self
    }

    pub fn growth(mut self, kg_per_week: f64) -> Self {
        self.site.growth_rate_kg_per_week = kg_per_week;
        self
    }

    pub fn max_per_visit(mut self, pigs: u32) -> Self {
        self.site.max_pigs_per_visit = pigs;
        self
    }

    pub fn build(self) -> ProductionSite {
        self.site
    }
}

// ==========================================
// ProcessingSite 构建器
// ==========================================

pub struct PlantBuilder {
    plant: ProcessingSite,
}

impl PlantBuilder {
    pub fn new(site_id: &str) -> Self {
        Self {
            plant: ProcessingSite::new(
                site_id,
                format!("Escorxador {}", site_id),
                41.85,
                2.15,
                1_000.0,
                IntakeUnit::Head,
                2.0,
                vec![],
            ),
        }
    }

    pub fn at(mut self, lat: f64, lon: f64) -> Self {
        self.plant.lat = lat;
        self.plant.lon = lon;
        self
    }

    pub fn capacity(mut self, head_per_day: f64) -> Self {
        self.plant.daily_capacity = head_per_day;
        self
    }

    pub fn price(mut self, per_kg: f64) -> Self {
        self.plant.price_per_kg = per_kg;
        self
    }

    pub fn tiers(mut self, tiers: Vec<PenaltyTier>) -> Self {
        self.plant.penalty_tiers = tiers;
        self
    }

    pub fn build(self) -> ProcessingSite {
        self.plant
    }
}

// ==========================================
// Vehicle 构建器
// ==========================================

pub struct VehicleBuilder {
    vehicle: Vehicle,
}

impl VehicleBuilder {
    pub fn new(vehicle_id: &str) -> Self {
        Self {
            vehicle: Vehicle::new(vehicle_id, "standard", 20_000.0, 1.2, 40.0, 700.0),
        }
    }

    pub fn capacity_kg(mut self, kg: f64) -> Self {
        self.vehicle.capacity_kg = kg;
        self
    }

    pub fn weekly_hours(mut self, hours: f64) -> Self {
        self.vehicle.max_hours_per_week = hours;
        self
    }

    pub fn fixed_weekly_cost(mut self, cost: f64) -> Self {
        self.vehicle.fixed_weekly_cost = cost;
        self
    }

    pub fn cost_per_km(mut self, cost: f64) -> Self {
        self.vehicle.cost_per_km = cost;
        self
    }

    pub fn build(self) -> Vehicle {
        self.vehicle
    }
}

// ==========================================
// Scenario 构建器
// ==========================================

#[derive(Default)]
pub struct ScenarioBuilder {
    scenario: Scenario,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn farm(mut self, farm: ProductionSite) -> Self {
        self.scenario.production_sites.push(farm);
        self
    }

    pub fn plant(mut self, plant: ProcessingSite) -> Self {
        self.scenario.processing_sites.push(plant);
        self
    }

    pub fn vehicle(mut self, vehicle: Vehicle) -> Self {
        self.scenario.vehicles.push(vehicle);
        self
    }

    pub fn weight_table(mut self, table: AgeTable) -> Self {
        self.scenario.weight_table = Some(table);
        self
    }

    pub fn build(self) -> Scenario {
        self.scenario
    }

    /// 多养殖场网格场景: n 个养殖场分布在屠宰场周边 ~30km 内
    pub fn regional(farms: usize, plants: usize, vehicles: usize) -> Scenario {
        let mut builder = ScenarioBuilder::new();
        for i in 0..farms {
            let lat = 41.70 + (i % 5) as f64 * 0.06;
            let lon = 2.00 + (i / 5) as f64 * 0.06;
            builder = builder.farm(
                FarmBuilder::new(&format!("F{:02}", i))
                    .at(lat, lon)
                    .inventory(60 + (i as u32 * 37) % 180)
                    .weight(100.0 + (i % 7) as f64 * 3.0)
                    .growth(6.0)
                    .max_per_visit(150)
                    .build(),
            );
        }
        for j in 0..plants {
            builder = builder.plant(
                PlantBuilder::new(&format!("S{}", j))
                    .at(41.80 + j as f64 * 0.1, 2.10)
                    .capacity(400.0)
                    .build(),
            );
        }
        for k in 0..vehicles {
            builder = builder.vehicle(VehicleBuilder::new(&format!("T{}", k)).build());
        }
        builder.build()
    }
}

/// 短周期配置
pub fn config_with_horizon(days: i64) -> SimulationConfig {
    SimulationConfig {
        horizon_days: days,
        ..Default::default()
    }
}
