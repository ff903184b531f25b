// ==========================================
// 生猪运输排程仿真 - 结果导出
// ==========================================
// 职责: 交付事件日志 + 每日 KPI 写出为 CSV
// 输出: events.csv / daily_kpis.csv
// ==========================================

use crate::domain::route::DeliveryEvent;
use crate::engine::metrics::DayKpis;
use crate::engine::simulator::SimulationOutcome;
use csv::Writer;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const EVENTS_FILE: &str = "events.csv";
pub const DAILY_KPIS_FILE: &str = "daily_kpis.csv";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 写出失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// events.csv 的扁平行 (停靠点展开为 ";" 分隔字段)
#[derive(Debug, Serialize)]
struct EventRow<'a> {
    run_id: &'a str,
    day: u32,
    plan_date: String,
    route_id: &'a str,
    vehicle_id: &'a str,
    vehicle_category: &'a str,
    destination_id: &'a str,
    destination_name: &'a str,
    farms: String,
    pigs_per_farm: String,
    pigs_delivered: u32,
    delivered_weight_kg: f64,
    avg_weight_kg: f64,
    distance_km: f64,
    time_hours: f64,
    capacity_utilization_pct: f64,
    revenue: f64,
    penalty_rate: f64,
    penalty: f64,
    transport_cost: f64,
    fixed_cost_share: f64,
    profit: f64,
}

impl<'a> EventRow<'a> {
    fn new(run_id: &'a str, event: &'a DeliveryEvent) -> Self {
        Self {
            run_id,
            day: event.day,
            plan_date: event.plan_date.map(|d| d.to_string()).unwrap_or_default(),
            route_id: &event.route_id,
            vehicle_id: &event.vehicle_id,
            vehicle_category: &event.vehicle_category,
            destination_id: &event.destination_id,
            destination_name: &event.destination_name,
            farms: event
                .stops
                .iter()
                .map(|s| s.site_id.as_str())
                .collect::<Vec<_>>()
                .join(";"),
            pigs_per_farm: event
                .stops
                .iter()
                .map(|s| s.pigs.to_string())
                .collect::<Vec<_>>()
                .join(";"),
            pigs_delivered: event.pigs_delivered,
            delivered_weight_kg: event.delivered_weight_kg,
            avg_weight_kg: event.avg_weight_kg,
            distance_km: event.distance_km,
            time_hours: event.time_hours,
            capacity_utilization_pct: event.capacity_utilization_pct,
            revenue: event.revenue,
            penalty_rate: event.penalty_rate,
            penalty: event.penalty,
            transport_cost: event.transport_cost,
            fixed_cost_share: event.fixed_cost_share,
            profit: event.profit,
        }
    }
}

/// 写出交付事件
pub fn write_events<W: Write>(writer: W, run_id: &str, events: &[DeliveryEvent]) -> ExportResult<()> {
    let mut csv = Writer::from_writer(writer);
    for event in events {
        csv.serialize(EventRow::new(run_id, event))?;
    }
    csv.flush()?;
    Ok(())
}

/// 写出每日 KPI
pub fn write_daily_kpis<W: Write>(writer: W, summaries: &[DayKpis]) -> ExportResult<()> {
    let mut csv = Writer::from_writer(writer);
    for summary in summaries {
        csv.serialize(DayRow::from(summary))?;
    }
    csv.flush()?;
    Ok(())
}

/// daily_kpis.csv 行 (日期展开为字符串)
#[derive(Debug, Serialize)]
struct DayRow {
    day: u32,
    plan_date: String,
    routes: u32,
    rejected_routes: u32,
    pigs_delivered: u32,
    delivered_weight_kg: f64,
    distance_km: f64,
    time_hours: f64,
    revenue: f64,
    penalty: f64,
    transport_cost: f64,
    fixed_cost: f64,
    idle_fixed_cost: f64,
    profit: f64,
    feed_consumed_kg: f64,
    plant_utilization_pct: f64,
}

impl From<&DayKpis> for DayRow {
    fn from(s: &DayKpis) -> Self {
        Self {
            day: s.day,
            plan_date: s.plan_date.map(|d| d.to_string()).unwrap_or_default(),
            routes: s.routes,
            rejected_routes: s.rejected_routes,
            pigs_delivered: s.pigs_delivered,
            delivered_weight_kg: s.delivered_weight_kg,
            distance_km: s.distance_km,
            time_hours: s.time_hours,
            revenue: s.revenue,
            penalty: s.penalty,
            transport_cost: s.transport_cost,
            fixed_cost: s.fixed_cost,
            idle_fixed_cost: s.idle_fixed_cost,
            profit: s.profit,
            feed_consumed_kg: s.feed_consumed_kg,
            plant_utilization_pct: s.plant_utilization_pct,
        }
    }
}

/// 将一次仿真结果写入输出目录
///
/// # 返回
/// 写出的文件路径 (events.csv, daily_kpis.csv)
pub fn export_outcome<P: AsRef<Path>>(
    out_dir: P,
    outcome: &SimulationOutcome,
) -> ExportResult<(PathBuf, PathBuf)> {
    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;

    let run_id = outcome.run_id.to_string();
    let events_path = out_dir.join(EVENTS_FILE);
    write_events(std::fs::File::create(&events_path)?, &run_id, &outcome.events)?;

    let kpis_path = out_dir.join(DAILY_KPIS_FILE);
    write_daily_kpis(std::fs::File::create(&kpis_path)?, &outcome.day_summaries)?;

    info!(
        events = outcome.events.len(),
        days = outcome.day_summaries.len(),
        out_dir = %out_dir.display(),
        "仿真结果已导出"
    );
    Ok((events_path, kpis_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::route::RouteStop;

    fn event() -> DeliveryEvent {
        DeliveryEvent {
            day: 2,
            plan_date: None,
            route_id: "day2_r0".to_string(),
            vehicle_id: "T1".to_string(),
            vehicle_category: "standard".to_string(),
            destination_id: "S1".to_string(),
            destination_name: "Escorxador".to_string(),
            stops: vec![
                RouteStop {
                    site_id: "F1".to_string(),
                    pigs: 60,
                    avg_weight_kg: 110.0,
                },
                RouteStop {
                    site_id: "F2".to_string(),
                    pigs: 40,
                    avg_weight_kg: 112.0,
                },
            ],
            pigs_delivered: 100,
            delivered_weight_kg: 11_080.0,
            avg_weight_kg: 110.8,
            distance_km: 80.0,
            time_hours: 2.3,
            capacity_utilization_pct: 55.4,
            revenue: 19_944.0,
            penalty_rate: 0.0,
            penalty: 0.0,
            transport_cost: 96.0,
            fixed_cost_share: 140.0,
            profit: 19_708.0,
        }
    }

    #[test]
    fn test_events_csv_flattens_stops() {
        let mut buf = Vec::new();
        write_events(&mut buf, "run-1", &[event()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("run_id,day,plan_date,route_id"));
        let row = lines.next().unwrap();
        assert!(row.contains("F1;F2"));
        assert!(row.contains("60;40"));
    }

    #[test]
    fn test_daily_kpis_one_row_per_day() {
        let summaries = vec![
            DayKpis {
                day: 0,
                ..Default::default()
            },
            DayKpis {
                day: 1,
                routes: 2,
                plant_utilization_pct: 45.0,
                ..Default::default()
            },
        ];
        let mut buf = Vec::new();
        write_daily_kpis(&mut buf, &summaries).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().next().unwrap().ends_with("plant_utilization_pct"));
        assert!(text.lines().nth(2).unwrap().ends_with(",45.0"));
    }
}
