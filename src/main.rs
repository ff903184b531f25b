// ==========================================
// 生猪运输排程仿真 - 命令行入口
// ==========================================
// 流程: 加载配置 → 加载场景 → 仿真 (或参数搜索) → 导出结果
// ==========================================

use anyhow::{Context, Result};
use clap::Parser;
use pig_logistics::config::config_keys;
use pig_logistics::engine::ParameterSearch;
use pig_logistics::logging::{self, LogFormat};
use pig_logistics::{exporter, ConfigManager, DaySimulator, RunKpis, ScenarioLoader};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "pig-logistics", version)]
#[command(about = "Day-by-day pig transport routing and economics simulation")]
struct Args {
    /// Directory holding farms / slaughterhouses / transports (+ weight / consumption) tables
    data_dir: PathBuf,

    /// JSON file with configuration overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for events.csv and daily_kpis.csv
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,

    /// Override the simulation horizon (days)
    #[arg(long)]
    horizon: Option<i64>,

    /// Grid-search minimum market weights (comma-separated kg) and export the best run
    #[arg(long, value_delimiter = ',')]
    search_min_weights: Vec<f64>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_with_format(if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    info!("==================================================");
    info!("{} v{}", pig_logistics::APP_NAME, pig_logistics::VERSION);
    info!("==================================================");

    let mut manager = match &args.config {
        Some(path) => ConfigManager::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ConfigManager::new(),
    };
    if let Some(horizon) = args.horizon {
        manager.set(config_keys::HORIZON_DAYS, horizon.to_string());
    }
    let config = manager.build_simulation_config()?;

    let scenario = ScenarioLoader::new(&args.data_dir)
        .load()
        .with_context(|| format!("failed to load scenario from {}", args.data_dir.display()))?;

    let outcome = if args.search_min_weights.is_empty() {
        DaySimulator::for_scenario(config, &scenario)?.run(&scenario)?
    } else {
        let search = ParameterSearch::new(config, scenario);
        let report = search
            .search_min_market_weight(&args.search_min_weights)
            .await?;
        for result in &report.results {
            info!(
                min_market_weight_kg = ?result.candidate.min_market_weight_kg,
                net_profit = result.kpis.net_profit,
                "候选结果"
            );
        }
        report
            .best()
            .map(|best| best.outcome.clone())
            .context("parameter search produced no candidates")?
    };

    let (events_path, kpis_path) = exporter::export_outcome(&args.out_dir, &outcome)?;
    print_kpis(&outcome.kpis);
    info!(
        events = %events_path.display(),
        daily_kpis = %kpis_path.display(),
        "完成"
    );
    Ok(())
}

fn print_kpis(kpis: &RunKpis) {
    info!(
        routes = kpis.num_routes,
        rejected = kpis.rejected_routes,
        pigs = kpis.total_pigs_delivered,
        weight_kg = kpis.total_weight_kg,
        distance_km = kpis.total_distance_km,
        revenue = kpis.total_revenue,
        penalty = kpis.total_penalty,
        transport_cost = kpis.total_transport_cost,
        fixed_cost = kpis.total_fixed_cost,
        net_profit = kpis.net_profit,
        cost_per_kg = kpis.cost_per_kg,
        "全程 KPI"
    );
}
