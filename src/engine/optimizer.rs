// ==========================================
// 生猪运输排程仿真 - 参数搜索
// ==========================================
// 职责: 以不同可调参数重复仿真, 选出净利润最高的组合
// 并行: 每个候选在 tokio blocking 线程池上独立运行, 各自持有状态副本
// 规则: 结果按候选顺序返回; 净利润相同时保留较早的候选
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::scenario::Scenario;
use crate::engine::biology::GrowthModel;
use crate::engine::error::{SimulationError, SimulationResult};
use crate::engine::metrics::RunKpis;
use crate::engine::simulator::{DaySimulator, SimulationOutcome};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, instrument};

/// 单个候选参数组合
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchCandidate {
    pub min_market_weight_kg: Option<f64>,
    pub horizon_days: i64,
}

/// 单个候选的仿真结果
#[derive(Debug, Clone)]
pub struct CandidateResult {
    pub candidate: SearchCandidate,
    pub kpis: RunKpis,
    pub outcome: SimulationOutcome,
}

/// 搜索结果
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub results: Vec<CandidateResult>,
    pub best_index: Option<usize>,
}

impl SearchReport {
    pub fn best(&self) -> Option<&CandidateResult> {
        self.best_index.and_then(|idx| self.results.get(idx))
    }
}

// ==========================================
// ParameterSearch - 网格搜索
// ==========================================
pub struct ParameterSearch {
    base_config: SimulationConfig,
    growth: GrowthModel,
    scenario: Arc<Scenario>,
}

impl ParameterSearch {
    pub fn new(base_config: SimulationConfig, scenario: Scenario) -> Self {
        let growth = GrowthModel::new(
            scenario.weight_table.clone(),
            scenario.consumption_table.clone(),
        );
        Self {
            base_config,
            growth,
            scenario: Arc::new(scenario),
        }
    }

    /// 构造候选网格
    ///
    /// # 参数
    /// - `min_weights_kg`: 出栏最低体重候选
    /// - `horizons`: 仿真天数候选 (空则使用基础配置)
    pub fn grid(&self, min_weights_kg: &[f64], horizons: &[i64]) -> Vec<SearchCandidate> {
        let horizons: Vec<i64> = if horizons.is_empty() {
            vec![self.base_config.horizon_days]
        } else {
            horizons.to_vec()
        };
        horizons
            .iter()
            .flat_map(|&horizon_days| {
                min_weights_kg.iter().map(move |&w| SearchCandidate {
                    min_market_weight_kg: Some(w),
                    horizon_days,
                })
            })
            .collect()
    }

    /// 并行评估全部候选
    ///
    /// # 返回
    /// - Ok(SearchReport): 按候选顺序的结果 + 最优下标
    /// - Err: 任一候选配置非法或任务失败
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub async fn run(&self, candidates: Vec<SearchCandidate>) -> SimulationResult<SearchReport> {
        info!("开始参数搜索");

        let tasks = candidates.into_iter().map(|candidate| {
            let config = SimulationConfig {
                min_market_weight_kg: candidate.min_market_weight_kg,
                horizon_days: candidate.horizon_days,
                ..self.base_config.clone()
            };
            let growth = self.growth.clone();
            let scenario = Arc::clone(&self.scenario);
            async move {
                let outcome = tokio::task::spawn_blocking(move || {
                    DaySimulator::new(config, growth)?.run(&scenario)
                })
                .await
                .map_err(|e| SimulationError::Task(e.to_string()))??;
                Ok::<_, SimulationError>(CandidateResult {
                    candidate,
                    kpis: outcome.kpis.clone(),
                    outcome,
                })
            }
        });

        let results = join_all(tasks)
            .await
            .into_iter()
            .collect::<SimulationResult<Vec<_>>>()?;

        let best_index = best_by_profit(&results);
        if let Some(best) = best_index.and_then(|idx| results.get(idx)) {
            info!(
                min_market_weight_kg = ?best.candidate.min_market_weight_kg,
                horizon_days = best.candidate.horizon_days,
                net_profit = best.kpis.net_profit,
                "参数搜索完成"
            );
        }

        Ok(SearchReport {
            results,
            best_index,
        })
    }

    /// 出栏最低体重网格搜索
    pub async fn search_min_market_weight(
        &self,
        min_weights_kg: &[f64],
    ) -> SimulationResult<SearchReport> {
        let candidates = self.grid(min_weights_kg, &[]);
        self.run(candidates).await
    }
}

/// 净利润最高者 (严格大于才替换, 平局保留较早候选)
fn best_by_profit(results: &[CandidateResult]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, result) in results.iter().enumerate() {
        let profit = result.kpis.net_profit;
        match best {
            Some((_, current)) if profit <= current => {}
            _ => best = Some((idx, profit)),
        }
    }
    best.map(|(idx, _)| idx)
}
