//! Run and comparison requests, and the result documents returned for them.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    anova::{one_way_anova, AnovaResult},
    board::SolutionGrid,
    config::{SimConfig, SHIPS},
    error::{ComparisonError, RunError},
    game::GameOutcome,
    placement::{Placement, PlacementStrategy},
    registry::AlgorithmRegistry,
    runner::{in_pool, run_batch, BatchOutcome, CancelToken},
    stats::{Histogram, SummaryStats},
};

/// Request to evaluate one algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub algorithm: String,
    #[serde(default)]
    pub ship_placement_strategy: PlacementStrategy,
    /// Solution grids for the fixed and set-based strategies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placement_grids: Vec<SolutionGrid>,
    #[serde(flatten)]
    pub config: SimConfig,
}

/// Request to evaluate and compare several algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareRequest {
    pub algorithms: Vec<String>,
    #[serde(default)]
    pub ship_placement_strategy: PlacementStrategy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placement_grids: Vec<SolutionGrid>,
    #[serde(flatten)]
    pub config: SimConfig,
}

/// Replayable trace of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGame {
    /// `[row, col]` pairs in firing order.
    pub shots: Vec<[usize; 2]>,
    pub solution_grid: SolutionGrid,
}

impl From<&GameOutcome> for SampleGame {
    fn from(game: &GameOutcome) -> Self {
        Self {
            shots: game.shots.iter().map(|s| [s.row, s.col]).collect(),
            solution_grid: game.solution_grid.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary_stats: SummaryStats,
    pub histogram: Histogram,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visualizations {
    pub sample_game: SampleGame,
    pub heat_map: Vec<Vec<usize>>,
}

/// Parameters the run actually used, seed included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub algorithms: Vec<String>,
    pub num_simulations: usize,
    pub ship_placement_strategy: PlacementStrategy,
    pub board_size: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawData {
    pub shots_per_game: Vec<usize>,
}

/// Result of a single-algorithm run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleRunResult {
    pub algorithm_name: String,
    pub analysis: Analysis,
    pub visualizations: Visualizations,
    pub simulation_parameters: SimulationParameters,
    pub raw_data: RawData,
    pub aborted_games: usize,
}

/// One algorithm's entry in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualResult {
    pub algorithm_name: String,
    #[serde(flatten)]
    pub summary_stats: SummaryStats,
    pub histogram: Histogram,
    pub sample_game: SampleGame,
    pub aborted_games: usize,
}

impl From<&BatchOutcome> for IndividualResult {
    fn from(batch: &BatchOutcome) -> Self {
        Self {
            algorithm_name: batch.algorithm_name.clone(),
            summary_stats: batch.summary.clone(),
            histogram: batch.histogram.clone(),
            sample_game: SampleGame::from(&batch.sample_game),
            aborted_games: batch.aborted_games,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub individual_results: BTreeMap<String, IndividualResult>,
    pub comparison_analysis: AnovaResult,
    pub simulation_parameters: SimulationParameters,
}

fn resolve_placement(
    strategy: PlacementStrategy,
    grids: &[SolutionGrid],
    config: &SimConfig,
) -> Result<Placement, RunError> {
    Ok(strategy.resolve(&SHIPS, config.board_size, grids)?)
}

/// Validate, then run one algorithm's batch.
pub fn run_single(
    registry: &AlgorithmRegistry,
    request: &RunRequest,
    cancel: &CancelToken,
) -> Result<SingleRunResult, RunError> {
    let definition = registry.resolve(&request.algorithm)?;
    let placement = resolve_placement(
        request.ship_placement_strategy,
        &request.placement_grids,
        &request.config,
    )?;
    let mut config = request.config.clone();
    let seed = config.resolve_seed();

    let batch = in_pool(config.threads, || {
        run_batch(&request.algorithm, &definition, &placement, &config, cancel)
    })??;

    Ok(SingleRunResult {
        algorithm_name: batch.algorithm_name.clone(),
        analysis: Analysis {
            summary_stats: batch.summary.clone(),
            histogram: batch.histogram.clone(),
        },
        visualizations: Visualizations {
            sample_game: SampleGame::from(&batch.sample_game),
            heat_map: batch.heat_map,
        },
        simulation_parameters: SimulationParameters {
            algorithms: vec![request.algorithm.clone()],
            num_simulations: config.num_simulations,
            ship_placement_strategy: request.ship_placement_strategy,
            board_size: config.board_size,
            seed,
        },
        raw_data: RawData {
            shots_per_game: batch.shots_per_game,
        },
        aborted_games: batch.aborted_games,
    })
}

/// Run every distinct algorithm of the request on the same seed and compare
/// the outcomes with a one-way ANOVA.
pub fn run_comparison(
    registry: &AlgorithmRegistry,
    request: &CompareRequest,
    cancel: &CancelToken,
) -> Result<ComparisonResult, RunError> {
    let mut ids: Vec<&str> = Vec::with_capacity(request.algorithms.len());
    for id in &request.algorithms {
        if !ids.contains(&id.as_str()) {
            ids.push(id);
        }
    }
    if ids.len() < 2 {
        return Err(ComparisonError::TooFewGroups(ids.len()).into());
    }
    let definitions = ids
        .iter()
        .map(|id| registry.resolve(id))
        .collect::<Result<Vec<_>, _>>()?;
    let placement = resolve_placement(
        request.ship_placement_strategy,
        &request.placement_grids,
        &request.config,
    )?;
    let mut config = request.config.clone();
    let seed = config.resolve_seed();

    let batches = in_pool(config.threads, || {
        ids.par_iter()
            .zip(definitions.par_iter())
            .map(|(id, def)| run_batch(id, def, &placement, &config, cancel))
            .collect::<Result<Vec<_>, _>>()
    })??;

    let groups: Vec<(&str, &[usize])> = batches
        .iter()
        .map(|b| (b.algorithm_id.as_str(), b.shots_per_game.as_slice()))
        .collect();
    let comparison_analysis = one_way_anova(&groups)?;

    Ok(ComparisonResult {
        individual_results: batches
            .iter()
            .map(|b| (b.algorithm_id.clone(), IndividualResult::from(b)))
            .collect(),
        comparison_analysis,
        simulation_parameters: SimulationParameters {
            algorithms: ids.iter().map(|id| id.to_string()).collect(),
            num_simulations: config.num_simulations,
            ship_placement_strategy: request.ship_placement_strategy,
            board_size: config.board_size,
            seed,
        },
    })
}
