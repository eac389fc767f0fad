//! Monte Carlo runner: many independent games of one algorithm in parallel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use rand::{rngs::SmallRng, SeedableRng};
use rayon::prelude::*;

use crate::{
    config::{SimConfig, SHIPS},
    error::{RunError, SimulationError},
    game::{GameEngine, GameOutcome},
    placement::Placement,
    stats::{Histogram, SummaryStats},
    targeting::AlgorithmDefinition,
};

/// Cooperative cancellation flag shared between a caller and running games.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything a batch produced for one algorithm.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub algorithm_id: String,
    pub algorithm_name: String,
    pub seed: u64,
    pub num_simulations: usize,
    /// Shots to win of each successful game, in game-index order.
    pub shots_per_game: Vec<usize>,
    pub aborted_games: usize,
    pub summary: SummaryStats,
    pub histogram: Histogram,
    /// Lowest-indexed successful game.
    pub sample_game: GameOutcome,
    /// How often each cell was fired at across successful games.
    pub heat_map: Vec<Vec<usize>>,
}

/// Generator for game `index` of a run seeded with `seed`.
pub fn game_rng(seed: u64, index: usize) -> SmallRng {
    SmallRng::seed_from_u64(seed.wrapping_add(index as u64))
}

/// Play game `index`: place the board from the game's own generator, then
/// hand the same generator to the algorithm.
pub fn play_one(
    definition: &AlgorithmDefinition,
    placement: &Placement,
    shot_cap: usize,
    seed: u64,
    index: usize,
    cancel: &CancelToken,
) -> Result<GameOutcome, SimulationError> {
    let mut rng = game_rng(seed, index);
    let board = placement.board_for_game(&mut rng);
    let engine = GameEngine::new(board, &SHIPS, definition, shot_cap, &mut rng);
    engine.play(&mut rng, cancel)
}

/// Per-worker partial result, merged once at the end.
struct Partial {
    samples: Vec<(usize, usize)>,
    aborted: usize,
    first_failure: Option<(usize, SimulationError)>,
    sample: Option<(usize, GameOutcome)>,
    heat: Vec<usize>,
    cancelled: bool,
}

impl Partial {
    fn new(cells: usize) -> Self {
        Self {
            samples: Vec::new(),
            aborted: 0,
            first_failure: None,
            sample: None,
            heat: vec![0; cells],
            cancelled: false,
        }
    }

    fn record(mut self, index: usize, size: usize, result: Result<GameOutcome, SimulationError>) -> Self {
        match result {
            Ok(outcome) => {
                self.samples.push((index, outcome.shots_to_win));
                for shot in &outcome.shots {
                    self.heat[shot.row * size + shot.col] += 1;
                }
                if self.sample.as_ref().map_or(true, |(i, _)| index < *i) {
                    self.sample = Some((index, outcome));
                }
            }
            Err(SimulationError::Cancelled) => self.cancelled = true,
            Err(err) => {
                debug!("game {} aborted: {}", index, err);
                self.aborted += 1;
                if self.first_failure.as_ref().map_or(true, |(i, _)| index < *i) {
                    self.first_failure = Some((index, err));
                }
            }
        }
        self
    }

    fn merge(mut self, other: Partial) -> Self {
        self.samples.extend(other.samples);
        self.aborted += other.aborted;
        self.cancelled |= other.cancelled;
        for (a, b) in self.heat.iter_mut().zip(other.heat) {
            *a += b;
        }
        self.first_failure = lowest(self.first_failure, other.first_failure);
        self.sample = lowest(self.sample, other.sample);
        self
    }
}

fn lowest<T>(a: Option<(usize, T)>, b: Option<(usize, T)>) -> Option<(usize, T)> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.0 < a.0 { b } else { a }),
        (a, b) => a.or(b),
    }
}

/// Run `f` on a dedicated pool of `threads` workers, or on the global pool
/// when `threads` is `None`.
pub fn in_pool<T, F>(threads: Option<usize>, f: F) -> Result<T, RunError>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    match threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| RunError::WorkerPool(e.to_string()))?;
            Ok(pool.install(f))
        }
        None => Ok(f()),
    }
}

/// Run `config.num_simulations` games of one algorithm. `config.seed` must
/// already be resolved.
pub fn run_batch(
    id: &str,
    definition: &AlgorithmDefinition,
    placement: &Placement,
    config: &SimConfig,
    cancel: &CancelToken,
) -> Result<BatchOutcome, RunError> {
    let n = config.num_simulations;
    if n == 0 {
        return Err(RunError::NoSimulations);
    }
    if !(0.0..=1.0).contains(&config.max_abort_rate) {
        return Err(RunError::InvalidAbortRate(config.max_abort_rate));
    }
    let seed = config.seed.unwrap_or_default();
    let size = config.board_size;
    let shot_cap = config.shot_cap();

    info!("running '{}': {} simulations, seed {}", id, n, seed);
    let start = Instant::now();

    let mut partial = (0..n)
        .into_par_iter()
        .fold(
            || Partial::new(size * size),
            |acc, i| acc.record(i, size, play_one(definition, placement, shot_cap, seed, i, cancel)),
        )
        .reduce(|| Partial::new(size * size), Partial::merge);

    if partial.cancelled || cancel.is_cancelled() {
        warn!("'{}' cancelled after {:.1?}", id, start.elapsed());
        return Err(RunError::Cancelled);
    }

    let aborted = partial.aborted;
    let threshold = |first: Option<SimulationError>| RunError::AbortThreshold {
        id: id.to_string(),
        aborted,
        total: n,
        first: first.unwrap_or(SimulationError::ShotCapExceeded { cap: shot_cap }),
    };
    if partial.samples.is_empty() || aborted as f64 / n as f64 > config.max_abort_rate {
        return Err(threshold(partial.first_failure.map(|(_, err)| err)));
    }
    if aborted > 0 {
        warn!("'{}': {} of {} games aborted", id, aborted, n);
    }

    partial.samples.sort_unstable_by_key(|&(i, _)| i);
    let shots_per_game: Vec<usize> = partial.samples.into_iter().map(|(_, shots)| shots).collect();
    let (_, sample_game) = partial.sample.ok_or_else(|| threshold(None))?;
    let summary = SummaryStats::from_samples(&shots_per_game).ok_or_else(|| threshold(None))?;
    let histogram = Histogram::from_samples(&shots_per_game, config.histogram_bins);
    let heat_map = partial.heat.chunks(size.max(1)).map(<[usize]>::to_vec).collect();

    info!(
        "finished '{}': {} games won, {} aborted in {:.1?}",
        id,
        shots_per_game.len(),
        aborted,
        start.elapsed()
    );

    Ok(BatchOutcome {
        algorithm_id: id.to_string(),
        algorithm_name: definition.name().to_string(),
        seed,
        num_simulations: n,
        shots_per_game,
        aborted_games: aborted,
        summary,
        histogram,
        sample_game,
        heat_map,
    })
}
