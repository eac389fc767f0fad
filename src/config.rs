//! Fleet constants and simulation settings.

use crate::ship::ShipType;
use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 10;
pub const NUM_SHIPS: usize = 5;
pub const SHIPS: [ShipType; NUM_SHIPS] = [
    ShipType::new("Carrier", 5),
    ShipType::new("Battleship", 4),
    ShipType::new("Cruiser", 3),
    ShipType::new("Submarine", 3),
    ShipType::new("Destroyer", 2),
];

/// Total number of ship segments used in the standard configuration.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Bin count used when a run does not ask for one.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Settings shared by every game of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side of the square board.
    pub board_size: usize,
    /// Games played per algorithm.
    pub num_simulations: usize,
    /// Run seed; drawn from OS entropy when absent.
    pub seed: Option<u64>,
    /// Extra shots allowed above `board_size²` before a game is aborted.
    pub shot_cap_margin: usize,
    /// Fraction of aborted games above which the whole run fails.
    pub max_abort_rate: f64,
    pub histogram_bins: usize,
    /// Worker threads; `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            num_simulations: 1000,
            seed: None,
            shot_cap_margin: 0,
            max_abort_rate: 0.5,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            threads: None,
        }
    }
}

impl SimConfig {
    pub fn with_simulations(mut self, num_simulations: usize) -> Self {
        self.num_simulations = num_simulations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_board_size(mut self, board_size: usize) -> Self {
        self.board_size = board_size;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Hard limit on shots in one game.
    pub fn shot_cap(&self) -> usize {
        self.board_size * self.board_size + self.shot_cap_margin
    }

    /// Returns the configured seed, or draws a fresh one and stores it so the
    /// run can be replayed.
    pub fn resolve_seed(&mut self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                self.seed = Some(seed);
                seed
            }
        }
    }
}
