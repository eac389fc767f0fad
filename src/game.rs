//! Single-game simulator: one board, one algorithm, shots until the fleet
//! is sunk or the shot cap is reached.

use rand::rngs::SmallRng;
use serde::Serialize;

use crate::{
    bitboard::BitBoard,
    board::{Board, SolutionGrid},
    common::{BoardError, Coord, ShotRecord, ShotResult},
    error::SimulationError,
    runner::CancelToken,
    ship::ShipType,
    targeting::{AlgorithmDefinition, TargetingAlgorithm},
};

/// The attacker's view of the opponent board: what has been fired at, what
/// hit, and which ships are known to be sunk.
#[derive(Clone, Debug)]
pub struct GuessBoard {
    size: usize,
    fleet: Vec<ShipType>,
    fired: BitBoard,
    hits: BitBoard,
    history: Vec<ShotRecord>,
    sunk: Vec<bool>,
}

impl GuessBoard {
    /// Fresh view with nothing fired.
    pub fn new(size: usize, fleet: &[ShipType]) -> Self {
        Self {
            size,
            fleet: fleet.to_vec(),
            fired: BitBoard::new(size),
            hits: BitBoard::new(size),
            history: Vec::new(),
            sunk: vec![false; fleet.len()],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn fleet(&self) -> &[ShipType] {
        &self.fleet
    }

    /// Every cell fired at so far.
    pub fn fired(&self) -> &BitBoard {
        &self.fired
    }

    /// Cells where a shot hit.
    pub fn hits(&self) -> &BitBoard {
        &self.hits
    }

    /// Shots in firing order.
    pub fn history(&self) -> &[ShotRecord] {
        &self.history
    }

    pub fn shots_fired(&self) -> usize {
        self.history.len()
    }

    /// In bounds and not yet fired at.
    #[inline]
    pub fn is_unfired(&self, row: usize, col: usize) -> bool {
        self.fired.in_bounds(row, col) && !self.fired.contains(row, col)
    }

    /// Cells not yet fired at, row-major.
    pub fn unfired_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (!&self.fired).iter_set_bits().collect::<Vec<_>>().into_iter()
    }

    pub fn last_shot(&self) -> Option<&ShotRecord> {
        self.history.last()
    }

    /// Most recent shot that hit.
    pub fn last_hit(&self) -> Option<Coord> {
        self.history
            .iter()
            .rev()
            .find(|s| s.result.is_hit())
            .map(ShotRecord::coord)
    }

    /// Whether the ship at fleet index `id` has been reported sunk.
    pub fn is_sunk(&self, id: usize) -> bool {
        self.sunk.get(id).copied().unwrap_or(false)
    }

    /// Lengths of enemy ships not yet sunk, in fleet order.
    pub fn remaining_lengths(&self) -> Vec<usize> {
        self.fleet
            .iter()
            .zip(self.sunk.iter())
            .filter(|(_, &sunk)| !sunk)
            .map(|(def, _)| def.length())
            .collect()
    }

    /// Record the result of a shot against the opponent.
    pub fn record(&mut self, row: usize, col: usize, result: ShotResult) -> Result<(), BoardError> {
        self.fired.set(row, col)?;
        if result.is_hit() {
            self.hits.set(row, col)?;
        }
        if let Some(flag) = result.sunk().and_then(|id| self.sunk.get_mut(id)) {
            *flag = true;
        }
        self.history.push(ShotRecord { row, col, result });
        Ok(())
    }
}

/// Lifecycle of one simulated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Setup,
    Playing,
    Won,
    Aborted,
}

/// Result of a game that ended with the whole fleet sunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameOutcome {
    pub shots_to_win: usize,
    pub shots: Vec<ShotRecord>,
    pub solution_grid: SolutionGrid,
}

/// Core game logic: the hidden board, the attacker's view and the algorithm
/// choosing shots.
pub struct GameEngine {
    board: Board,
    guesses: GuessBoard,
    algorithm: Box<dyn TargetingAlgorithm>,
    phase: GamePhase,
    shot_cap: usize,
}

impl GameEngine {
    /// Setup phase: take the placed board and start a fresh algorithm
    /// instance, running its entry logic. The engine leaves in `Playing`.
    pub fn new(
        board: Board,
        fleet: &[ShipType],
        definition: &AlgorithmDefinition,
        shot_cap: usize,
        rng: &mut SmallRng,
    ) -> Self {
        let guesses = GuessBoard::new(board.size(), fleet);
        let algorithm = definition.instantiate(&guesses, rng);
        Self {
            board,
            guesses,
            algorithm,
            phase: GamePhase::Playing,
            shot_cap,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn guesses(&self) -> &GuessBoard {
        &self.guesses
    }

    pub fn algorithm_name(&self) -> &str {
        self.algorithm.name()
    }

    /// Fire one shot chosen by the algorithm and advance the phase.
    pub fn step(&mut self, rng: &mut SmallRng) -> Result<GamePhase, SimulationError> {
        if self.phase != GamePhase::Playing {
            return Ok(self.phase);
        }
        let stepped = self.fire(rng);
        if stepped.is_err() {
            self.phase = GamePhase::Aborted;
        }
        stepped
    }

    fn fire(&mut self, rng: &mut SmallRng) -> Result<GamePhase, SimulationError> {
        let (row, col) = self.algorithm.next_shot(&self.guesses, rng)?;
        let size = self.board.size();
        let invalid = || SimulationError::InvalidShot { row, col, size };
        let result = self.board.record_shot(row, col).map_err(|_| invalid())?;
        self.guesses.record(row, col, result).map_err(|_| invalid())?;
        self.algorithm.on_shot_result((row, col), result, &self.guesses);

        if self.board.all_sunk() {
            self.phase = GamePhase::Won;
        } else if self.guesses.shots_fired() >= self.shot_cap {
            return Err(SimulationError::ShotCapExceeded { cap: self.shot_cap });
        }
        Ok(self.phase)
    }

    /// Play until won or aborted, checking `cancel` between shots.
    pub fn play(
        mut self,
        rng: &mut SmallRng,
        cancel: &CancelToken,
    ) -> Result<GameOutcome, SimulationError> {
        while self.phase == GamePhase::Playing {
            if cancel.is_cancelled() {
                self.phase = GamePhase::Aborted;
                return Err(SimulationError::Cancelled);
            }
            self.step(rng)?;
        }
        Ok(GameOutcome {
            shots_to_win: self.guesses.shots_fired(),
            solution_grid: self.board.solution_grid(),
            shots: self.guesses.history,
        })
    }
}
