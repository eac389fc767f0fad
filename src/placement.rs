//! How each game's hidden board is produced.

use core::fmt;
use core::str::FromStr;

use rand::{rngs::SmallRng, Rng};
use serde::{Deserialize, Serialize};

use crate::board::{Board, SolutionGrid};
use crate::error::PlacementError;
use crate::ship::ShipType;

/// Placement strategy named in a run request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStrategy {
    /// A fresh random layout for every game.
    #[default]
    RandomEachRound,
    /// One supplied grid used for every game.
    FixedForAllRounds,
    /// Each game draws one grid from a supplied set.
    RandomFromSet,
}

impl PlacementStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            PlacementStrategy::RandomEachRound => "random_each_round",
            PlacementStrategy::FixedForAllRounds => "fixed_for_all_rounds",
            PlacementStrategy::RandomFromSet => "random_from_set",
        }
    }

    /// Validate the strategy against the fleet, board side and supplied
    /// grids before any game runs.
    pub fn resolve(
        self,
        fleet: &[ShipType],
        size: usize,
        grids: &[SolutionGrid],
    ) -> Result<Placement, PlacementError> {
        match self {
            PlacementStrategy::RandomEachRound => {
                Board::check_fleet_fits(fleet, size)?;
                Ok(Placement(Source::Random {
                    fleet: fleet.to_vec(),
                    size,
                }))
            }
            PlacementStrategy::FixedForAllRounds => match grids {
                [grid] => Ok(Placement(Source::Fixed(board_from_grid(fleet, size, grid)?))),
                [] => Err(PlacementError::MissingGrid {
                    strategy: self.as_str(),
                    needs: "exactly one solution grid",
                }),
                _ => Err(PlacementError::InvalidGrid(format!(
                    "{} takes exactly one grid, got {}",
                    self.as_str(),
                    grids.len()
                ))),
            },
            PlacementStrategy::RandomFromSet => {
                if grids.is_empty() {
                    return Err(PlacementError::MissingGrid {
                        strategy: self.as_str(),
                        needs: "at least one solution grid",
                    });
                }
                let boards = grids
                    .iter()
                    .map(|grid| board_from_grid(fleet, size, grid))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Placement(Source::FromSet(boards)))
            }
        }
    }
}

impl fmt::Display for PlacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random_each_round" => Ok(PlacementStrategy::RandomEachRound),
            "fixed_for_all_rounds" => Ok(PlacementStrategy::FixedForAllRounds),
            "random_from_set" => Ok(PlacementStrategy::RandomFromSet),
            other => Err(format!(
                "unknown placement strategy '{}' (expected random_each_round, fixed_for_all_rounds or random_from_set)",
                other
            )),
        }
    }
}

fn board_from_grid(fleet: &[ShipType], size: usize, grid: &SolutionGrid) -> Result<Board, PlacementError> {
    if grid.len() != size {
        return Err(PlacementError::InvalidGrid(format!(
            "grid has {} rows, board side is {}",
            grid.len(),
            size
        )));
    }
    Board::from_solution_grid(fleet, grid)
}

/// A validated placement, ready to hand out one board per game.
#[derive(Debug, Clone)]
pub struct Placement(Source);

#[derive(Debug, Clone)]
enum Source {
    Random { fleet: Vec<ShipType>, size: usize },
    Fixed(Board),
    /// Never empty.
    FromSet(Vec<Board>),
}

impl Placement {
    /// Board for one game, drawn from that game's generator.
    pub fn board_for_game(&self, rng: &mut SmallRng) -> Board {
        match &self.0 {
            Source::Random { fleet, size } => Board::layout_random(fleet, *size, rng),
            Source::Fixed(board) => board.clone(),
            Source::FromSet(boards) => boards[rng.random_range(0..boards.len())].clone(),
        }
    }
}
