//! Common types for Battleship: coordinates, shot results and board errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bitboard::BitBoardError;

/// A `(row, col)` cell.
pub type Coord = (usize, usize);

/// Index of a ship within the fleet.
pub type ShipId = usize;

/// Result of a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotResult {
    /// Shot hit a ship segment.
    Hit,
    /// Shot missed all ships.
    Miss,
    /// Shot hit and sank a ship, carrying its fleet index.
    Sink(ShipId),
}

impl ShotResult {
    /// `true` for both plain hits and sinking hits.
    pub fn is_hit(self) -> bool {
        !matches!(self, ShotResult::Miss)
    }

    /// Fleet index of the ship this shot sank, if any.
    pub fn sunk(self) -> Option<ShipId> {
        match self {
            ShotResult::Sink(id) => Some(id),
            _ => None,
        }
    }
}

/// One fired shot, in firing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub row: usize,
    pub col: usize,
    pub result: ShotResult,
}

impl ShotRecord {
    pub fn coord(&self) -> Coord {
        (self.row, self.col)
    }
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Underlying bitboard error (e.g., invalid size or index).
    #[error("bitboard error: {0}")]
    BitBoard(#[from] BitBoardError),
    /// A shot landed outside the grid.
    #[error("shot ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },
    /// Ship placement runs past the edge of the board.
    #[error("{name} at ({row}, {col}) does not fit on the board")]
    ShipOutOfBounds {
        name: &'static str,
        row: usize,
        col: usize,
    },
    /// Ship placement overlaps another ship.
    #[error("{name} overlaps an already placed ship")]
    ShipOverlaps { name: &'static str },
}
