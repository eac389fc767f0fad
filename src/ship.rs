//! Ship definitions and placed-ship hit tracking.

use core::fmt;

use crate::common::{BoardError, Coord, ShipId};

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Offset of segment `i` from the ship's origin.
    #[inline]
    pub fn step(self, (row, col): Coord, i: usize) -> Coord {
        match self {
            Orientation::Horizontal => (row, col + i),
            Orientation::Vertical => (row + i, col),
        }
    }
}

/// Type of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipType {
    name: &'static str,
    length: usize,
}

impl ShipType {
    /// Create a new ship type.
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    /// Ship's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ship's length.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// A ship placed on a board, with a hit flag per segment.
#[derive(Clone, PartialEq, Eq)]
pub struct Ship {
    id: ShipId,
    ship_type: ShipType,
    orientation: Orientation,
    row: usize,
    col: usize,
    hits: Vec<bool>,
}

impl Ship {
    /// Place a ship at (`row`, `col`) with `orientation` on a board of side
    /// `board_size`.
    pub fn new(
        id: ShipId,
        ship_type: ShipType,
        orientation: Orientation,
        row: usize,
        col: usize,
        board_size: usize,
    ) -> Result<Self, BoardError> {
        let len = ship_type.length();
        let last = len.saturating_sub(1);
        let end = match orientation {
            Orientation::Horizontal => col.checked_add(last).map(|c| (row, c)),
            Orientation::Vertical => row.checked_add(last).map(|r| (r, col)),
        };
        let fits = end.is_some_and(|(r, c)| r < board_size && c < board_size);
        if len == 0 || !fits {
            return Err(BoardError::ShipOutOfBounds {
                name: ship_type.name(),
                row,
                col,
            });
        }
        Ok(Ship {
            id,
            ship_type,
            orientation,
            row,
            col,
            hits: vec![false; len],
        })
    }

    /// Cells covered by the ship, from its origin outwards.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.ship_type.length()).map(move |i| self.orientation.step((self.row, self.col), i))
    }

    /// Segment index of `(row, col)` if the ship covers it.
    fn segment(&self, row: usize, col: usize) -> Option<usize> {
        let offset = match self.orientation {
            Orientation::Horizontal if row == self.row && col >= self.col => Some(col - self.col),
            Orientation::Vertical if col == self.col && row >= self.row => Some(row - self.row),
            _ => None,
        };
        offset.filter(|&i| i < self.ship_type.length())
    }

    /// Whether the ship covers `(row, col)`.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.segment(row, col).is_some()
    }

    /// Register a hit at (`row`, `col`). Returns `true` if the ship covers
    /// the cell; hitting the same segment twice is recorded once.
    pub fn register_hit(&mut self, row: usize, col: usize) -> bool {
        match self.segment(row, col) {
            Some(i) => {
                self.hits[i] = true;
                true
            }
            None => false,
        }
    }

    /// Number of distinct segments hit so far.
    pub fn hit_count(&self) -> usize {
        self.hits.iter().filter(|&&h| h).count()
    }

    /// Check if the ship is sunk (all segments hit).
    pub fn is_sunk(&self) -> bool {
        self.hit_count() == self.ship_type.length()
    }

    /// Fleet index of this ship.
    pub fn id(&self) -> ShipId {
        self.id
    }

    /// Ship's type.
    pub fn ship_type(&self) -> ShipType {
        self.ship_type
    }

    /// Origin of the ship (row, col).
    pub fn origin(&self) -> Coord {
        (self.row, self.col)
    }

    /// Orientation of the ship.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ id: {}, name: \"{}\", origin: ({}, {}), orientation: {:?}, hits: {} }}",
            self.id,
            self.ship_type.name(),
            self.row,
            self.col,
            self.orientation,
            self.hit_count(),
        )
    }
}
