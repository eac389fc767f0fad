//! Game board: the hidden solution plus hit/miss bookkeeping.

use std::collections::BTreeMap;

use crate::bitboard::BitBoard;
use crate::common::{BoardError, Coord, ShipId, ShotResult};
use crate::error::PlacementError;
use crate::ship::{Orientation, Ship, ShipType};
use core::fmt;
use rand::Rng;

/// Consecutive rejected positions for one ship before the whole fleet is
/// laid out again.
const RESTART_AFTER_REJECTIONS: usize = 10_000;

/// A solution grid as exchanged with callers: `None` is water, otherwise the
/// name of the ship covering the cell.
pub type SolutionGrid = Vec<Vec<Option<String>>>;

/// Main board state: ship placements, hits, misses.
#[derive(Clone)]
pub struct Board {
    size: usize,
    ships: Vec<Ship>,
    cells: Vec<Option<ShipId>>,
    ship_map: BitBoard,
    hits: BitBoard,
    misses: BitBoard,
}

impl Board {
    /// Create an empty board (no ships placed).
    pub fn new(size: usize) -> Self {
        Board {
            size,
            ships: Vec::new(),
            cells: vec![None; size * size],
            ship_map: BitBoard::new(size),
            hits: BitBoard::new(size),
            misses: BitBoard::new(size),
        }
    }

    /// Structural check that `fleet` can always be laid out on a board of
    /// side `size`: every ship fits along one axis and the fleet covers at
    /// most half the board.
    pub fn check_fleet_fits(fleet: &[ShipType], size: usize) -> Result<(), PlacementError> {
        if size == 0 {
            return Err(PlacementError::EmptyBoard);
        }
        if let Some(def) = fleet.iter().find(|def| def.length() > size) {
            return Err(PlacementError::ShipTooLong {
                name: def.name(),
                length: def.length(),
                size,
            });
        }
        let required: usize = fleet.iter().map(|def| def.length()).sum();
        let capacity = size * size / 2;
        if required > capacity {
            return Err(PlacementError::FleetTooLarge {
                required,
                capacity,
                size,
            });
        }
        Ok(())
    }

    /// Lay out `fleet` in order, each ship at a uniformly random cell and
    /// orientation, rejecting positions that leave the board or overlap.
    pub fn place_random<R: Rng + ?Sized>(
        fleet: &[ShipType],
        size: usize,
        rng: &mut R,
    ) -> Result<Board, PlacementError> {
        Self::check_fleet_fits(fleet, size)?;
        Ok(Self::layout_random(fleet, size, rng))
    }

    /// Random layout without the capacity check. Only call with a fleet
    /// that passed [`Board::check_fleet_fits`] for `size`.
    pub(crate) fn layout_random<R: Rng + ?Sized>(fleet: &[ShipType], size: usize, rng: &mut R) -> Board {
        'layout: loop {
            let mut board = Board::new(size);
            for &def in fleet {
                match board.random_placement(rng, def) {
                    Some((r, c, orient)) => {
                        // random_placement only yields free, in-bounds spots
                        if board.place(def, r, c, orient).is_err() {
                            continue 'layout;
                        }
                    }
                    None => continue 'layout,
                }
            }
            return board;
        }
    }

    /// Rebuild a board from a caller-supplied solution grid. Every fleet
    /// ship must appear exactly once as a straight run of its length.
    pub fn from_solution_grid(
        fleet: &[ShipType],
        grid: &[Vec<Option<String>>],
    ) -> Result<Board, PlacementError> {
        let size = grid.len();
        if size == 0 {
            return Err(PlacementError::EmptyBoard);
        }
        if let Some((r, row)) = grid.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(PlacementError::InvalidGrid(format!(
                "row {} has {} cells, expected {}",
                r,
                row.len(),
                size
            )));
        }

        let mut by_name: BTreeMap<&str, Vec<Coord>> = BTreeMap::new();
        for (r, row) in grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Some(name) = cell {
                    by_name.entry(name.as_str()).or_default().push((r, c));
                }
            }
        }
        if let Some(name) = by_name
            .keys()
            .find(|name| !fleet.iter().any(|def| def.name() == **name))
        {
            return Err(PlacementError::InvalidGrid(format!("unknown ship '{}'", name)));
        }

        let mut board = Board::new(size);
        for &def in fleet {
            let cells = by_name.get(def.name()).map(Vec::as_slice).unwrap_or(&[]);
            let (r, c, orient) = straight_run(cells, def.length()).ok_or_else(|| {
                PlacementError::InvalidGrid(format!(
                    "{} must occupy {} cells in one straight line, found {}",
                    def.name(),
                    def.length(),
                    cells.len()
                ))
            })?;
            board
                .place(def, r, c, orient)
                .map_err(|e| PlacementError::InvalidGrid(e.to_string()))?;
        }
        Ok(board)
    }

    /// Side of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Placed ships in fleet order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Returns `true` when every ship's hit count equals its length.
    pub fn all_sunk(&self) -> bool {
        self.ships.iter().all(|s| s.is_sunk())
    }

    /// Board occupancy mask of all ships.
    pub fn ship_map(&self) -> &BitBoard {
        &self.ship_map
    }

    /// Cells that have been hit.
    pub fn hits(&self) -> &BitBoard {
        &self.hits
    }

    /// Cells that have been fired at and missed.
    pub fn misses(&self) -> &BitBoard {
        &self.misses
    }

    /// Fleet index of the ship covering `(row, col)`.
    pub fn ship_at(&self, row: usize, col: usize) -> Option<ShipId> {
        if row < self.size && col < self.size {
            self.cells[row * self.size + col]
        } else {
            None
        }
    }

    /// Place the next fleet ship at (row, col) with `orientation`. Returns the
    /// fleet index assigned to it.
    pub fn place(
        &mut self,
        ship_type: ShipType,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<ShipId, BoardError> {
        let id = self.ships.len();
        let ship = Ship::new(id, ship_type, orientation, row, col, self.size)?;
        // ensure no overlap
        if ship.cells().any(|(r, c)| self.ship_map.contains(r, c)) {
            return Err(BoardError::ShipOverlaps {
                name: ship_type.name(),
            });
        }
        for (r, c) in ship.cells() {
            self.ship_map.set(r, c)?;
            self.cells[r * self.size + c] = Some(id);
        }
        self.ships.push(ship);
        Ok(id)
    }

    /// Draws random (row, col, orientation) candidates for `def` until one is
    /// in bounds and free. Gives up after a long run of rejections so the
    /// caller can restart the layout.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        def: ShipType,
    ) -> Option<(usize, usize, Orientation)> {
        for _ in 0..RESTART_AFTER_REJECTIONS {
            let orient = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let r = rng.random_range(0..self.size);
            let c = rng.random_range(0..self.size);
            let (end_r, end_c) = orient.step((r, c), def.length().saturating_sub(1));
            if end_r >= self.size || end_c >= self.size {
                continue;
            }
            let blocked = (0..def.length())
                .map(|i| orient.step((r, c), i))
                .any(|(rr, cc)| self.ship_map.contains(rr, cc));
            if !blocked {
                return Some((r, c, orient));
            }
        }
        None
    }

    /// Fire at (row, col). Marks the cell, credits the owning ship and
    /// reports whether the shot sank it. Re-firing a cell scores it as
    /// whatever it already is and never reports a second sink.
    pub fn record_shot(&mut self, row: usize, col: usize) -> Result<ShotResult, BoardError> {
        if row >= self.size || col >= self.size {
            return Err(BoardError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        match self.cells[row * self.size + col] {
            Some(id) => {
                self.hits.set(row, col)?;
                let ship = &mut self.ships[id];
                let was_sunk = ship.is_sunk();
                ship.register_hit(row, col);
                if !was_sunk && ship.is_sunk() {
                    Ok(ShotResult::Sink(id))
                } else {
                    Ok(ShotResult::Hit)
                }
            }
            None => {
                self.misses.set(row, col)?;
                Ok(ShotResult::Miss)
            }
        }
    }

    /// The hidden layout, one ship name per occupied cell.
    pub fn solution_grid(&self) -> SolutionGrid {
        (0..self.size)
            .map(|r| {
                (0..self.size)
                    .map(|c| {
                        self.ship_at(r, c)
                            .map(|id| self.ships[id].ship_type().name().to_string())
                    })
                    .collect()
            })
            .collect()
    }
}

/// Origin and orientation of `cells` if they form one straight contiguous
/// run of exactly `length` cells. Expects row-major order.
fn straight_run(cells: &[Coord], length: usize) -> Option<(usize, usize, Orientation)> {
    if cells.len() != length || length == 0 {
        return None;
    }
    let (r0, c0) = cells[0];
    for orient in [Orientation::Horizontal, Orientation::Vertical] {
        if cells
            .iter()
            .enumerate()
            .all(|(i, &cell)| cell == orient.step((r0, c0), i))
        {
            return Some((r0, c0, orient));
        }
    }
    None
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  ship_map: {:?},\n  hits: {:?},\n  misses: {:?},\n  ships: {:?}\n}}",
            self.ship_map, self.hits, self.misses, self.ships
        )
    }
}
