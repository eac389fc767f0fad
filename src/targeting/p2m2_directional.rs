use std::collections::VecDeque;

use rand::{rngs::SmallRng, seq::IndexedRandom};

use super::{
    groups::{self, HitGroups, ShipCounter},
    patterns::{self, ADJACENT, P2M2},
    random_unfired, TargetingAlgorithm,
};
use crate::{
    common::{Coord, ShotResult},
    error::SimulationError,
    game::GuessBoard,
};

/// Ships found before distance-two probing is dropped in favour of plain
/// neighbours.
const P2M2_SHIP_LIMIT: usize = 4;

/// Directional P2M2.
///
/// Hunts along a serpentine anti-diagonal path that starts at a random edge
/// cell and keeps only that cell's colour. A single hit is probed with the
/// P2M2 pattern (while few ships have been found); once two or more hits
/// form a line, only the gaps and the two ends of that line are fired at.
/// After every miss, groups with no candidate left are retired as sunk.
pub struct P2M2Directional {
    hunt: VecDeque<Coord>,
    groups: HitGroups,
    remaining: ShipCounter,
    ships_found: usize,
}

impl P2M2Directional {
    pub fn new(view: &GuessBoard, rng: &mut SmallRng) -> Self {
        let size = view.size();
        let path = patterns::diagonal_path(size);
        let start = patterns::edge_cells(size).choose(rng).copied().unwrap_or((0, 0));
        let parity = patterns::parity_of(start);
        let split = path.iter().position(|&p| p == start).unwrap_or(0);
        let hunt = path[split..]
            .iter()
            .chain(path[..split].iter())
            .copied()
            .filter(|&p| patterns::parity_of(p) == parity)
            .collect();
        Self {
            hunt,
            groups: HitGroups::new(),
            remaining: ShipCounter::from_fleet(view.fleet()),
            ships_found: 0,
        }
    }

    fn candidates(size: usize, ships_found: usize, group: &[Coord]) -> Vec<Coord> {
        let probe = ships_found <= P2M2_SHIP_LIMIT;
        if let Some(line) = groups::line_of(group) {
            return groups::line_candidates(size, group, line, true);
        }
        let mut out: Vec<Coord> = Vec::new();
        if probe {
            out.extend(group.iter().flat_map(|&h| patterns::around(size, h, &P2M2)));
        }
        out.extend(group.iter().flat_map(|&h| patterns::around(size, h, &ADJACENT)));
        out
    }
}

impl TargetingAlgorithm for P2M2Directional {
    fn name(&self) -> &str {
        "P2M2-ST (Directional)"
    }

    fn next_shot(&mut self, view: &GuessBoard, rng: &mut SmallRng) -> Result<Coord, SimulationError> {
        let size = view.size();
        for group in self.groups.by_size() {
            if let Some(cell) = Self::candidates(size, self.ships_found, group)
                .into_iter()
                .find(|&(r, c)| view.is_unfired(r, c))
            {
                return Ok(cell);
            }
        }
        while let Some((r, c)) = self.hunt.pop_front() {
            if view.is_unfired(r, c) {
                return Ok((r, c));
            }
        }
        random_unfired(view, rng)
    }

    fn on_shot_result(&mut self, shot: Coord, result: ShotResult, view: &GuessBoard) {
        if result.is_hit() {
            if self.groups.is_empty() {
                self.ships_found += 1;
            }
            self.groups.add_hit(shot);
        } else {
            let (size, found) = (view.size(), self.ships_found);
            self.groups
                .retire_boxed_in(view, &mut self.remaining, |g| Self::candidates(size, found, g));
        }
    }
}
