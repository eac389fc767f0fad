use rand::{rngs::SmallRng, seq::SliceRandom};

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

/// Fraction of the board fired at after which hunt cells are only taken
/// when the shortest remaining ship still fits through them.
const SPACE_CHECK_PROGRESS: f64 = 0.6;

/// Hybrid P2M2: connected hits are grouped, lines are filled gap-first then
/// extended, and a group with nothing left to probe is assumed to be a sunk
/// ship of its size. Hunting walks a shuffled checkerboard and, late in the
/// game, skips cells no remaining ship can cover.
pub struct P2M2Optimized {
    hunt: Vec<Coord>,
    groups: HitGroups,
    remaining: ShipCounter,
}

impl P2M2Optimized {
    pub fn new(view: &GuessBoard, rng: &mut SmallRng) -> Self {
        let mut hunt = patterns::checkerboard(view.size(), 0);
        hunt.shuffle(rng);
        Self {
            hunt,
            groups: HitGroups::new(),
            remaining: ShipCounter::from_fleet(view.fleet()),
        }
    }

    fn candidates(size: usize, group: &[Coord]) -> Vec<Coord> {
        if let [origin] = group {
            return patterns::around(size, *origin, &P2M2)
                .chain(patterns::around(size, *origin, &ADJACENT))
                .collect();
        }
        match groups::line_of(group) {
            Some(line) => groups::line_candidates(size, group, line, true),
            None => groups::group_neighbours(size, group),
        }
    }

    fn space_for_remaining(&self, view: &GuessBoard, cell: Coord) -> bool {
        match self.remaining.min_length() {
            Some(len) => groups::has_room(view, cell, len),
            None => true,
        }
    }
}

impl TargetingAlgorithm for P2M2Optimized {
    fn name(&self) -> &str {
        "P2M2 Optimized"
    }

    fn next_shot(&mut self, view: &GuessBoard, rng: &mut SmallRng) -> Result<Coord, SimulationError> {
        let size = view.size();
        for group in self.groups.by_size() {
            if let Some(cell) = Self::candidates(size, group)
                .into_iter()
                .find(|&(r, c)| view.is_unfired(r, c))
            {
                return Ok(cell);
            }
        }

        let progress = view.shots_fired() as f64 / (size * size) as f64;
        let space_check = progress > SPACE_CHECK_PROGRESS;
        while let Some((r, c)) = self.hunt.pop() {
            if view.is_unfired(r, c) && (!space_check || self.space_for_remaining(view, (r, c))) {
                return Ok((r, c));
            }
        }
        random_unfired(view, rng)
    }

    fn on_shot_result(&mut self, shot: Coord, result: ShotResult, view: &GuessBoard) {
        if !result.is_hit() {
            return;
        }
        self.groups.add_hit(shot);
        let size = view.size();
        self.groups
            .retire_boxed_in(view, &mut self.remaining, |g| Self::candidates(size, g));
    }
}
