use rand::rngs::SmallRng;

use super::{
    groups::{self, HitGroups, ShipCounter},
    patterns::{self, ADJACENT},
    random_unfired, TargetingAlgorithm,
};
use crate::{
    ai,
    bitboard::BitBoard,
    common::{Coord, ShotResult},
    error::SimulationError,
    game::GuessBoard,
};

/// Hit groups drive targeting; hunting fires at the most likely cell of a
/// probability map built from the unsunk ship lengths.
///
/// A group of one is probed on its four neighbours, a line only at its two
/// ends, and any other shape on every neighbour.
pub struct SmartTarget {
    groups: HitGroups,
    remaining: ShipCounter,
}

impl SmartTarget {
    pub fn new(view: &GuessBoard, _rng: &mut SmallRng) -> Self {
        Self {
            groups: HitGroups::new(),
            remaining: ShipCounter::from_fleet(view.fleet()),
        }
    }

    fn candidates(size: usize, group: &[Coord]) -> Vec<Coord> {
        if let [origin] = group {
            return patterns::around(size, *origin, &ADJACENT).collect();
        }
        match groups::line_of(group) {
            Some(line) => groups::line_candidates(size, group, line, false),
            None => groups::group_neighbours(size, group),
        }
    }

    fn hunt(&self, view: &GuessBoard, rng: &mut SmallRng) -> Option<Coord> {
        let size = view.size();
        let open_hits = BitBoard::new(size);
        let pdf = ai::calc_pdf(size, &open_hits, view.fired(), &view.remaining_lengths());
        ai::most_likely(&pdf, size, |r, c| view.is_unfired(r, c), rng)
    }
}

impl TargetingAlgorithm for SmartTarget {
    fn name(&self) -> &str {
        "Smart Target"
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
        match self.hunt(view, rng) {
            Some(cell) => Ok(cell),
            None => random_unfired(view, rng),
        }
    }

    fn on_shot_result(&mut self, shot: Coord, result: ShotResult, view: &GuessBoard) {
        if result.is_hit() {
            self.groups.add_hit(shot);
        } else {
            let size = view.size();
            self.groups
                .retire_boxed_in(view, &mut self.remaining, |g| Self::candidates(size, g));
        }
    }
}
