use rand::{rngs::SmallRng, seq::SliceRandom};

use super::{
    patterns::{self, ADJACENT},
    random_unfired, TargetingAlgorithm,
};
use crate::{
    common::{Coord, ShotResult},
    error::SimulationError,
    game::GuessBoard,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Hunt,
    Target,
}

/// Two-stage strategy. Hunts on one checkerboard colour (the other colour
/// is kept as a fallback) and, after a hit, works through the hit's
/// neighbours last-in first-out until none are left.
pub struct HuntAndTarget {
    mode: Mode,
    hunt: Vec<Coord>,
    priority: Vec<Coord>,
}

impl HuntAndTarget {
    pub fn new(view: &GuessBoard, rng: &mut SmallRng) -> Self {
        let size = view.size();
        let mut primary = patterns::checkerboard(size, 0);
        let mut secondary = patterns::checkerboard(size, 1);
        primary.shuffle(rng);
        secondary.shuffle(rng);
        // popped from the back: primary colour first
        secondary.extend(primary);
        Self {
            mode: Mode::Hunt,
            hunt: secondary,
            priority: Vec::new(),
        }
    }
}

impl TargetingAlgorithm for HuntAndTarget {
    fn name(&self) -> &str {
        "Hunt and Target"
    }

    fn next_shot(&mut self, view: &GuessBoard, rng: &mut SmallRng) -> Result<Coord, SimulationError> {
        if self.mode == Mode::Target {
            while let Some((r, c)) = self.priority.pop() {
                if view.is_unfired(r, c) {
                    return Ok((r, c));
                }
            }
            self.mode = Mode::Hunt;
        }
        while let Some((r, c)) = self.hunt.pop() {
            if view.is_unfired(r, c) {
                return Ok((r, c));
            }
        }
        random_unfired(view, rng)
    }

    fn on_shot_result(&mut self, shot: Coord, result: ShotResult, view: &GuessBoard) {
        if !result.is_hit() {
            return;
        }
        self.mode = Mode::Target;
        for (r, c) in patterns::around(view.size(), shot, &ADJACENT) {
            if view.is_unfired(r, c) && !self.priority.contains(&(r, c)) {
                self.priority.push((r, c));
            }
        }
    }
}
