use rand::{rngs::SmallRng, seq::SliceRandom};

use super::TargetingAlgorithm;
use crate::{common::Coord, error::SimulationError, game::GuessBoard};

/// Fires at every cell once, in a shuffled order. The baseline strategy.
pub struct RandomSearch {
    unfired: Vec<Coord>,
}

impl RandomSearch {
    pub fn new(view: &GuessBoard, rng: &mut SmallRng) -> Self {
        let mut unfired: Vec<Coord> = view.unfired_cells().collect();
        unfired.shuffle(rng);
        Self { unfired }
    }
}

impl TargetingAlgorithm for RandomSearch {
    fn name(&self) -> &str {
        "Random Search"
    }

    fn next_shot(&mut self, view: &GuessBoard, _rng: &mut SmallRng) -> Result<Coord, SimulationError> {
        while let Some((r, c)) = self.unfired.pop() {
            if view.is_unfired(r, c) {
                return Ok((r, c));
            }
        }
        Err(SimulationError::NoCandidate {
            state: "random".to_string(),
        })
    }
}
