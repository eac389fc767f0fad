use std::collections::VecDeque;

use rand::{rngs::SmallRng, seq::SliceRandom, Rng};

use super::{
    patterns::{self, ADJACENT, P2M2},
    random_unfired, TargetingAlgorithm,
};
use crate::{
    common::{Coord, ShotResult},
    error::SimulationError,
    game::GuessBoard,
};

/// Parity hunt plus P2M2 ("plus two, minus two") targeting.
///
/// The hunt fires on one randomly chosen checkerboard colour. Each hit is
/// probed first at distance two, which keeps shots on the hunting colour,
/// then at distance one. When a distance-two probe hits, the cell between
/// the two hits is fired next.
pub struct P2M2Enhanced {
    hunt: Vec<Coord>,
    /// Hits still being worked, newest first.
    priority: VecDeque<Coord>,
    /// Hit whose distance-two pattern is being probed.
    anchor: Option<Coord>,
    probe_hit: bool,
}

impl P2M2Enhanced {
    pub fn new(view: &GuessBoard, rng: &mut SmallRng) -> Self {
        let size = view.size();
        let parity: u8 = rng.random_range(0..2);
        let mut primary = patterns::checkerboard(size, parity);
        let mut secondary = patterns::checkerboard(size, 1 - parity);
        primary.shuffle(rng);
        secondary.shuffle(rng);
        secondary.extend(primary);
        Self {
            hunt: secondary,
            priority: VecDeque::new(),
            anchor: None,
            probe_hit: false,
        }
    }

    fn target(&mut self, view: &GuessBoard) -> Option<Coord> {
        let size = view.size();
        while let Some(&origin) = self.priority.front() {
            if self.probe_hit {
                self.probe_hit = false;
                if let Some(prev) = self.anchor {
                    let mid = ((origin.0 + prev.0) / 2, (origin.1 + prev.1) / 2);
                    if view.is_unfired(mid.0, mid.1) {
                        return Some(mid);
                    }
                }
            }
            self.anchor = Some(origin);
            let next = patterns::around(size, origin, &P2M2)
                .chain(patterns::around(size, origin, &ADJACENT))
                .find(|&(r, c)| view.is_unfired(r, c));
            if next.is_some() {
                return next;
            }
            self.priority.pop_front();
        }
        None
    }
}

impl TargetingAlgorithm for P2M2Enhanced {
    fn name(&self) -> &str {
        "P2M2 Enhanced"
    }

    fn next_shot(&mut self, view: &GuessBoard, rng: &mut SmallRng) -> Result<Coord, SimulationError> {
        if let Some(cell) = self.target(view) {
            return Ok(cell);
        }
        while let Some((r, c)) = self.hunt.pop() {
            if view.is_unfired(r, c) {
                self.anchor = None;
                self.probe_hit = false;
                return Ok((r, c));
            }
        }
        random_unfired(view, rng)
    }

    fn on_shot_result(&mut self, shot: Coord, result: ShotResult, view: &GuessBoard) {
        if !result.is_hit() {
            return;
        }
        if let Some(anchor) = self.anchor {
            if patterns::around(view.size(), anchor, &P2M2).any(|p| p == shot) {
                self.probe_hit = true;
            }
        }
        self.priority.push_front(shot);
    }
}
