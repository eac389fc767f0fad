//! Targeting algorithms
//!
//! This module defines the [`TargetingAlgorithm`] trait every shot chooser
//! implements, plus the built-in strategies:
//! - RandomSearch: uniformly random unfired cells
//! - HuntAndTarget: checkerboard hunt with adjacent follow-up after a hit
//! - P2M2Enhanced: parity hunt with distance-two probing and midpoint fill
//! - P2M2Optimized: hit groups, gap filling and space-aware hunting
//! - P2M2Directional: diagonal hunt with direction inference on lines
//! - SmartTarget: hit groups for targeting, probability map for hunting
//!
//! Declarative algorithms are interpreted by [`crate::fsm`].

use std::sync::Arc;

use rand::{rngs::SmallRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    common::{Coord, ShotResult},
    error::SimulationError,
    fsm::{CompiledFsm, FsmRuntime},
    game::GuessBoard,
};

pub mod groups;
pub mod hunt_target;
pub mod p2m2;
pub mod p2m2_directional;
pub mod p2m2_optimized;
pub mod patterns;
pub mod random_search;
pub mod smart_target;

pub use hunt_target::HuntAndTarget;
pub use p2m2::P2M2Enhanced;
pub use p2m2_directional::P2M2Directional;
pub use p2m2_optimized::P2M2Optimized;
pub use random_search::RandomSearch;
pub use smart_target::SmartTarget;

/// Interface implemented by every shot chooser.
///
/// One instance plays exactly one game. It is created at game start, asked
/// for a shot each turn and told the result of that shot.
pub trait TargetingAlgorithm: Send {
    /// Human readable name.
    fn name(&self) -> &str;

    /// Choose the next cell to fire at. Must be in bounds and unfired.
    fn next_shot(&mut self, view: &GuessBoard, rng: &mut SmallRng) -> Result<Coord, SimulationError>;

    /// Inform the algorithm of the result of its last shot. `view` already
    /// includes it.
    fn on_shot_result(&mut self, _shot: Coord, _result: ShotResult, _view: &GuessBoard) {}
}

/// The closed set of built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinKind {
    RandomSearch,
    HuntAndTarget,
    P2M2Enhanced,
    P2M2Optimized,
    #[serde(rename = "p2m2stdirectional")]
    P2M2Directional,
    SmartTarget,
}

impl BuiltinKind {
    pub const ALL: [BuiltinKind; 6] = [
        BuiltinKind::RandomSearch,
        BuiltinKind::HuntAndTarget,
        BuiltinKind::P2M2Enhanced,
        BuiltinKind::P2M2Optimized,
        BuiltinKind::P2M2Directional,
        BuiltinKind::SmartTarget,
    ];

    /// Registry id.
    pub fn id(self) -> &'static str {
        match self {
            BuiltinKind::RandomSearch => "randomsearch",
            BuiltinKind::HuntAndTarget => "huntandtarget",
            BuiltinKind::P2M2Enhanced => "p2m2enhanced",
            BuiltinKind::P2M2Optimized => "p2m2optimized",
            BuiltinKind::P2M2Directional => "p2m2stdirectional",
            BuiltinKind::SmartTarget => "smarttarget",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BuiltinKind::RandomSearch => "Random Search",
            BuiltinKind::HuntAndTarget => "Hunt and Target",
            BuiltinKind::P2M2Enhanced => "P2M2 Enhanced",
            BuiltinKind::P2M2Optimized => "P2M2 Optimized",
            BuiltinKind::P2M2Directional => "P2M2-ST (Directional)",
            BuiltinKind::SmartTarget => "Smart Target",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    fn instantiate(self, view: &GuessBoard, rng: &mut SmallRng) -> Box<dyn TargetingAlgorithm> {
        match self {
            BuiltinKind::RandomSearch => Box::new(RandomSearch::new(view, rng)),
            BuiltinKind::HuntAndTarget => Box::new(HuntAndTarget::new(view, rng)),
            BuiltinKind::P2M2Enhanced => Box::new(P2M2Enhanced::new(view, rng)),
            BuiltinKind::P2M2Optimized => Box::new(P2M2Optimized::new(view, rng)),
            BuiltinKind::P2M2Directional => Box::new(P2M2Directional::new(view, rng)),
            BuiltinKind::SmartTarget => Box::new(SmartTarget::new(view, rng)),
        }
    }
}

/// A resolved, validated algorithm ready to be instantiated once per game.
#[derive(Debug, Clone)]
pub enum AlgorithmDefinition {
    BuiltIn(BuiltinKind),
    Declarative(Arc<CompiledFsm>),
}

impl AlgorithmDefinition {
    pub fn name(&self) -> &str {
        match self {
            AlgorithmDefinition::BuiltIn(kind) => kind.display_name(),
            AlgorithmDefinition::Declarative(fsm) => fsm.name(),
        }
    }

    /// Fresh per-game instance. Declarative machines run the initial state's
    /// entry actions here.
    pub fn instantiate(&self, view: &GuessBoard, rng: &mut SmallRng) -> Box<dyn TargetingAlgorithm> {
        match self {
            AlgorithmDefinition::BuiltIn(kind) => kind.instantiate(view, rng),
            AlgorithmDefinition::Declarative(fsm) => Box::new(FsmRuntime::start(Arc::clone(fsm), view)),
        }
    }
}

/// Uniformly random unfired cell. The last resort of every built-in.
pub fn random_unfired(view: &GuessBoard, rng: &mut SmallRng) -> Result<Coord, SimulationError> {
    let open: Vec<Coord> = view.unfired_cells().collect();
    open.choose(rng).copied().ok_or_else(|| SimulationError::NoCandidate {
        state: "fallback".to_string(),
    })
}
