mod ai;
mod anova;
mod bitboard;
mod board;
mod common;
mod config;
mod error;
pub mod fsm;
mod game;
mod logging;
mod placement;
mod registry;
mod report;
mod runner;
mod ship;
mod stats;
pub mod targeting;

pub use ai::*;
pub use anova::{f_survival, one_way_anova, regularized_beta, AnovaResult};
pub use bitboard::{BitBoard, BitBoardError};
pub use board::*;
pub use common::*;
pub use config::*;
pub use error::*;
pub use game::*;
pub use logging::init_logging;
pub use placement::{Placement, PlacementStrategy};
pub use registry::{AlgorithmInfo, AlgorithmRegistry};
pub use report::*;
pub use runner::*;
pub use ship::*;
pub use stats::{Histogram, SummaryStats};
pub use targeting::{AlgorithmDefinition, BuiltinKind, TargetingAlgorithm};
