//! Declarative finite-state-machine algorithms.
//!
//! A definition names states, FIFO queues of cells and integer variables.
//! Each state lists actions run on entry, actions tried in order to produce
//! the next shot, and transitions checked after every shot. Definitions are
//! parsed with serde into a closed set of actions and conditions, validated
//! once, and compiled into an index-based form that every game of a run
//! shares read-only.

pub mod definition;
pub mod interpreter;

pub use definition::{
    compile_json, Action, ActionStep, CompiledFsm, Condition, FsmDefinition, ShotCondition,
    StateSpec, TransitionSpec, VariableBound,
};
pub use interpreter::FsmRuntime;
