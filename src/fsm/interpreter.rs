use std::collections::VecDeque;
use std::sync::Arc;

use rand::{rngs::SmallRng, seq::IndexedRandom};

use super::definition::{CompiledFsm, Cond, Op, StateId, Step};
use crate::{
    common::{Coord, ShotResult},
    error::SimulationError,
    game::GuessBoard,
    targeting::{
        patterns::{self, ADJACENT, P2M2},
        TargetingAlgorithm,
    },
};

/// Per-game instance of a declarative algorithm: current state, queue
/// contents, variables and the last shot's result. Never shared between
/// games.
pub struct FsmRuntime {
    fsm: Arc<CompiledFsm>,
    state: StateId,
    queues: Vec<VecDeque<Coord>>,
    variables: Vec<i64>,
    last_result: Option<ShotResult>,
}

impl FsmRuntime {
    /// Enter the initial state, running its entry actions.
    pub fn start(fsm: Arc<CompiledFsm>, view: &GuessBoard) -> Self {
        let mut runtime = Self {
            state: fsm.initial,
            queues: vec![VecDeque::new(); fsm.queue_names.len()],
            variables: fsm.variable_init.clone(),
            last_result: None,
            fsm,
        };
        runtime.enter(runtime.state, view);
        runtime
    }

    pub fn state_name(&self) -> &str {
        &self.fsm.state_names[self.state]
    }

    /// Queued cells of the named queue, front first.
    pub fn queue(&self, name: &str) -> Option<&VecDeque<Coord>> {
        let id = self.fsm.queue_names.iter().position(|q| q == name)?;
        self.queues.get(id)
    }

    pub fn variable(&self, name: &str) -> Option<i64> {
        let id = self.fsm.variable_names.iter().position(|v| v == name)?;
        self.variables.get(id).copied()
    }

    /// Switch to `state` and run its entry actions. Cells yielded by entry
    /// actions are discarded.
    fn enter(&mut self, state: StateId, view: &GuessBoard) {
        self.state = state;
        let fsm = Arc::clone(&self.fsm);
        for step in &fsm.states[state].on_entry {
            if self.guard_holds(step) {
                self.execute(step.op, view, None);
            }
        }
    }

    fn guard_holds(&self, step: &Step) -> bool {
        step.guard.map_or(true, |cond| self.holds(cond))
    }

    fn holds(&self, cond: Cond) -> bool {
        match cond {
            Cond::OnHit => self.last_result.is_some_and(ShotResult::is_hit),
            Cond::OnMiss => self.last_result == Some(ShotResult::Miss),
            Cond::QueueEmpty(q) => self.queues[q].is_empty(),
            Cond::VarLessEqual(v, bound) => self.variables[v] <= bound,
        }
    }

    /// Run one action. Only `Pop` and `RandomShot` yield a cell; the latter
    /// needs a generator and is inert without one.
    fn execute(&mut self, op: Op, view: &GuessBoard, rng: Option<&mut SmallRng>) -> Option<Coord> {
        let size = view.size();
        match op {
            Op::Checkerboard { queue, parity } => {
                self.enqueue(queue, patterns::checkerboard(size, parity), view);
                None
            }
            Op::Diagonal { queue, parity } => {
                let path = patterns::diagonal_path(size)
                    .into_iter()
                    .filter(|&p| patterns::parity_of(p) == parity);
                self.enqueue(queue, path, view);
                None
            }
            Op::AddAdjacent { queue } => {
                if let Some(hit) = view.last_hit() {
                    self.enqueue(queue, patterns::around(size, hit, &ADJACENT), view);
                }
                None
            }
            Op::AddP2M2 { queue } => {
                if let Some(hit) = view.last_hit() {
                    self.enqueue(queue, patterns::around(size, hit, &P2M2), view);
                }
                None
            }
            Op::Pop { queue } => {
                let q = &mut self.queues[queue];
                while let Some((r, c)) = q.pop_front() {
                    if view.is_unfired(r, c) {
                        return Some((r, c));
                    }
                }
                None
            }
            Op::RandomShot => {
                let open: Vec<Coord> = view.unfired_cells().collect();
                rng.and_then(|rng| open.choose(rng).copied())
            }
            Op::Increment { var } => {
                self.variables[var] += 1;
                None
            }
        }
    }

    /// Append unfired cells not already queued, keeping `cells` order.
    fn enqueue(&mut self, queue: usize, cells: impl IntoIterator<Item = Coord>, view: &GuessBoard) {
        let q = &mut self.queues[queue];
        for (r, c) in cells {
            if view.is_unfired(r, c) && !q.contains(&(r, c)) {
                q.push_back((r, c));
            }
        }
    }
}

impl TargetingAlgorithm for FsmRuntime {
    fn name(&self) -> &str {
        self.fsm.name()
    }

    fn next_shot(&mut self, view: &GuessBoard, rng: &mut SmallRng) -> Result<Coord, SimulationError> {
        let fsm = Arc::clone(&self.fsm);
        for step in &fsm.states[self.state].next_shot {
            if !self.guard_holds(step) {
                continue;
            }
            if let Some((r, c)) = self.execute(step.op, view, Some(&mut *rng)) {
                if view.is_unfired(r, c) {
                    return Ok((r, c));
                }
            }
        }
        Err(SimulationError::NoCandidate {
            state: self.state_name().to_string(),
        })
    }

    fn on_shot_result(&mut self, _shot: Coord, result: ShotResult, view: &GuessBoard) {
        self.last_result = Some(result);
        for q in self.queues.iter_mut() {
            q.retain(|&(r, c)| view.is_unfired(r, c));
        }
        let fsm = Arc::clone(&self.fsm);
        let target = fsm.states[self.state]
            .transitions
            .iter()
            .find(|(cond, _)| self.holds(*cond))
            .map(|&(_, target)| target);
        if let Some(target) = target {
            self.enter(target, view);
        }
    }
}
