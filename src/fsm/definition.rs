//! JSON shape of a declarative algorithm and its validated, indexed form.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// A declarative algorithm as written by users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FsmDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub initial_state: String,
    #[serde(default)]
    pub queues: Vec<String>,
    /// Integer variables and their starting values.
    #[serde(default, deserialize_with = "unique_keys")]
    pub variables: BTreeMap<String, i64>,
    #[serde(deserialize_with = "unique_keys")]
    pub states: BTreeMap<String, StateSpec>,
}

/// Map deserializer that rejects a key declared twice instead of keeping the last.
fn unique_keys<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueKeys<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueKeys<V> {
        type Value = BTreeMap<String, V>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map with unique keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut map = BTreeMap::new();
            while let Some((key, value)) = access.next_entry::<String, V>()? {
                if map.contains_key(&key) {
                    return Err(de::Error::custom(format!("duplicate key '{key}'")));
                }
                map.insert(key, value);
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueKeys(PhantomData))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSpec {
    #[serde(default)]
    pub on_entry: Vec<ActionStep>,
    #[serde(default)]
    pub next_shot: Vec<ActionStep>,
    #[serde(default)]
    pub transitions: Vec<TransitionSpec>,
}

/// One action, optionally guarded by a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
    #[serde(flatten)]
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    GenerateCheckerboardHunt {
        queue: String,
        #[serde(default)]
        parity: u8,
    },
    GenerateDiagonalHunt {
        queue: String,
        #[serde(default)]
        parity: u8,
    },
    AddAdjacentToQueue {
        queue: String,
    },
    #[serde(rename = "add_p2m2_to_queue")]
    AddP2M2ToQueue {
        queue: String,
    },
    PopFromQueue {
        queue: String,
    },
    GenerateRandomShot,
    IncrementVariable {
        variable: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Keyword(ShotCondition),
    QueueEmpty { queue_empty: String },
    VariableLessEqual { variable_less_equal: VariableBound },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotCondition {
    OnHit,
    OnMiss,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableBound {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub condition: Condition,
    pub next_state: String,
}

pub type StateId = usize;
pub type QueueId = usize;
pub type VarId = usize;

/// Action with every name resolved to an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Checkerboard { queue: QueueId, parity: u8 },
    Diagonal { queue: QueueId, parity: u8 },
    AddAdjacent { queue: QueueId },
    AddP2M2 { queue: QueueId },
    Pop { queue: QueueId },
    RandomShot,
    Increment { var: VarId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    OnHit,
    OnMiss,
    QueueEmpty(QueueId),
    VarLessEqual(VarId, i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub op: Op,
    pub guard: Option<Cond>,
}

#[derive(Debug, Clone, Default)]
pub struct CompiledState {
    pub on_entry: Vec<Step>,
    pub next_shot: Vec<Step>,
    pub transitions: Vec<(Cond, StateId)>,
}

/// A validated definition. Shared read-only by every game of a run.
#[derive(Debug, Clone)]
pub struct CompiledFsm {
    name: String,
    description: String,
    pub(crate) initial: StateId,
    pub(crate) states: Vec<CompiledState>,
    pub(crate) state_names: Vec<String>,
    pub(crate) queue_names: Vec<String>,
    pub(crate) variable_names: Vec<String>,
    pub(crate) variable_init: Vec<i64>,
}

impl CompiledFsm {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn state_names(&self) -> &[String] {
        &self.state_names
    }

    pub fn queue_names(&self) -> &[String] {
        &self.queue_names
    }
}

impl FsmDefinition {
    /// Parse a JSON document. Shape errors, unknown actions and unknown
    /// conditions all surface as [`ValidationError::Malformed`].
    pub fn from_json(text: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(text).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    /// Check every reference and resolve names to indices.
    pub fn compile(&self) -> Result<CompiledFsm, ValidationError> {
        let mut queue_ids: HashMap<&str, QueueId> = HashMap::new();
        for (i, q) in self.queues.iter().enumerate() {
            if queue_ids.insert(q.as_str(), i).is_some() {
                return Err(ValidationError::DuplicateQueue(q.clone()));
            }
        }
        let var_ids: HashMap<&str, VarId> = self
            .variables
            .keys()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        let state_ids: HashMap<&str, StateId> = self
            .states
            .keys()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let initial = *state_ids
            .get(self.initial_state.as_str())
            .ok_or_else(|| ValidationError::UnknownInitialState(self.initial_state.clone()))?;

        let resolver = Resolver {
            queues: &queue_ids,
            variables: &var_ids,
        };
        let mut states = Vec::with_capacity(self.states.len());
        for (state, spec) in &self.states {
            let steps = |list: &[ActionStep]| -> Result<Vec<Step>, ValidationError> {
                list.iter().map(|s| resolver.step(state, s)).collect()
            };
            let mut transitions = Vec::with_capacity(spec.transitions.len());
            for t in &spec.transitions {
                let cond = resolver.condition(state, &t.condition)?;
                let target = *state_ids.get(t.next_state.as_str()).ok_or_else(|| {
                    ValidationError::UndeclaredState {
                        state: state.clone(),
                        target: t.next_state.clone(),
                    }
                })?;
                transitions.push((cond, target));
            }
            states.push(CompiledState {
                on_entry: steps(&spec.on_entry)?,
                next_shot: steps(&spec.next_shot)?,
                transitions,
            });
        }

        Ok(CompiledFsm {
            name: self.name.clone(),
            description: self.description.clone(),
            initial,
            states,
            state_names: self.states.keys().cloned().collect(),
            queue_names: self.queues.clone(),
            variable_names: self.variables.keys().cloned().collect(),
            variable_init: self.variables.values().copied().collect(),
        })
    }
}

/// Parse and compile in one go.
pub fn compile_json(text: &str) -> Result<CompiledFsm, ValidationError> {
    FsmDefinition::from_json(text)?.compile()
}

struct Resolver<'a> {
    queues: &'a HashMap<&'a str, QueueId>,
    variables: &'a HashMap<&'a str, VarId>,
}

impl Resolver<'_> {
    fn queue(&self, state: &str, name: &str) -> Result<QueueId, ValidationError> {
        self.queues
            .get(name)
            .copied()
            .ok_or_else(|| ValidationError::UndeclaredQueue {
                state: state.to_string(),
                queue: name.to_string(),
            })
    }

    fn variable(&self, state: &str, name: &str) -> Result<VarId, ValidationError> {
        self.variables
            .get(name)
            .copied()
            .ok_or_else(|| ValidationError::UndeclaredVariable {
                state: state.to_string(),
                variable: name.to_string(),
            })
    }

    fn parity(&self, state: &str, parity: u8) -> Result<u8, ValidationError> {
        if parity > 1 {
            return Err(ValidationError::InvalidParity {
                state: state.to_string(),
                parity,
            });
        }
        Ok(parity)
    }

    fn step(&self, state: &str, step: &ActionStep) -> Result<Step, ValidationError> {
        let op = match &step.action {
            Action::GenerateCheckerboardHunt { queue, parity } => Op::Checkerboard {
                queue: self.queue(state, queue)?,
                parity: self.parity(state, *parity)?,
            },
            Action::GenerateDiagonalHunt { queue, parity } => Op::Diagonal {
                queue: self.queue(state, queue)?,
                parity: self.parity(state, *parity)?,
            },
            Action::AddAdjacentToQueue { queue } => Op::AddAdjacent {
                queue: self.queue(state, queue)?,
            },
            Action::AddP2M2ToQueue { queue } => Op::AddP2M2 {
                queue: self.queue(state, queue)?,
            },
            Action::PopFromQueue { queue } => Op::Pop {
                queue: self.queue(state, queue)?,
            },
            Action::GenerateRandomShot => Op::RandomShot,
            Action::IncrementVariable { variable } => Op::Increment {
                var: self.variable(state, variable)?,
            },
        };
        let guard = step
            .condition
            .as_ref()
            .map(|c| self.condition(state, c))
            .transpose()?;
        Ok(Step { op, guard })
    }

    fn condition(&self, state: &str, cond: &Condition) -> Result<Cond, ValidationError> {
        Ok(match cond {
            Condition::Keyword(ShotCondition::OnHit) => Cond::OnHit,
            Condition::Keyword(ShotCondition::OnMiss) => Cond::OnMiss,
            Condition::QueueEmpty { queue_empty } => Cond::QueueEmpty(self.queue(state, queue_empty)?),
            Condition::VariableLessEqual { variable_less_equal } => Cond::VarLessEqual(
                self.variable(state, &variable_less_equal.name)?,
                variable_less_equal.value,
            ),
        })
    }
}
