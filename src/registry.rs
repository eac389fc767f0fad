//! Algorithm registry: built-ins under fixed ids plus declarative
//! definitions registered from JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;

use crate::error::RunError;
use crate::fsm::FsmDefinition;
use crate::targeting::{AlgorithmDefinition, BuiltinKind};

/// Listing entry for one registered algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
enum Entry {
    BuiltIn(BuiltinKind),
    /// Parsed but not yet validated; validation happens on every resolve so
    /// a bad definition fails the run that names it.
    Declarative(FsmDefinition),
}

impl Entry {
    fn name(&self) -> &str {
        match self {
            Entry::BuiltIn(kind) => kind.display_name(),
            Entry::Declarative(def) => &def.name,
        }
    }
}

/// Maps algorithm ids to definitions.
#[derive(Debug, Clone, Default)]
pub struct AlgorithmRegistry {
    entries: BTreeMap<String, Entry>,
}

impl AlgorithmRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in strategy.
    pub fn with_builtins() -> Self {
        let entries = BuiltinKind::ALL
            .into_iter()
            .map(|kind| (kind.id().to_string(), Entry::BuiltIn(kind)))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Register a declarative definition under `id`. The JSON must parse;
    /// reference checks are deferred to [`AlgorithmRegistry::resolve`].
    pub fn register_json(&mut self, id: &str, json: &str) -> Result<(), RunError> {
        if self.contains(id) {
            return Err(RunError::DuplicateAlgorithm(id.to_string()));
        }
        let def = FsmDefinition::from_json(json).map_err(|source| RunError::Validation {
            id: id.to_string(),
            source,
        })?;
        self.register_definition(id, def)
    }

    pub fn register_definition(&mut self, id: &str, def: FsmDefinition) -> Result<(), RunError> {
        if self.contains(id) {
            return Err(RunError::DuplicateAlgorithm(id.to_string()));
        }
        self.entries.insert(id.to_string(), Entry::Declarative(def));
        Ok(())
    }

    /// Register every `*.json` file in `dir`, id taken from the file stem.
    /// Files that cannot be read or parsed are logged and skipped. Returns the
    /// ids that were added.
    pub fn load_dir(&mut self, dir: &Path) -> Result<Vec<String>, RunError> {
        let io_err = |source| RunError::Io {
            path: dir.display().to_string(),
            source,
        };
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = Vec::new();
        for path in paths {
            let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                warn!("skipping {}: file name is not valid UTF-8", path.display());
                continue;
            };
            let registered = fs::read_to_string(&path)
                .map_err(|source| RunError::Io {
                    path: path.display().to_string(),
                    source,
                })
                .and_then(|json| self.register_json(&id, &json));
            match registered {
                Ok(()) => {
                    info!("registered algorithm '{}' from {}", id, path.display());
                    loaded.push(id);
                }
                Err(e) => warn!("skipping {}: {}", path.display(), e),
            }
        }
        Ok(loaded)
    }

    /// Every registered algorithm, sorted by display name then id.
    pub fn list(&self) -> Vec<AlgorithmInfo> {
        let mut out: Vec<AlgorithmInfo> = self
            .entries
            .iter()
            .map(|(id, entry)| AlgorithmInfo {
                id: id.clone(),
                name: entry.name().to_string(),
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        out
    }

    /// Look up and validate `id`, ready to instantiate per game.
    pub fn resolve(&self, id: &str) -> Result<AlgorithmDefinition, RunError> {
        match self.entries.get(id) {
            Some(Entry::BuiltIn(kind)) => Ok(AlgorithmDefinition::BuiltIn(*kind)),
            Some(Entry::Declarative(def)) => def
                .compile()
                .map(|fsm| AlgorithmDefinition::Declarative(Arc::new(fsm)))
                .map_err(|source| RunError::Validation {
                    id: id.to_string(),
                    source,
                }),
            None => Err(RunError::UnknownAlgorithm {
                id: id.to_string(),
                available: self.entries.keys().cloned().collect::<Vec<_>>().join(", "),
            }),
        }
    }
}
