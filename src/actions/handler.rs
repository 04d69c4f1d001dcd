//! Action handler seam and the dispatch table

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use ahash::AHashMap;

use crate::actions::catalog::ParamSpec;
use crate::core::error::{InterpreterError, Result};
use crate::core::types::ActionKind;

/// Filtered, fully resolved arguments passed to a handler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionArgs(BTreeMap<&'static str, String>);

impl ActionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.0.insert(name, value.into());
        self
    }

    pub fn insert(&mut self, name: &'static str, value: impl Into<String>) {
        self.0.insert(name, value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Look up an argument the catalog marks as required
    pub fn require(&self, kind: ActionKind, name: &'static str) -> Result<&str> {
        self.get(name)
            .ok_or(InterpreterError::MissingArgument { kind, param: name })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// Keep only the declared parameters, checking required ones are present
    pub fn filtered(&self, kind: ActionKind, params: &[ParamSpec]) -> Result<ActionArgs> {
        let mut kept = ActionArgs::new();
        for param in params {
            match self.0.get(param.name) {
                Some(value) => kept.insert(param.name, value.clone()),
                None if param.required => {
                    return Err(InterpreterError::MissingArgument {
                        kind,
                        param: param.name,
                    })
                }
                None => {}
            }
        }
        Ok(kept)
    }
}

/// What a handler reports back on success
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerOutput {
    /// Passed through verbatim to the presentation layer
    pub message: String,
    /// Path the effect produced, when it differs from what the dispatcher expects
    pub location: Option<PathBuf>,
}

impl HandlerOutput {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// A capability that performs the real-world effect of an action
///
/// Handlers may block. Failures are returned, never panicked; the dispatcher
/// turns them into failed results with the error text passed through.
pub trait ActionHandler: Send + Sync {
    /// Parameters accepted for `kind`; defaults to the catalog entry
    fn params(&self, kind: ActionKind) -> &'static [ParamSpec] {
        kind.params()
    }

    fn handle(&self, kind: ActionKind, args: &ActionArgs) -> Result<HandlerOutput>;
}

/// Dispatch table from action kind to handler
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: AHashMap<ActionKind, Arc<dyn ActionHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`, replacing any previous one
    pub fn register(&mut self, kind: ActionKind, handler: Arc<dyn ActionHandler>) -> &mut Self {
        self.handlers.insert(kind, handler);
        self
    }

    /// Register one shared handler for several kinds
    pub fn register_all(
        &mut self,
        kinds: &[ActionKind],
        handler: Arc<dyn ActionHandler>,
    ) -> &mut Self {
        for kind in kinds {
            self.handlers.insert(*kind, Arc::clone(&handler));
        }
        self
    }

    /// Register `handler` only for kinds that have none yet
    pub fn fill_missing(&mut self, handler: Arc<dyn ActionHandler>) -> &mut Self {
        for kind in ActionKind::LEAVES {
            self.handlers
                .entry(kind)
                .or_insert_with(|| Arc::clone(&handler));
        }
        self
    }

    pub fn get(&self, kind: ActionKind) -> Option<&Arc<dyn ActionHandler>> {
        self.handlers.get(&kind)
    }

    pub fn contains(&self, kind: ActionKind) -> bool {
        self.handlers.contains_key(&kind)
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().map(|k| k.to_string()).collect();
        kinds.sort();
        f.debug_struct("HandlerRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}
