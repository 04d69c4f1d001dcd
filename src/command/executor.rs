//! Action dispatch - runs structured actions through registered handlers

use std::collections::BTreeMap;

use crate::actions::handler::{ActionArgs, HandlerRegistry};
use crate::command::action::{NavigateTarget, StructuredAction};
use crate::command::memory::ExecutionMemory;
use crate::command::resolver::LocationResolver;
use crate::core::error::{InterpreterError, Result};
use crate::core::types::{ActionKind, ActionResult, CanonicalLocation, PendingOperation};

/// Dispatches structured actions and applies execution-memory updates
///
/// The executor holds no session state of its own; memory is passed in by
/// the owner on every call.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    registry: HandlerRegistry,
    resolver: LocationResolver,
    app_aliases: BTreeMap<String, String>,
}

/// A leaf action with resolved arguments and its planned memory effects
#[derive(Debug)]
struct Prepared {
    args: ActionArgs,
    /// Location recorded on success unless the handler reports its own
    expected: Option<CanonicalLocation>,
    arms: Option<(CanonicalLocation, PendingOperation)>,
    clears_pending: bool,
}

impl Prepared {
    fn new(args: ActionArgs) -> Self {
        Self {
            args,
            expected: None,
            arms: None,
            clears_pending: false,
        }
    }

    fn producing(mut self, location: CanonicalLocation) -> Self {
        self.expected = Some(location);
        self
    }
}

impl CommandExecutor {
    pub fn new(
        registry: HandlerRegistry,
        resolver: LocationResolver,
        app_aliases: BTreeMap<String, String>,
    ) -> Self {
        Self {
            registry,
            resolver,
            app_aliases,
        }
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// Execute an action, returning a structured result
    ///
    /// Never panics on handler failure: every error becomes a failed result.
    pub fn execute(&self, action: &StructuredAction, memory: &mut ExecutionMemory) -> ActionResult {
        match action {
            StructuredAction::Sequence { steps } => self.execute_sequence(steps, memory),
            leaf => self.execute_leaf(leaf, memory),
        }
    }

    /// Run steps in order, injecting the remembered location for the pronoun
    fn execute_sequence(
        &self,
        steps: &[StructuredAction],
        memory: &mut ExecutionMemory,
    ) -> ActionResult {
        let mut last = ActionResult::ok("Nothing to do");

        for (index, step) in steps.iter().enumerate() {
            let mut step = step.clone();
            if let Some(location) = memory.last_resolved_location() {
                step.substitute_pronoun(location);
            }

            let result = self.execute(&step, memory);
            if !result.success {
                tracing::warn!(step = index + 1, kind = %step.kind(), "sequence aborted");
                return result;
            }
            last = result;
        }

        last
    }

    fn execute_leaf(&self, action: &StructuredAction, memory: &mut ExecutionMemory) -> ActionResult {
        match self.try_execute_leaf(action, memory) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(kind = %action.kind(), error = %e, "action failed");
                ActionResult::failed(e.kind(), e.to_string())
            }
        }
    }

    fn try_execute_leaf(
        &self,
        action: &StructuredAction,
        memory: &mut ExecutionMemory,
    ) -> Result<ActionResult> {
        // An empty buffer outranks a missing paste handler
        if matches!(action, StructuredAction::Paste { .. }) && memory.pending().is_none() {
            return Err(InterpreterError::NothingPending);
        }

        let kind = self.handler_kind(action);
        let handler = self
            .registry
            .get(kind)
            .ok_or(InterpreterError::UnsupportedAction(kind))?;

        let prepared = self.prepare(kind, action, memory)?;
        let args = prepared.args.filtered(kind, handler.params(kind))?;

        tracing::info!(%kind, args = args.len(), "dispatching action");
        let output = handler.handle(kind, &args)?;

        let location = output
            .location
            .map(|path| self.resolver.canonicalize(path))
            .or(prepared.expected);

        if prepared.clears_pending {
            memory.clear_pending();
        }
        if let Some((source, operation)) = prepared.arms {
            memory.arm(source, operation);
        }
        if let Some(location) = &location {
            memory.record_location(location.clone());
        }

        Ok(ActionResult::ok(output.message).with_location(location))
    }

    /// Renames go to a dedicated handler when one is registered
    fn handler_kind(&self, action: &StructuredAction) -> ActionKind {
        match action {
            StructuredAction::Move {
                keep_parent: true, ..
            } if self.registry.contains(ActionKind::Rename) => ActionKind::Rename,
            other => other.kind(),
        }
    }

    /// Resolve locations and build the argument map for `kind`
    fn prepare(
        &self,
        kind: ActionKind,
        action: &StructuredAction,
        memory: &ExecutionMemory,
    ) -> Result<Prepared> {
        let resolve = |phrase: &str| self.resolver.resolve(phrase, memory);

        let prepared = match action {
            StructuredAction::Delete { target } => {
                let target = resolve(target)?;
                Prepared::new(ActionArgs::new().with("target_path", target.to_string()))
            }

            StructuredAction::Move {
                source,
                destination: Some(name),
                keep_parent: true,
            } => {
                let source = resolve(source)?;
                let destination = self.resolver.sibling(&source, name);
                let args = ActionArgs::new()
                    .with("source_path", source.to_string())
                    .with("destination_path", destination.to_string());
                Prepared::new(args).producing(destination)
            }

            StructuredAction::Move {
                destination: None,
                keep_parent: true,
                ..
            } => {
                return Err(InterpreterError::MissingArgument {
                    kind,
                    param: "destination_path",
                })
            }

            StructuredAction::Copy {
                source,
                destination,
            }
            | StructuredAction::Move {
                source,
                destination,
                keep_parent: false,
            } => {
                let operation = if kind == ActionKind::Copy {
                    PendingOperation::Copy
                } else {
                    PendingOperation::Move
                };
                let source = resolve(source)?;
                let args = ActionArgs::new().with("source_path", source.to_string());

                match destination {
                    Some(phrase) => {
                        let destination = resolve(phrase)?;
                        Prepared::new(args.with("destination_path", destination.to_string()))
                            .producing(destination)
                    }
                    None => Prepared {
                        arms: Some((source, operation)),
                        ..Prepared::new(args)
                    },
                }
            }

            StructuredAction::Paste { destination } => {
                let pending = memory.pending().ok_or(InterpreterError::NothingPending)?;
                let destination = resolve(destination)?;
                let args = ActionArgs::new()
                    .with("source_path", pending.source.to_string())
                    .with("destination_path", destination.to_string())
                    .with("operation", pending.operation.to_string());
                Prepared {
                    clears_pending: true,
                    ..Prepared::new(args).producing(destination)
                }
            }

            StructuredAction::CreateFolder { name, location }
            | StructuredAction::CreateFile { name, location } => {
                let parent = resolve(location.as_deref().unwrap_or(""))?;
                let created = self.resolver.child(&parent, name);
                let args = ActionArgs::new()
                    .with("location", parent.to_string())
                    .with("name", name.clone());
                Prepared::new(args).producing(created)
            }

            StructuredAction::OpenApp { app } | StructuredAction::CloseApp { app } => {
                Prepared::new(ActionArgs::new().with("app_name", self.launch_name(app)))
            }

            StructuredAction::Navigate {
                target: NavigateTarget::Url(url),
            } => Prepared::new(ActionArgs::new().with("url", url.clone())),

            StructuredAction::Navigate {
                target: NavigateTarget::Location(phrase),
            } => {
                let location = resolve(phrase)?;
                Prepared::new(ActionArgs::new().with("path", location.to_string()))
                    .producing(location)
            }

            StructuredAction::Screenshot => {
                let directory = self.resolver.default_location();
                Prepared::new(ActionArgs::new().with("directory", directory.to_string()))
            }

            StructuredAction::Volume { direction } => {
                Prepared::new(ActionArgs::new().with("direction", direction.as_str()))
            }

            StructuredAction::Media { command } => {
                Prepared::new(ActionArgs::new().with("command", command.as_str()))
            }

            StructuredAction::Calculate { expression } => {
                Prepared::new(ActionArgs::new().with("expression", expression.to_string()))
            }

            StructuredAction::Sequence { .. } => {
                return Err(InterpreterError::UnsupportedAction(ActionKind::Sequence))
            }
        };

        Ok(prepared)
    }

    /// Map a spoken application name through the alias table
    fn launch_name(&self, app: &str) -> String {
        if let Some(name) = self.app_aliases.get(app) {
            return name.clone();
        }
        self.app_aliases
            .iter()
            .find(|(spoken, _)| app.contains(spoken.as_str()))
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| app.to_string())
    }
}
