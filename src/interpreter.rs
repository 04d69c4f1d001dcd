//! Interpreter facade - one conversational session
//!
//! Owns the execution memory and runs every utterance through parsing,
//! the optional fallback, and dispatch. Each session gets its own
//! `Interpreter`; nothing is shared between instances.

use crate::actions::handler::HandlerRegistry;
use crate::command::action::StructuredAction;
use crate::command::executor::CommandExecutor;
use crate::command::memory::ExecutionMemory;
use crate::command::parse_utterance;
use crate::command::resolver::LocationResolver;
use crate::core::config::InterpreterConfig;
use crate::core::error::{InterpreterError, Result};
use crate::core::types::{ActionResult, CanonicalLocation};
use crate::llm::fallback::IntentService;

/// Reported when neither patterns nor the fallback understand an utterance
pub const CANNOT_EXECUTE: &str = "I cannot execute this action";

pub struct Interpreter {
    executor: CommandExecutor,
    memory: ExecutionMemory,
    fallback: Option<Box<dyn IntentService>>,
}

impl Interpreter {
    /// Build an interpreter from validated configuration and a handler table
    pub fn new(config: &InterpreterConfig, registry: HandlerRegistry) -> Result<Self> {
        config.validate()?;
        let resolver = LocationResolver::from_config(config);
        let executor = CommandExecutor::new(registry, resolver, config.app_aliases.clone());

        Ok(Self {
            executor,
            memory: ExecutionMemory::new(),
            fallback: None,
        })
    }

    /// Attach the fallback intent service
    pub fn with_fallback(mut self, service: Box<dyn IntentService>) -> Self {
        self.fallback = Some(service);
        self
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Parse an utterance, consulting the fallback once on failure
    ///
    /// The fallback sees the whole raw utterance, never a single segment,
    /// and its answer is parsed without a second fallback.
    pub fn parse(&self, utterance: &str) -> Option<StructuredAction> {
        if let Some(action) = parse_utterance(utterance) {
            return Some(action);
        }

        let service = self.fallback.as_ref()?;
        tracing::warn!(%utterance, "pattern extraction failed, asking fallback");

        let command = service.classify(utterance)?;
        tracing::debug!(%command, "fallback suggested command");
        parse_utterance(&command)
    }

    /// Interpret and execute one utterance
    pub fn handle(&mut self, utterance: &str) -> ActionResult {
        match self.parse(utterance) {
            Some(action) => {
                tracing::debug!(kind = %action.kind(), "executing");
                self.executor.execute(&action, &mut self.memory)
            }
            None => {
                let error = InterpreterError::ParseFailure(utterance.to_string());
                tracing::warn!(%error, "could not interpret utterance");
                ActionResult::failed(error.kind(), CANNOT_EXECUTE)
            }
        }
    }

    /// Execute an already structured action against this session's memory
    pub fn execute(&mut self, action: &StructuredAction) -> ActionResult {
        self.executor.execute(action, &mut self.memory)
    }

    /// Resolve a phrase the way actions do, without side effects
    pub fn resolve(&self, phrase: &str) -> Result<CanonicalLocation> {
        self.executor.resolver().resolve(phrase, &self.memory)
    }

    pub fn memory(&self) -> &ExecutionMemory {
        &self.memory
    }

    /// Explicit restart: forget the last location and any pending paste
    pub fn reset(&mut self) {
        tracing::info!("session memory reset");
        self.memory.reset();
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("executor", &self.executor)
            .field("memory", &self.memory)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
