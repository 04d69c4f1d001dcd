use thiserror::Error;

use crate::core::types::{ActionKind, ErrorKind};

#[derive(Error, Debug)]
pub enum InterpreterError {
    #[error("Could not understand command: {0}")]
    ParseFailure(String),

    #[error("No handler registered for action: {0}")]
    UnsupportedAction(ActionKind),

    #[error("Nothing to paste - copy or move something first")]
    NothingPending,

    #[error("{0}")]
    HandlerError(String),

    #[error("Ambiguous location: {0}")]
    ResolutionAmbiguous(String),

    #[error("Missing argument '{param}' for {kind}")]
    MissingArgument { kind: ActionKind, param: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl InterpreterError {
    /// Category reported to the presentation layer
    pub fn kind(&self) -> ErrorKind {
        match self {
            InterpreterError::ParseFailure(_) => ErrorKind::ParseFailure,
            InterpreterError::UnsupportedAction(_) => ErrorKind::UnsupportedAction,
            InterpreterError::NothingPending => ErrorKind::NothingPending,
            InterpreterError::ResolutionAmbiguous(_) => ErrorKind::ResolutionAmbiguous,
            InterpreterError::HandlerError(_)
            | InterpreterError::MissingArgument { .. }
            | InterpreterError::Config(_)
            | InterpreterError::Llm(_)
            | InterpreterError::Io(_)
            | InterpreterError::Serde(_) => ErrorKind::HandlerError,
        }
    }

    pub fn handler(message: impl Into<String>) -> Self {
        InterpreterError::HandlerError(message.into())
    }
}

pub type Result<T> = std::result::Result<T, InterpreterError>;
