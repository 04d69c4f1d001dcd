pub mod config;
pub mod error;
pub mod types;

pub use config::InterpreterConfig;
pub use error::{InterpreterError, Result};
pub use types::{ActionKind, ActionResult, CanonicalLocation, ErrorKind, PendingOperation};
