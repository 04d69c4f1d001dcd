//! Fallback classification through a language model
//!
//! Used only when pattern extraction fails. The model parses commands; it
//! never executes anything.

pub mod client;
pub mod fallback;

pub use client::LlmClient;
pub use fallback::{IntentService, LlmIntentService};
