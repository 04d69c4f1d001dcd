//! Deskpilot - Natural-Language Command Interpreter

pub mod actions;
pub mod command;
pub mod core;
pub mod interpreter;
pub mod llm;
