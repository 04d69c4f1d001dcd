//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Closed set of action kinds the interpreter can dispatch
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    #[display(fmt = "rename")]
    Rename,
    #[display(fmt = "delete")]
    Delete,
    #[display(fmt = "copy")]
    Copy,
    #[display(fmt = "move")]
    Move,
    #[display(fmt = "paste")]
    Paste,
    #[display(fmt = "create_folder")]
    CreateFolder,
    #[display(fmt = "create_file")]
    CreateFile,
    #[display(fmt = "open_app")]
    OpenApp,
    #[display(fmt = "close_app")]
    CloseApp,
    #[display(fmt = "navigate")]
    Navigate,
    #[display(fmt = "screenshot")]
    Screenshot,
    #[display(fmt = "volume")]
    Volume,
    #[display(fmt = "media")]
    Media,
    #[display(fmt = "calculate")]
    Calculate,
    #[display(fmt = "sequence")]
    Sequence,
}

impl ActionKind {
    /// Every leaf kind, i.e. everything except `Sequence`
    pub const LEAVES: [ActionKind; 14] = [
        ActionKind::Rename,
        ActionKind::Delete,
        ActionKind::Copy,
        ActionKind::Move,
        ActionKind::Paste,
        ActionKind::CreateFolder,
        ActionKind::CreateFile,
        ActionKind::OpenApp,
        ActionKind::CloseApp,
        ActionKind::Navigate,
        ActionKind::Screenshot,
        ActionKind::Volume,
        ActionKind::Media,
        ActionKind::Calculate,
    ];
}

/// Operation a pending source is armed for
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingOperation {
    #[display(fmt = "copy")]
    Copy,
    #[display(fmt = "move")]
    Move,
}

/// Error categories surfaced to the presentation layer
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ParseFailure,
    UnsupportedAction,
    NothingPending,
    HandlerError,
    ResolutionAmbiguous,
}

/// An absolute, resolved filesystem location
///
/// Only `LocationResolver` constructs these; everything past the resolver
/// carries locations in this form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalLocation(PathBuf);

impl CanonicalLocation {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for CanonicalLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for CanonicalLocation {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Outcome of interpreting or dispatching an action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    /// Human-readable text for the presentation layer
    pub message: String,
    pub error: Option<ErrorKind>,
    pub produced_location: Option<CanonicalLocation>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            produced_location: None,
        }
    }

    pub fn failed(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(kind),
            produced_location: None,
        }
    }

    pub fn with_location(mut self, location: Option<CanonicalLocation>) -> Self {
        self.produced_location = location;
        self
    }
}
