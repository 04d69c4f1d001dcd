//! Typed structured actions produced by the extractor

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::{ActionKind, CanonicalLocation};

/// Pronoun deferring to the last resolved location
pub const PRONOUN: &str = "it";

/// A single validated user intent, or an ordered sequence of them
///
/// Location-bearing fields hold raw phrases; they become canonical paths
/// only when the dispatcher resolves them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuredAction {
    Delete {
        target: String,
    },
    Copy {
        source: String,
        destination: Option<String>,
    },
    /// Also carries renames: `keep_parent` makes the destination a sibling name
    Move {
        source: String,
        destination: Option<String>,
        keep_parent: bool,
    },
    Paste {
        destination: String,
    },
    CreateFolder {
        name: String,
        location: Option<String>,
    },
    CreateFile {
        name: String,
        location: Option<String>,
    },
    OpenApp {
        app: String,
    },
    CloseApp {
        app: String,
    },
    Navigate {
        target: NavigateTarget,
    },
    Screenshot,
    Volume {
        direction: VolumeDirection,
    },
    Media {
        command: MediaCommand,
    },
    Calculate {
        expression: Expression,
    },
    Sequence {
        steps: Vec<StructuredAction>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigateTarget {
    /// Browser navigation, already normalized to a full URL
    Url(String),
    /// A location phrase for the resolver
    Location(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeDirection {
    Up,
    Down,
    Mute,
}

impl VolumeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeDirection::Up => "up",
            VolumeDirection::Down => "down",
            VolumeDirection::Mute => "mute",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCommand {
    Play,
    Pause,
    Next,
    Prev,
}

impl MediaCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaCommand::Play => "play",
            MediaCommand::Pause => "pause",
            MediaCommand::Next => "next",
            MediaCommand::Prev => "prev",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }
}

/// Binary integer expression, displayed as `"30 - 8"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    pub lhs: i64,
    pub op: Operator,
    pub rhs: i64,
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op.symbol(), self.rhs)
    }
}

impl StructuredAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            StructuredAction::Delete { .. } => ActionKind::Delete,
            StructuredAction::Copy { .. } => ActionKind::Copy,
            StructuredAction::Move { .. } => ActionKind::Move,
            StructuredAction::Paste { .. } => ActionKind::Paste,
            StructuredAction::CreateFolder { .. } => ActionKind::CreateFolder,
            StructuredAction::CreateFile { .. } => ActionKind::CreateFile,
            StructuredAction::OpenApp { .. } => ActionKind::OpenApp,
            StructuredAction::CloseApp { .. } => ActionKind::CloseApp,
            StructuredAction::Navigate { .. } => ActionKind::Navigate,
            StructuredAction::Screenshot => ActionKind::Screenshot,
            StructuredAction::Volume { .. } => ActionKind::Volume,
            StructuredAction::Media { .. } => ActionKind::Media,
            StructuredAction::Calculate { .. } => ActionKind::Calculate,
            StructuredAction::Sequence { .. } => ActionKind::Sequence,
        }
    }

    /// Replace every argument equal to the pronoun with `location`
    ///
    /// Only this action's own fields are touched; sequence children are
    /// substituted one at a time as the dispatcher reaches them.
    pub fn substitute_pronoun(&mut self, location: &CanonicalLocation) {
        let replacement = location.to_string();
        let swap = |value: &mut String| {
            if value == PRONOUN {
                *value = replacement.clone();
            }
        };

        match self {
            StructuredAction::Delete { target } => swap(target),
            StructuredAction::Copy {
                source,
                destination,
            }
            | StructuredAction::Move {
                source,
                destination,
                ..
            } => {
                swap(source);
                if let Some(destination) = destination {
                    swap(destination);
                }
            }
            StructuredAction::Paste { destination } => swap(destination),
            StructuredAction::CreateFolder { name, location }
            | StructuredAction::CreateFile { name, location } => {
                swap(name);
                if let Some(location) = location {
                    swap(location);
                }
            }
            StructuredAction::OpenApp { app } | StructuredAction::CloseApp { app } => swap(app),
            StructuredAction::Navigate {
                target: NavigateTarget::Location(phrase),
            } => swap(phrase),
            StructuredAction::Navigate {
                target: NavigateTarget::Url(_),
            }
            | StructuredAction::Screenshot
            | StructuredAction::Volume { .. }
            | StructuredAction::Media { .. }
            | StructuredAction::Calculate { .. }
            | StructuredAction::Sequence { .. } => {}
        }
    }
}
