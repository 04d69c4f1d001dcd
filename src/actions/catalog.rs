//! Action parameter catalog
//!
//! Static metadata describing which arguments each action kind accepts.
//! The dispatcher filters prepared arguments against this table before a
//! handler ever sees them.

use crate::core::types::ActionKind;

/// One accepted argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub required: bool,
}

const fn required(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        required: true,
    }
}

const fn optional(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        required: false,
    }
}

const RENAME: [ParamSpec; 2] = [required("source_path"), required("destination_path")];
const DELETE: [ParamSpec; 1] = [required("target_path")];
const TRANSFER: [ParamSpec; 2] = [required("source_path"), optional("destination_path")];
const PASTE: [ParamSpec; 3] = [
    required("source_path"),
    required("destination_path"),
    required("operation"),
];
const CREATE: [ParamSpec; 2] = [required("location"), required("name")];
const APP: [ParamSpec; 1] = [required("app_name")];
const NAVIGATE: [ParamSpec; 2] = [optional("path"), optional("url")];
const SCREENSHOT: [ParamSpec; 1] = [optional("directory")];
const VOLUME: [ParamSpec; 1] = [required("direction")];
const MEDIA: [ParamSpec; 1] = [required("command")];
const CALCULATE: [ParamSpec; 1] = [required("expression")];

impl ActionKind {
    /// Parameters a handler for this kind accepts by default
    pub fn params(&self) -> &'static [ParamSpec] {
        match self {
            ActionKind::Rename => &RENAME,
            ActionKind::Delete => &DELETE,
            ActionKind::Copy | ActionKind::Move => &TRANSFER,
            ActionKind::Paste => &PASTE,
            ActionKind::CreateFolder | ActionKind::CreateFile => &CREATE,
            ActionKind::OpenApp | ActionKind::CloseApp => &APP,
            ActionKind::Navigate => &NAVIGATE,
            ActionKind::Screenshot => &SCREENSHOT,
            ActionKind::Volume => &VOLUME,
            ActionKind::Media => &MEDIA,
            ActionKind::Calculate => &CALCULATE,
            ActionKind::Sequence => &[],
        }
    }

    pub fn required_params(&self) -> impl Iterator<Item = &'static str> {
        self.params().iter().filter(|p| p.required).map(|p| p.name)
    }
}
