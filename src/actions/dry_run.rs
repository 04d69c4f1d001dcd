//! Handler that reports what would happen without doing it

use crate::actions::handler::{ActionArgs, ActionHandler, HandlerOutput};
use crate::core::error::Result;
use crate::core::types::ActionKind;

/// Describes an action instead of performing it
///
/// Stands in for host capabilities (processes, volume, media, screen
/// capture, browser) and for the filesystem under `--dry-run`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunHandler;

impl ActionHandler for DryRunHandler {
    fn handle(&self, kind: ActionKind, args: &ActionArgs) -> Result<HandlerOutput> {
        let described: Vec<String> = args
            .names()
            .filter_map(|name| args.get(name).map(|value| format!("{}={}", name, value)))
            .collect();

        let message = if described.is_empty() {
            format!("[dry run] would {}", kind)
        } else {
            format!("[dry run] would {} ({})", kind, described.join(", "))
        };

        // Nothing is written, so there is no location to report
        Ok(HandlerOutput::message(message))
    }
}
