//! Command interpretation pipeline
//!
//! Converts free text into dispatched actions:
//! utterance -> segmenter -> extractor -> StructuredAction -> CommandExecutor -> ActionResult

pub mod action;
pub mod executor;
pub mod extractor;
pub mod memory;
pub mod names;
pub mod resolver;
pub mod segmenter;

pub use action::StructuredAction;
pub use executor::CommandExecutor;
pub use memory::ExecutionMemory;
pub use resolver::{AliasTable, LocationResolver};

/// Parse a whole utterance, all or nothing
///
/// Returns `None` if any segment fails extraction, so no part of a
/// half-understood utterance ever runs. Several segments become a
/// `Sequence`; one segment is returned as the bare action.
pub fn parse_utterance(utterance: &str) -> Option<StructuredAction> {
    let segments = segmenter::segment(utterance);
    tracing::debug!(?segments, "segmented utterance");

    if segments.is_empty() {
        return None;
    }

    let mut actions = Vec::with_capacity(segments.len());
    for segment in &segments {
        match extractor::extract(segment) {
            Some(action) => actions.push(action),
            None => {
                tracing::debug!(%segment, "no rule matched segment");
                return None;
            }
        }
    }
    tracing::debug!(?actions, "extracted actions");

    if actions.len() == 1 {
        actions.pop()
    } else {
        Some(StructuredAction::Sequence { steps: actions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::action::{Expression, Operator};

    #[test]
    fn test_single_segment_is_bare_action() {
        let action = parse_utterance("take a screenshot").unwrap();
        assert_eq!(action, StructuredAction::Screenshot);
    }

    #[test]
    fn test_conjunction_builds_sequence() {
        let action = parse_utterance("take a screenshot and then subtract 8 from 30").unwrap();
        assert_eq!(
            action,
            StructuredAction::Sequence {
                steps: vec![
                    StructuredAction::Screenshot,
                    StructuredAction::Calculate {
                        expression: Expression {
                            lhs: 30,
                            op: Operator::Subtract,
                            rhs: 8,
                        },
                    },
                ],
            }
        );
    }

    #[test]
    fn test_one_unknown_segment_fails_whole_utterance() {
        assert!(parse_utterance("take a screenshot and sing me a song").is_none());
    }

    #[test]
    fn test_blank_utterance_fails() {
        assert!(parse_utterance("   ").is_none());
    }
}
