//! Split an utterance into ordered sub-commands on conjunctions

/// Conjunction markers in priority order; only the first one present is split on
pub const CONJUNCTIONS: [&str; 4] = [" and then ", " after that ", " then ", " and "];

/// Split a raw utterance into trimmed, lower-cased segments
///
/// Finds the highest-priority conjunction present and splits on every
/// occurrence of that marker alone. Pieces that are empty after trimming are
/// dropped. Returns a single segment when no marker is present. The result is
/// empty only when the utterance itself is blank.
pub fn segment(utterance: &str) -> Vec<String> {
    let normalized = utterance.trim().to_lowercase();

    let Some(marker) = CONJUNCTIONS.iter().find(|m| normalized.contains(*m)) else {
        return if normalized.is_empty() {
            Vec::new()
        } else {
            vec![normalized]
        };
    };

    normalized
        .split(marker)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}
