//! Name and phrase extraction shared by the extraction rules

use std::ops::Range;

/// Keywords that introduce a name, in priority order
const NAME_KEYWORDS: [&str; 5] = ["named", "as", "called", "folder", "file"];

/// Words that end a name
const STOP_WORDS: [&str; 7] = ["on", "in", "from", "to", "and", "then", "at"];

/// Prepositions that introduce a trailing location phrase
const LOCATION_PREPOSITIONS: [&str; 4] = ["on", "in", "from", "at"];

/// Filler dropped in front of a bare name
pub const ARTICLES: [&str; 5] = ["the", "a", "an", "my", "this"];

const TRAILING_PUNCTUATION: [char; 4] = ['.', '!', '?', ','];

/// Strip speech punctuation from the end of a name
pub fn strip_trailing_punctuation(text: &str) -> &str {
    text.trim().trim_end_matches(&TRAILING_PUNCTUATION[..]).trim_end()
}

/// Whitespace tokens with trailing punctuation removed
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(strip_trailing_punctuation)
        .filter(|w| !w.is_empty())
        .collect()
}

pub fn has_word(text: &str, word: &str) -> bool {
    words(text).contains(&word)
}

pub fn has_any_word(text: &str, candidates: &[&str]) -> bool {
    let tokens = words(text);
    candidates.iter().any(|c| tokens.contains(c))
}

/// Trimmed text following the first whole-word occurrence of any verb
pub fn after_verb<'a>(text: &'a str, verbs: &[&str]) -> Option<&'a str> {
    let mut offset = 0;
    for raw in text.split_inclusive(char::is_whitespace) {
        let token = strip_trailing_punctuation(raw);
        offset += raw.len();
        if verbs.contains(&token) {
            return Some(text[offset..].trim());
        }
    }
    None
}

/// Byte span of the first quoted substring, quotes included
fn quoted_span(text: &str) -> Option<Range<usize>> {
    let (start, quote) = text.char_indices().find(|(_, c)| *c == '"' || *c == '\'')?;
    let close = start + 1 + text[start + 1..].find(quote)?;
    Some(start..close + 1)
}

/// Contents of the first single- or double-quoted substring
pub fn quoted(text: &str) -> Option<&str> {
    let span = quoted_span(text)?;
    let inner = text[span.start + 1..span.end - 1].trim();
    (!inner.is_empty()).then_some(inner)
}

/// Text with its first quoted substring removed
fn without_quoted(text: &str) -> String {
    match quoted_span(text) {
        Some(span) => format!("{} {}", &text[..span.start], &text[span.end..]),
        None => text.to_string(),
    }
}

/// Byte offsets of `separator` that lie outside the first quoted substring
pub fn unquoted_offsets(text: &str, separator: &str) -> Vec<usize> {
    let span = quoted_span(text);
    text.match_indices(separator)
        .map(|(idx, _)| idx)
        .filter(|idx| match &span {
            Some(span) => idx + separator.len() <= span.start || *idx >= span.end,
            None => true,
        })
        .collect()
}

/// Extract the object name from a segment
///
/// Quoted substrings win outright. Otherwise the verb prefix is dropped and
/// the words following the first name keyword are taken up to a stop word.
pub fn get_name(segment: &str, verbs: &[&str]) -> Option<String> {
    if let Some(inner) = quoted(segment) {
        return Some(strip_trailing_punctuation(inner).to_string());
    }

    let body = after_verb(segment, verbs).unwrap_or(segment);
    let tokens = words(body);

    for keyword in NAME_KEYWORDS {
        let Some(pos) = tokens.iter().position(|t| *t == keyword) else {
            continue;
        };
        let name: Vec<&str> = tokens[pos + 1..]
            .iter()
            .take_while(|t| !STOP_WORDS.contains(t))
            .copied()
            .collect();
        if !name.is_empty() {
            return Some(strip_trailing_punctuation(&name.join(" ")).to_string());
        }
    }

    None
}

/// First word after the verb, skipping articles
pub fn first_word_after(segment: &str, verbs: &[&str]) -> Option<String> {
    let body = after_verb(segment, verbs)?;
    words(body)
        .into_iter()
        .find(|w| !ARTICLES.contains(w))
        .map(String::from)
}

/// Remainder after the verb, cut at the first trailing location phrase
pub fn name_before_location(segment: &str, verbs: &[&str]) -> Option<String> {
    let body = after_verb(segment, verbs)?;
    let name: Vec<&str> = words(body)
        .into_iter()
        .skip_while(|w| ARTICLES.contains(w) || *w == "file" || *w == "folder")
        .take_while(|w| !STOP_WORDS.contains(w))
        .collect();
    (!name.is_empty()).then(|| name.join(" "))
}

/// Trailing location phrase such as `"from downloads"` or `"on the desktop"`
///
/// Quoted names are ignored so a preposition inside a filename does not count.
pub fn location_phrase(segment: &str) -> Option<String> {
    let unquoted = without_quoted(segment);
    let tokens = words(&unquoted);
    let pos = tokens
        .iter()
        .enumerate()
        .skip(1)
        .find(|(i, t)| LOCATION_PREPOSITIONS.contains(t) && *i + 1 < tokens.len())
        .map(|(i, _)| i)?;

    let phrase: Vec<&str> = tokens[pos..]
        .iter()
        .take_while(|t| **t != "and" && **t != "then")
        .copied()
        .collect();
    Some(phrase.join(" "))
}

/// Combine a name with an optional location phrase for the resolver
pub fn with_location(name: &str, location: Option<String>) -> String {
    match location {
        Some(location) => format!("{} {}", name, location),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_takes_priority() {
        assert_eq!(
            get_name("copy \"report.pdf\" named other", &["copy"]),
            Some("report.pdf".to_string())
        );
        assert_eq!(quoted("delete 'my notes.txt' from desktop"), Some("my notes.txt"));
    }

    #[test]
    fn test_keyword_name_stops_at_stop_word() {
        assert_eq!(
            get_name("create folder reports on desktop", &["create"]),
            Some("reports".to_string())
        );
        assert_eq!(
            get_name("make a new folder named tax returns in documents", &["make"]),
            Some("tax returns".to_string())
        );
    }

    #[test]
    fn test_named_beats_folder_keyword() {
        assert_eq!(
            get_name("create a folder named drafts", &["create"]),
            Some("drafts".to_string())
        );
    }

    #[test]
    fn test_no_keyword_no_name() {
        assert_eq!(get_name("copy report.pdf to downloads", &["copy"]), None);
    }

    #[test]
    fn test_trailing_punctuation_stripped() {
        assert_eq!(
            get_name("create a file called notes.txt!", &["create"]),
            Some("notes.txt".to_string())
        );
    }

    #[test]
    fn test_first_word_skips_articles() {
        assert_eq!(
            first_word_after("move the draft.docx to documents", &["move"]),
            Some("draft.docx".to_string())
        );
    }

    #[test]
    fn test_name_before_location() {
        assert_eq!(
            name_before_location("delete old notes.txt from desktop", &["delete"]),
            Some("old notes.txt".to_string())
        );
    }

    #[test]
    fn test_location_phrase() {
        assert_eq!(
            location_phrase("delete report.pdf from desktop"),
            Some("from desktop".to_string())
        );
        assert_eq!(
            location_phrase("delete 'notes on cats.txt'"),
            None
        );
        assert_eq!(location_phrase("copy report.pdf"), None);
    }

    #[test]
    fn test_separator_inside_quotes_is_skipped() {
        let text = "copy \"notes to self.txt\" to downloads";
        let offsets = unquoted_offsets(text, " to ");
        assert_eq!(offsets.len(), 1);
        assert_eq!(&text[offsets[0] + 4..], "downloads");

        assert!(unquoted_offsets("copy 'a to b.txt'", " to ").is_empty());
        assert_eq!(unquoted_offsets("move a to b to c", " to "), vec![6, 11]);
    }

    #[test]
    fn test_after_verb_whole_word_only() {
        assert_eq!(after_verb("remove notes.txt", &["move"]), None);
        assert_eq!(after_verb("please open spotify now", &["open"]), Some("spotify now"));
    }
}
