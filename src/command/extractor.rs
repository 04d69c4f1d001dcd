//! Pattern-based entity extraction
//!
//! Each segment is classified by an ordered list of rules; the first rule
//! that both triggers and extracts its arguments wins. A segment no rule
//! accepts yields `None`, which sends the whole utterance to the fallback.

use crate::command::action::{
    Expression, MediaCommand, NavigateTarget, Operator, StructuredAction, VolumeDirection, PRONOUN,
};
use crate::command::names::{
    after_verb, first_word_after, get_name, has_any_word, has_word, location_phrase,
    name_before_location, strip_trailing_punctuation, unquoted_offsets, with_location, words,
};
use crate::core::config::BUILTIN_ALIASES;

const DELETE_VERBS: [&str; 4] = ["delete", "remove", "erase", "trash"];
const CREATE_VERBS: [&str; 3] = ["create", "make", "mkdir"];
const OPEN_VERBS: [&str; 4] = ["open", "show", "launch", "start"];
const CLOSE_VERBS: [&str; 4] = ["close", "stop", "quit", "kill"];

const URL_MARKERS: [&str; 8] = [".com", "http", "www.", ".org", ".net", ".io", ".edu", ".gov"];
const FOLDER_KEYWORDS: [&str; 8] = [
    "desktop",
    "downloads",
    "documents",
    "folder",
    "directory",
    "pictures",
    "music",
    "movies",
];

/// Words dropped from a paste destination
const PASTE_FILLER: [&str; 10] = [
    "it", "here", "there", "into", "in", "to", "on", "onto", "inside", "the",
];

const ARITHMETIC_WORDS: [&str; 11] = [
    "add",
    "plus",
    "sum",
    "subtract",
    "minus",
    "multiply",
    "multiplied",
    "times",
    "divide",
    "divided",
    "calculate",
];

type Rule = fn(&str) -> Option<StructuredAction>;

const RULES: [Rule; 12] = [
    rename,
    delete,
    copy_or_move,
    paste,
    create_folder,
    open_or_navigate,
    create_file,
    close_app,
    screenshot,
    volume,
    media,
    calculate,
];

/// Classify one lower-cased segment into a structured action
pub fn extract(segment: &str) -> Option<StructuredAction> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }
    RULES.iter().find_map(|rule| rule(segment))
}

fn unquote(text: &str) -> String {
    strip_trailing_punctuation(text)
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

fn rename(segment: &str) -> Option<StructuredAction> {
    if !has_word(segment, "rename") {
        return None;
    }
    let body = after_verb(segment, &["rename"])?;
    if body == "to" {
        return None;
    }
    // Leading space so "rename to x" splits with an empty source
    let body = format!(" {}", body);

    let (source, destination) = match unquoted_offsets(&body, " to ").first() {
        Some(&idx) => {
            let source = unquote(&body[..idx]);
            let source = if source.is_empty() {
                PRONOUN.to_string()
            } else {
                source
            };
            (source, unquote(&body[idx + 4..]))
        }
        None => (PRONOUN.to_string(), unquote(&body)),
    };

    if destination.is_empty() {
        return None;
    }

    Some(StructuredAction::Move {
        source,
        destination: Some(destination),
        keep_parent: true,
    })
}

fn delete(segment: &str) -> Option<StructuredAction> {
    if !has_any_word(segment, &DELETE_VERBS) {
        return None;
    }
    let name = get_name(segment, &DELETE_VERBS)
        .or_else(|| name_before_location(segment, &DELETE_VERBS))?;

    Some(StructuredAction::Delete {
        target: with_location(&name, location_phrase(segment)),
    })
}

fn copy_or_move(segment: &str) -> Option<StructuredAction> {
    let verb = if has_word(segment, "copy") {
        "copy"
    } else if has_word(segment, "move") {
        "move"
    } else {
        return None;
    };

    let (head, destination) = match unquoted_offsets(segment, " to ").last() {
        Some(&idx) => {
            let destination = unquote(&segment[idx + 4..]);
            (&segment[..idx], (!destination.is_empty()).then_some(destination))
        }
        None => (segment, None),
    };

    let name = get_name(head, &[verb]).or_else(|| first_word_after(head, &[verb]))?;
    let source = with_location(&name, location_phrase(head));

    Some(if verb == "copy" {
        StructuredAction::Copy {
            source,
            destination,
        }
    } else {
        StructuredAction::Move {
            source,
            destination,
            keep_parent: false,
        }
    })
}

fn paste(segment: &str) -> Option<StructuredAction> {
    if !has_word(segment, "paste") {
        return None;
    }

    let destination = get_name(segment, &["paste"]).unwrap_or_else(|| {
        let body = after_verb(segment, &["paste"]).unwrap_or("");
        words(body)
            .into_iter()
            .filter(|w| !PASTE_FILLER.contains(w))
            .collect::<Vec<_>>()
            .join(" ")
    });

    Some(StructuredAction::Paste {
        destination: if destination.is_empty() {
            PRONOUN.to_string()
        } else {
            destination
        },
    })
}

fn create_folder(segment: &str) -> Option<StructuredAction> {
    let is_mkdir = has_word(segment, "mkdir");
    let mentions_folder = has_any_word(segment, &["folder", "directory"]);
    if !(is_mkdir || (has_any_word(segment, &CREATE_VERBS) && mentions_folder)) {
        return None;
    }

    let name = get_name(segment, &CREATE_VERBS)
        .or_else(|| is_mkdir.then(|| first_word_after(segment, &["mkdir"])).flatten())
        .filter(|n| !BUILTIN_ALIASES.contains(&n.as_str()))
        .unwrap_or_else(|| "NewFolder".to_string());

    Some(StructuredAction::CreateFolder {
        name,
        location: location_phrase(segment),
    })
}

fn open_or_navigate(segment: &str) -> Option<StructuredAction> {
    let target = after_verb(segment, &OPEN_VERBS)
        .or_else(|| segment.find("go to ").map(|idx| segment[idx + 6..].trim()))?;
    let target = strip_trailing_punctuation(target);
    if target.is_empty() {
        return None;
    }

    if URL_MARKERS.iter().any(|m| target.contains(m)) {
        let url = words(target)
            .into_iter()
            .find(|w| URL_MARKERS.iter().any(|m| w.contains(m)))
            .unwrap_or(target);
        return Some(StructuredAction::Navigate {
            target: NavigateTarget::Url(normalize_url(url)),
        });
    }

    if target == PRONOUN || has_any_word(target, &FOLDER_KEYWORDS) {
        return Some(StructuredAction::Navigate {
            target: NavigateTarget::Location(target.to_string()),
        });
    }

    let app = clean_app_name(target);
    (!app.is_empty()).then_some(StructuredAction::OpenApp { app })
}

/// Prefix bare hosts with https
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

fn clean_app_name(target: &str) -> String {
    let mut name = target.trim();
    if let Some(rest) = name.strip_prefix("the ") {
        name = rest;
    }
    for filler in ["application ", "app ", "program "] {
        if let Some(rest) = name.strip_prefix(filler) {
            name = rest;
            break;
        }
    }
    strip_trailing_punctuation(name).to_string()
}

fn create_file(segment: &str) -> Option<StructuredAction> {
    if !(has_word(segment, "file") && has_any_word(segment, &CREATE_VERBS)) {
        return None;
    }

    let name = get_name(segment, &CREATE_VERBS).unwrap_or_else(|| "NewFile.txt".to_string());

    Some(StructuredAction::CreateFile {
        name,
        location: location_phrase(segment),
    })
}

fn close_app(segment: &str) -> Option<StructuredAction> {
    if !has_any_word(segment, &CLOSE_VERBS) {
        return None;
    }
    let app = first_word_after(segment, &CLOSE_VERBS)?;
    Some(StructuredAction::CloseApp { app })
}

fn screenshot(segment: &str) -> Option<StructuredAction> {
    let triggered = segment.contains("screenshot")
        || segment.contains("screen shot")
        || has_word(segment, "capture");
    triggered.then_some(StructuredAction::Screenshot)
}

fn volume(segment: &str) -> Option<StructuredAction> {
    if !has_any_word(segment, &["volume", "mute", "unmute", "louder", "quieter"]) {
        return None;
    }

    let direction = if has_any_word(segment, &["up", "increase", "louder", "raise"]) {
        VolumeDirection::Up
    } else if has_any_word(segment, &["down", "decrease", "quieter", "lower"]) {
        VolumeDirection::Down
    } else {
        VolumeDirection::Mute
    };

    Some(StructuredAction::Volume { direction })
}

fn media(segment: &str) -> Option<StructuredAction> {
    let command = if has_word(segment, "pause") {
        MediaCommand::Pause
    } else if has_any_word(segment, &["next", "skip"]) {
        MediaCommand::Next
    } else if has_any_word(segment, &["previous", "prev"]) {
        MediaCommand::Prev
    } else if has_any_word(segment, &["play", "resume"]) {
        MediaCommand::Play
    } else {
        return None;
    };

    Some(StructuredAction::Media { command })
}

fn calculate(segment: &str) -> Option<StructuredAction> {
    let worded = has_any_word(segment, &ARITHMETIC_WORDS);
    let symbol = segment.chars().find_map(Operator::from_symbol);
    if !worded && symbol.is_none() {
        return None;
    }

    let operands: Vec<i64> = segment
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse().ok())
        .take(2)
        .collect();
    let &[first, second] = &operands[..] else {
        return None;
    };

    let op = worded_operator(segment).or(symbol)?;

    let (lhs, rhs) = if op == Operator::Subtract && has_word(segment, "from") {
        (second, first)
    } else {
        (first, second)
    };

    Some(StructuredAction::Calculate {
        expression: Expression { lhs, op, rhs },
    })
}

fn worded_operator(segment: &str) -> Option<Operator> {
    if has_any_word(segment, &["add", "plus", "sum"]) {
        Some(Operator::Add)
    } else if has_any_word(segment, &["subtract", "minus"]) {
        Some(Operator::Subtract)
    } else if has_any_word(segment, &["multiply", "multiplied", "times"]) {
        Some(Operator::Multiply)
    } else if has_any_word(segment, &["divide", "divided"]) {
        Some(Operator::Divide)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(lhs: i64, op: Operator, rhs: i64) -> StructuredAction {
        StructuredAction::Calculate {
            expression: Expression { lhs, op, rhs },
        }
    }

    #[test]
    fn test_rename_with_to() {
        assert_eq!(
            extract("rename report.pdf to summary.pdf"),
            Some(StructuredAction::Move {
                source: "report.pdf".into(),
                destination: Some("summary.pdf".into()),
                keep_parent: true,
            })
        );
    }

    #[test]
    fn test_rename_without_to_defers_to_memory() {
        assert_eq!(
            extract("rename final.txt"),
            Some(StructuredAction::Move {
                source: "it".into(),
                destination: Some("final.txt".into()),
                keep_parent: true,
            })
        );
    }

    #[test]
    fn test_rename_quoted_source_containing_to() {
        assert_eq!(
            extract("rename \"a to b.txt\" to c.txt"),
            Some(StructuredAction::Move {
                source: "a to b.txt".into(),
                destination: Some("c.txt".into()),
                keep_parent: true,
            })
        );
    }

    #[test]
    fn test_rename_to_without_source() {
        assert_eq!(
            extract("rename to final.txt"),
            Some(StructuredAction::Move {
                source: "it".into(),
                destination: Some("final.txt".into()),
                keep_parent: true,
            })
        );
        assert_eq!(extract("rename to"), None);
    }

    #[test]
    fn test_delete_quoted_with_location() {
        assert_eq!(
            extract("delete \"old notes.txt\" from desktop"),
            Some(StructuredAction::Delete {
                target: "old notes.txt from desktop".into(),
            })
        );
    }

    #[test]
    fn test_delete_strips_filler() {
        assert_eq!(
            extract("please remove the draft.docx in downloads"),
            Some(StructuredAction::Delete {
                target: "draft.docx in downloads".into(),
            })
        );
    }

    #[test]
    fn test_copy_without_destination() {
        assert_eq!(
            extract("copy \"report.pdf\""),
            Some(StructuredAction::Copy {
                source: "report.pdf".into(),
                destination: None,
            })
        );
    }

    #[test]
    fn test_copy_quoted_name_containing_to() {
        assert_eq!(
            extract("copy \"notes to self.txt\""),
            Some(StructuredAction::Copy {
                source: "notes to self.txt".into(),
                destination: None,
            })
        );
        assert_eq!(
            extract("move 'notes to self.txt' to documents"),
            Some(StructuredAction::Move {
                source: "notes to self.txt".into(),
                destination: Some("documents".into()),
                keep_parent: false,
            })
        );
    }

    #[test]
    fn test_move_with_destination_and_source_location() {
        assert_eq!(
            extract("move notes.txt from desktop to documents"),
            Some(StructuredAction::Move {
                source: "notes.txt from desktop".into(),
                destination: Some("documents".into()),
                keep_parent: false,
            })
        );
    }

    #[test]
    fn test_remove_is_not_move() {
        assert!(matches!(
            extract("remove notes.txt"),
            Some(StructuredAction::Delete { .. })
        ));
    }

    #[test]
    fn test_paste_destination() {
        assert_eq!(
            extract("paste downloads"),
            Some(StructuredAction::Paste {
                destination: "downloads".into()
            })
        );
        assert_eq!(
            extract("paste it here"),
            Some(StructuredAction::Paste {
                destination: "it".into()
            })
        );
    }

    #[test]
    fn test_create_folder_on_desktop() {
        assert_eq!(
            extract("create folder reports on desktop"),
            Some(StructuredAction::CreateFolder {
                name: "reports".into(),
                location: Some("on desktop".into()),
            })
        );
    }

    #[test]
    fn test_create_folder_default_name() {
        assert_eq!(
            extract("make a new folder on the desktop"),
            Some(StructuredAction::CreateFolder {
                name: "NewFolder".into(),
                location: Some("on the desktop".into()),
            })
        );
    }

    #[test]
    fn test_open_url() {
        assert_eq!(
            extract("open youtube.com"),
            Some(StructuredAction::Navigate {
                target: NavigateTarget::Url("https://youtube.com".into()),
            })
        );
        assert_eq!(
            extract("go to https://example.org/docs"),
            Some(StructuredAction::Navigate {
                target: NavigateTarget::Url("https://example.org/docs".into()),
            })
        );
    }

    #[test]
    fn test_open_folder_keyword_navigates() {
        assert_eq!(
            extract("open downloads"),
            Some(StructuredAction::Navigate {
                target: NavigateTarget::Location("downloads".into()),
            })
        );
    }

    #[test]
    fn test_new_is_not_a_create_verb() {
        let expected = Some(StructuredAction::Navigate {
            target: NavigateTarget::Location("the new folder".into()),
        });
        assert_eq!(extract("open the new folder"), expected);
        assert_eq!(extract("go to the new folder"), expected);
    }

    #[test]
    fn test_open_multi_word_app_not_truncated() {
        assert_eq!(
            extract("open the app visual studio code"),
            Some(StructuredAction::OpenApp {
                app: "visual studio code".into()
            })
        );
    }

    #[test]
    fn test_open_it_navigates_to_memory() {
        assert_eq!(
            extract("open it"),
            Some(StructuredAction::Navigate {
                target: NavigateTarget::Location("it".into()),
            })
        );
    }

    #[test]
    fn test_create_file_default_name() {
        assert_eq!(
            extract("create a new file"),
            Some(StructuredAction::CreateFile {
                name: "NewFile.txt".into(),
                location: None,
            })
        );
    }

    #[test]
    fn test_close_takes_first_token() {
        assert_eq!(
            extract("close google chrome"),
            Some(StructuredAction::CloseApp {
                app: "google".into()
            })
        );
    }

    #[test]
    fn test_screenshot() {
        assert_eq!(extract("take a screenshot"), Some(StructuredAction::Screenshot));
        assert_eq!(extract("capture the screen"), Some(StructuredAction::Screenshot));
    }

    #[test]
    fn test_volume_directions() {
        let dir = |s| match extract(s) {
            Some(StructuredAction::Volume { direction }) => Some(direction),
            _ => None,
        };
        assert_eq!(dir("turn the volume up"), Some(VolumeDirection::Up));
        assert_eq!(dir("decrease volume"), Some(VolumeDirection::Down));
        assert_eq!(dir("volume"), Some(VolumeDirection::Mute));
    }

    #[test]
    fn test_media_commands() {
        let cmd = |s| match extract(s) {
            Some(StructuredAction::Media { command }) => Some(command),
            _ => None,
        };
        assert_eq!(cmd("play music"), Some(MediaCommand::Play));
        assert_eq!(cmd("pause"), Some(MediaCommand::Pause));
        assert_eq!(cmd("skip this song"), Some(MediaCommand::Next));
        assert_eq!(cmd("previous track"), Some(MediaCommand::Prev));
    }

    #[test]
    fn test_math_operand_ordering() {
        assert_eq!(extract("subtract 8 from 30"), Some(calc(30, Operator::Subtract, 8)));
        assert_eq!(extract("30 minus 8"), Some(calc(30, Operator::Subtract, 8)));
        assert_eq!(extract("8 minus 30"), Some(calc(8, Operator::Subtract, 30)));
        assert_eq!(extract("8 plus 2"), Some(calc(8, Operator::Add, 2)));
    }

    #[test]
    fn test_math_symbols() {
        assert_eq!(extract("6*7"), Some(calc(6, Operator::Multiply, 7)));
        assert_eq!(extract("calculate 100 / 4"), Some(calc(100, Operator::Divide, 4)));
    }

    #[test]
    fn test_math_needs_two_operands() {
        assert_eq!(extract("add 5"), None);
    }

    #[test]
    fn test_gibberish_is_no_match() {
        assert_eq!(extract("tell me a joke"), None);
        assert_eq!(extract(""), None);
    }
}
