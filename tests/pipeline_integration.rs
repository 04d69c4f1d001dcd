//! Integration tests for the interpreter pipeline
//!
//! These tests drive whole utterances through segmentation, extraction,
//! fallback and dispatch with recording handlers, verifying:
//! - Two-phase copy/paste through execution memory
//! - Sequence ordering, pronoun chaining and fail-fast
//! - All-or-nothing parsing with a single fallback attempt
//! - Location memory round-trips

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use deskpilot::actions::{ActionArgs, ActionHandler, HandlerOutput, HandlerRegistry};
use deskpilot::command::action::{Expression, Operator, StructuredAction};
use deskpilot::command::parse_utterance;
use deskpilot::command::segmenter::segment;
use deskpilot::core::config::InterpreterConfig;
use deskpilot::core::error::{InterpreterError, Result};
use deskpilot::core::types::{ActionKind, ErrorKind, PendingOperation};
use deskpilot::interpreter::{Interpreter, CANNOT_EXECUTE};
use deskpilot::llm::IntentService;

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<(ActionKind, ActionArgs)>>,
}

impl Recorder {
    fn calls(&self) -> Vec<(ActionKind, ActionArgs)> {
        self.calls.lock().unwrap().clone()
    }

    fn kinds(&self) -> Vec<ActionKind> {
        self.calls().into_iter().map(|(kind, _)| kind).collect()
    }
}

impl ActionHandler for Recorder {
    fn handle(&self, kind: ActionKind, args: &ActionArgs) -> Result<HandlerOutput> {
        self.calls.lock().unwrap().push((kind, args.clone()));
        Ok(HandlerOutput::message(format!("{} ok", kind)))
    }
}

struct Refuses;

impl ActionHandler for Refuses {
    fn handle(&self, _kind: ActionKind, _args: &ActionArgs) -> Result<HandlerOutput> {
        Err(InterpreterError::handler("Access is denied"))
    }
}

/// Intent service that records what it was asked and replies with a fixed answer
struct StubService {
    reply: Option<&'static str>,
    asked: Arc<Mutex<Vec<String>>>,
    calls: Arc<AtomicUsize>,
}

impl IntentService for StubService {
    fn classify(&self, utterance: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.asked.lock().unwrap().push(utterance.to_string());
        self.reply.map(String::from)
    }
}

fn config() -> InterpreterConfig {
    InterpreterConfig {
        home: Some(PathBuf::from("/home/tester")),
        ..InterpreterConfig::default()
    }
}

fn recording_interpreter() -> (Interpreter, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let mut registry = HandlerRegistry::new();
    registry.fill_missing(recorder.clone());
    let interpreter = Interpreter::new(&config(), registry).unwrap();
    (interpreter, recorder)
}

fn stub(
    reply: Option<&'static str>,
) -> (Box<StubService>, Arc<Mutex<Vec<String>>>, Arc<AtomicUsize>) {
    let asked = Arc::new(Mutex::new(Vec::new()));
    let calls = Arc::new(AtomicUsize::new(0));
    let service = StubService {
        reply,
        asked: asked.clone(),
        calls: calls.clone(),
    };
    (Box::new(service), asked, calls)
}

// ============================================================================
// Two-phase copy / paste
// ============================================================================

#[test]
fn test_copy_then_paste_clears_pending() {
    let (mut interp, recorder) = recording_interpreter();

    let result = interp.handle("copy \"report.pdf\"");
    assert!(result.success);
    assert_eq!(
        interp.memory().pending_source().map(|l| l.to_string()),
        Some("/home/tester/Desktop/report.pdf".to_string())
    );
    assert_eq!(
        interp.memory().pending_operation(),
        Some(PendingOperation::Copy)
    );

    let result = interp.handle("paste downloads");
    assert!(result.success);
    assert!(interp.memory().pending_source().is_none());
    assert!(interp.memory().pending_operation().is_none());

    let calls = recorder.calls();
    assert_eq!(recorder.kinds(), vec![ActionKind::Copy, ActionKind::Paste]);
    let (_, paste_args) = &calls[1];
    assert_eq!(paste_args.get("operation"), Some("copy"));
    assert_eq!(
        paste_args.get("destination_path"),
        Some("/home/tester/Downloads")
    );
    assert!(!recorder.kinds().contains(&ActionKind::Move));
}

#[test]
fn test_paste_with_nothing_pending() {
    let (mut interp, recorder) = recording_interpreter();

    let result = interp.handle("paste it here");
    assert!(!result.success);
    assert_eq!(result.error, Some(ErrorKind::NothingPending));
    assert!(recorder.calls().is_empty());
}

#[test]
fn test_paste_with_nothing_pending_and_no_paste_handler() {
    let mut interp = Interpreter::new(&config(), HandlerRegistry::new()).unwrap();

    let result = interp.handle("paste downloads");
    assert_eq!(result.error, Some(ErrorKind::NothingPending));
}

#[test]
fn test_move_without_destination_arms_move() {
    let (mut interp, _recorder) = recording_interpreter();

    assert!(interp.handle("move notes.txt from downloads").success);
    assert_eq!(
        interp.memory().pending_operation(),
        Some(PendingOperation::Move)
    );
    assert_eq!(
        interp.memory().pending_source().map(|l| l.to_string()),
        Some("/home/tester/Downloads/notes.txt".to_string())
    );
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_conjunction_priority() {
    let segments = segment("open chrome and then take a screenshot and close it");
    assert_eq!(
        segments,
        vec!["open chrome", "take a screenshot and close it"]
    );

    let Some(StructuredAction::Sequence { steps }) =
        parse_utterance("open chrome and then take a screenshot and close it")
    else {
        panic!("expected a sequence");
    };
    assert_eq!(steps.len(), 2);
    assert_eq!(
        steps[0],
        StructuredAction::OpenApp {
            app: "chrome".into()
        }
    );
}

#[test]
fn test_math_operand_ordering() {
    let calc = |lhs, op, rhs| StructuredAction::Calculate {
        expression: Expression { lhs, op, rhs },
    };

    assert_eq!(
        parse_utterance("subtract 8 from 30"),
        Some(calc(30, Operator::Subtract, 8))
    );
    assert_eq!(
        parse_utterance("30 minus 8"),
        Some(calc(30, Operator::Subtract, 8))
    );
    assert_eq!(
        parse_utterance("8 plus 2"),
        Some(calc(8, Operator::Add, 2))
    );
}

#[test]
fn test_create_folder_on_alias_has_no_sub_path() {
    let (mut interp, recorder) = recording_interpreter();

    assert!(interp.handle("create folder Reports on desktop").success);

    let calls = recorder.calls();
    let (kind, args) = &calls[0];
    assert_eq!(*kind, ActionKind::CreateFolder);
    assert_eq!(args.get("location"), Some("/home/tester/Desktop"));
    assert_eq!(args.get("name"), Some("reports"));
}

#[test]
fn test_compound_phrase_resolution() {
    let (interp, _recorder) = recording_interpreter();
    let location = interp.resolve("notes from downloads.").unwrap();
    assert_eq!(location.to_string(), "/home/tester/Downloads/notes");
}

// ============================================================================
// Sequences
// ============================================================================

#[test]
fn test_sequence_fail_fast() {
    let recorder = Arc::new(Recorder::default());
    let mut registry = HandlerRegistry::new();
    registry.register(ActionKind::Delete, Arc::new(Refuses));
    registry.fill_missing(recorder.clone());
    let mut interp = Interpreter::new(&config(), registry).unwrap();

    let result = interp
        .handle("create folder reports on desktop and then delete it and then 2 plus 3");

    assert!(!result.success);
    assert_eq!(result.error, Some(ErrorKind::HandlerError));
    assert_eq!(result.message, "Access is denied");
    assert_eq!(recorder.kinds(), vec![ActionKind::CreateFolder]);
}

#[test]
fn test_sequence_pronoun_chaining() {
    let (mut interp, recorder) = recording_interpreter();

    let result =
        interp.handle("create folder projects on documents and then create file todo.txt in it");
    assert!(result.success);

    let calls = recorder.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1].1.get("location"),
        Some("/home/tester/Documents/projects")
    );
    assert_eq!(
        result.produced_location.map(|l| l.to_string()),
        Some("/home/tester/Documents/projects/todo.txt".to_string())
    );
}

#[test]
fn test_sequence_result_is_last_success() {
    let (mut interp, _recorder) = recording_interpreter();
    let result = interp.handle("take a screenshot and then volume up");
    assert!(result.success);
    assert_eq!(result.message, "volume ok");
}

#[test]
fn test_unregistered_handler_is_unsupported() {
    let mut interp = Interpreter::new(&config(), HandlerRegistry::new()).unwrap();
    let result = interp.handle("pause");
    assert_eq!(result.error, Some(ErrorKind::UnsupportedAction));
}

// ============================================================================
// Fallback
// ============================================================================

#[test]
fn test_partial_parse_sends_whole_utterance_to_fallback() {
    let (interp, recorder) = recording_interpreter();
    let (service, asked, calls) = stub(None);
    let mut interp = interp.with_fallback(service);

    let utterance = "create folder reports and then sing a song";
    let result = interp.handle(utterance);

    assert_eq!(result.error, Some(ErrorKind::ParseFailure));
    assert_eq!(result.message, CANNOT_EXECUTE);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(asked.lock().unwrap().as_slice(), [utterance.to_string()]);
    assert!(recorder.calls().is_empty());
}

#[test]
fn test_fallback_answer_is_executed() {
    let (interp, recorder) = recording_interpreter();
    let (service, _asked, calls) = stub(Some("open spotify"));
    let mut interp = interp.with_fallback(service);

    let result = interp.handle("fire up some tunes");

    assert!(result.success);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let recorded = recorder.calls();
    assert_eq!(recorded[0].0, ActionKind::OpenApp);
    assert_eq!(recorded[0].1.get("app_name"), Some("spotify"));
}

#[test]
fn test_fallback_is_not_retried() {
    let (interp, recorder) = recording_interpreter();
    let (service, _asked, calls) = stub(Some("hum a little tune"));
    let mut interp = interp.with_fallback(service);

    let result = interp.handle("serenade me");

    assert_eq!(result.error, Some(ErrorKind::ParseFailure));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(recorder.calls().is_empty());
}

#[test]
fn test_parsed_utterance_skips_fallback() {
    let (interp, _recorder) = recording_interpreter();
    let (service, _asked, calls) = stub(Some("pause"));
    let mut interp = interp.with_fallback(service);

    assert!(interp.handle("take a screenshot").success);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Location memory
// ============================================================================

#[test]
fn test_location_memory_round_trip() {
    let (mut interp, _recorder) = recording_interpreter();

    assert_eq!(
        interp.resolve("it").unwrap().to_string(),
        "/home/tester/Desktop"
    );

    assert!(interp.handle("open downloads").success);
    let remembered = interp.memory().last_resolved_location().cloned().unwrap();
    assert_eq!(remembered.to_string(), "/home/tester/Downloads");
    assert_eq!(interp.resolve("it").unwrap(), remembered);
}

#[test]
fn test_failed_action_leaves_memory_untouched() {
    let mut registry = HandlerRegistry::new();
    registry.register(ActionKind::CreateFolder, Arc::new(Refuses));
    let mut interp = Interpreter::new(&config(), registry).unwrap();

    assert!(!interp.handle("create folder reports on desktop").success);
    assert!(interp.memory().last_resolved_location().is_none());
}
