//! Deskpilot - Entry Point
//!
//! Interactive shell around the command interpreter. Reads one utterance
//! per line, runs it, and prints the result.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use deskpilot::actions::{DryRunHandler, HandlerRegistry};
use deskpilot::core::config::InterpreterConfig;
use deskpilot::core::error::Result;
use deskpilot::core::types::{ActionKind, ActionResult};
use deskpilot::interpreter::Interpreter;
use deskpilot::llm::{LlmClient, LlmIntentService};

/// Deskpilot - natural-language desktop commands
#[derive(Parser, Debug)]
#[command(name = "deskpilot")]
#[command(about = "Type commands like \"copy report.pdf to downloads and then open it\"")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never consult the language-model fallback
    #[arg(long)]
    no_fallback: bool,

    /// Describe actions instead of performing them
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("deskpilot=info")
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => InterpreterConfig::load(path)?,
        None => InterpreterConfig::default(),
    };

    let registry = if args.dry_run {
        HandlerRegistry::dry_run()
    } else {
        let mut registry = HandlerRegistry::with_builtins();
        let describe = Arc::new(DryRunHandler);
        // No host automation in this shell; report what would happen
        registry
            .register_all(
                &[
                    ActionKind::OpenApp,
                    ActionKind::CloseApp,
                    ActionKind::Screenshot,
                    ActionKind::Volume,
                    ActionKind::Media,
                ],
                describe.clone(),
            )
            .with_browser(describe);
        registry
    };

    let mut interpreter = Interpreter::new(&config, registry)?;

    if config.fallback.enabled && !args.no_fallback {
        match LlmClient::from_config(&config.fallback).and_then(LlmIntentService::new) {
            Ok(service) => interpreter = interpreter.with_fallback(Box::new(service)),
            Err(e) => tracing::warn!(error = %e, "running without fallback classifier"),
        }
    }

    tracing::info!(dry_run = args.dry_run, "Deskpilot starting...");

    println!("\n=== DESKPILOT ===");
    println!("Natural-language commands for your desktop");
    println!();
    println!("Commands:");
    println!("  memory          - Show the current execution memory");
    println!("  reset           - Forget the last location and pending paste");
    println!("  quit / q        - Exit");
    println!("  <any text>      - Interpret and run a command");
    if interpreter.has_fallback() {
        println!("  (unrecognized commands are sent to the language model)");
    }
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "memory" {
            display_memory(&interpreter)?;
            continue;
        }

        if input == "reset" {
            interpreter.reset();
            println!("Memory cleared.");
            continue;
        }

        let result = interpreter.handle(input);
        display_result(&result);
    }

    println!("\nGoodbye!");
    Ok(())
}

fn display_result(result: &ActionResult) {
    if result.success {
        println!("{}", result.message);
        if let Some(location) = &result.produced_location {
            println!("  -> {}", location);
        }
    } else {
        match result.error {
            Some(kind) => println!("Failed ({}): {}", kind, result.message),
            None => println!("Failed: {}", result.message),
        }
    }
}

fn display_memory(interpreter: &Interpreter) -> Result<()> {
    let snapshot = interpreter.memory().snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
