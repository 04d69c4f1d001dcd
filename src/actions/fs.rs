//! Filesystem action handlers

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::actions::catalog::ParamSpec;
use crate::actions::handler::{ActionArgs, ActionHandler, HandlerOutput};
use crate::core::error::{InterpreterError, Result};
use crate::core::types::ActionKind;

/// Kinds served by `FileSystemHandlers`
pub const FILESYSTEM_KINDS: [ActionKind; 8] = [
    ActionKind::Rename,
    ActionKind::Delete,
    ActionKind::Copy,
    ActionKind::Move,
    ActionKind::Paste,
    ActionKind::CreateFolder,
    ActionKind::CreateFile,
    ActionKind::Navigate,
];

const NAVIGATE_PATH_ONLY: [ParamSpec; 1] = [ParamSpec {
    name: "path",
    required: false,
}];

/// Performs file and folder effects with `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemHandlers;

impl ActionHandler for FileSystemHandlers {
    fn params(&self, kind: ActionKind) -> &'static [ParamSpec] {
        match kind {
            ActionKind::Navigate => &NAVIGATE_PATH_ONLY,
            other => other.params(),
        }
    }

    fn handle(&self, kind: ActionKind, args: &ActionArgs) -> Result<HandlerOutput> {
        match kind {
            ActionKind::CreateFolder => create_folder(args),
            ActionKind::CreateFile => create_file(args),
            ActionKind::Delete => delete(args),
            ActionKind::Copy | ActionKind::Move => transfer(kind, args),
            ActionKind::Rename => rename(args),
            ActionKind::Paste => paste(args),
            ActionKind::Navigate => navigate(args),
            other => Err(InterpreterError::UnsupportedAction(other)),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn not_found(path: &Path) -> InterpreterError {
    InterpreterError::handler(format!("Could not find '{}'", path.display()))
}

fn create_folder(args: &ActionArgs) -> Result<HandlerOutput> {
    let location = PathBuf::from(args.require(ActionKind::CreateFolder, "location")?);
    let name = args.require(ActionKind::CreateFolder, "name")?;
    let path = location.join(name);

    fs::create_dir_all(&path)?;

    Ok(HandlerOutput::message(format!(
        "Folder '{}' created at {}",
        name,
        location.display()
    ))
    .at(path))
}

fn create_file(args: &ActionArgs) -> Result<HandlerOutput> {
    let location = PathBuf::from(args.require(ActionKind::CreateFile, "location")?);
    let name = args.require(ActionKind::CreateFile, "name")?;
    let path = location.join(name);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new().create(true).append(true).open(&path)?;

    Ok(HandlerOutput::message(format!(
        "File '{}' created at {}",
        name,
        location.display()
    ))
    .at(path))
}

fn delete(args: &ActionArgs) -> Result<HandlerOutput> {
    let target = PathBuf::from(args.require(ActionKind::Delete, "target_path")?);
    let metadata = fs::symlink_metadata(&target).map_err(|_| not_found(&target))?;

    if metadata.is_dir() {
        fs::remove_dir_all(&target)?;
    } else {
        fs::remove_file(&target)?;
    }

    Ok(HandlerOutput::message(format!(
        "Deleted '{}'",
        display_name(&target)
    )))
}

/// Copy or move with an explicit destination, or verify the source before arming
fn transfer(kind: ActionKind, args: &ActionArgs) -> Result<HandlerOutput> {
    let source = PathBuf::from(args.require(kind, "source_path")?);
    if !source.exists() {
        return Err(not_found(&source));
    }

    let verb = if kind == ActionKind::Copy { "Copied" } else { "Moved" };

    let Some(destination) = args.get("destination_path") else {
        return Ok(HandlerOutput::message(format!(
            "Ready to {} '{}'. Say paste and a destination to finish.",
            kind,
            display_name(&source)
        )));
    };

    let target = place_into(&source, Path::new(destination));
    if kind == ActionKind::Copy {
        copy_entry(&source, &target)?;
    } else {
        move_entry(&source, &target)?;
    }

    Ok(HandlerOutput::message(format!(
        "{} '{}' to {}",
        verb,
        display_name(&source),
        target.display()
    ))
    .at(target))
}

fn rename(args: &ActionArgs) -> Result<HandlerOutput> {
    let source = PathBuf::from(args.require(ActionKind::Rename, "source_path")?);
    let target = PathBuf::from(args.require(ActionKind::Rename, "destination_path")?);

    if !source.exists() {
        return Err(not_found(&source));
    }
    if target.exists() {
        return Err(InterpreterError::handler(format!(
            "'{}' already exists",
            display_name(&target)
        )));
    }

    move_entry(&source, &target)?;

    Ok(HandlerOutput::message(format!(
        "Renamed '{}' to '{}'",
        display_name(&source),
        display_name(&target)
    ))
    .at(target))
}

fn paste(args: &ActionArgs) -> Result<HandlerOutput> {
    let operation = args.require(ActionKind::Paste, "operation")?;
    let kind = match operation {
        "copy" => ActionKind::Copy,
        "move" => ActionKind::Move,
        other => {
            return Err(InterpreterError::handler(format!(
                "Unknown paste operation '{}'",
                other
            )))
        }
    };
    transfer(kind, args)
}

fn navigate(args: &ActionArgs) -> Result<HandlerOutput> {
    let Some(path) = args.get("path") else {
        return Err(InterpreterError::handler(
            "Browser navigation is not available here",
        ));
    };
    let path = PathBuf::from(path);
    if !path.exists() {
        return Err(not_found(&path));
    }
    Ok(HandlerOutput::message(format!("Opened {}", path.display())).at(path))
}

/// Navigation that opens paths itself and hands URLs to a browser handler
#[derive(Clone)]
pub struct NavigateHandler {
    browser: Arc<dyn ActionHandler>,
}

impl NavigateHandler {
    pub fn new(browser: Arc<dyn ActionHandler>) -> Self {
        Self { browser }
    }
}

impl ActionHandler for NavigateHandler {
    fn handle(&self, kind: ActionKind, args: &ActionArgs) -> Result<HandlerOutput> {
        if args.get("path").is_some() {
            navigate(args)
        } else {
            self.browser.handle(kind, args)
        }
    }
}

/// Destination directories keep the source's file name
fn place_into(source: &Path, destination: &Path) -> PathBuf {
    match source.file_name() {
        Some(name) if destination.is_dir() => destination.join(name),
        _ => destination.to_path_buf(),
    }
}

fn copy_entry(source: &Path, target: &Path) -> io::Result<()> {
    if source.is_dir() {
        fs::create_dir_all(target)?;
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            copy_entry(&entry.path(), &target.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, target).map(|_| ())
    }
}

fn move_entry(source: &Path, target: &Path) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    // Cross-device renames fail; fall back to copy and remove
    if fs::rename(source, target).is_ok() {
        return Ok(());
    }
    copy_entry(source, target)?;
    if source.is_dir() {
        fs::remove_dir_all(source)
    } else {
        fs::remove_file(source)
    }
}
