//! Action handlers and their parameter catalog

pub mod calculator;
pub mod catalog;
pub mod dry_run;
pub mod fs;
pub mod handler;

use std::sync::Arc;

pub use calculator::CalculatorHandler;
pub use catalog::ParamSpec;
pub use dry_run::DryRunHandler;
pub use fs::{FileSystemHandlers, NavigateHandler};
pub use handler::{ActionArgs, ActionHandler, HandlerOutput, HandlerRegistry};

use crate::core::types::ActionKind;

impl HandlerRegistry {
    /// Built-in handlers: filesystem and arithmetic
    ///
    /// Host capabilities (apps, volume, media, screenshots, browser) are
    /// left unregistered for the embedding system to supply.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register_all(&fs::FILESYSTEM_KINDS, Arc::new(FileSystemHandlers))
            .register(ActionKind::Calculate, Arc::new(CalculatorHandler));
        registry
    }

    /// Route URL navigation to `browser`, keeping path navigation on disk
    pub fn with_browser(&mut self, browser: Arc<dyn ActionHandler>) -> &mut Self {
        self.register(ActionKind::Navigate, Arc::new(NavigateHandler::new(browser)))
    }

    /// Every kind answered by the dry-run handler, arithmetic still computed
    pub fn dry_run() -> Self {
        let mut registry = Self::new();
        registry
            .register(ActionKind::Calculate, Arc::new(CalculatorHandler))
            .fill_missing(Arc::new(DryRunHandler));
        registry
    }
}
