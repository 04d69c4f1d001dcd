//! Short-term execution memory carried across turns

use serde::Serialize;

use crate::core::types::{CanonicalLocation, PendingOperation};

/// Source armed by a destination-less copy or move
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingBuffer {
    pub source: CanonicalLocation,
    pub operation: PendingOperation,
}

/// Session state owned by one interpreter instance
///
/// The pending source and operation live in a single `Option` so they are
/// always set and cleared together. Mutation is restricted to the crate; the
/// dispatcher is the only writer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionMemory {
    last_resolved_location: Option<CanonicalLocation>,
    pending: Option<PendingBuffer>,
}

impl ExecutionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_resolved_location(&self) -> Option<&CanonicalLocation> {
        self.last_resolved_location.as_ref()
    }

    pub fn pending(&self) -> Option<&PendingBuffer> {
        self.pending.as_ref()
    }

    pub fn pending_source(&self) -> Option<&CanonicalLocation> {
        self.pending.as_ref().map(|p| &p.source)
    }

    pub fn pending_operation(&self) -> Option<PendingOperation> {
        self.pending.as_ref().map(|p| p.operation)
    }

    /// Immutable copy for display
    pub fn snapshot(&self) -> ExecutionMemory {
        self.clone()
    }

    pub(crate) fn record_location(&mut self, location: CanonicalLocation) {
        tracing::info!(location = %location, "remembering location");
        self.last_resolved_location = Some(location);
    }

    pub(crate) fn arm(&mut self, source: CanonicalLocation, operation: PendingOperation) {
        tracing::info!(source = %source, operation = %operation, "armed for paste");
        self.pending = Some(PendingBuffer { source, operation });
    }

    pub(crate) fn clear_pending(&mut self) {
        if self.pending.take().is_some() {
            tracing::info!("pending buffer cleared");
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
