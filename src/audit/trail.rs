//! In-memory audit recorder.

use std::cell::RefCell;

use super::{AuditEvent, AuditEventKind};

/// Records audit events in arrival order.
///
/// Owned by a single request pipeline; not `Sync`.
#[derive(Debug, Default)]
pub struct AuditTrail {
    events: RefCell<Vec<AuditEvent>>,
}

impl AuditTrail {
    /// Creates an empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event and mirrors it to `tracing`.
    pub fn record(&self, event: AuditEvent) {
        tracing::info!(target: "audit", request_id = %event.request_id(), "{}", event);
        self.events.borrow_mut().push(event);
    }

    /// Returns a snapshot of all events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.borrow().clone()
    }

    /// Returns the events of one kind.
    pub fn of_kind(&self, kind: AuditEventKind) -> Vec<AuditEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    /// Returns the number of events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Drops all events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
