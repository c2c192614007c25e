//! Audit trail for guard decisions, sessions and asset changes.
//!
//! Events carry request ids, principal ids, action names and record ids.
//! Nothing from a credential or a raw form field is stored.

mod event;
mod trail;

pub use event::{AuditEvent, AuditEventKind, AuditOutcome};
pub use trail::AuditTrail;
