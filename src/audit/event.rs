//! Audit event schema.

use std::fmt;

/// What an audit event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventKind {
    /// A session guard decision on a protected action
    GuardDecision,
    /// A remember-token cookie was issued
    SignIn,
    /// A remember-token cookie was removed
    SignOut,
    /// An asset record was created
    AssetCreated,
    /// An asset record was changed
    AssetUpdated,
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEventKind::GuardDecision => write!(f, "guard_decision"),
            AuditEventKind::SignIn => write!(f, "sign_in"),
            AuditEventKind::SignOut => write!(f, "sign_out"),
            AuditEventKind::AssetCreated => write!(f, "asset_created"),
            AuditEventKind::AssetUpdated => write!(f, "asset_updated"),
        }
    }
}

/// How the audited step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Went through
    Success,
    /// Stopped by the guard
    Halted,
    /// Rejected by validation
    Rejected,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Success => write!(f, "success"),
            AuditOutcome::Halted => write!(f, "halted"),
            AuditOutcome::Rejected => write!(f, "rejected"),
        }
    }
}

/// One entry in the [`AuditTrail`](super::AuditTrail).
///
/// Holds identifiers only. Credentials and raw form input never go in here.
///
/// ```
/// use asset_guard::audit::{AuditEvent, AuditEventKind, AuditOutcome};
///
/// let event = AuditEvent::new("req-9", None::<String>, AuditEventKind::GuardDecision, AuditOutcome::Halted)
///     .with_action("assets#index");
///
/// assert_eq!(
///     event.to_string(),
///     "AuditEvent[kind=guard_decision, outcome=halted, request_id=req-9, principal=<none>, action=assets#index]"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    request_id: String,
    principal: Option<String>,
    kind: AuditEventKind,
    outcome: AuditOutcome,
    action: Option<String>,
    resource_id: Option<String>,
}

impl AuditEvent {
    /// Creates an event with the required fields.
    pub fn new(
        request_id: impl Into<String>,
        principal: Option<impl Into<String>>,
        kind: AuditEventKind,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            principal: principal.map(Into::into),
            kind,
            outcome,
            action: None,
            resource_id: None,
        }
    }

    /// Names the action, e.g. `assets#update`.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Sets the affected record id.
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Returns the request id.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the acting principal id, if signed in.
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Returns the event kind.
    pub fn kind(&self) -> AuditEventKind {
        self.kind
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    /// Returns the action, if set.
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Returns the resource id, if set.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditEvent[kind={}, outcome={}, request_id={}, principal={}",
            self.kind,
            self.outcome,
            self.request_id,
            self.principal.as_deref().unwrap_or("<none>")
        )?;
        if let Some(action) = &self.action {
            write!(f, ", action={}", action)?;
        }
        if let Some(id) = &self.resource_id {
            write!(f, ", resource_id={}", id)?;
        }
        write!(f, "]")
    }
}
