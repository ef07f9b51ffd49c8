//! Audit event schema.

use std::fmt;

/// Kind of security-relevant action being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventKind {
    /// Credential verification, login or registration
    Authentication,
    /// Ownership check before a mutation
    Authorization,
    /// A post, like set or profile was written
    StateChange,
    /// Session cookie issued or cleared
    SessionLifecycle,
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEventKind::Authentication => write!(f, "authentication"),
            AuditEventKind::Authorization => write!(f, "authorization"),
            AuditEventKind::StateChange => write!(f, "state_change"),
            AuditEventKind::SessionLifecycle => write!(f, "session_lifecycle"),
        }
    }
}

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Operation succeeded
    Success,
    /// Operation was refused by the guard or the ownership check
    Denied,
    /// Operation failed in a collaborator
    Error,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Success => write!(f, "success"),
            AuditOutcome::Denied => write!(f, "denied"),
            AuditOutcome::Error => write!(f, "error"),
        }
    }
}

/// A structured audit event.
///
/// Only identifiers and short labels are stored: never tokens, passwords or
/// post bodies. The principal is recorded by its user ID.
///
/// # Example
///
/// ```
/// use session_core::audit::{AuditEvent, AuditEventKind, AuditOutcome};
///
/// let event = AuditEvent::new(
///     "req-123",
///     Some("0b6f6a56-3a43-4ad5-9a4e-58b2d1f1b0c3"),
///     AuditEventKind::Authorization,
///     AuditOutcome::Denied,
/// )
/// .with_action("update_post")
/// .with_resource_id("5d8c1f2e-7e55-4d5b-a1b4-2f0a6f1c9e77")
/// .with_reason("Forbidden");
///
/// assert_eq!(event.request_id(), "req-123");
/// assert_eq!(event.reason(), Some("Forbidden"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    request_id: String,
    principal: Option<String>,
    kind: AuditEventKind,
    outcome: AuditOutcome,
    action: Option<String>,
    resource_id: Option<String>,
    reason: Option<String>,
}

impl AuditEvent {
    /// Creates a new audit event with required fields.
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
            reason: None,
        }
    }

    /// Sets the operation name (e.g. `"toggle_like"`).
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Sets the identifier of the user or post acted upon.
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Sets a short reason label for denials and errors.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns the request identifier.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the principal, if authenticated.
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Returns the event kind.
    pub fn kind(&self) -> AuditEventKind {
        self.kind
    }

    /// Returns the operation outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    /// Returns the action, if set.
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Returns the resource identifier, if set.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    /// Returns the reason label, if set.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
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
        if let Some(resource_id) = &self.resource_id {
            write!(f, ", resource_id={}", resource_id)?;
        }
        if let Some(reason) = &self.reason {
            write!(f, ", reason={}", reason)?;
        }

        write!(f, "]")
    }
}
