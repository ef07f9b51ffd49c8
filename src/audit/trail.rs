//! In-memory audit trail recorder.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::{AuditEvent, AuditOutcome};

/// Recorder for audit events.
///
/// Each recorded event is emitted as a structured `tracing` event on the
/// `audit` target. Retention in memory is a separate choice:
///
/// - [`AuditTrail::new`] keeps every event, for tests and short-lived tools
/// - [`AuditTrail::bounded`] keeps the most recent `capacity` events
/// - [`AuditTrail::emit_only`] keeps nothing, for long-running servers
///
/// Shared across request threads.
///
/// # Example
///
/// ```
/// use session_core::audit::{AuditTrail, AuditEvent, AuditEventKind, AuditOutcome};
///
/// let trail = AuditTrail::new();
/// trail.record(AuditEvent::new(
///     "req-123",
///     None::<String>,
///     AuditEventKind::Authentication,
///     AuditOutcome::Denied,
/// ));
///
/// assert_eq!(trail.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct AuditTrail {
    events: Mutex<VecDeque<AuditEvent>>,
    capacity: Option<usize>,
}

impl AuditTrail {
    /// Creates a trail that retains every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a trail that retains at most `capacity` events, dropping the
    /// oldest first.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: Some(capacity),
        }
    }

    /// Creates a trail that only emits through `tracing`.
    pub fn emit_only() -> Self {
        Self::bounded(0)
    }

    /// Returns the retention limit, or `None` if unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Records an audit event and emits it through `tracing`.
    pub fn record(&self, event: AuditEvent) {
        emit(&event);
        if self.capacity == Some(0) {
            return;
        }
        let mut events = self.events.lock();
        if let Some(cap) = self.capacity {
            while events.len() >= cap {
                events.pop_front();
            }
        }
        events.push_back(event);
    }

    /// Returns a snapshot of the retained events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Returns the number of retained events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if no events are retained.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Clears all retained events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

fn emit(event: &AuditEvent) {
    let principal = event.principal().unwrap_or("<none>");
    let action = event.action().unwrap_or("");
    let resource_id = event.resource_id().unwrap_or("");
    let reason = event.reason().unwrap_or("");

    match event.outcome() {
        AuditOutcome::Success => tracing::info!(
            target: "audit",
            request_id = %event.request_id(),
            principal = %principal,
            kind = %event.kind(),
            outcome = %event.outcome(),
            action = %action,
            resource_id = %resource_id,
            "audit event"
        ),
        AuditOutcome::Denied | AuditOutcome::Error => tracing::warn!(
            target: "audit",
            request_id = %event.request_id(),
            principal = %principal,
            kind = %event.kind(),
            outcome = %event.outcome(),
            action = %action,
            resource_id = %resource_id,
            reason = %reason,
            "audit event"
        ),
    }
}
