//! Audit trail for authentication, authorization and state changes.
//!
//! This module provides:
//! - `AuditEvent`: structured event schema
//! - `AuditTrail`: thread-safe recorder that also emits through `tracing`
//!
//! Events carry identifiers only. Tokens, passwords and post content are
//! never recorded.

mod event;
mod trail;

pub use event::{AuditEvent, AuditEventKind, AuditOutcome};
pub use trail::AuditTrail;
