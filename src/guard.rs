use chrono::{DateTime, Utc};

use crate::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditTrail};
use crate::context::Ctx;
use crate::credential::{self, SigningKey};
use crate::error::Violation;
use crate::request::{Principal, RequestMeta};
use crate::state::{Anonymous, Authed};

/// The session guard.
///
/// `SessionGuard` is the only way to construct a `Ctx<Authed>`. It verifies
/// the request's session credential against the signing key and, on success,
/// attaches the resolved principal to the request context. Nothing is
/// renewed or reissued on the success path.
///
/// Every decision is recorded on the audit trail, when one is attached.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use session_core::credential::SigningKey;
/// use session_core::{RequestMeta, SessionGuard, ViolationKind};
///
/// let key = SigningKey::new(vec![9u8; 32]);
/// let guard = SessionGuard::new(&key);
///
/// let err = guard
///     .authenticate(RequestMeta::anonymous("req-1"), Utc::now())
///     .unwrap_err();
/// assert_eq!(err.kind, ViolationKind::Unauthenticated);
///
/// let err = guard
///     .authenticate(RequestMeta::with_token("req-2", "not-a-token"), Utc::now())
///     .unwrap_err();
/// assert_eq!(err.kind, ViolationKind::InvalidCredential);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SessionGuard<'a> {
    key: &'a SigningKey,
    audit: Option<&'a AuditTrail>,
}

impl<'a> SessionGuard<'a> {
    /// Creates a guard over the given signing key.
    pub fn new(key: &'a SigningKey) -> Self {
        Self { key, audit: None }
    }

    /// Records every guard decision on `trail`.
    pub fn with_audit(mut self, trail: &'a AuditTrail) -> Self {
        self.audit = Some(trail);
        self
    }

    /// Verifies a raw token; see [`credential::verify`].
    pub fn verify(&self, token: Option<&str>, now: DateTime<Utc>) -> Result<Principal, Violation> {
        credential::verify(token, self.key, now)
    }

    /// Wraps a request in an anonymous context without looking at its token.
    ///
    /// For public routes that never need an identity.
    pub fn anonymous(&self, meta: RequestMeta) -> Ctx<Anonymous> {
        Ctx::new_anonymous(meta.request_id)
    }

    /// Requires a valid session credential.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` when the request carries no token
    /// - `InvalidCredential` when the token is malformed, tampered with or expired
    pub fn authenticate(
        &self,
        meta: RequestMeta,
        now: DateTime<Utc>,
    ) -> Result<Ctx<Authed>, Violation> {
        let token = meta.session_token.as_ref().map(|t| t.expose_secret().as_str());
        let verdict = self.verify(token, now);
        self.settle(Ctx::new_anonymous(meta.request_id), verdict)
    }

    /// Accepts anonymous callers but still rejects a bad credential.
    ///
    /// Returns `Ok(None)` when no token was sent. A token that is present but
    /// fails verification is an error, never silently downgraded to anonymous.
    pub fn authenticate_optional(
        &self,
        meta: RequestMeta,
        now: DateTime<Utc>,
    ) -> Result<Option<Ctx<Authed>>, Violation> {
        let has_token = meta
            .session_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty());
        if has_token {
            self.authenticate(meta, now).map(Some)
        } else {
            Ok(None)
        }
    }

    fn settle(
        &self,
        ctx: Ctx<Anonymous>,
        verdict: Result<Principal, Violation>,
    ) -> Result<Ctx<Authed>, Violation> {
        match verdict {
            Ok(principal) => {
                self.record(
                    AuditEvent::new(
                        ctx.request_id(),
                        Some(principal.id.to_string()),
                        AuditEventKind::Authentication,
                        AuditOutcome::Success,
                    )
                    .with_action("verify_session"),
                );
                let ctx = ctx.authenticate(principal);
                ctx.log().debug(format_args!("session verified"));
                Ok(ctx)
            }
            Err(violation) => {
                ctx.log()
                    .warn(format_args!("session rejected: {}", violation));
                self.record(
                    AuditEvent::new(
                        ctx.request_id(),
                        None::<String>,
                        AuditEventKind::Authentication,
                        AuditOutcome::Denied,
                    )
                    .with_action("verify_session")
                    .with_reason(violation.kind.to_string()),
                );
                Err(violation)
            }
        }
    }

    fn record(&self, event: AuditEvent) {
        if let Some(trail) = self.audit {
            trail.record(event);
        }
    }
}
