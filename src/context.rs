use crate::logging::RequestLog;
use crate::request::Principal;
use crate::state::{Anonymous, Authed};

/// Request-scoped execution context.
///
/// `Ctx<S>` is generic over its authentication state:
/// - `Ctx<Anonymous>`: no principal; enough to serve public pages
/// - `Ctx<Authed>`: a verified principal, produced only by the session guard
///
/// # Type-State Progression
///
/// ```text
/// Ctx<Anonymous> --SessionGuard::authenticate--> Ctx<Authed>
/// ```
///
/// A handler that needs an identity takes `&Ctx<Authed>`; there is no way to
/// obtain one without passing through [`SessionGuard`](crate::SessionGuard),
/// and no way to ask it for a principal that is not there.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use session_core::credential::{CredentialIssuer, SigningKey};
/// use session_core::{Principal, RequestMeta, SessionGuard, UserId};
///
/// let key = SigningKey::new(vec![1u8; 32]);
/// let alice = Principal { id: UserId::generate(), email: "alice@example.com".into() };
/// let cred = CredentialIssuer::new(&key).issue(&alice, Utc::now()).unwrap();
///
/// let meta = RequestMeta::with_token("req-1", cred.token());
/// let ctx = SessionGuard::new(&key).authenticate(meta, Utc::now()).unwrap();
///
/// assert_eq!(ctx.request_id(), "req-1");
/// assert_eq!(ctx.principal(), &alice);
/// ```
#[derive(Debug, Clone)]
pub struct Ctx<S = Authed> {
    request_id: String,
    state: S,
}

impl<S> Ctx<S> {
    /// Returns the request ID for this context.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

impl Ctx<Anonymous> {
    /// Creates a context with only a request ID.
    pub(crate) fn new_anonymous(request_id: String) -> Self {
        Self {
            request_id,
            state: Anonymous::new(),
        }
    }

    /// Attaches a verified principal.
    ///
    /// `pub(crate)`: only the guard calls this, after verifying a credential.
    pub(crate) fn authenticate(self, principal: Principal) -> Ctx<Authed> {
        Ctx {
            request_id: self.request_id,
            state: Authed::new(principal),
        }
    }

    /// Returns a logger tagged with this request.
    pub fn log(&self) -> RequestLog<'_> {
        RequestLog::new(&self.request_id, None)
    }
}

impl Ctx<Authed> {
    /// Returns the verified principal.
    pub fn principal(&self) -> &Principal {
        &self.state.principal
    }

    /// Returns a logger tagged with this request and principal.
    pub fn log(&self) -> RequestLog<'_> {
        RequestLog::new(&self.request_id, Some(&self.state.principal.id))
    }
}
