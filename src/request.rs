use crate::ids::UserId;
use crate::secret::Secret;

/// Metadata about an incoming request, as seen by the session guard.
///
/// Contains the request identifier and the raw session token, if the client
/// sent one. The token is untrusted until [`SessionGuard`](crate::SessionGuard)
/// has verified it.
#[derive(Debug)]
pub struct RequestMeta {
    /// Unique identifier for this request
    pub request_id: String,
    /// Raw session token from the cookie store, if any
    pub session_token: Option<Secret<String>>,
}

impl RequestMeta {
    /// Creates request metadata without a session token.
    pub fn anonymous(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            session_token: None,
        }
    }

    /// Creates request metadata carrying a session token.
    pub fn with_token(request_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            session_token: Some(Secret::new(token.into())),
        }
    }
}

/// The identity resolved from a valid credential.
///
/// A principal is never persisted; it is recomputed from the credential on
/// every request and lives only as long as that request's context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The user this credential was issued to
    pub id: UserId,
    /// Email recorded at issuance
    pub email: String,
}
