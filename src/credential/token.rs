use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{Claims, SigningKey};
use crate::error::Violation;
use crate::request::Principal;
use crate::secret::Secret;

/// Default credential lifetime: seven days.
pub const DEFAULT_TTL_SECS: i64 = 7 * 24 * 60 * 60;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Error raised while producing a credential.
#[derive(Debug)]
pub enum CredentialError {
    /// The claims could not be encoded or signed
    Encode(jsonwebtoken::errors::Error),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Encode(e) => write!(f, "failed to sign claims: {}", e),
        }
    }
}

impl std::error::Error for CredentialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CredentialError::Encode(e) => Some(e),
        }
    }
}

/// A freshly issued credential, ready to be handed to the client.
#[derive(Debug)]
pub struct Credential {
    token: Secret<String>,
    expires_at: DateTime<Utc>,
    ttl: TimeDelta,
}

impl Credential {
    /// The encoded token. Only the cookie writer should read this.
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// The instant after which the token no longer verifies.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Lifetime the credential was issued with.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }
}

/// Issues signed credentials for verified principals.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use session_core::credential::{verify, CredentialIssuer, SigningKey};
/// use session_core::{Principal, UserId};
///
/// let key = SigningKey::new(vec![42u8; 32]);
/// let principal = Principal { id: UserId::generate(), email: "a@example.com".into() };
///
/// let now = Utc::now();
/// let credential = CredentialIssuer::new(&key).issue(&principal, now).unwrap();
///
/// let verified = verify(Some(credential.token()), &key, now).unwrap();
/// assert_eq!(verified, principal);
/// ```
#[derive(Debug)]
pub struct CredentialIssuer<'a> {
    key: &'a SigningKey,
    ttl: TimeDelta,
}

impl<'a> CredentialIssuer<'a> {
    /// Creates an issuer with the default seven-day lifetime.
    pub fn new(key: &'a SigningKey) -> Self {
        Self {
            key,
            ttl: TimeDelta::seconds(DEFAULT_TTL_SECS),
        }
    }

    /// Overrides the credential lifetime.
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    /// Signs `{sub, email, iat = now, exp = now + ttl}` for `principal` as an
    /// HS256 JWT.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` if the claims cannot be encoded.
    pub fn issue(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<Credential, CredentialError> {
        let claims = Claims::for_principal(principal, now, self.ttl);
        let token = encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(self.key.as_bytes()),
        )
        .map_err(CredentialError::Encode)?;

        Ok(Credential {
            token: Secret::new(token),
            expires_at: claims.expires_at().unwrap_or(DateTime::<Utc>::MAX_UTC),
            ttl: self.ttl,
        })
    }
}

/// HS256 only, `exp` required, no leeway.
///
/// The library's own expiry check reads the system clock, so it is off here
/// and [`verify`] compares `exp` against the caller's `now` instead.
fn validation() -> Validation {
    let mut validation = Validation::new(ALGORITHM);
    validation.leeway = 0;
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

/// Verifies a raw session token.
///
/// Pure function of `(token, key, now)`:
///
/// - `None` or an empty token → [`ViolationKind::Unauthenticated`]
/// - not a JWT, a different algorithm, a bad signature, unreadable claims,
///   or `now` at/after `exp` → [`ViolationKind::InvalidCredential`]
/// - otherwise the principal the token was issued to
///
/// [`ViolationKind::Unauthenticated`]: crate::ViolationKind::Unauthenticated
/// [`ViolationKind::InvalidCredential`]: crate::ViolationKind::InvalidCredential
pub fn verify(
    token: Option<&str>,
    key: &SigningKey,
    now: DateTime<Utc>,
) -> Result<Principal, Violation> {
    let token = match token {
        Some(t) if !t.is_empty() => t,
        _ => return Err(Violation::unauthenticated("No session credential presented")),
    };

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(key.as_bytes()), &validation())
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => {
                Violation::invalid_credential("Session credential signature mismatch")
            }
            ErrorKind::ExpiredSignature => Violation::invalid_credential("Session credential expired"),
            _ => Violation::invalid_credential("Malformed session credential"),
        })?
        .claims;

    if claims.is_expired_at(now) {
        return Err(Violation::invalid_credential("Session credential expired"));
    }

    claims
        .principal()
        .ok_or_else(|| Violation::invalid_credential("Session credential names no valid user"))
}
