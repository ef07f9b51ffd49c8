//! Session cookie transport.

use std::fmt::Write as _;

use crate::config::Config;
use crate::credential::Credential;
use crate::secret::Secret;

/// A `Set-Cookie` instruction for the session cookie.
///
/// Always `HttpOnly`, `SameSite=Lax` and `Path=/`; `Secure` when the
/// configuration says the deployment is served over HTTPS. The value is held
/// as a [`Secret`], so `Debug` output stays redacted.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use session_core::credential::{CredentialIssuer, SigningKey};
/// use session_core::web::SessionCookie;
/// use session_core::{Config, Principal, UserId};
///
/// let config = Config::new(SigningKey::new(vec![3u8; 32]));
/// let alice = Principal { id: UserId::generate(), email: "alice@example.com".into() };
/// let cred = CredentialIssuer::new(config.signing_key()).issue(&alice, Utc::now()).unwrap();
///
/// let header = SessionCookie::issue(&config, &cred).header_value();
/// assert!(header.expose_secret().starts_with("token="));
/// assert!(header.expose_secret().contains("; HttpOnly"));
/// assert!(header.expose_secret().contains("; Max-Age=604800"));
///
/// let cleared = SessionCookie::clear(&config).header_value();
/// assert_eq!(
///     cleared.expose_secret(),
///     "token=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"
/// );
/// ```
#[derive(Debug)]
pub struct SessionCookie {
    name: String,
    value: Secret<String>,
    max_age_secs: i64,
    secure: bool,
}

impl SessionCookie {
    /// Carries a freshly issued credential for its whole lifetime.
    pub fn issue(config: &Config, credential: &Credential) -> Self {
        Self {
            name: config.cookie_name.clone(),
            value: Secret::new(credential.token().to_string()),
            max_age_secs: credential.ttl().num_seconds(),
            secure: config.cookie_secure,
        }
    }

    /// Tells the client to drop the session cookie.
    pub fn clear(config: &Config) -> Self {
        Self {
            name: config.cookie_name.clone(),
            value: Secret::new(String::new()),
            max_age_secs: 0,
            secure: config.cookie_secure,
        }
    }

    /// Cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lifetime in seconds; zero for a clearing cookie.
    pub fn max_age_secs(&self) -> i64 {
        self.max_age_secs
    }

    /// Whether `Secure` is set.
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Whether this instruction removes the cookie.
    pub fn is_clearing(&self) -> bool {
        self.max_age_secs == 0 && self.value.expose_secret().is_empty()
    }

    /// Renders the `Set-Cookie` header value.
    ///
    /// The result embeds the token, so it comes back wrapped.
    pub fn header_value(&self) -> Secret<String> {
        let mut out = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.name,
            self.value.expose_secret(),
            self.max_age_secs
        );
        if self.secure {
            let _ = write!(out, "; Secure");
        }
        Secret::new(out)
    }
}

/// Splits a raw `Cookie` request header into `(name, value)` pairs.
///
/// Pairs without `=` or with an empty name are skipped; surrounding
/// whitespace and a pair of double quotes around the value are removed.
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}
