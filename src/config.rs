//! Process configuration, loaded once at startup.
//!
//! | Variable           | Default   | Meaning                                   |
//! |--------------------|-----------|-------------------------------------------|
//! | `SESSION_SECRET`   | required  | signing key, at least 32 bytes            |
//! | `SESSION_TTL_SECS` | `604800`  | credential lifetime                       |
//! | `SESSION_COOKIE`   | `token`   | name of the session cookie                |
//! | `COOKIE_SECURE`    | `false`   | mark the cookie `Secure` (production)     |
//! | `LOGIN_PATH`       | `/login`  | where page routes send anonymous callers  |

use std::fmt;

use chrono::TimeDelta;

use crate::credential::{SigningKey, DEFAULT_TTL_SECS};

/// Minimum accepted signing key length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Default session cookie name.
pub const DEFAULT_COOKIE_NAME: &str = "token";

/// Default login entry point.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Error raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `SESSION_SECRET` is not set
    MissingSecret,
    /// `SESSION_SECRET` is shorter than [`MIN_SECRET_LEN`]
    SecretTooShort {
        /// Length that was supplied
        len: usize,
    },
    /// A variable holds a value that cannot be parsed
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingSecret => write!(f, "SESSION_SECRET is not set"),
            ConfigError::SecretTooShort { len } => write!(
                f,
                "SESSION_SECRET is {} bytes, need at least {}",
                len, MIN_SECRET_LEN
            ),
            ConfigError::InvalidValue { var, value } => {
                write!(f, "{} has invalid value '{}'", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Session and cookie settings shared by every request.
#[derive(Debug, Clone)]
pub struct Config {
    signing_key: SigningKey,
    /// Credential lifetime, also used as the cookie `Max-Age`
    pub session_ttl: TimeDelta,
    /// Name of the session cookie
    pub cookie_name: String,
    /// Whether the cookie is restricted to encrypted transport
    pub cookie_secure: bool,
    /// Redirect target for anonymous callers of page routes
    pub login_path: String,
}

impl Config {
    /// Creates a configuration with defaults around an explicit key.
    ///
    /// The key length is not checked here; [`from_lookup`](Self::from_lookup)
    /// is the path that enforces [`MIN_SECRET_LEN`].
    pub fn new(signing_key: SigningKey) -> Self {
        Self {
            signing_key,
            session_ttl: TimeDelta::seconds(DEFAULT_TTL_SECS),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_secure: false,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the secret is missing or short, or if any
    /// optional variable cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use session_core::Config;
    ///
    /// let config = Config::from_lookup(|var| match var {
    ///     "SESSION_SECRET" => Some("x".repeat(32)),
    ///     "COOKIE_SECURE" => Some("true".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert!(config.cookie_secure);
    /// assert_eq!(config.cookie_name, "token");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("SESSION_SECRET").ok_or(ConfigError::MissingSecret)?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort { len: secret.len() });
        }

        let mut config = Self::new(SigningKey::new(secret.into_bytes()));

        if let Some(raw) = lookup("SESSION_TTL_SECS") {
            config.session_ttl = raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .and_then(TimeDelta::try_seconds)
                .ok_or(ConfigError::InvalidValue {
                    var: "SESSION_TTL_SECS",
                    value: raw,
                })?;
        }

        if let Some(name) = lookup("SESSION_COOKIE") {
            let valid = !name.is_empty()
                && name
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
            if !valid {
                return Err(ConfigError::InvalidValue {
                    var: "SESSION_COOKIE",
                    value: name,
                });
            }
            config.cookie_name = name;
        }

        if let Some(raw) = lookup("COOKIE_SECURE") {
            config.cookie_secure = parse_flag(&raw).ok_or(ConfigError::InvalidValue {
                var: "COOKIE_SECURE",
                value: raw,
            })?;
        }

        if let Some(path) = lookup("LOGIN_PATH") {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    var: "LOGIN_PATH",
                    value: path,
                });
            }
            config.login_path = path;
        }

        Ok(config)
    }

    /// Returns the signing key.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
