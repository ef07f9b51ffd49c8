use std::fmt;

/// A wrapper that keeps session tokens and passwords out of logs.
///
/// `Secret<T>` renders as `[REDACTED]` under both `Debug` and `Display`, so a
/// `RequestMeta` or a login form can be traced without leaking the bearer
/// token or the password it carries. The value is reachable only through
/// [`expose_secret`](Self::expose_secret).
///
/// # Examples
///
/// ```
/// use session_core::Secret;
///
/// let token = Secret::new("eyJhbGciOiJIUzI1NiJ9...".to_string());
/// assert_eq!(format!("{:?}", token), "[REDACTED]");
/// assert_eq!(format!("{}", token), "[REDACTED]");
/// assert!(token.expose_secret().starts_with("eyJh"));
/// ```
// Do NOT derive Clone, Copy or Default: each would let the value be
// duplicated or fabricated outside of the explicit access path.
pub struct Secret<T> {
    inner: T,
}

impl<T> Secret<T> {
    /// Wraps a sensitive value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Explicitly exposes the secret value.
    ///
    /// The exposed reference must not be formatted into logs or responses.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
