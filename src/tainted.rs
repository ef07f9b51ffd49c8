use std::fmt;

/// A wrapper for untrusted request input that must be sanitized before use.
///
/// Form fields and path parameters enter the crate as `Tainted<String>`. The
/// value cannot be read back out; the only way forward is a
/// [`Sanitizer`](crate::Sanitizer), which yields a [`Verified`](crate::Verified).
///
/// # Examples
///
/// ```
/// use session_core::{Sanitizer, Tainted, TextSanitizer};
///
/// let content = Tainted::new("  my first post  ".to_string());
/// let verified = TextSanitizer::post_content().sanitize(content).unwrap();
/// assert_eq!(verified.as_ref(), "my first post");
/// ```
// Keep Clone: the adapter hands out copies of the same field.
#[derive(Clone)]
pub struct Tainted<T> {
    // Must stay private; a public field bypasses sanitization entirely.
    inner: T,
}

impl<T> Tainted<T> {
    /// Wraps an untrusted value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Extracts the inner value for sanitization.
    ///
    /// `pub(crate)`: only sanitizers call this, and only to validate the value
    /// before wrapping it in `Verified<T>`.
    pub(crate) fn into_inner(self) -> T {
        self.inner
    }
}

// No Deref, AsRef, Borrow, From<T> or Into<T>: each would let tainted input
// reach a handler without sanitization.

impl<T: fmt::Debug> fmt::Debug for Tainted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tainted")
            .field("inner", &self.inner)
            .finish()
    }
}
