/// A value that has passed a [`Sanitizer`](crate::Sanitizer).
///
/// Post bodies and profile fields are stored only as `Verified<String>`:
/// [`Post::new`](crate::Post::new) and
/// [`Post::edit_content`](crate::Post::edit_content) refuse anything else.
///
/// External code cannot construct one directly:
///
/// ```compile_fail
/// use session_core::Verified;
///
/// let verified = Verified::new_unchecked("data".to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified<T> {
    inner: T,
}

impl<T> Verified<T> {
    /// Creates a `Verified<T>` without performing validation.
    ///
    /// `pub(crate)`: callers must have validated the value already.
    pub(crate) fn new_unchecked(value: T) -> Self {
        Self { inner: value }
    }

    /// Consumes the wrapper and returns the value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsRef<T> for Verified<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}
