use std::fmt;

use crate::{Tainted, Verified};

/// Error returned when sanitization fails.
///
/// The message describes the rule that was broken, never the rejected input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationError {
    kind: SanitizationErrorKind,
    message: String,
}

impl SanitizationError {
    /// Creates a new sanitization error.
    pub fn new(kind: SanitizationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> SanitizationErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SanitizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sanitization failed ({}): {}", self.kind, self.message)
    }
}

impl std::error::Error for SanitizationError {}

/// Kind of sanitization error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizationErrorKind {
    /// Input is empty or contains only whitespace.
    Empty,
    /// Input exceeds maximum allowed length.
    TooLong,
    /// Input contains control or non-printable characters.
    ContainsControlChars,
    /// Input does not have the required shape.
    MalformedInput,
}

impl fmt::Display for SanitizationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty input"),
            Self::TooLong => write!(f, "input too long"),
            Self::ContainsControlChars => write!(f, "contains control characters"),
            Self::MalformedInput => write!(f, "malformed input"),
        }
    }
}

/// Promotes tainted request input to verified input.
///
/// Implementations validate (and may normalize) the value, construct
/// `Verified<T>` only on success, and keep the rejected value out of the
/// error.
pub trait Sanitizer<T> {
    /// Sanitizes a tainted value, returning a verified value on success.
    ///
    /// # Errors
    ///
    /// Returns `SanitizationError` if the input fails validation.
    fn sanitize(&self, input: Tainted<T>) -> Result<Verified<T>, SanitizationError>;
}

/// Maximum length of a post, in characters.
pub const MAX_POST_LEN: usize = 2000;

/// Maximum length of a single-line form field, in characters.
pub const MAX_FIELD_LEN: usize = 256;

/// A text sanitizer for form fields and post bodies.
///
/// - trims leading and trailing whitespace
/// - rejects empty results
/// - rejects control characters; multi-line mode still admits `\n`, `\r`
///   and `\t` so posts can have paragraphs
/// - enforces a maximum length in characters
///
/// # Examples
///
/// ```
/// use session_core::{Sanitizer, Tainted, TextSanitizer};
///
/// let field = TextSanitizer::field();
/// assert_eq!(field.sanitize(Tainted::new(" alice ".into())).unwrap().as_ref(), "alice");
/// assert!(field.sanitize(Tainted::new("a\nb".into())).is_err());
///
/// let post = TextSanitizer::post_content();
/// assert!(post.sanitize(Tainted::new("line one\nline two".into())).is_ok());
/// assert!(post.sanitize(Tainted::new("   ".into())).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TextSanitizer {
    max_len: usize,
    multiline: bool,
}

impl TextSanitizer {
    /// Creates a single-line sanitizer with the given maximum length.
    ///
    /// # Panics
    ///
    /// Panics if `max_len` is 0.
    pub fn single_line(max_len: usize) -> Self {
        assert!(max_len > 0, "max_len must be greater than 0");
        Self {
            max_len,
            multiline: false,
        }
    }

    /// Creates a multi-line sanitizer with the given maximum length.
    ///
    /// # Panics
    ///
    /// Panics if `max_len` is 0.
    pub fn multi_line(max_len: usize) -> Self {
        assert!(max_len > 0, "max_len must be greater than 0");
        Self {
            max_len,
            multiline: true,
        }
    }

    /// Limits for usernames, names and emails.
    pub fn field() -> Self {
        Self::single_line(MAX_FIELD_LEN)
    }

    /// Limits for post bodies.
    pub fn post_content() -> Self {
        Self::multi_line(MAX_POST_LEN)
    }

    fn is_forbidden(&self, c: char) -> bool {
        if self.multiline && matches!(c, '\n' | '\r' | '\t') {
            return false;
        }
        c.is_control()
    }
}

impl Sanitizer<String> for TextSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let raw = input.into_inner();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(SanitizationError::new(
                SanitizationErrorKind::Empty,
                "input is empty or contains only whitespace",
            ));
        }

        if trimmed.chars().any(|c| self.is_forbidden(c)) {
            return Err(SanitizationError::new(
                SanitizationErrorKind::ContainsControlChars,
                "input contains control or non-printable characters",
            ));
        }

        if trimmed.chars().count() > self.max_len {
            return Err(SanitizationError::new(
                SanitizationErrorKind::TooLong,
                format!("input exceeds maximum length of {}", self.max_len),
            ));
        }

        Ok(Verified::new_unchecked(trimmed.to_string()))
    }
}

/// Image extensions accepted for profile pictures.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Validates the stored filename of an uploaded profile picture.
///
/// The name must be a single path component, at most [`MAX_FIELD_LEN`]
/// characters, made of ASCII letters, digits, `-`, `_` and one `.` before an
/// image extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFilenameSanitizer;

impl Sanitizer<String> for ImageFilenameSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let name = input.into_inner();

        if name.is_empty() {
            return Err(SanitizationError::new(
                SanitizationErrorKind::Empty,
                "filename is empty",
            ));
        }
        if name.len() > MAX_FIELD_LEN {
            return Err(SanitizationError::new(
                SanitizationErrorKind::TooLong,
                format!("filename exceeds maximum length of {}", MAX_FIELD_LEN),
            ));
        }

        let shape_ok = name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
            && name.matches('.').count() == 1;
        let ext_ok = name
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| {
                !stem.is_empty() && IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
            });

        if !(shape_ok && ext_ok) {
            return Err(SanitizationError::new(
                SanitizationErrorKind::MalformedInput,
                "filename must be a plain image name",
            ));
        }

        Ok(Verified::new_unchecked(name))
    }
}
