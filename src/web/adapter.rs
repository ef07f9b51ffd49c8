//! Request adapter for mapping HTTP requests to session-core types.

use std::collections::HashMap;
use std::fmt;

use crate::secret::Secret;
use crate::Tainted;

use super::cookie::parse_cookie_header;

/// A file the multipart collaborator has already received and stored.
///
/// Only the stored filename and size cross the boundary; the bytes stay with
/// the collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    stored_name: String,
    size: u64,
}

impl UploadedFile {
    /// Describes a stored upload.
    pub fn new(stored_name: impl Into<String>, size: u64) -> Self {
        Self {
            stored_name: stored_name.into(),
            size,
        }
    }

    /// The stored filename, untrusted until sanitized.
    pub fn stored_name(&self) -> Tainted<String> {
        Tainted::new(self.stored_name.clone())
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Framework-agnostic view of one HTTP request.
///
/// Framework-specific code fills an adapter from its own request type, then
/// hands it to [`App`](super::App). Nothing here is trusted:
/// - cookie values reach the session guard only through
///   [`ExtractMetadata`](super::ExtractMetadata)
/// - form fields and path parameters come back out as `Tainted<String>`
/// - passwords come back out as `Secret<String>`
///
/// `Debug` prints field names only, so an adapter can be logged without
/// leaking a token or a password.
///
/// # Examples
///
/// ```
/// use session_core::web::{ExtractMetadata, RequestAdapter};
///
/// let mut adapter = RequestAdapter::new("req-12345");
/// adapter.add_cookie_header("theme=dark; token=abc.def");
/// adapter.add_form_field("content", "hello");
///
/// let meta = adapter.extract_metadata("token");
/// assert_eq!(meta.request_id, "req-12345");
/// assert!(meta.session_token.is_some());
/// assert!(adapter.form_field("content").is_some());
/// assert!(!format!("{:?}", adapter).contains("abc.def"));
/// ```
#[derive(Clone)]
pub struct RequestAdapter {
    request_id: String,
    cookies: HashMap<String, String>,
    form: HashMap<String, String>,
    path_params: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl RequestAdapter {
    /// Creates an adapter with the given request ID and nothing else.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            cookies: HashMap::new(),
            form: HashMap::new(),
            path_params: HashMap::new(),
            file: None,
        }
    }

    /// Adds one cookie. A later cookie with the same name wins.
    pub fn add_cookie(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Adds every cookie in a raw `Cookie` header.
    pub fn add_cookie_header(&mut self, header: &str) {
        for (name, value) in parse_cookie_header(header) {
            self.cookies.insert(name, value);
        }
    }

    /// Adds a urlencoded form field (already decoded).
    pub fn add_form_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.form.insert(key.into(), value.into());
    }

    /// Adds a path parameter captured by routing.
    pub fn add_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.path_params.insert(key.into(), value.into());
    }

    /// Attaches the upload received for this request.
    pub fn set_file(&mut self, file: UploadedFile) {
        self.file = Some(file);
    }

    /// Returns the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns a form field as tainted input.
    pub fn form_field(&self, key: &str) -> Option<Tainted<String>> {
        self.form.get(key).map(|v| Tainted::new(v.clone()))
    }

    /// Returns a form field that carries a password.
    ///
    /// Passwords are compared, never stored or echoed, so they skip text
    /// sanitization and go straight into a [`Secret`].
    pub fn password_field(&self, key: &str) -> Option<Secret<String>> {
        self.form.get(key).map(|v| Secret::new(v.clone()))
    }

    /// Returns a path parameter as tainted input.
    pub fn path_param(&self, key: &str) -> Option<Tainted<String>> {
        self.path_params.get(key).map(|v| Tainted::new(v.clone()))
    }

    /// Returns the upload, if one was received.
    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub(super) fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

impl fmt::Debug for RequestAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cookies: Vec<&str> = self.cookies.keys().map(String::as_str).collect();
        let mut form: Vec<&str> = self.form.keys().map(String::as_str).collect();
        cookies.sort_unstable();
        form.sort_unstable();
        f.debug_struct("RequestAdapter")
            .field("request_id", &self.request_id)
            .field("cookies", &cookies)
            .field("form", &form)
            .field("path_params", &self.path_params)
            .field("file", &self.file)
            .finish()
    }
}
