//! Extraction boundary between framework requests and the session guard.

use crate::request::RequestMeta;

use super::RequestAdapter;

/// Extracts request metadata from a framework-specific request.
///
/// Implementations only map types: they read the request ID and the raw
/// session cookie and nothing else. Verifying the token is the
/// [`SessionGuard`](crate::SessionGuard)'s job.
///
/// # Examples
///
/// ```
/// use session_core::web::ExtractMetadata;
/// use session_core::RequestMeta;
///
/// struct MyFrameworkRequest {
///     id: String,
///     cookie: Option<String>,
/// }
///
/// impl ExtractMetadata for MyFrameworkRequest {
///     fn extract_metadata(&self, _cookie_name: &str) -> RequestMeta {
///         match &self.cookie {
///             Some(token) => RequestMeta::with_token(self.id.clone(), token.clone()),
///             None => RequestMeta::anonymous(self.id.clone()),
///         }
///     }
/// }
///
/// let req = MyFrameworkRequest { id: "r-1".into(), cookie: None };
/// assert!(req.extract_metadata("token").session_token.is_none());
/// ```
pub trait ExtractMetadata {
    /// Returns the request ID and the raw value of the `cookie_name` cookie.
    fn extract_metadata(&self, cookie_name: &str) -> RequestMeta;
}

impl ExtractMetadata for RequestAdapter {
    fn extract_metadata(&self, cookie_name: &str) -> RequestMeta {
        match self.cookie(cookie_name) {
            Some(token) => RequestMeta::with_token(self.request_id(), token),
            None => RequestMeta::anonymous(self.request_id()),
        }
    }
}
