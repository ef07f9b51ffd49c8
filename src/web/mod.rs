//! The HTTP boundary, without an HTTP framework.
//!
//! Framework glue fills a [`RequestAdapter`] (cookies, decoded form fields,
//! path parameters, the stored upload) and passes it to [`App::dispatch`].
//! It gets back a [`Response`]: a status, an optional redirect, an optional
//! [`SessionCookie`], and a body that is either text or a [`Page`] for the
//! template engine.
//!
//! Untrusted input stays untrusted across this boundary: the session cookie
//! only reaches the guard through [`ExtractMetadata`], form fields and path
//! parameters come out as `Tainted<String>`, and passwords as
//! `Secret<String>`.
//!
//! ```text
//! framework request
//!   -> RequestAdapter
//!   -> Route::resolve
//!   -> SessionGuard (guarded routes)  -> Ctx<Authed>
//!   -> handler -> Store
//!   -> Response (errors via Response::from_error)
//! ```

mod adapter;
mod cookie;
mod extract;
mod handlers;
mod outcome;

pub use adapter::{RequestAdapter, UploadedFile};
pub use cookie::{parse_cookie_header, SessionCookie};
pub use extract::ExtractMetadata;
pub use handlers::{App, Route, PROFILE_PATH};
pub use outcome::{Body, Page, Response, RouteKind};
