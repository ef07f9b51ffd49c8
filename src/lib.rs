//! Session and authorization core for a small social app.
//!
//! This crate verifies who a request comes from and whether that caller may
//! touch a resource:
//! - **Credentials**: signed, time-limited session tokens carried in a cookie
//! - **Session guard**: the only way to obtain an authenticated [`Ctx`]
//! - **Ownership**: [`authorize_edit`] yields the [`EditCap`] a post edit requires
//! - **Likes**: a per-post set of users with an idempotent toggle
//! - **Taint tracking**: form input is [`Tainted`] until a [`Sanitizer`] verifies it
//!
//! The [`web`] module wires all of this into handlers for every route,
//! independent of any HTTP framework.
//!
//! # Core Types
//!
//! - [`Secret<T>`]: Wrapper that redacts tokens and passwords in logs
//! - [`SessionGuard`]: Verifies the session credential and builds `Ctx<Authed>`
//! - [`Ctx`]: Request-scoped context, typed by authentication state
//! - [`Violation`]: Why a request was refused, with a [`ViolationKind`]
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use session_core::credential::{CredentialIssuer, SigningKey};
//! use session_core::{authorize_edit, Post, Principal, RequestMeta, SessionGuard};
//! use session_core::{Sanitizer, Tainted, TextSanitizer, UserId, ViolationKind};
//!
//! let key = SigningKey::new(b"an-example-signing-key-of-32-b!!".to_vec());
//! let alice = Principal { id: UserId::generate(), email: "alice@example.com".into() };
//! let now = Utc::now();
//!
//! // Login issues a credential; the client sends it back as a cookie.
//! let credential = CredentialIssuer::new(&key).issue(&alice, now).unwrap();
//!
//! // Every guarded request goes through the guard first.
//! let ctx = SessionGuard::new(&key)
//!     .authenticate(RequestMeta::with_token("req-1", credential.token()), now)
//!     .unwrap();
//!
//! let content = TextSanitizer::post_content()
//!     .sanitize(Tainted::new("hello".to_string()))
//!     .unwrap();
//! let mut post = Post::new(ctx.principal().id, content, now);
//!
//! // The owner may edit; the capability is the proof.
//! let cap = authorize_edit(&ctx, &post).unwrap();
//! let edited = TextSanitizer::post_content()
//!     .sanitize(Tainted::new("hello, edited".to_string()))
//!     .unwrap();
//! post.edit_content(&cap, edited).unwrap();
//!
//! // Someone else's post is off limits.
//! let other = Post::new(UserId::generate(), TextSanitizer::post_content()
//!     .sanitize(Tainted::new("not yours".to_string()))
//!     .unwrap(), now);
//! assert_eq!(authorize_edit(&ctx, &other).unwrap_err().kind, ViolationKind::Forbidden);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
mod capability;
mod config;
mod context;
pub mod credential;
mod error;
mod guard;
mod ids;
mod likes;
mod logging;
mod model;
mod password;
mod policy;
mod request;
mod sanitizer;
mod secret;
mod state;
pub mod store;
mod tainted;
mod verified;
pub mod web;

pub use capability::EditCap;
pub use config::{
    Config, ConfigError, DEFAULT_COOKIE_NAME, DEFAULT_LOGIN_PATH, MIN_SECRET_LEN,
};
pub use context::Ctx;
pub use error::{Error, Violation, ViolationKind};
pub use guard::SessionGuard;
pub use ids::{PostId, UserId};
pub use likes::{LikeSet, LikeToggle};
pub use logging::RequestLog;
pub use model::{Post, User, DEFAULT_PROFILE_PIC};
pub use password::{hash_password, verify_login, verify_password, PasswordError};
pub use policy::{authorize_edit, authorize_edit_audited};
pub use request::{Principal, RequestMeta};
pub use sanitizer::{
    ImageFilenameSanitizer, SanitizationError, SanitizationErrorKind, Sanitizer, TextSanitizer,
    IMAGE_EXTENSIONS, MAX_FIELD_LEN, MAX_POST_LEN,
};
pub use secret::Secret;
pub use state::{Anonymous, Authed};
pub use tainted::Tainted;
pub use verified::Verified;
