//! Transport outcomes and the single error-to-status table.

use crate::error::{Error, ViolationKind};
use crate::model::{Post, User};
use crate::request::Principal;

use super::SessionCookie;

/// How a route reports an authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Browser navigation: an anonymous caller is redirected to log in
    Page,
    /// Form posts and actions: an anonymous caller gets a 401
    Api,
}

/// A page for the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Landing page with the registration form
    Index,
    /// Login form
    Login,
    /// Profile picture upload form
    Upload,
    /// The caller's profile and posts
    Profile {
        /// Who is looking
        principal: Principal,
        /// The stored user record
        user: User,
        /// The user's posts, oldest first
        posts: Vec<Post>,
    },
    /// Every post, newest first
    Feed {
        /// The caller, if a session cookie was sent
        principal: Option<Principal>,
        /// Posts to show
        posts: Vec<Post>,
    },
    /// Edit form for a post the caller owns
    Edit {
        /// The post being edited
        post: Post,
    },
}

/// Response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// No body (redirects)
    Empty,
    /// Plain text
    Text(String),
    /// A page to render
    Page(Page),
}

/// What the transport should send back.
#[derive(Debug)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// `Location` header for redirects
    pub location: Option<String>,
    /// `Set-Cookie` instruction, if the session changes
    pub set_cookie: Option<SessionCookie>,
    /// Body
    pub body: Body,
}

impl Response {
    /// 200 with a page to render.
    pub fn page(page: Page) -> Self {
        Self {
            status: 200,
            location: None,
            set_cookie: None,
            body: Body::Page(page),
        }
    }

    /// A plain-text response.
    pub fn text(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            location: None,
            set_cookie: None,
            body: Body::Text(message.into()),
        }
    }

    /// 302 to `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            status: 302,
            location: Some(location.into()),
            set_cookie: None,
            body: Body::Empty,
        }
    }

    /// Attaches a `Set-Cookie` instruction.
    pub fn with_cookie(mut self, cookie: SessionCookie) -> Self {
        self.set_cookie = Some(cookie);
        self
    }

    /// Maps an error to its response.
    ///
    /// | error               | page route          | api route |
    /// |---------------------|---------------------|-----------|
    /// | `Unauthenticated`   | 302 to `login_path` | 401       |
    /// | `InvalidCredential` | 401                 | 401       |
    /// | `BadLogin`          | 401                 | 401       |
    /// | `Forbidden`         | 403                 | 403       |
    /// | `NotFound`          | 404                 | 404       |
    /// | `InvalidInput`      | 400                 | 400       |
    /// | `Conflict`          | 400                 | 400       |
    /// | anything else       | 500                 | 500       |
    ///
    /// Server errors carry a fixed body; the underlying message goes to the
    /// log, not to the client.
    pub fn from_error(err: &Error, kind: RouteKind, login_path: &str) -> Self {
        let Error::Violation(violation) = err else {
            return Self::text(500, "Internal server error");
        };

        match (violation.kind, kind) {
            (ViolationKind::Unauthenticated, RouteKind::Page) => Self::redirect(login_path),
            (ViolationKind::Unauthenticated, RouteKind::Api) => Self::text(401, "Login required"),
            (ViolationKind::InvalidCredential, _) => Self::text(401, "Invalid token"),
            (ViolationKind::BadLogin, _) => Self::text(401, violation.message.clone()),
            (ViolationKind::Forbidden, _) => Self::text(403, violation.message.clone()),
            (ViolationKind::NotFound, _) => Self::text(404, violation.message.clone()),
            (ViolationKind::InvalidInput | ViolationKind::Conflict, _) => {
                Self::text(400, violation.message.clone())
            }
        }
    }

    /// Whether the status is 5xx.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}
