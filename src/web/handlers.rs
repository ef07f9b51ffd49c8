//! Route handlers.
//!
//! Every handler takes the request adapter and the current time, and returns
//! `Result<Response, Error>`. [`App::handle`] turns the error side into a
//! response through [`Response::from_error`], so the status for each error
//! kind is decided in one place.
//!
//! Guarded handlers authenticate first. Nothing touches the store until the
//! guard has produced a `Ctx<Authed>`, and the principal is read only from
//! that context.

use chrono::{DateTime, Utc};

use crate::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditTrail};
use crate::config::Config;
use crate::context::Ctx;
use crate::credential::CredentialIssuer;
use crate::error::{Error, Violation, ViolationKind};
use crate::guard::SessionGuard;
use crate::ids::PostId;
use crate::likes::LikeToggle;
use crate::logging::RequestLog;
use crate::model::{Post, User};
use crate::password::{hash_password, verify_login};
use crate::policy::authorize_edit_audited;
use crate::request::{Principal, RequestMeta};
use crate::sanitizer::{ImageFilenameSanitizer, SanitizationErrorKind, Sanitizer, TextSanitizer};
use crate::secret::Secret;
use crate::state::Authed;
use crate::store::Store;
use crate::tainted::Tainted;
use crate::verified::Verified;

use super::{ExtractMetadata, Page, RequestAdapter, Response, RouteKind, SessionCookie};

/// Where successful form posts land.
pub const PROFILE_PATH: &str = "/profile";

/// Every route the application serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `GET /`
    Index,
    /// `POST /register`
    Register,
    /// `GET /login`
    LoginPage,
    /// `POST /login`
    Login,
    /// `GET /logout`
    Logout,
    /// `GET /profile`
    Profile,
    /// `GET /feed`
    Feed,
    /// `GET /profile/upload`
    UploadPage,
    /// `POST /upload`
    Upload,
    /// `POST /posts`
    CreatePost,
    /// `GET /like/:id`
    ToggleLike,
    /// `GET /posts/:id/edit`
    EditPage,
    /// `POST /update/:id`
    UpdatePost,
}

impl Route {
    /// Matches a method and path, returning the route and its `:id`
    /// segment, if the route has one.
    ///
    /// ```
    /// use session_core::web::Route;
    ///
    /// assert_eq!(Route::resolve("GET", "/"), Some((Route::Index, None)));
    /// assert_eq!(
    ///     Route::resolve("GET", "/posts/abc/edit"),
    ///     Some((Route::EditPage, Some("abc".to_string())))
    /// );
    /// assert_eq!(Route::resolve("DELETE", "/profile"), None);
    /// ```
    pub fn resolve(method: &str, path: &str) -> Option<(Route, Option<String>)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let route = match (method, segments.as_slice()) {
            ("GET", []) => Route::Index,
            ("POST", ["register"]) => Route::Register,
            ("GET", ["login"]) => Route::LoginPage,
            ("POST", ["login"]) => Route::Login,
            ("GET", ["logout"]) => Route::Logout,
            ("GET", ["profile"]) => Route::Profile,
            ("GET", ["feed"]) => Route::Feed,
            ("GET", ["profile", "upload"]) => Route::UploadPage,
            ("POST", ["upload"]) => Route::Upload,
            ("POST", ["posts"]) => Route::CreatePost,
            ("GET", ["like", id]) => return Some((Route::ToggleLike, Some(id.to_string()))),
            ("GET", ["posts", id, "edit"]) => {
                return Some((Route::EditPage, Some(id.to_string())))
            }
            ("POST", ["update", id]) => return Some((Route::UpdatePost, Some(id.to_string()))),
            _ => return None,
        };
        Some((route, None))
    }

    /// How an authentication failure on this route is reported.
    pub fn kind(self) -> RouteKind {
        match self {
            Route::Index
            | Route::LoginPage
            | Route::Profile
            | Route::Feed
            | Route::UploadPage
            | Route::EditPage => RouteKind::Page,
            Route::Register
            | Route::Login
            | Route::Logout
            | Route::Upload
            | Route::CreatePost
            | Route::ToggleLike
            | Route::UpdatePost => RouteKind::Api,
        }
    }

    /// Short name used in logs and audit events.
    pub fn name(self) -> &'static str {
        match self {
            Route::Index => "index",
            Route::Register => "register",
            Route::LoginPage => "login_page",
            Route::Login => "login",
            Route::Logout => "logout",
            Route::Profile => "profile",
            Route::Feed => "feed",
            Route::UploadPage => "upload_page",
            Route::Upload => "upload_profile_pic",
            Route::CreatePost => "create_post",
            Route::ToggleLike => "toggle_like",
            Route::EditPage => "edit_page",
            Route::UpdatePost => "update_post",
        }
    }
}

/// The application: configuration, a store and an audit trail.
///
/// By default audit events are emitted through `tracing` and not kept in
/// memory; [`App::with_audit_trail`] opts into retention.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use session_core::credential::SigningKey;
/// use session_core::store::MemoryStore;
/// use session_core::web::{App, RequestAdapter};
/// use session_core::Config;
///
/// let app = App::new(Config::new(SigningKey::new(vec![5u8; 32])), MemoryStore::new());
///
/// let resp = app.dispatch("GET", "/profile", RequestAdapter::new("req-1"), Utc::now());
/// assert_eq!(resp.status, 302);
/// assert_eq!(resp.location.as_deref(), Some("/login"));
/// ```
#[derive(Debug)]
pub struct App<S> {
    config: Config,
    store: S,
    audit: AuditTrail,
}

impl<S: Store> App<S> {
    /// Creates an application whose audit events go to `tracing` only.
    pub fn new(config: Config, store: S) -> Self {
        Self {
            config,
            store,
            audit: AuditTrail::emit_only(),
        }
    }

    /// Replaces the audit trail, e.g. with one that retains events.
    pub fn with_audit_trail(mut self, audit: AuditTrail) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the audit trail.
    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    /// Resolves `method` and `path`, then runs the route.
    ///
    /// Unknown routes get a plain 404.
    pub fn dispatch(
        &self,
        method: &str,
        path: &str,
        mut req: RequestAdapter,
        now: DateTime<Utc>,
    ) -> Response {
        match Route::resolve(method, path) {
            Some((route, id)) => {
                if let Some(id) = id {
                    req.add_path_param("id", id);
                }
                self.handle(route, &req, now)
            }
            None => Response::text(404, "Not found"),
        }
    }

    /// Runs one route and maps any error to its response.
    pub fn handle(&self, route: Route, req: &RequestAdapter, now: DateTime<Utc>) -> Response {
        let result = match route {
            Route::Index => self.index(req),
            Route::Register => self.register(req, now),
            Route::LoginPage => self.login_page(req),
            Route::Login => self.login(req, now),
            Route::Logout => self.logout(req),
            Route::Profile => self.profile(req, now),
            Route::Feed => self.feed(req, now),
            Route::UploadPage => self.upload_page(req, now),
            Route::Upload => self.upload_profile_pic(req, now),
            Route::CreatePost => self.create_post(req, now),
            Route::ToggleLike => self.toggle_like(req, now),
            Route::EditPage => self.edit_page(req, now),
            Route::UpdatePost => self.update_post(req, now),
        };

        result.unwrap_or_else(|err| {
            let response = Response::from_error(&err, route.kind(), &self.config.login_path);
            let log = RequestLog::new(req.request_id(), None);
            if response.is_server_error() {
                log.error(format_args!("{} failed: {}", route.name(), err));
            } else {
                log.info(format_args!(
                    "{} refused with {}: {}",
                    route.name(),
                    response.status,
                    err
                ));
            }
            response
        })
    }

    /// `GET /`
    pub fn index(&self, req: &RequestAdapter) -> Result<Response, Error> {
        let ctx = self.guard().anonymous(self.meta(req));
        ctx.log().debug(format_args!("serving index"));
        Ok(Response::page(Page::Index))
    }

    /// `POST /register`
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a missing password or a bad field
    /// - `Conflict` when the email or username is taken
    pub fn register(&self, req: &RequestAdapter, now: DateTime<Utc>) -> Result<Response, Error> {
        let ctx = self.guard().anonymous(self.meta(req));

        let password = req
            .password_field("password")
            .filter(|p| !p.expose_secret().is_empty())
            .ok_or_else(|| Violation::invalid_input("Password is required"))?;

        let field = TextSanitizer::field();
        let email = sanitize_field(req, "email", &field)?
            .into_inner()
            .to_lowercase();
        let username = sanitize_field(req, "username", &field)?.into_inner();
        let name = sanitize_field(req, "name", &field)?.into_inner();
        let age = parse_age(req.form_field("age"))?;

        if self.store.find_user_by_email(&email)?.is_some()
            || self.store.find_user_by_username(&username)?.is_some()
        {
            self.audit.record(
                AuditEvent::new(
                    ctx.request_id(),
                    None::<String>,
                    AuditEventKind::Authentication,
                    AuditOutcome::Denied,
                )
                .with_action("register")
                .with_reason(ViolationKind::Conflict.to_string()),
            );
            return Err(Violation::new(ViolationKind::Conflict, "User already exists").into());
        }

        let user = User::new(username, name, age, email, hash_password(&password)?);
        self.store.persist_user(&user)?;

        let cookie = self.issue_cookie(&user.principal(), now)?;
        self.audit.record(
            AuditEvent::new(
                ctx.request_id(),
                Some(user.id.to_string()),
                AuditEventKind::Authentication,
                AuditOutcome::Success,
            )
            .with_action("register"),
        );
        ctx.log().info(format_args!("registered user {}", user.id));

        Ok(Response::text(201, "Registered Successfully").with_cookie(cookie))
    }

    /// `GET /login`
    pub fn login_page(&self, req: &RequestAdapter) -> Result<Response, Error> {
        let ctx = self.guard().anonymous(self.meta(req));
        ctx.log().debug(format_args!("serving login page"));
        Ok(Response::page(Page::Login))
    }

    /// `POST /login`
    ///
    /// An unknown username and a wrong password fail identically, and both
    /// run an Argon2 verification.
    ///
    /// # Errors
    ///
    /// Returns `BadLogin` when the credentials do not match.
    pub fn login(&self, req: &RequestAdapter, now: DateTime<Utc>) -> Result<Response, Error> {
        let ctx = self.guard().anonymous(self.meta(req));

        let username = req
            .form_field("username")
            .and_then(|u| TextSanitizer::field().sanitize(u).ok());
        let password = req
            .password_field("password")
            .unwrap_or_else(|| Secret::new(String::new()));

        let user = match username {
            Some(username) => self.store.find_user_by_username(&username.into_inner())?,
            None => None,
        };
        let matched = verify_login(user.as_ref().map(|u| u.password_hash.as_str()), &password);
        let user = user.filter(|_| matched);

        let Some(user) = user else {
            self.audit.record(
                AuditEvent::new(
                    ctx.request_id(),
                    None::<String>,
                    AuditEventKind::Authentication,
                    AuditOutcome::Denied,
                )
                .with_action("login")
                .with_reason(ViolationKind::BadLogin.to_string()),
            );
            ctx.log().warn(format_args!("login rejected"));
            return Err(
                Violation::new(ViolationKind::BadLogin, "Invalid username or password").into(),
            );
        };

        let cookie = self.issue_cookie(&user.principal(), now)?;
        self.audit.record(
            AuditEvent::new(
                ctx.request_id(),
                Some(user.id.to_string()),
                AuditEventKind::Authentication,
                AuditOutcome::Success,
            )
            .with_action("login"),
        );
        ctx.log().info(format_args!("user {} logged in", user.id));

        Ok(Response::redirect(PROFILE_PATH).with_cookie(cookie))
    }

    /// `GET /logout`
    ///
    /// Clears the cookie whether or not the caller was logged in.
    pub fn logout(&self, req: &RequestAdapter) -> Result<Response, Error> {
        let ctx = self.guard().anonymous(self.meta(req));
        self.audit.record(
            AuditEvent::new(
                ctx.request_id(),
                None::<String>,
                AuditEventKind::SessionLifecycle,
                AuditOutcome::Success,
            )
            .with_action("logout"),
        );
        ctx.log().info(format_args!("session cookie cleared"));
        Ok(Response::redirect(self.config.login_path.clone())
            .with_cookie(SessionCookie::clear(&self.config)))
    }

    /// `GET /profile`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the principal's user record is gone.
    pub fn profile(&self, req: &RequestAdapter, now: DateTime<Utc>) -> Result<Response, Error> {
        let ctx = self.authenticate(req, now)?;
        let user = self.current_user(&ctx)?;
        let posts = self.store.posts_by_owner(&user.id)?;

        Ok(Response::page(Page::Profile {
            principal: ctx.principal().clone(),
            user,
            posts,
        }))
    }

    /// `GET /feed`
    ///
    /// Open to anonymous callers; a cookie that is present must still verify.
    pub fn feed(&self, req: &RequestAdapter, now: DateTime<Utc>) -> Result<Response, Error> {
        let ctx = self.guard().authenticate_optional(self.meta(req), now)?;
        let posts = self.store.all_posts()?;

        Ok(Response::page(Page::Feed {
            principal: ctx.map(|c| c.principal().clone()),
            posts,
        }))
    }

    /// `GET /profile/upload`
    pub fn upload_page(&self, req: &RequestAdapter, now: DateTime<Utc>) -> Result<Response, Error> {
        self.authenticate(req, now)?;
        Ok(Response::page(Page::Upload))
    }

    /// `POST /upload`
    ///
    /// # Errors
    ///
    /// - `NotFound` if the principal's user record is gone
    /// - `InvalidInput` if no file arrived or its name is not an image name
    pub fn upload_profile_pic(
        &self,
        req: &RequestAdapter,
        now: DateTime<Utc>,
    ) -> Result<Response, Error> {
        let ctx = self.authenticate(req, now)?;
        let mut user = self.current_user(&ctx)?;

        let file = req
            .file()
            .ok_or_else(|| Violation::invalid_input("No file uploaded"))?;
        let stored = ImageFilenameSanitizer.sanitize(file.stored_name())?;

        user.profile_pic = stored.into_inner();
        self.store.persist_user(&user)?;

        self.record_change(&ctx, "upload_profile_pic", user.id.to_string());
        Ok(Response::redirect(PROFILE_PATH))
    }

    /// `POST /posts`
    ///
    /// # Errors
    ///
    /// - `NotFound` if the principal's user record is gone
    /// - `InvalidInput` for empty, oversized or control-character content
    pub fn create_post(&self, req: &RequestAdapter, now: DateTime<Utc>) -> Result<Response, Error> {
        let ctx = self.authenticate(req, now)?;
        let mut user = self.current_user(&ctx)?;
        let content = sanitize_content(req, "Post content required")?;

        let post = Post::new(user.id, content, now);
        self.store.persist_post(&post)?;
        user.posts.push(post.id());
        self.store.persist_user(&user)?;

        self.record_change(&ctx, "create_post", post.id().to_string());
        ctx.log().info(format_args!("created post {}", post.id()));
        Ok(Response::redirect(PROFILE_PATH))
    }

    /// `GET /like/:id`
    ///
    /// A failed save is reported as a server error; the toggle is not
    /// retried.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown or non-canonical post id
    /// - `Storage` when the store fails
    pub fn toggle_like(&self, req: &RequestAdapter, now: DateTime<Utc>) -> Result<Response, Error> {
        let ctx = self.authenticate(req, now)?;
        let post_id = post_id_param(req)?;

        let toggled = match self.store.toggle_like(&post_id, &ctx.principal().id) {
            Ok(Some(toggled)) => toggled,
            Ok(None) => return Err(post_not_found().into()),
            Err(e) => {
                self.audit.record(
                    AuditEvent::new(
                        ctx.request_id(),
                        Some(ctx.principal().id.to_string()),
                        AuditEventKind::StateChange,
                        AuditOutcome::Error,
                    )
                    .with_action("toggle_like")
                    .with_resource_id(post_id.to_string()),
                );
                return Err(e.into());
            }
        };

        let action = match toggled {
            LikeToggle::Liked => "like",
            LikeToggle::Unliked => "unlike",
        };
        self.record_change(&ctx, action, post_id.to_string());
        Ok(Response::redirect(PROFILE_PATH))
    }

    /// `GET /posts/:id/edit`
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown post
    /// - `Forbidden` if the caller does not own it
    pub fn edit_page(&self, req: &RequestAdapter, now: DateTime<Utc>) -> Result<Response, Error> {
        let ctx = self.authenticate(req, now)?;
        let post = self.find_post(req)?;
        authorize_edit_audited(&ctx, &post, "edit_post", &self.audit)?;

        Ok(Response::page(Page::Edit { post }))
    }

    /// `POST /update/:id`
    ///
    /// Ownership is checked before the new content is looked at.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown post
    /// - `Forbidden` if the caller does not own it
    /// - `InvalidInput` for empty, oversized or control-character content
    pub fn update_post(&self, req: &RequestAdapter, now: DateTime<Utc>) -> Result<Response, Error> {
        let ctx = self.authenticate(req, now)?;
        let mut post = self.find_post(req)?;
        let cap = authorize_edit_audited(&ctx, &post, "update_post", &self.audit)
            .map_err(|v| Violation::new(v.kind, "Not authorized to update this post"))?;

        let content = sanitize_content(req, "Content required")?;
        post.edit_content(&cap, content)?;
        self.store.persist_post(&post)?;

        self.record_change(&ctx, "update_post", post.id().to_string());
        Ok(Response::redirect(PROFILE_PATH))
    }

    fn guard(&self) -> SessionGuard<'_> {
        SessionGuard::new(self.config.signing_key()).with_audit(&self.audit)
    }

    fn meta(&self, req: &RequestAdapter) -> RequestMeta {
        req.extract_metadata(&self.config.cookie_name)
    }

    fn authenticate(&self, req: &RequestAdapter, now: DateTime<Utc>) -> Result<Ctx<Authed>, Error> {
        Ok(self.guard().authenticate(self.meta(req), now)?)
    }

    fn issue_cookie(&self, principal: &Principal, now: DateTime<Utc>) -> Result<SessionCookie, Error> {
        let credential = CredentialIssuer::new(self.config.signing_key())
            .with_ttl(self.config.session_ttl)
            .issue(principal, now)?;
        Ok(SessionCookie::issue(&self.config, &credential))
    }

    fn current_user(&self, ctx: &Ctx<Authed>) -> Result<User, Error> {
        self.store
            .find_user(&ctx.principal().id)?
            .ok_or_else(|| Violation::not_found("User not found").into())
    }

    fn find_post(&self, req: &RequestAdapter) -> Result<Post, Error> {
        let id = post_id_param(req)?;
        self.store
            .find_post(&id)?
            .ok_or_else(|| post_not_found().into())
    }

    fn record_change(&self, ctx: &Ctx<Authed>, action: &str, resource_id: String) {
        self.audit.record(
            AuditEvent::new(
                ctx.request_id(),
                Some(ctx.principal().id.to_string()),
                AuditEventKind::StateChange,
                AuditOutcome::Success,
            )
            .with_action(action)
            .with_resource_id(resource_id),
        );
    }
}

fn post_not_found() -> Violation {
    Violation::not_found("Post not found")
}

fn post_id_param(req: &RequestAdapter) -> Result<PostId, Violation> {
    req.path_param("id")
        .and_then(|raw| PostId::parse(&raw.into_inner()))
        .ok_or_else(post_not_found)
}

fn sanitize_field(
    req: &RequestAdapter,
    key: &str,
    sanitizer: &TextSanitizer,
) -> Result<Verified<String>, Violation> {
    let raw = req
        .form_field(key)
        .unwrap_or_else(|| Tainted::new(String::new()));
    sanitizer
        .sanitize(raw)
        .map_err(|e| Violation::invalid_input(format!("{}: {}", key, e.message())))
}

fn sanitize_content(req: &RequestAdapter, empty_message: &str) -> Result<Verified<String>, Violation> {
    let raw = req
        .form_field("content")
        .unwrap_or_else(|| Tainted::new(String::new()));
    TextSanitizer::post_content().sanitize(raw).map_err(|e| {
        if e.kind() == SanitizationErrorKind::Empty {
            Violation::invalid_input(empty_message)
        } else {
            Violation::from(e)
        }
    })
}

fn parse_age(raw: Option<Tainted<String>>) -> Result<Option<u32>, Violation> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match TextSanitizer::single_line(3).sanitize(raw) {
        Ok(age) => age
            .into_inner()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| Violation::invalid_input("age: must be a whole number")),
        Err(e) if e.kind() == SanitizationErrorKind::Empty => Ok(None),
        Err(_) => Err(Violation::invalid_input("age: must be a whole number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::SigningKey;
    use crate::store::MemoryStore;
    use crate::web::Body;

    fn app() -> App<MemoryStore> {
        App::new(
            Config::new(SigningKey::new(b"handlers-test-key-handlers-test!".to_vec())),
            MemoryStore::new(),
        )
    }

    fn form(pairs: &[(&str, &str)]) -> RequestAdapter {
        let mut req = RequestAdapter::new("req-h");
        for (k, v) in pairs {
            req.add_form_field(*k, *v);
        }
        req
    }

    #[test]
    fn routes_resolve_with_ids() {
        assert_eq!(Route::resolve("POST", "/register"), Some((Route::Register, None)));
        assert_eq!(
            Route::resolve("GET", "/like/xyz/"),
            Some((Route::ToggleLike, Some("xyz".to_string())))
        );
        assert_eq!(
            Route::resolve("POST", "/update/xyz"),
            Some((Route::UpdatePost, Some("xyz".to_string())))
        );
        assert_eq!(Route::resolve("GET", "/update/xyz"), None);
        assert_eq!(Route::resolve("GET", "/posts/a/b"), None);
    }

    #[test]
    fn page_and_api_routes_are_split() {
        assert_eq!(Route::Profile.kind(), RouteKind::Page);
        assert_eq!(Route::EditPage.kind(), RouteKind::Page);
        assert_eq!(Route::ToggleLike.kind(), RouteKind::Api);
        assert_eq!(Route::UpdatePost.kind(), RouteKind::Api);
    }

    #[test]
    fn register_requires_password() {
        let app = app();
        let resp = app.handle(
            Route::Register,
            &form(&[("email", "a@example.com"), ("username", "a"), ("name", "A")]),
            Utc::now(),
        );
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body, Body::Text("Password is required".to_string()));
        assert_eq!(app.store().user_count(), 0);
    }

    #[test]
    fn register_rejects_bad_age() {
        let app = app();
        let resp = app.handle(
            Route::Register,
            &form(&[
                ("email", "a@example.com"),
                ("username", "a"),
                ("name", "A"),
                ("password", "pw"),
                ("age", "old"),
            ]),
            Utc::now(),
        );
        assert_eq!(resp.status, 400);
    }

    #[test]
    fn blank_age_is_absent() {
        assert_eq!(parse_age(None).unwrap(), None);
        assert_eq!(parse_age(Some(Tainted::new("  ".into()))).unwrap(), None);
        assert_eq!(parse_age(Some(Tainted::new(" 42 ".into()))).unwrap(), Some(42));
        assert!(parse_age(Some(Tainted::new("-1".into()))).is_err());
    }

    #[test]
    fn bad_post_id_is_not_found() {
        let mut req = RequestAdapter::new("req-id");
        req.add_path_param("id", "NOT-A-UUID");
        assert_eq!(post_id_param(&req).unwrap_err().kind, ViolationKind::NotFound);

        let upper = PostId::generate().to_string().to_uppercase();
        let mut req = RequestAdapter::new("req-id");
        req.add_path_param("id", upper);
        assert_eq!(post_id_param(&req).unwrap_err().kind, ViolationKind::NotFound);
    }

    #[test]
    fn empty_content_uses_route_message() {
        let req = form(&[("content", "   ")]);
        let err = sanitize_content(&req, "Content required").unwrap_err();
        assert_eq!(err.kind, ViolationKind::InvalidInput);
        assert_eq!(err.message, "Content required");
    }

    #[test]
    fn every_failed_login_runs_argon2() {
        use crate::password::counter;

        let app = app();
        let registered = app.handle(
            Route::Register,
            &form(&[
                ("email", "a@example.com"),
                ("username", "alice"),
                ("name", "A"),
                ("password", "right"),
            ]),
            Utc::now(),
        );
        assert_eq!(registered.status, 201);

        for attempt in [
            form(&[("username", "alice"), ("password", "wrong")]),
            form(&[("username", "nobody"), ("password", "wrong")]),
            form(&[("username", "nobody")]),
            form(&[("password", "wrong")]),
        ] {
            let before = counter::verifications();
            let resp = app.handle(Route::Login, &attempt, Utc::now());
            assert_eq!(resp.status, 401);
            assert_eq!(counter::verifications() - before, 1);
        }
    }

    #[test]
    fn unknown_route_is_404() {
        let resp = app().dispatch("GET", "/admin", RequestAdapter::new("r"), Utc::now());
        assert_eq!(resp.status, 404);
    }

    #[test]
    fn public_pages_render_without_cookie() {
        let app = app();
        for (route, page) in [(Route::Index, Page::Index), (Route::LoginPage, Page::Login)] {
            let resp = app.handle(route, &RequestAdapter::new("r"), Utc::now());
            assert_eq!(resp.status, 200);
            assert_eq!(resp.body, Body::Page(page));
        }
    }
}
