//! End-to-end tests for the web boundary.
//!
//! These drive `App::dispatch` the way framework glue would: build a
//! `RequestAdapter`, dispatch, then inspect the `Response`, the store and the
//! audit trail.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use session_core::audit::{AuditEventKind, AuditOutcome, AuditTrail};
use session_core::credential::{CredentialIssuer, SigningKey};
use session_core::store::{MemoryStore, StorageError, Store};
use session_core::web::{App, Body, Page, RequestAdapter, Response, UploadedFile};
use session_core::{Config, LikeToggle, Post, PostId, User, UserId, DEFAULT_PROFILE_PIC};

const KEY: &[u8] = b"web-integration-signing-key-0001";

fn config() -> Config {
    Config::new(SigningKey::new(KEY.to_vec()))
}

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn request(id: &str, token: Option<&str>) -> RequestAdapter {
    let mut req = RequestAdapter::new(id);
    if let Some(token) = token {
        req.add_cookie("token", token);
    }
    req
}

fn token_from(resp: &Response) -> String {
    let header = resp
        .set_cookie
        .as_ref()
        .expect("response sets a cookie")
        .header_value();
    let first = header.expose_secret().split(';').next().unwrap().to_string();
    first.split_once('=').unwrap().1.to_string()
}

fn register<S: Store>(app: &App<S>, username: &str) -> String {
    let mut req = RequestAdapter::new(format!("req-register-{}", username));
    req.add_form_field("username", username);
    req.add_form_field("name", username.to_uppercase());
    req.add_form_field("email", format!("{}@example.com", username));
    req.add_form_field("age", "30");
    req.add_form_field("password", format!("{}-password", username));

    let resp = app.dispatch("POST", "/register", req, now());
    assert_eq!(resp.status, 201);
    assert_eq!(resp.body, Body::Text("Registered Successfully".to_string()));
    token_from(&resp)
}

fn user_named<S: Store>(app: &App<S>, username: &str) -> User {
    app.store()
        .find_user_by_username(username)
        .unwrap()
        .expect("user exists")
}

fn create_post<S: Store>(app: &App<S>, token: &str, content: &str) -> Response {
    let mut req = request("req-create", Some(token));
    req.add_form_field("content", content);
    app.dispatch("POST", "/posts", req, now())
}

fn only_post_of<S: Store>(app: &App<S>, username: &str) -> Post {
    let user = user_named(app, username);
    let mut posts = app.store().posts_by_owner(&user.id).unwrap();
    assert_eq!(posts.len(), 1);
    posts.remove(0)
}

/// A store that counts every call before delegating.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Store for CountingStore {
    fn find_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        self.tick();
        self.inner.find_user(id)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        self.tick();
        self.inner.find_user_by_email(email)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        self.tick();
        self.inner.find_user_by_username(username)
    }

    fn find_post(&self, id: &PostId) -> Result<Option<Post>, StorageError> {
        self.tick();
        self.inner.find_post(id)
    }

    fn persist_user(&self, user: &User) -> Result<(), StorageError> {
        self.tick();
        self.inner.persist_user(user)
    }

    fn persist_post(&self, post: &Post) -> Result<(), StorageError> {
        self.tick();
        self.inner.persist_post(post)
    }

    fn posts_by_owner(&self, owner: &UserId) -> Result<Vec<Post>, StorageError> {
        self.tick();
        self.inner.posts_by_owner(owner)
    }

    fn all_posts(&self) -> Result<Vec<Post>, StorageError> {
        self.tick();
        self.inner.all_posts()
    }

    fn toggle_like(&self, post: &PostId, user: &UserId) -> Result<Option<LikeToggle>, StorageError> {
        self.tick();
        self.inner.toggle_like(post, user)
    }
}

/// A store whose post writes fail once `fail_posts` is set.
///
/// Keeps the default read-modify-write `toggle_like`.
#[derive(Default)]
struct FlakyPostStore {
    inner: MemoryStore,
    fail_posts: std::sync::atomic::AtomicBool,
}

impl Store for FlakyPostStore {
    fn find_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        self.inner.find_user(id)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        self.inner.find_user_by_email(email)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        self.inner.find_user_by_username(username)
    }

    fn find_post(&self, id: &PostId) -> Result<Option<Post>, StorageError> {
        self.inner.find_post(id)
    }

    fn persist_user(&self, user: &User) -> Result<(), StorageError> {
        self.inner.persist_user(user)
    }

    fn persist_post(&self, post: &Post) -> Result<(), StorageError> {
        if self.fail_posts.load(Ordering::SeqCst) {
            return Err(StorageError::new("write rejected"));
        }
        self.inner.persist_post(post)
    }

    fn posts_by_owner(&self, owner: &UserId) -> Result<Vec<Post>, StorageError> {
        self.inner.posts_by_owner(owner)
    }

    fn all_posts(&self) -> Result<Vec<Post>, StorageError> {
        self.inner.all_posts()
    }
}

#[test]
fn register_login_logout_flow() {
    let app = App::new(config(), MemoryStore::new());
    let token = register(&app, "alice");

    let alice = user_named(&app, "alice");
    assert_eq!(alice.age, Some(30));
    assert_eq!(alice.profile_pic, DEFAULT_PROFILE_PIC);
    assert!(alice.password_hash.starts_with("$argon2"));

    // The registration cookie already works.
    let resp = app.dispatch("GET", "/profile", request("req-p", Some(&token)), now());
    assert_eq!(resp.status, 200);

    let mut req = RequestAdapter::new("req-login");
    req.add_form_field("username", "alice");
    req.add_form_field("password", "alice-password");
    let resp = app.dispatch("POST", "/login", req, now());
    assert_eq!(resp.status, 302);
    assert_eq!(resp.location.as_deref(), Some("/profile"));
    let cookie = resp.set_cookie.as_ref().unwrap();
    assert_eq!(cookie.max_age_secs(), 7 * 24 * 60 * 60);
    let header = cookie.header_value();
    assert!(header.expose_secret().contains("HttpOnly"));
    assert!(header.expose_secret().contains("SameSite=Lax"));
    assert!(!header.expose_secret().contains("Secure"));

    let resp = app.dispatch("GET", "/logout", request("req-out", Some(&token)), now());
    assert_eq!(resp.status, 302);
    assert_eq!(resp.location.as_deref(), Some("/login"));
    assert!(resp.set_cookie.as_ref().unwrap().is_clearing());
}

#[test]
fn secure_cookie_in_production() {
    let mut config = config();
    config.cookie_secure = true;
    let app = App::new(config, MemoryStore::new());

    let mut req = RequestAdapter::new("req-reg");
    req.add_form_field("username", "sam");
    req.add_form_field("name", "Sam");
    req.add_form_field("email", "sam@example.com");
    req.add_form_field("password", "pw");
    let resp = app.dispatch("POST", "/register", req, now());

    let header = resp.set_cookie.unwrap().header_value();
    assert!(header.expose_secret().ends_with("; Secure"));
}

#[test]
fn duplicate_registration_is_rejected() {
    let app = App::new(config(), MemoryStore::new());
    register(&app, "alice");

    let mut req = RequestAdapter::new("req-dup");
    req.add_form_field("username", "alice2");
    req.add_form_field("name", "Alice Again");
    req.add_form_field("email", "alice@example.com");
    req.add_form_field("password", "pw");
    let resp = app.dispatch("POST", "/register", req, now());

    assert_eq!(resp.status, 400);
    assert_eq!(resp.body, Body::Text("User already exists".to_string()));
    assert_eq!(app.store().user_count(), 1);
}

#[test]
fn duplicate_email_differing_only_in_case_is_rejected() {
    let app = App::new(config(), MemoryStore::new());
    register(&app, "alice");

    let mut req = RequestAdapter::new("req-dup-case");
    req.add_form_field("username", "alice2");
    req.add_form_field("name", "Alice Again");
    req.add_form_field("email", "Alice@Example.com");
    req.add_form_field("password", "pw");
    let resp = app.dispatch("POST", "/register", req, now());

    assert_eq!(resp.status, 400);
    assert_eq!(resp.body, Body::Text("User already exists".to_string()));
    assert_eq!(app.store().user_count(), 1);
}

#[test]
fn registered_email_is_stored_lowercase() {
    let app = App::new(config(), MemoryStore::new());
    let mut req = RequestAdapter::new("req-mixed-case");
    req.add_form_field("username", "bob");
    req.add_form_field("name", "Bob");
    req.add_form_field("email", "Bob@Example.COM");
    req.add_form_field("password", "pw");
    assert_eq!(app.dispatch("POST", "/register", req, now()).status, 201);

    assert_eq!(user_named(&app, "bob").email, "bob@example.com");
}

#[test]
fn default_app_does_not_retain_audit_events() {
    let app = App::new(config(), MemoryStore::new());
    for i in 0..1_000 {
        let resp = app.dispatch("GET", "/profile", request(&format!("req-{}", i), None), now());
        assert_eq!(resp.status, 302);
    }
    assert!(app.audit().is_empty());
    assert_eq!(app.audit().capacity(), Some(0));
}

#[test]
fn bounded_audit_trail_caps_retention() {
    let app = App::new(config(), MemoryStore::new()).with_audit_trail(AuditTrail::bounded(8));
    for i in 0..100 {
        app.dispatch("GET", "/profile", request(&format!("req-{}", i), None), now());
    }
    let events = app.audit().events();
    assert_eq!(events.len(), 8);
    assert_eq!(events.last().unwrap().request_id(), "req-99");
}

#[test]
fn bad_login_looks_the_same_for_unknown_user_and_wrong_password() {
    let app = App::new(config(), MemoryStore::new());
    register(&app, "alice");

    let attempt = |username: &str, password: &str| {
        let mut req = RequestAdapter::new("req-bad-login");
        req.add_form_field("username", username);
        req.add_form_field("password", password);
        app.dispatch("POST", "/login", req, now())
    };

    let wrong_pw = attempt("alice", "nope");
    let unknown = attempt("mallory", "alice-password");

    for resp in [&wrong_pw, &unknown] {
        assert_eq!(resp.status, 401);
        assert_eq!(
            resp.body,
            Body::Text("Invalid username or password".to_string())
        );
        assert!(resp.set_cookie.is_none());
    }
}

#[test]
fn like_then_unlike_restores_empty_set() {
    let app = App::new(config(), MemoryStore::new()).with_audit_trail(AuditTrail::new());
    let owner = register(&app, "owner");
    let u1 = register(&app, "u1");
    assert_eq!(create_post(&app, &owner, "p1").status, 302);
    let p1 = only_post_of(&app, "owner");
    let u1_id = user_named(&app, "u1").id;
    assert!(p1.likes().is_empty());

    let path = format!("/like/{}", p1.id());

    let resp = app.dispatch("GET", &path, request("req-like-1", Some(&u1)), now());
    assert_eq!(resp.status, 302);
    let likes = app.store().find_post(&p1.id()).unwrap().unwrap().likes().clone();
    assert_eq!(likes.len(), 1);
    assert!(likes.contains(&u1_id));

    let resp = app.dispatch("GET", &path, request("req-like-2", Some(&u1)), now());
    assert_eq!(resp.status, 302);
    assert!(app
        .store()
        .find_post(&p1.id())
        .unwrap()
        .unwrap()
        .likes()
        .is_empty());

    let actions: Vec<String> = app
        .audit()
        .events()
        .iter()
        .filter(|e| e.kind() == AuditEventKind::StateChange)
        .filter_map(|e| e.action().map(str::to_string))
        .collect();
    assert_eq!(actions, vec!["create_post", "like", "unlike"]);
}

#[test]
fn like_on_missing_post_is_not_found() {
    let app = App::new(config(), MemoryStore::new());
    let token = register(&app, "u1");

    let path = format!("/like/{}", PostId::generate());
    let resp = app.dispatch("GET", &path, request("req-404", Some(&token)), now());
    assert_eq!(resp.status, 404);
    assert_eq!(resp.body, Body::Text("Post not found".to_string()));

    let resp = app.dispatch("GET", "/like/not-an-id", request("req-404b", Some(&token)), now());
    assert_eq!(resp.status, 404);
}

#[test]
fn no_cookie_is_unauthenticated_without_store_access() {
    let app = App::new(config(), CountingStore::default()).with_audit_trail(AuditTrail::new());
    let post = PostId::generate();

    let api = app.dispatch("GET", &format!("/like/{}", post), request("req-a", None), now());
    assert_eq!(api.status, 401);
    assert_eq!(api.body, Body::Text("Login required".to_string()));

    let page = app.dispatch("GET", "/profile", request("req-b", None), now());
    assert_eq!(page.status, 302);
    assert_eq!(page.location.as_deref(), Some("/login"));

    let mut req = request("req-c", None);
    req.add_form_field("content", "sneaky");
    let write = app.dispatch("POST", &format!("/update/{}", post), req, now());
    assert_eq!(write.status, 401);

    assert_eq!(app.store().calls(), 0);

    let denials: Vec<_> = app
        .audit()
        .events()
        .into_iter()
        .filter(|e| e.kind() == AuditEventKind::Authentication)
        .collect();
    assert_eq!(denials.len(), 3);
    assert!(denials
        .iter()
        .all(|e| e.outcome() == AuditOutcome::Denied && e.reason() == Some("Unauthenticated")));
}

#[test]
fn expired_credential_is_invalid_without_store_access() {
    let app = App::new(config(), CountingStore::default());
    let key = SigningKey::new(KEY.to_vec());
    let principal = session_core::Principal {
        id: UserId::generate(),
        email: "late@example.com".to_string(),
    };
    let issued = now() - TimeDelta::days(8);
    let cred = CredentialIssuer::new(&key).issue(&principal, issued).unwrap();

    let api = app.dispatch(
        "GET",
        &format!("/like/{}", PostId::generate()),
        request("req-exp-a", Some(cred.token())),
        now(),
    );
    assert_eq!(api.status, 401);
    assert_eq!(api.body, Body::Text("Invalid token".to_string()));

    // A page route does not redirect: the caller sent a credential, it is
    // just no good.
    let page = app.dispatch("GET", "/profile", request("req-exp-b", Some(cred.token())), now());
    assert_eq!(page.status, 401);
    assert!(page.location.is_none());

    assert_eq!(app.store().calls(), 0);
}

#[test]
fn foreign_key_credential_is_invalid() {
    let app = App::new(config(), MemoryStore::new());
    let other_key = SigningKey::new(b"some-other-deployment-key-000000".to_vec());
    let principal = session_core::Principal {
        id: UserId::generate(),
        email: "x@example.com".to_string(),
    };
    let cred = CredentialIssuer::new(&other_key).issue(&principal, now()).unwrap();

    let resp = app.dispatch("GET", "/profile", request("req-fk", Some(cred.token())), now());
    assert_eq!(resp.status, 401);
}

#[test]
fn failed_like_save_is_a_server_error() {
    let app = App::new(config(), FlakyPostStore::default()).with_audit_trail(AuditTrail::new());
    let owner = register(&app, "owner");
    let fan = register(&app, "fan");
    assert_eq!(create_post(&app, &owner, "p1").status, 302);
    let post = only_post_of(&app, "owner");

    app.store().fail_posts.store(true, Ordering::SeqCst);
    let resp = app.dispatch(
        "GET",
        &format!("/like/{}", post.id()),
        request("req-flaky", Some(&fan)),
        now(),
    );

    assert_eq!(resp.status, 500);
    assert_eq!(resp.body, Body::Text("Internal server error".to_string()));
    assert!(app
        .store()
        .find_post(&post.id())
        .unwrap()
        .unwrap()
        .likes()
        .is_empty());

    let last = app.audit().events().pop().unwrap();
    assert_eq!(last.action(), Some("toggle_like"));
    assert_eq!(last.outcome(), AuditOutcome::Error);
}

#[test]
fn non_owner_cannot_edit_or_update() {
    let app = App::new(config(), MemoryStore::new());
    let owner = register(&app, "owner");
    let intruder = register(&app, "intruder");
    create_post(&app, &owner, "original");
    let post = only_post_of(&app, "owner");

    let edit = app.dispatch(
        "GET",
        &format!("/posts/{}/edit", post.id()),
        request("req-e", Some(&intruder)),
        now(),
    );
    assert_eq!(edit.status, 403);
    assert_eq!(
        edit.body,
        Body::Text("Not authorized to edit this post".to_string())
    );

    let mut req = request("req-u", Some(&intruder));
    req.add_form_field("content", "defaced");
    let update = app.dispatch("POST", &format!("/update/{}", post.id()), req, now());
    assert_eq!(update.status, 403);
    assert_eq!(
        update.body,
        Body::Text("Not authorized to update this post".to_string())
    );

    // Ownership is decided before the content is looked at.
    let mut req = request("req-u2", Some(&intruder));
    req.add_form_field("content", "   ");
    let update = app.dispatch("POST", &format!("/update/{}", post.id()), req, now());
    assert_eq!(update.status, 403);

    let stored = app.store().find_post(&post.id()).unwrap().unwrap();
    assert_eq!(stored.content(), "original");
    assert_eq!(stored.owner(), post.owner());
}

#[test]
fn owner_edits_own_post() {
    let app = App::new(config(), MemoryStore::new());
    let owner = register(&app, "owner");
    create_post(&app, &owner, "first draft");
    let post = only_post_of(&app, "owner");

    let edit = app.dispatch(
        "GET",
        &format!("/posts/{}/edit", post.id()),
        request("req-e", Some(&owner)),
        now(),
    );
    assert_eq!(edit.status, 200);
    assert_eq!(edit.body, Body::Page(Page::Edit { post: post.clone() }));

    let mut req = request("req-u", Some(&owner));
    req.add_form_field("content", "   ");
    let empty = app.dispatch("POST", &format!("/update/{}", post.id()), req, now());
    assert_eq!(empty.status, 400);
    assert_eq!(empty.body, Body::Text("Content required".to_string()));

    let mut req = request("req-u", Some(&owner));
    req.add_form_field("content", "  final draft ");
    let update = app.dispatch("POST", &format!("/update/{}", post.id()), req, now());
    assert_eq!(update.status, 302);
    assert_eq!(
        app.store().find_post(&post.id()).unwrap().unwrap().content(),
        "final draft"
    );
}

#[test]
fn edit_of_missing_post_is_not_found() {
    let app = App::new(config(), MemoryStore::new());
    let token = register(&app, "owner");

    let resp = app.dispatch(
        "GET",
        &format!("/posts/{}/edit", PostId::generate()),
        request("req-e", Some(&token)),
        now(),
    );
    assert_eq!(resp.status, 404);
}

#[test]
fn create_post_validates_content() {
    let app = App::new(config(), MemoryStore::new());
    let token = register(&app, "writer");

    let empty = create_post(&app, &token, " \n ");
    assert_eq!(empty.status, 400);
    assert_eq!(empty.body, Body::Text("Post content required".to_string()));

    let too_long = create_post(&app, &token, &"x".repeat(2001));
    assert_eq!(too_long.status, 400);

    assert_eq!(app.store().post_count(), 0);

    assert_eq!(create_post(&app, &token, "line one\nline two").status, 302);
    let writer = user_named(&app, "writer");
    assert_eq!(writer.posts.len(), 1);
}

#[test]
fn profile_lists_own_posts_oldest_first() {
    let app = App::new(config(), MemoryStore::new());
    let token = register(&app, "alice");
    let other = register(&app, "bob");

    let mut req = request("req-1", Some(&token));
    req.add_form_field("content", "first");
    app.dispatch("POST", "/posts", req, now());
    let mut req = request("req-2", Some(&token));
    req.add_form_field("content", "second");
    app.dispatch("POST", "/posts", req, now() + TimeDelta::seconds(5));
    create_post(&app, &other, "not alice's");

    let resp = app.dispatch("GET", "/profile", request("req-p", Some(&token)), now());
    let Body::Page(Page::Profile { principal, user, posts }) = resp.body else {
        panic!("expected profile page");
    };
    assert_eq!(principal.id, user.id);
    assert_eq!(
        posts.iter().map(Post::content).collect::<Vec<_>>(),
        vec!["first", "second"]
    );
}

#[test]
fn feed_is_public_but_rejects_bad_cookies() {
    let app = App::new(config(), MemoryStore::new());
    let token = register(&app, "alice");
    create_post(&app, &token, "hello world");

    let anon = app.dispatch("GET", "/feed", request("req-f1", None), now());
    let Body::Page(Page::Feed { principal, posts }) = anon.body else {
        panic!("expected feed page");
    };
    assert!(principal.is_none());
    assert_eq!(posts.len(), 1);

    let authed = app.dispatch("GET", "/feed", request("req-f2", Some(&token)), now());
    let Body::Page(Page::Feed { principal, .. }) = authed.body else {
        panic!("expected feed page");
    };
    assert_eq!(principal.map(|p| p.email), Some("alice@example.com".to_string()));

    let bad = app.dispatch("GET", "/feed", request("req-f3", Some("garbage")), now());
    assert_eq!(bad.status, 401);
}

#[test]
fn upload_requires_an_image_file() {
    let app = App::new(config(), MemoryStore::new());
    let token = register(&app, "alice");

    let none = app.dispatch("POST", "/upload", request("req-u1", Some(&token)), now());
    assert_eq!(none.status, 400);
    assert_eq!(none.body, Body::Text("No file uploaded".to_string()));

    let mut req = request("req-u2", Some(&token));
    req.set_file(UploadedFile::new("../../etc/passwd", 10));
    let bad = app.dispatch("POST", "/upload", req, now());
    assert_eq!(bad.status, 400);
    assert_eq!(user_named(&app, "alice").profile_pic, DEFAULT_PROFILE_PIC);

    let mut req = request("req-u3", Some(&token));
    req.set_file(UploadedFile::new("3f2a9c.png", 2048));
    let ok = app.dispatch("POST", "/upload", req, now());
    assert_eq!(ok.status, 302);
    assert_eq!(ok.location.as_deref(), Some("/profile"));
    assert_eq!(user_named(&app, "alice").profile_pic, "3f2a9c.png");
}

#[test]
fn upload_page_requires_login() {
    let app = App::new(config(), MemoryStore::new());
    let resp = app.dispatch("GET", "/profile/upload", request("req-up", None), now());
    assert_eq!(resp.status, 302);

    let token = register(&app, "alice");
    let resp = app.dispatch("GET", "/profile/upload", request("req-up2", Some(&token)), now());
    assert_eq!(resp.body, Body::Page(Page::Upload));
}

#[test]
fn cookie_header_reaches_the_guard() {
    let app = App::new(config(), MemoryStore::new());
    let token = register(&app, "alice");

    let mut req = RequestAdapter::new("req-hdr");
    req.add_cookie_header(&format!("theme=dark; token={}; lang=en", token));
    let resp = app.dispatch("GET", "/profile", req, now());
    assert_eq!(resp.status, 200);
}

#[test]
fn deleted_user_profile_is_not_found() {
    let app = App::new(config(), MemoryStore::new());
    let key = SigningKey::new(KEY.to_vec());
    let ghost = session_core::Principal {
        id: UserId::generate(),
        email: "ghost@example.com".to_string(),
    };
    let cred = CredentialIssuer::new(&key).issue(&ghost, now()).unwrap();

    let resp = app.dispatch("GET", "/profile", request("req-ghost", Some(cred.token())), now());
    assert_eq!(resp.status, 404);
    assert_eq!(resp.body, Body::Text("User not found".to_string()));
}
