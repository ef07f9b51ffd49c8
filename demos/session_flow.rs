//! Session flow demonstration.
//!
//! This demo walks one browser session through the app:
//! 1. Register and receive a session cookie
//! 2. Post, like and unlike through guarded routes
//! 3. Watch an intruder get refused on someone else's post
//! 4. Present an expired cookie and a missing cookie
//! 5. Dump the audit trail
//!
//! Run with: `cargo run --example session_flow`

use chrono::{TimeDelta, Utc};
use session_core::audit::AuditTrail;
use session_core::credential::SigningKey;
use session_core::store::{MemoryStore, Store};
use session_core::web::{App, RequestAdapter, Response};
use session_core::Config;
use tracing::Level;

fn register(app: &App<MemoryStore>, username: &str) -> String {
    let mut req = RequestAdapter::new(format!("req-register-{}", username));
    req.add_form_field("username", username);
    req.add_form_field("name", username);
    req.add_form_field("email", format!("{}@example.com", username));
    req.add_form_field("password", "correct horse battery staple");

    let resp = app.dispatch("POST", "/register", req, Utc::now());
    show("POST /register", &resp);

    // Pull the token back out of the Set-Cookie header, as a browser would.
    let header = resp
        .set_cookie
        .map(|c| c.header_value().expose_secret().clone())
        .unwrap_or_default();
    header
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

fn with_cookie(id: &str, token: &str) -> RequestAdapter {
    let mut req = RequestAdapter::new(id);
    req.add_cookie_header(&format!("token={}", token));
    req
}

fn show(label: &str, resp: &Response) {
    match &resp.location {
        Some(to) => println!("{:<28} -> {} (to {})", label, resp.status, to),
        None => println!("{:<28} -> {}", label, resp.status),
    }
}

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::WARN).init();

    println!("=== Session Flow Demo ===\n");

    let config = Config::from_env().unwrap_or_else(|_| {
        println!("(SESSION_SECRET not set, using a throwaway demo key)\n");
        Config::new(SigningKey::new(b"demo-only-signing-key-not-secret".to_vec()))
    });
    let app = App::new(config, MemoryStore::new()).with_audit_trail(AuditTrail::bounded(256));

    // Scenario 1: Registration
    println!("--- Scenario 1: Registration ---");
    let alice = register(&app, "alice");
    let mallory = register(&app, "mallory");

    // Scenario 2: Posting and liking
    println!("\n--- Scenario 2: Posting and liking ---");
    let mut req = with_cookie("req-post", &alice);
    req.add_form_field("content", "Hello from alice");
    show("POST /posts", &app.dispatch("POST", "/posts", req, Utc::now()));

    let Some(post) = app
        .store()
        .all_posts()
        .ok()
        .and_then(|posts| posts.into_iter().next())
    else {
        println!("post was not stored");
        return;
    };
    let like = format!("/like/{}", post.id());
    show(
        "GET /like/:id (mallory)",
        &app.dispatch("GET", &like, with_cookie("req-like-1", &mallory), Utc::now()),
    );
    show(
        "GET /like/:id (mallory)",
        &app.dispatch("GET", &like, with_cookie("req-like-2", &mallory), Utc::now()),
    );

    // Scenario 3: Ownership
    println!("\n--- Scenario 3: Ownership ---");
    let mut req = with_cookie("req-deface", &mallory);
    req.add_form_field("content", "defaced");
    show(
        "POST /update/:id (mallory)",
        &app.dispatch("POST", &format!("/update/{}", post.id()), req, Utc::now()),
    );
    let mut req = with_cookie("req-edit", &alice);
    req.add_form_field("content", "Hello from alice, edited");
    show(
        "POST /update/:id (alice)",
        &app.dispatch("POST", &format!("/update/{}", post.id()), req, Utc::now()),
    );

    // Scenario 4: Bad sessions
    println!("\n--- Scenario 4: Bad sessions ---");
    let next_week = Utc::now() + TimeDelta::days(8);
    show(
        "GET /profile (expired)",
        &app.dispatch("GET", "/profile", with_cookie("req-late", &alice), next_week),
    );
    show(
        "GET /profile (no cookie)",
        &app.dispatch("GET", "/profile", RequestAdapter::new("req-anon"), Utc::now()),
    );

    // Scenario 5: Audit trail
    println!("\n--- Scenario 5: Audit trail ---");
    for event in app.audit().events() {
        println!("  {}", event);
    }
}
