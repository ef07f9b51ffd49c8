//! Ownership authorization.
//!
//! Authentication says who the caller is; this module decides whether that
//! caller may mutate a particular post. The two fail differently: a missing
//! or bad credential is `Unauthenticated`/`InvalidCredential`, a valid
//! credential for the wrong user is `Forbidden`.

use crate::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditTrail};
use crate::capability::EditCap;
use crate::context::Ctx;
use crate::error::{Violation, ViolationKind};
use crate::model::Post;
use crate::state::Authed;

/// Checks that the principal in `ctx` owns `post`.
///
/// Compares the canonical identifiers for exact equality and, on a match,
/// returns the [`EditCap`] that [`Post::edit_content`] requires.
///
/// # Errors
///
/// Returns `Forbidden` when the principal is not the post's owner.
pub fn authorize_edit(ctx: &Ctx<Authed>, post: &Post) -> Result<EditCap, Violation> {
    if ctx.principal().id == post.owner() {
        Ok(EditCap::new(post.id()))
    } else {
        Err(Violation::new(
            ViolationKind::Forbidden,
            "Not authorized to edit this post",
        ))
    }
}

/// [`authorize_edit`], recording the decision on `trail`.
pub fn authorize_edit_audited(
    ctx: &Ctx<Authed>,
    post: &Post,
    action: &str,
    trail: &AuditTrail,
) -> Result<EditCap, Violation> {
    let verdict = authorize_edit(ctx, post);
    let outcome = if verdict.is_ok() {
        AuditOutcome::Success
    } else {
        AuditOutcome::Denied
    };

    let mut event = AuditEvent::new(
        ctx.request_id(),
        Some(ctx.principal().id.to_string()),
        AuditEventKind::Authorization,
        outcome,
    )
    .with_action(action)
    .with_resource_id(post.id().to_string());
    if let Err(v) = &verdict {
        event = event.with_reason(v.kind.to_string());
        ctx.log()
            .warn(format_args!("{} refused on post {}", action, post.id()));
    }
    trail.record(event);

    verdict
}
