use crate::ids::PostId;

/// Proof that the current principal owns a specific post.
///
/// Issued only by [`authorize_edit`](crate::authorize_edit) after the
/// ownership check passes, and required by
/// [`Post::edit_content`](crate::Post::edit_content). It cannot be
/// constructed outside this crate, so a post cannot be edited without the
/// check having run.
///
/// The proof is bound to one post; presenting it to another is refused.
///
/// ```compile_fail
/// # use session_core::{EditCap, PostId};
/// let cap = EditCap { post: PostId::generate(), _private: () };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditCap {
    post: PostId,
    _private: (),
}

impl EditCap {
    pub(crate) fn new(post: PostId) -> Self {
        Self { post, _private: () }
    }

    /// The post this proof was issued for.
    pub fn post(&self) -> PostId {
        self.post
    }
}
