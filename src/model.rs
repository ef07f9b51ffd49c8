//! Users and posts as the handlers see them.

use chrono::{DateTime, Utc};

use crate::capability::EditCap;
use crate::error::{Violation, ViolationKind};
use crate::ids::{PostId, UserId};
use crate::likes::{LikeSet, LikeToggle};
use crate::request::Principal;
use crate::verified::Verified;

/// Profile picture shown until the user uploads one.
pub const DEFAULT_PROFILE_PIC: &str = "default.png";

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Identifier, assigned at registration
    pub id: UserId,
    /// Login name
    pub username: String,
    /// Display name
    pub name: String,
    /// Age, if given
    pub age: Option<u32>,
    /// Email, unique across users
    pub email: String,
    /// PHC-formatted password hash
    pub password_hash: String,
    /// Stored filename of the profile picture
    pub profile_pic: String,
    /// Posts created by this user, oldest first
    pub posts: Vec<PostId>,
}

impl User {
    /// Creates a user with a fresh identifier and the default picture.
    pub fn new(
        username: String,
        name: String,
        age: Option<u32>,
        email: String,
        password_hash: String,
    ) -> Self {
        Self {
            id: UserId::generate(),
            username,
            name,
            age,
            email,
            password_hash,
            profile_pic: DEFAULT_PROFILE_PIC.to_string(),
            posts: Vec::new(),
        }
    }

    /// The principal a credential for this user should carry.
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// A text post.
///
/// The owner is fixed at creation: there is no setter, and content edits
/// require an [`EditCap`] issued for this post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: PostId,
    owner: UserId,
    created_at: DateTime<Utc>,
    content: String,
    likes: LikeSet,
}

impl Post {
    /// Creates a post owned by `owner`.
    pub fn new(owner: UserId, content: Verified<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: PostId::generate(),
            owner,
            created_at,
            content: content.into_inner(),
            likes: LikeSet::new(),
        }
    }

    /// Identifier.
    pub fn id(&self) -> PostId {
        self.id
    }

    /// The user who created this post.
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Users who like this post.
    pub fn likes(&self) -> &LikeSet {
        &self.likes
    }

    /// Flips `user`'s membership in the like set.
    pub fn toggle_like(&mut self, user: UserId) -> LikeToggle {
        self.likes.toggle(user)
    }

    /// Replaces the content.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` if `cap` was issued for a different post.
    pub fn edit_content(&mut self, cap: &EditCap, content: Verified<String>) -> Result<(), Violation> {
        if cap.post() != self.id {
            return Err(Violation::new(
                ViolationKind::Forbidden,
                "Edit authorization was issued for another post",
            ));
        }
        self.content = content.into_inner();
        Ok(())
    }
}
