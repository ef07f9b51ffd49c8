//! The storage collaborator contract and an in-memory implementation.
//!
//! Handlers only need the shapes in [`Store`]; the query language behind it
//! is the implementor's business. Writes are upserts keyed by identifier.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;

use crate::ids::{PostId, UserId};
use crate::likes::LikeToggle;
use crate::model::{Post, User};

/// Failure reported by a storage collaborator.
///
/// Surfaced to the caller as a generic server error; never retried here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageError {
    message: String,
}

impl StorageError {
    /// Creates a storage error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage error: {}", self.message)
    }
}

impl std::error::Error for StorageError {}

/// Persistence operations the handlers depend on.
pub trait Store: Send + Sync {
    /// Looks a user up by identifier.
    fn find_user(&self, id: &UserId) -> Result<Option<User>, StorageError>;

    /// Looks a user up by email, ignoring case.
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    /// Looks a user up by username.
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;

    /// Looks a post up by identifier.
    fn find_post(&self, id: &PostId) -> Result<Option<Post>, StorageError>;

    /// Inserts or replaces a user.
    fn persist_user(&self, user: &User) -> Result<(), StorageError>;

    /// Inserts or replaces a post.
    fn persist_post(&self, post: &Post) -> Result<(), StorageError>;

    /// All posts owned by `owner`, oldest first.
    fn posts_by_owner(&self, owner: &UserId) -> Result<Vec<Post>, StorageError>;

    /// Every post, newest first.
    fn all_posts(&self) -> Result<Vec<Post>, StorageError>;

    /// Flips `user`'s like on `post`; `Ok(None)` if the post does not exist.
    ///
    /// The default is read-modify-write over [`find_post`](Self::find_post)
    /// and [`persist_post`](Self::persist_post): two concurrent toggles by
    /// different users can lose one update. Implementations with an atomic
    /// set add/remove should override it.
    fn toggle_like(&self, post: &PostId, user: &UserId) -> Result<Option<LikeToggle>, StorageError> {
        let Some(mut found) = self.find_post(post)? else {
            return Ok(None);
        };
        let toggled = found.toggle_like(*user);
        self.persist_post(&found)?;
        Ok(Some(toggled))
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    posts: HashMap<PostId, Post>,
}

/// A [`Store`] held in process memory.
///
/// Lookups take a read lock; writes and [`toggle_like`](Store::toggle_like)
/// take the write lock, so concurrent toggles never lose an update.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.tables.read().users.len()
    }

    /// Number of stored posts.
    pub fn post_count(&self) -> usize {
        self.tables.read().posts.len()
    }
}

impl Store for MemoryStore {
    fn find_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        Ok(self.tables.read().users.get(id).cloned())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.email.to_lowercase() == email.to_lowercase())
            .cloned())
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    fn find_post(&self, id: &PostId) -> Result<Option<Post>, StorageError> {
        Ok(self.tables.read().posts.get(id).cloned())
    }

    fn persist_user(&self, user: &User) -> Result<(), StorageError> {
        self.tables.write().users.insert(user.id, user.clone());
        Ok(())
    }

    fn persist_post(&self, post: &Post) -> Result<(), StorageError> {
        self.tables.write().posts.insert(post.id(), post.clone());
        Ok(())
    }

    fn posts_by_owner(&self, owner: &UserId) -> Result<Vec<Post>, StorageError> {
        let mut posts: Vec<Post> = self
            .tables
            .read()
            .posts
            .values()
            .filter(|p| p.owner() == *owner)
            .cloned()
            .collect();
        posts.sort_by_key(|p| (p.created_at(), p.id()));
        Ok(posts)
    }

    fn all_posts(&self) -> Result<Vec<Post>, StorageError> {
        let mut posts: Vec<Post> = self.tables.read().posts.values().cloned().collect();
        posts.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(posts)
    }

    fn toggle_like(&self, post: &PostId, user: &UserId) -> Result<Option<LikeToggle>, StorageError> {
        Ok(self
            .tables
            .write()
            .posts
            .get_mut(post)
            .map(|p| p.toggle_like(*user)))
    }
}
