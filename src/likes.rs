//! Like sets and the membership toggle.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Result of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    /// The user was added to the set
    Liked,
    /// The user was removed from the set
    Unliked,
}

/// The set of users who like a post.
///
/// A set keyed by user ID: a user can appear at most once and iteration order
/// says nothing about when anyone liked the post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikeSet(BTreeSet<UserId>);

impl LikeSet {
    /// Creates an empty like set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `user` if absent, removes it if present.
    pub fn toggle(&mut self, user: UserId) -> LikeToggle {
        if self.0.remove(&user) {
            LikeToggle::Unliked
        } else {
            self.0.insert(user);
            LikeToggle::Liked
        }
    }

    /// Returns true if `user` likes the post.
    pub fn contains(&self, user: &UserId) -> bool {
        self.0.contains(user)
    }

    /// Number of likes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nobody likes the post.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over likers in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.0.iter()
    }
}

impl FromIterator<UserId> for LikeSet {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
