//! Type-state markers for context progression.
//!
//! The state of a [`Ctx`](crate::Ctx) encodes whether the session guard has
//! resolved a principal. Unlike a marker-only design, [`Authed`] carries the
//! principal itself, so an authenticated context can never be missing one.

use crate::request::Principal;

/// State of a context whose caller has not been authenticated.
#[derive(Debug, Clone)]
pub struct Anonymous {
    _private: (),
}

impl Anonymous {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }
}

/// State of a context whose credential has been verified.
#[derive(Debug, Clone)]
pub struct Authed {
    pub(crate) principal: Principal,
}

impl Authed {
    pub(crate) fn new(principal: Principal) -> Self {
        Self { principal }
    }
}
