use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;
use crate::request::Principal;

/// The signed body of a session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// Canonical user identifier
    pub sub: String,
    /// Email at issuance
    pub email: String,
    /// Issued-at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds)
    pub exp: i64,
}

impl Claims {
    /// Builds claims for `principal`, valid for `ttl` from `issued_at`.
    pub fn for_principal(principal: &Principal, issued_at: DateTime<Utc>, ttl: TimeDelta) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: principal.id.to_string(),
            email: principal.email.clone(),
            iat,
            exp: iat.saturating_add(ttl.num_seconds()),
        }
    }

    /// Returns true once `now` has reached the expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Returns the expiry as a timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Recovers the principal, or `None` if `sub` is not a canonical id.
    pub fn principal(&self) -> Option<Principal> {
        UserId::parse(&self.sub).map(|id| Principal {
            id,
            email: self.email.clone(),
        })
    }
}
