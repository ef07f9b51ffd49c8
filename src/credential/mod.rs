//! Signed, time-limited session credentials.
//!
//! A credential is an HS256 JSON Web Token whose claims bind a principal's
//! identifier and email to an issue time and an expiry, signed under the
//! process signing key.
//!
//! - [`CredentialIssuer`] produces credentials at login and registration.
//! - [`verify`] is the pure check the session guard runs on every request.
//! - [`SigningKey`] holds the secret and wipes it on drop.

mod claims;
mod key;
mod token;

pub use claims::Claims;
pub use key::SigningKey;
pub use token::{verify, Credential, CredentialError, CredentialIssuer, DEFAULT_TTL_SECS};
