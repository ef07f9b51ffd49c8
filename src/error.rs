use std::fmt;

use crate::credential::CredentialError;
use crate::password::PasswordError;
use crate::sanitizer::SanitizationError;
use crate::store::StorageError;

/// Errors that can terminate a request.
///
/// Every variant is terminal: nothing in this crate retries, and a handler
/// never continues past one. The web layer maps each variant to exactly one
/// transport outcome (see [`crate::web::Response::from_error`]).
#[derive(Debug)]
pub enum Error {
    /// A guard, ownership or input rule rejected the request
    Violation(Violation),
    /// The storage collaborator failed
    Storage(StorageError),
    /// A credential could not be produced
    Credential(CredentialError),
    /// Password hashing failed
    Password(PasswordError),
}

impl Error {
    /// Returns the violation kind, if this error is a violation.
    pub fn violation_kind(&self) -> Option<ViolationKind> {
        match self {
            Error::Violation(v) => Some(v.kind),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Violation(v) => write!(f, "Policy violation: {}", v),
            Error::Storage(e) => write!(f, "Storage failure: {}", e),
            Error::Credential(e) => write!(f, "Credential failure: {}", e),
            Error::Password(e) => write!(f, "Password failure: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Violation(v) => Some(v),
            Error::Storage(e) => Some(e),
            Error::Credential(e) => Some(e),
            Error::Password(e) => Some(e),
        }
    }
}

impl From<Violation> for Error {
    fn from(v: Violation) -> Self {
        Error::Violation(v)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Error::Storage(e)
    }
}

impl From<CredentialError> for Error {
    fn from(e: CredentialError) -> Self {
        Error::Credential(e)
    }
}

impl From<PasswordError> for Error {
    fn from(e: PasswordError) -> Self {
        Error::Password(e)
    }
}

impl From<SanitizationError> for Error {
    fn from(e: SanitizationError) -> Self {
        Error::Violation(Violation::from(e))
    }
}

/// A rule violation with details about what failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The kind of violation that occurred
    pub kind: ViolationKind,
    /// Human-readable message explaining the violation
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Unauthenticated, message)
    }

    pub(crate) fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::InvalidCredential, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::NotFound, message)
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::InvalidInput, message)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Violation {}

impl From<SanitizationError> for Violation {
    fn from(e: SanitizationError) -> Self {
        Violation::invalid_input(e.to_string())
    }
}

/// The kind of rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// No credential was presented
    Unauthenticated,
    /// A credential was presented but is malformed, tampered with or expired
    InvalidCredential,
    /// The principal is authenticated but does not own the resource
    Forbidden,
    /// The addressed user or post does not exist
    NotFound,
    /// A form field or upload failed validation
    InvalidInput,
    /// The resource already exists (duplicate registration)
    Conflict,
    /// Username or password did not match
    BadLogin,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Unauthenticated => write!(f, "Unauthenticated"),
            ViolationKind::InvalidCredential => write!(f, "Invalid credential"),
            ViolationKind::Forbidden => write!(f, "Forbidden"),
            ViolationKind::NotFound => write!(f, "Not found"),
            ViolationKind::InvalidInput => write!(f, "Invalid input"),
            ViolationKind::Conflict => write!(f, "Conflict"),
            ViolationKind::BadLogin => write!(f, "Bad login"),
        }
    }
}
