//! Error taxonomy for the domain layer.
//!
//! Three families, matching how failures surface to the user:
//! - validation errors are caught before any storage call and point at a
//!   specific form field;
//! - expense service errors cover not-found and storage failures; the user
//!   sees a generic retryable message, details go to the log;
//! - auth errors carry fixed user-readable messages. Unmapped backend
//!   failures fall back to a generic message.
//!
//! Nothing here is fatal. Every failure is caught at the call site and the
//! caller stays interactive; retries are always user-initiated.

use thiserror::Error;

/// Failures from expense CRUD and query operations.
#[derive(Debug, Error)]
pub enum ExpenseServiceError {
    /// Bad user input, surfaced inline near the offending field.
    #[error("{0}")]
    Validation(String),

    /// No expense with that id for this owner.
    #[error("Expense not found")]
    NotFound,

    /// Create/update/delete/query failure in the storage layer.
    #[error("Something went wrong. Please try again.")]
    Persistence(#[source] anyhow::Error),
}

impl From<anyhow::Error> for ExpenseServiceError {
    fn from(err: anyhow::Error) -> Self {
        ExpenseServiceError::Persistence(err)
    }
}

/// Sign-in and account management failures.
///
/// The display strings are the complete set of user-facing messages; backend
/// details are never shown. Mirrors the fixed code-to-message mapping of the
/// login screen.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("The email address is not valid.")]
    InvalidEmail,

    #[error("The email or password is not valid.")]
    InvalidCredential,

    #[error("This account has been disabled.")]
    UserDisabled,

    #[error("No account found with this email.")]
    UserNotFound,

    #[error("Incorrect password. Please try again.")]
    WrongPassword,

    #[error("Too many unsuccessful login attempts. Please try again later.")]
    TooManyRequests,

    #[error("An account with this email already exists.")]
    EmailAlreadyInUse,

    #[error("Password should be at least 6 characters.")]
    WeakPassword,

    #[error("Your session has expired. Please sign in again.")]
    InvalidSession,

    #[error("The password reset link is not valid or has expired.")]
    InvalidResetToken,

    /// Catch-all for unmapped backend failures.
    #[error("An unexpected error occurred. Please try again.")]
    Unexpected(#[source] anyhow::Error),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Unexpected(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_have_fixed_messages() {
        assert_eq!(
            AuthError::WrongPassword.to_string(),
            "Incorrect password. Please try again."
        );
        assert_eq!(
            AuthError::UserNotFound.to_string(),
            "No account found with this email."
        );
        assert_eq!(
            AuthError::TooManyRequests.to_string(),
            "Too many unsuccessful login attempts. Please try again later."
        );
        assert_eq!(
            AuthError::Unexpected(anyhow::anyhow!("socket closed")).to_string(),
            "An unexpected error occurred. Please try again."
        );
    }

    #[test]
    fn test_persistence_error_hides_details() {
        let err = ExpenseServiceError::Persistence(anyhow::anyhow!("disk full"));
        assert_eq!(err.to_string(), "Something went wrong. Please try again.");
    }
}
