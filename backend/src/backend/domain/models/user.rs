//! Domain model for an account holder.

/// A registered user.
///
/// Passwords are stored as a salted SHA-256 digest; the plaintext never
/// leaves the auth service. New accounts start unverified and enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub email_verified: bool,
    pub disabled: bool,
    /// RFC 3339 timestamp
    pub created_at: String,
}

impl User {
    /// Generate a user ID
    pub fn generate_id(uuid: &str) -> String {
        format!("user::{}", uuid)
    }
}
