//! Authentication and account management.
//!
//! Sessions, password hashing, sign-in throttling and the password reset
//! flow all live here. Failures map to the fixed set of user-readable
//! messages in [`AuthError`]; backend details are logged, never surfaced.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use sha2::{Digest, Sha256};
use shared::UserInfo;
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::domain::commands::auth::{
    PasswordResetStarted, SignInCommand, SignInResult, SignUpCommand,
};
use crate::backend::domain::errors::AuthError;
use crate::backend::domain::models::user::User as DomainUser;
use crate::backend::storage::traits::UserStorage;

/// Sign-ins are rejected outright once this many attempts have failed for an
/// email, until a successful reset clears the counter.
const MAX_FAILED_SIGN_INS: u32 = 5;

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Clone)]
pub struct AuthService {
    user_repository: Arc<dyn UserStorage>,
    /// session token -> user id
    sessions: Arc<Mutex<HashMap<String, String>>>,
    /// reset token -> user id
    reset_tokens: Arc<Mutex<HashMap<String, String>>>,
    /// email -> consecutive failed sign-ins
    failed_attempts: Arc<Mutex<HashMap<String, u32>>>,
    /// Observable for sign-in/sign-out transitions
    auth_state: Arc<watch::Sender<Option<UserInfo>>>,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserStorage>) -> Self {
        let (auth_state, _) = watch::channel(None);
        Self {
            user_repository,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            reset_tokens: Arc::new(Mutex::new(HashMap::new())),
            failed_attempts: Arc::new(Mutex::new(HashMap::new())),
            auth_state: Arc::new(auth_state),
        }
    }

    /// Create a new account. New users start unverified and enabled.
    pub fn sign_up(&self, command: SignUpCommand) -> Result<DomainUser, AuthError> {
        let email = command.email.trim().to_lowercase();

        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        if command.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword);
        }
        if self.user_repository.get_user_by_email(&email)?.is_some() {
            return Err(AuthError::EmailAlreadyInUse);
        }

        let salt = Uuid::new_v4().to_string();
        let user = DomainUser {
            id: DomainUser::generate_id(&Uuid::new_v4().to_string()),
            email: email.clone(),
            password_hash: hash_password(&salt, &command.password),
            password_salt: salt,
            email_verified: false,
            disabled: false,
            created_at: Utc::now().to_rfc3339(),
        };

        self.user_repository.store_user(&user)?;
        info!("Created account for {}", email);
        Ok(user)
    }

    /// Sign in with email and password, yielding a session token.
    pub fn sign_in(&self, command: SignInCommand) -> Result<SignInResult, AuthError> {
        let email = command.email.trim().to_lowercase();

        // Throttle before even looking at the credentials
        if self.failed_count(&email) >= MAX_FAILED_SIGN_INS {
            warn!("Sign-in throttled for {}", email);
            return Err(AuthError::TooManyRequests);
        }

        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }

        let user = match self.user_repository.get_user_by_email(&email)? {
            Some(user) => user,
            None => {
                self.record_failed_attempt(&email);
                return Err(AuthError::UserNotFound);
            }
        };

        if user.disabled {
            return Err(AuthError::UserDisabled);
        }

        if hash_password(&user.password_salt, &command.password) != user.password_hash {
            self.record_failed_attempt(&email);
            return Err(AuthError::WrongPassword);
        }

        self.failed_attempts.lock().unwrap().remove(&email);

        let session_token = Uuid::new_v4().to_string();
        self.sessions
            .lock()
            .unwrap()
            .insert(session_token.clone(), user.id.clone());

        self.auth_state.send_replace(Some(user_info(&user)));
        info!("Signed in {}", email);

        Ok(SignInResult {
            session_token,
            user,
        })
    }

    /// Resolve a session token to its user.
    pub fn current_user(&self, session_token: &str) -> Result<DomainUser, AuthError> {
        let user_id = self
            .sessions
            .lock()
            .unwrap()
            .get(session_token)
            .cloned()
            .ok_or(AuthError::InvalidSession)?;

        self.user_repository
            .get_user(&user_id)?
            .ok_or(AuthError::InvalidSession)
    }

    /// Revoke a session. Signing out an already-dead session is a no-op.
    pub fn sign_out(&self, session_token: &str) {
        let removed = self.sessions.lock().unwrap().remove(session_token);
        if removed.is_some() {
            self.auth_state.send_replace(None);
            info!("Signed out session");
        }
    }

    /// Flip the verification flag for an account.
    pub fn mark_email_verified(&self, email: &str) -> Result<DomainUser, AuthError> {
        let email = email.trim().to_lowercase();
        let mut user = self
            .user_repository
            .get_user_by_email(&email)?
            .ok_or(AuthError::UserNotFound)?;

        user.email_verified = true;
        self.user_repository.update_user(&user)?;
        Ok(user)
    }

    /// Start a password reset, minting a single-use token.
    ///
    /// Delivery of the token (email) is outside this service.
    pub fn request_password_reset(&self, email: &str) -> Result<PasswordResetStarted, AuthError> {
        let email = email.trim().to_lowercase();
        let user = self
            .user_repository
            .get_user_by_email(&email)?
            .ok_or(AuthError::UserNotFound)?;

        let reset_token = Uuid::new_v4().to_string();
        self.reset_tokens
            .lock()
            .unwrap()
            .insert(reset_token.clone(), user.id);
        info!("Password reset requested for {}", email);

        Ok(PasswordResetStarted { reset_token })
    }

    /// Complete a password reset. Consumes the token, revokes the user's
    /// sessions and clears the sign-in throttle.
    pub fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<(), AuthError> {
        if new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword);
        }

        let user_id = self
            .reset_tokens
            .lock()
            .unwrap()
            .remove(reset_token)
            .ok_or(AuthError::InvalidResetToken)?;

        let mut user = self
            .user_repository
            .get_user(&user_id)?
            .ok_or(AuthError::InvalidResetToken)?;

        let salt = Uuid::new_v4().to_string();
        user.password_hash = hash_password(&salt, new_password);
        user.password_salt = salt;
        self.user_repository.update_user(&user)?;

        self.sessions
            .lock()
            .unwrap()
            .retain(|_, session_user| session_user != &user.id);
        self.failed_attempts.lock().unwrap().remove(&user.email);
        info!("Password reset completed for {}", user.email);

        Ok(())
    }

    /// Observable of sign-in/sign-out transitions: the most recent transition
    /// carries the signed-in user, or None after a sign-out.
    pub fn subscribe_auth_state(&self) -> watch::Receiver<Option<UserInfo>> {
        self.auth_state.subscribe()
    }

    fn failed_count(&self, email: &str) -> u32 {
        self.failed_attempts
            .lock()
            .unwrap()
            .get(email)
            .copied()
            .unwrap_or(0)
    }

    fn record_failed_attempt(&self, email: &str) {
        let mut attempts = self.failed_attempts.lock().unwrap();
        *attempts.entry(email.to_string()).or_insert(0) += 1;
    }
}

/// Public view of a user, safe to hand to the UI.
pub fn user_info(user: &DomainUser) -> UserInfo {
    UserInfo {
        id: user.id.clone(),
        email: user.email.clone(),
        email_verified: user.email_verified,
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
