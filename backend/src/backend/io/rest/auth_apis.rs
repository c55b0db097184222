//! # REST API for Authentication
//!
//! Endpoints for account creation, sign-in/out, session lookup and the
//! password reset flow. Every failure maps to a fixed user-readable message;
//! backend details only go to the log.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info};

use crate::backend::domain::auth_service::user_info;
use crate::backend::domain::commands::auth::{SignInCommand, SignUpCommand};
use crate::backend::domain::errors::AuthError;
use crate::backend::domain::models::user::User as DomainUser;
use crate::backend::AppState;
use shared::{
    CompletePasswordResetRequest, CompletePasswordResetResponse, CurrentUserResponse,
    LoginRequest, LoginResponse, LogoutResponse, PasswordResetRequest,
    PasswordResetRequestResponse, SignUpRequest, SignUpResponse,
};

/// HTTP status for each auth failure
fn auth_error_status(error: &AuthError) -> StatusCode {
    match error {
        AuthError::InvalidEmail
        | AuthError::WeakPassword
        | AuthError::EmailAlreadyInUse
        | AuthError::InvalidResetToken => StatusCode::BAD_REQUEST,
        AuthError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        AuthError::InvalidCredential
        | AuthError::UserDisabled
        | AuthError::UserNotFound
        | AuthError::WrongPassword
        | AuthError::InvalidSession => StatusCode::UNAUTHORIZED,
        AuthError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn auth_error_response(error: AuthError) -> Response {
    if let AuthError::Unexpected(ref source) = error {
        error!("Unexpected auth failure: {:?}", source);
    }
    (auth_error_status(&error), error.to_string()).into_response()
}

/// Pull the bearer session token out of the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the request's session to a user, or produce the 401 response
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<DomainUser, Response> {
    let token = bearer_token(headers).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            AuthError::InvalidSession.to_string(),
        )
            .into_response()
    })?;

    state
        .auth_service
        .current_user(token)
        .map_err(auth_error_response)
}

/// Create a new account
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/signup - email: {}", request.email);

    match state.auth_service.sign_up(SignUpCommand {
        email: request.email,
        password: request.password,
    }) {
        Ok(user) => (
            StatusCode::CREATED,
            Json(SignUpResponse {
                user: user_info(&user),
                success_message: "Account created! Please verify your email address.".to_string(),
            }),
        )
            .into_response(),
        Err(e) => auth_error_response(e),
    }
}

/// Sign in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/login - email: {}", request.email);

    match state.auth_service.sign_in(SignInCommand {
        email: request.email,
        password: request.password,
    }) {
        Ok(result) => (
            StatusCode::OK,
            Json(LoginResponse {
                session_token: result.session_token,
                user: user_info(&result.user),
            }),
        )
            .into_response(),
        Err(e) => auth_error_response(e),
    }
}

/// Revoke the current session
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("POST /api/auth/logout");

    if let Some(token) = bearer_token(&headers) {
        state.auth_service.sign_out(token);
    }

    (
        StatusCode::OK,
        Json(LogoutResponse {
            success_message: "Signed out".to_string(),
        }),
    )
        .into_response()
}

/// Current signed-in user, if the session is still valid
pub async fn current_user(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let user = bearer_token(&headers)
        .and_then(|token| state.auth_service.current_user(token).ok());

    (
        StatusCode::OK,
        Json(CurrentUserResponse {
            user: user.as_ref().map(user_info),
        }),
    )
        .into_response()
}

/// Start a password reset
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(request): Json<PasswordResetRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/reset-request - email: {}", request.email);

    match state.auth_service.request_password_reset(&request.email) {
        Ok(_started) => (
            StatusCode::OK,
            Json(PasswordResetRequestResponse {
                success_message: "Password reset email sent!".to_string(),
            }),
        )
            .into_response(),
        Err(_) => {
            // Same generic message whether or not the account exists
            (
                StatusCode::BAD_REQUEST,
                "Failed to send password reset email. Please check the email address.",
            )
                .into_response()
        }
    }
}

/// Complete a password reset with the emailed token
pub async fn complete_password_reset(
    State(state): State<AppState>,
    Json(request): Json<CompletePasswordResetRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/reset");

    match state
        .auth_service
        .reset_password(&request.reset_token, &request.new_password)
    {
        Ok(()) => (
            StatusCode::OK,
            Json(CompletePasswordResetResponse {
                success_message: "Password updated. Please sign in again.".to_string(),
            }),
        )
            .into_response(),
        Err(e) => auth_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_state;

    fn signup_request(email: &str, password: &str) -> SignUpRequest {
        SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_and_login() {
        let (state, _env) = test_state();

        let response = sign_up(
            State(state.clone()),
            Json(signup_request("ada@example.com", "hunter22")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = login(
            State(state),
            Json(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "hunter22".to_string(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let (state, _env) = test_state();
        sign_up(
            State(state.clone()),
            Json(signup_request("ada@example.com", "hunter22")),
        )
        .await;

        let response = login(
            State(state),
            Json(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "wrong".to_string(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email() {
        let (state, _env) = test_state();
        sign_up(
            State(state.clone()),
            Json(signup_request("ada@example.com", "hunter22")),
        )
        .await;

        let response = sign_up(
            State(state),
            Json(signup_request("ada@example.com", "hunter22")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_current_user_without_session() {
        let (state, _env) = test_state();

        let response = current_user(State(state), HeaderMap::new())
            .await
            .into_response();
        // No session is not an error here; the body just has no user
        assert_eq!(response.status(), StatusCode::OK);
    }
}
