//! # Backend Module
//!
//! Contains all non-UI logic for the expense tracker application.
//!
//! This module serves as the orchestration layer that brings together:
//! - **Domain**: Business logic and rules for expense tracking
//! - **Storage**: Data persistence mechanisms
//! - **IO**: Interface layer that exposes functionality to clients
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! UI Layer (browser client)
//!     |
//! IO Layer (REST API, handlers)
//!     |
//! Domain Layer (Business logic, services)
//!     |
//! Storage Layer (CSV files, persistence)
//! ```

pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::backend::domain::{AuthService, ExpenseService};
use crate::backend::storage::csv::{CsvConnection, ExpenseRepository, UserRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub expense_service: ExpenseService,
    pub auth_service: AuthService,
}

/// Initialize the backend against the default data directory
pub fn initialize_backend() -> Result<AppState> {
    info!("Setting up storage");
    let connection = CsvConnection::new_default()?;
    Ok(initialize_backend_with_connection(connection))
}

/// Initialize the backend against a specific storage connection
pub fn initialize_backend_with_connection(connection: CsvConnection) -> AppState {
    info!("Setting up domain services");
    let expense_service =
        ExpenseService::new(Arc::new(ExpenseRepository::new(connection.clone())));
    let auth_service = AuthService::new(Arc::new(UserRepository::new(connection)));

    AppState {
        expense_service,
        auth_service,
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow the browser frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .route("/auth/signup", post(io::auth_apis::sign_up))
        .route("/auth/login", post(io::auth_apis::login))
        .route("/auth/logout", post(io::auth_apis::logout))
        .route("/auth/me", get(io::auth_apis::current_user))
        .route(
            "/auth/reset-request",
            post(io::auth_apis::request_password_reset),
        )
        .route("/auth/reset", post(io::auth_apis::complete_password_reset))
        .route(
            "/expenses",
            get(io::expense_apis::list_expenses).post(io::expense_apis::create_expense),
        )
        .route(
            "/expenses/summary",
            get(io::summary_apis::get_expense_summary),
        )
        .route("/expenses/validate", post(io::expense_apis::validate_expense))
        .route(
            "/expenses/:id",
            put(io::expense_apis::update_expense).delete(io::expense_apis::delete_expense),
        );

    // Define our main application router
    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}

/// State over a temp-dir connection, for handler tests
#[cfg(test)]
pub fn test_state() -> (AppState, storage::csv::test_utils::TestEnvironment) {
    let env = storage::csv::test_utils::TestEnvironment::new();
    let state = initialize_backend_with_connection(env.connection.clone());
    (state, env)
}
