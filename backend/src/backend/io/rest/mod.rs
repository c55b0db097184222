//! # REST API Interface Layer
//!
//! Provides HTTP REST endpoints for the expense tracker application.
//! This layer handles:
//! - HTTP request/response serialization and deserialization
//! - Session resolution from the Authorization header
//! - Error translation from domain to HTTP status codes
//! - Request logging
//!
//! It is a pure translation layer: no business logic lives here.

pub mod auth_apis;
pub mod expense_apis;
pub mod summary_apis;

pub mod mappers;
