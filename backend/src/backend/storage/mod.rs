//! # Storage Module
//!
//! Handles all data persistence for the expense tracker application.
//!
//! The domain layer depends only on the traits defined here; the concrete
//! backend can be swapped (CSV files, a database, an in-memory fake for
//! tests) without touching domain logic.
//!
//! ## Current Implementation
//!
//! - **Primary Storage**: CSV files under a per-user data directory, written
//!   atomically through a temp file
//! - **Tests**: `tempfile`-backed connections with automatic cleanup

pub mod csv;
pub mod traits;

pub use traits::{ExpenseStorage, UserStorage};
