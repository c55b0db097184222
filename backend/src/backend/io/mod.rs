//! # IO Module
//!
//! Interface layer that exposes backend functionality over HTTP.

pub mod rest;

pub use rest::auth_apis;
pub use rest::expense_apis;
pub use rest::summary_apis;
