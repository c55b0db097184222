//! Expense tracker backend library.
//!
//! See [`backend`] for the layered architecture: domain, storage and IO.

pub mod backend;
