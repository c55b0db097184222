//! CSV file-backed storage.
//!
//! One `users.csv` at the data directory root, one `expenses.csv` per user
//! directory. Writes always go through a temp file followed by an atomic
//! rename, so a crash mid-write never corrupts existing data.

pub mod connection;
pub mod expense_repository;
pub mod user_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use expense_repository::ExpenseRepository;
pub use user_repository::UserRepository;
