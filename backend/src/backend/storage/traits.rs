//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;

use crate::backend::domain::models::expense::Expense as DomainExpense;
use crate::backend::domain::models::user::User as DomainUser;

/// Trait defining the interface for expense storage operations
///
/// This trait abstracts away the specific storage implementation details,
/// allowing the domain layer to work with different storage backends
/// (CSV files, SQL databases, in-memory fakes for tests) without
/// modification. All listing is owner-scoped; a repository never returns
/// another owner's records.
pub trait ExpenseStorage: Send + Sync {
    /// Store a new expense
    fn store_expense(&self, expense: &DomainExpense) -> Result<()>;

    /// Retrieve a specific expense by ID for a given owner
    fn get_expense(&self, owner_id: &str, expense_id: &str) -> Result<Option<DomainExpense>>;

    /// List all expenses for an owner in insertion order (oldest first)
    fn list_expenses(&self, owner_id: &str) -> Result<Vec<DomainExpense>>;

    /// Overwrite an existing expense
    /// Returns true if the expense was found and updated, false otherwise
    fn update_expense(&self, expense: &DomainExpense) -> Result<bool>;

    /// Delete a single expense
    /// Returns true if the expense was found and deleted, false otherwise
    fn delete_expense(&self, owner_id: &str, expense_id: &str) -> Result<bool>;
}

/// Trait defining the interface for user account storage operations
pub trait UserStorage: Send + Sync {
    /// Store a new user
    fn store_user(&self, user: &DomainUser) -> Result<()>;

    /// Retrieve a specific user by ID
    fn get_user(&self, user_id: &str) -> Result<Option<DomainUser>>;

    /// Retrieve a user by email address
    fn get_user_by_email(&self, email: &str) -> Result<Option<DomainUser>>;

    /// Update an existing user
    fn update_user(&self, user: &DomainUser) -> Result<()>;

    /// List all users ordered by creation time
    fn list_users(&self) -> Result<Vec<DomainUser>>;
}
