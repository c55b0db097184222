//! Domain-level command and query types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod expenses {
    use crate::backend::domain::filter::ExpenseFilter;
    use crate::backend::domain::models::expense::Expense as DomainExpense;

    /// Input for creating a new expense.
    #[derive(Debug, Clone)]
    pub struct CreateExpenseCommand {
        pub owner_id: String,
        pub title: String,
        pub amount: f64,
        pub category: String,
        /// YYYY-MM-DD; today when absent.
        pub date: Option<String>,
        pub note: Option<String>,
    }

    /// Input for overwriting an existing expense.
    #[derive(Debug, Clone)]
    pub struct UpdateExpenseCommand {
        pub owner_id: String,
        pub expense_id: String,
        pub title: String,
        pub amount: f64,
        pub category: String,
        pub date: String,
        pub note: Option<String>,
    }

    /// Input for deleting an expense.
    #[derive(Debug, Clone)]
    pub struct DeleteExpenseCommand {
        pub owner_id: String,
        pub expense_id: String,
    }

    /// Query parameters for listing expenses.
    #[derive(Debug, Clone, Default)]
    pub struct ExpenseListQuery {
        pub owner_id: String,
        pub filter: ExpenseFilter,
    }

    /// Result of listing expenses.
    #[derive(Debug, Clone)]
    pub struct ExpenseListResult {
        pub expenses: Vec<DomainExpense>,
    }

    /// Result of deleting an expense.
    #[derive(Debug, Clone)]
    pub struct DeleteExpenseResult {
        pub deleted: bool,
        pub success_message: String,
    }

    /// Query parameters for the aggregated summary view.
    #[derive(Debug, Clone, Default)]
    pub struct ExpenseSummaryQuery {
        pub owner_id: String,
        pub filter: ExpenseFilter,
    }
}

pub mod auth {
    use crate::backend::domain::models::user::User as DomainUser;

    /// Input for creating an account.
    #[derive(Debug, Clone)]
    pub struct SignUpCommand {
        pub email: String,
        pub password: String,
    }

    /// Input for signing in.
    #[derive(Debug, Clone)]
    pub struct SignInCommand {
        pub email: String,
        pub password: String,
    }

    /// Result of a successful sign-in.
    #[derive(Debug, Clone)]
    pub struct SignInResult {
        pub session_token: String,
        pub user: DomainUser,
    }

    /// Result of starting a password reset.
    ///
    /// The token would be delivered out of band (email) in a deployed setup;
    /// the domain layer only mints it.
    #[derive(Debug, Clone)]
    pub struct PasswordResetStarted {
        pub reset_token: String,
    }
}
