use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed set of expense categories.
///
/// Every expense belongs to exactly one of these; there is no free-form
/// category input anywhere in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Bills,
    Education,
    Luxuries,
    Others,
}

impl Category {
    /// All categories in display order (also the chart color order).
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Bills,
        Category::Education,
        Category::Luxuries,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Bills => "Bills",
            Category::Education => "Education",
            Category::Luxuries => "Luxuries",
            Category::Others => "Others",
        }
    }

    /// Parse a category label. Matching is exact; the UI only ever submits
    /// values from the fixed select list.
    pub fn parse(value: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == value)
    }

    /// Position of this category in the fixed ordering, used for palette
    /// color assignment.
    pub fn index(&self) -> usize {
        match self {
            Category::Food => 0,
            Category::Transport => 1,
            Category::Bills => 2,
            Category::Education => 3,
            Category::Luxuries => 4,
            Category::Others => 5,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expense ID in format: "expense::<epoch_millis>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: String,
    /// ID of the user this expense belongs to
    pub owner_id: String,
    /// Short label for the expense
    pub title: String,
    /// Non-negative expense amount
    pub amount: f64,
    pub category: Category,
    /// Calendar date of the expense (YYYY-MM-DD, no time component)
    pub date: String,
    /// Optional free text, empty when omitted
    pub note: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

impl ExpenseRecord {
    /// Generate an expense ID from a creation timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("expense::{}", epoch_millis)
    }

    /// Parse an expense ID to extract the creation timestamp
    pub fn parse_id(id: &str) -> Result<u64, ExpenseIdError> {
        let parts: Vec<&str> = id.split("::").collect();
        if parts.len() != 2 || parts[0] != "expense" {
            return Err(ExpenseIdError::InvalidFormat);
        }

        parts[1]
            .parse::<u64>()
            .map_err(|_| ExpenseIdError::InvalidTimestamp)
    }

    /// Extract the creation timestamp from this record's ID
    pub fn extract_timestamp(&self) -> Result<u64, ExpenseIdError> {
        Self::parse_id(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseIdError {
    InvalidFormat,
    InvalidTimestamp,
}

impl fmt::Display for ExpenseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpenseIdError::InvalidFormat => write!(f, "Invalid expense ID format"),
            ExpenseIdError::InvalidTimestamp => write!(f, "Invalid timestamp in expense ID"),
        }
    }
}

impl std::error::Error for ExpenseIdError {}

/// Request for creating a new expense
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateExpenseRequest {
    pub title: String,
    pub amount: f64,
    pub category: String,
    /// Optional date override (YYYY-MM-DD) - uses today if not provided
    pub date: Option<String>,
    pub note: Option<String>,
}

/// Request for updating an existing expense.
///
/// Edits are a full overwrite of the editable fields, never a partial merge;
/// id and owner are immutable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateExpenseRequest {
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub note: Option<String>,
}

/// Optional constraints for listing expenses. All absent means no filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExpenseListRequest {
    /// Inclusive start date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Inclusive end date (YYYY-MM-DD)
    pub end_date: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseListResponse {
    pub expenses: Vec<ExpenseRecord>,
}

/// Response after creating or updating an expense
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseResponse {
    pub expense: ExpenseRecord,
    pub success_message: String,
}

/// Response after deleting an expense
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteExpenseResponse {
    pub deleted: bool,
    pub success_message: String,
}

/// Accumulated amount for a single category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotalEntry {
    pub category: Category,
    pub amount: f64,
}

/// One slice of the category breakdown chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSlice {
    pub label: String,
    pub value: f64,
    /// CSS color taken from the fixed palette, cycled by category index
    pub color: String,
}

/// One row of the expense list display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseRow {
    pub id: String,
    pub title: String,
    pub formatted_amount: String,
    pub category: String,
    pub date: String,
    pub note: String,
}

/// Filtered expenses together with their aggregates, shaped for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseSummaryResponse {
    pub rows: Vec<ExpenseRow>,
    pub total: f64,
    pub formatted_total: String,
    pub category_totals: Vec<CategoryTotalEntry>,
    pub chart: Vec<ChartSlice>,
}

/// Specific validation errors for the expense form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ExpenseFieldError {
    EmptyTitle,
    EmptyAmount,
    InvalidAmountFormat(String),
    AmountNegative,
    AmountNotFinite,
    UnknownCategory(String),
    InvalidDate(String),
}

/// Request for validating expense form input without persisting anything
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidateExpenseRequest {
    pub title: String,
    /// Raw amount text as typed, before cleaning
    pub amount_input: String,
    pub category: String,
    pub date: String,
}

/// Validation result for expense form input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseFormValidation {
    pub is_valid: bool,
    pub errors: Vec<ExpenseFieldError>,
    pub cleaned_amount: Option<f64>,
}

/// Editor mode for the expense form.
///
/// Creating: no record selected, submit creates. Editing: a record is
/// selected, submit overwrites it and returns to Creating on success. Only
/// one edit session can exist at a time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EditorMode {
    Creating,
    Editing { expense_id: String },
}

/// State for the expense input form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseFormState {
    pub title: String,
    pub amount_input: String,
    pub category_input: String,
    pub date_input: String,
    pub note: String,
    pub mode: EditorMode,
    pub is_submitting: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
    /// Epoch millis when the error banner was set, for timed auto-clear
    pub error_set_at_ms: Option<u64>,
    /// Epoch millis when the success banner was set, for timed auto-clear
    pub success_set_at_ms: Option<u64>,
}

/// Configuration for expense forms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseFormConfig {
    pub max_title_length: usize,
    pub currency_symbol: String,
    pub success_message_duration_ms: u64,
    pub error_message_duration_ms: u64,
}

impl Default for ExpenseFormConfig {
    fn default() -> Self {
        Self {
            max_title_length: 256,
            currency_symbol: "$".to_string(),
            success_message_duration_ms: 3000,
            error_message_duration_ms: 5000,
        }
    }
}

/// Request for creating a new account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

/// Request for signing in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public user information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub email_verified: bool,
}

/// Response after a successful sign-in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub session_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignUpResponse {
    pub user: UserInfo,
    pub success_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogoutResponse {
    pub success_message: String,
}

/// Response containing the current signed-in user, if any
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentUserResponse {
    pub user: Option<UserInfo>,
}

/// Request for starting a password reset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PasswordResetRequestResponse {
    pub success_message: String,
}

/// Request for completing a password reset with the emailed token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletePasswordResetRequest {
    pub reset_token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletePasswordResetResponse {
    pub success_message: String,
}
