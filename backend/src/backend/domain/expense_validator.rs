//! Expense input validation.
//!
//! All field rules live here, ahead of any storage call. The UI should only
//! handle presentation concerns; a record that passes this module is safe to
//! persist and to aggregate.

use chrono::NaiveDate;
use shared::{Category, ExpenseFieldError, ExpenseFormConfig, ExpenseFormValidation};

use crate::backend::domain::models::expense::ExpenseDraft;

/// Validator service holding the form configuration.
#[derive(Clone)]
pub struct ExpenseValidator {
    config: ExpenseFormConfig,
}

impl Default for ExpenseValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseValidator {
    pub fn new() -> Self {
        Self {
            config: ExpenseFormConfig::default(),
        }
    }

    pub fn with_config(config: ExpenseFormConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExpenseFormConfig {
        &self.config
    }

    /// Validate raw form input, collecting every field error.
    ///
    /// Pure function: no side effects, same input gives the same result.
    pub fn validate_form(
        &self,
        title: &str,
        amount_input: &str,
        category: &str,
        date: &str,
    ) -> ExpenseFormValidation {
        let mut errors = Vec::new();

        if title.trim().is_empty() {
            errors.push(ExpenseFieldError::EmptyTitle);
        }

        let cleaned_amount = if amount_input.trim().is_empty() {
            errors.push(ExpenseFieldError::EmptyAmount);
            None
        } else {
            match self.clean_and_parse_amount(amount_input) {
                Ok(amount) => match self.check_amount(amount) {
                    Ok(()) => Some(amount),
                    Err(e) => {
                        errors.push(e);
                        None
                    }
                },
                Err(parse_error) => {
                    errors.push(ExpenseFieldError::InvalidAmountFormat(parse_error));
                    None
                }
            }
        };

        if Category::parse(category).is_none() {
            errors.push(ExpenseFieldError::UnknownCategory(category.to_string()));
        }

        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            errors.push(ExpenseFieldError::InvalidDate(date.to_string()));
        }

        ExpenseFormValidation {
            is_valid: errors.is_empty(),
            errors,
            cleaned_amount,
        }
    }

    /// Validate already-typed field values (the REST path, where amount
    /// arrives as a JSON number) into a draft ready for persistence.
    ///
    /// Returns the first offending field.
    pub fn validate_record(
        &self,
        title: &str,
        amount: f64,
        category: &str,
        date: &str,
        note: Option<String>,
    ) -> Result<ExpenseDraft, ExpenseFieldError> {
        let title_trimmed = title.trim();
        if title_trimmed.is_empty() {
            return Err(ExpenseFieldError::EmptyTitle);
        }

        self.check_amount(amount)?;

        let category = Category::parse(category)
            .ok_or_else(|| ExpenseFieldError::UnknownCategory(category.to_string()))?;

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ExpenseFieldError::InvalidDate(date.to_string()))?;

        Ok(ExpenseDraft {
            title: title_trimmed.to_string(),
            amount,
            category,
            date,
            note: note.unwrap_or_default(),
        })
    }

    fn check_amount(&self, amount: f64) -> Result<(), ExpenseFieldError> {
        if !amount.is_finite() {
            return Err(ExpenseFieldError::AmountNotFinite);
        }
        if amount < 0.0 {
            return Err(ExpenseFieldError::AmountNegative);
        }
        Ok(())
    }

    /// Clean and parse amount input string
    pub fn clean_and_parse_amount(&self, amount_input: &str) -> Result<f64, String> {
        // Strip currency symbol, commas and spaces before parsing
        let cleaned = amount_input
            .trim()
            .replace(&self.config.currency_symbol, "")
            .replace(",", "")
            .replace(" ", "");

        if cleaned.is_empty() {
            return Err("Empty amount after cleaning".to_string());
        }

        cleaned
            .parse::<f64>()
            .map_err(|e| format!("Invalid number format: {}", e))
    }

    /// Get user-friendly error message for a validation error
    pub fn get_error_message(&self, error: &ExpenseFieldError) -> String {
        match error {
            ExpenseFieldError::EmptyTitle => "Please enter a title".to_string(),
            ExpenseFieldError::EmptyAmount => "Please enter an amount".to_string(),
            ExpenseFieldError::InvalidAmountFormat(msg) => {
                format!("Please enter a valid amount (like 5 or 5.00): {}", msg)
            }
            ExpenseFieldError::AmountNegative => "Amount cannot be negative".to_string(),
            ExpenseFieldError::AmountNotFinite => "Amount must be a real number".to_string(),
            ExpenseFieldError::UnknownCategory(value) => {
                format!("Please select a category from the list (got '{}')", value)
            }
            ExpenseFieldError::InvalidDate(value) => {
                format!("Please enter a valid date as YYYY-MM-DD (got '{}')", value)
            }
        }
    }

    /// Which form field an error belongs to, for inline display.
    pub fn field_name(&self, error: &ExpenseFieldError) -> &'static str {
        match error {
            ExpenseFieldError::EmptyTitle => "title",
            ExpenseFieldError::EmptyAmount
            | ExpenseFieldError::InvalidAmountFormat(_)
            | ExpenseFieldError::AmountNegative
            | ExpenseFieldError::AmountNotFinite => "amount",
            ExpenseFieldError::UnknownCategory(_) => "category",
            ExpenseFieldError::InvalidDate(_) => "date",
        }
    }
}
