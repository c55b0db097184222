//! Composable expense filtering.
//!
//! A filter is built independently of the storage query mechanism, so the
//! same constraints can run as an in-memory pass over fetched records or be
//! translated into a storage-level query. Every filter change triggers a
//! fresh evaluation over the full collection, never an incremental patch of
//! a previous result.

use chrono::NaiveDate;
use shared::Category;

use crate::backend::domain::models::expense::Expense;

/// Optional date-range and category constraints.
///
/// A record passes only if ALL present constraints are satisfied; with no
/// constraints the filter accepts every record. An inverted range
/// (`start > end`) simply matches nothing - an empty result, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<Category>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_date(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn with_end_date(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none() && self.category.is_none()
    }

    /// The filter predicate. Pure: same record, same answer, every time.
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(start) = self.start_date {
            if expense.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if expense.date > end {
                return false;
            }
        }
        if let Some(category) = self.category {
            if expense.category != category {
                return false;
            }
        }
        true
    }

    /// Run a fresh pass over the collection, preserving input order.
    pub fn apply(&self, expenses: &[Expense]) -> Vec<Expense> {
        expenses
            .iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect()
    }
}
