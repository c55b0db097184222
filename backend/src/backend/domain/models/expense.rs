//! Domain model for a single expense record.

use chrono::NaiveDate;
use shared::Category;

/// An expense as the domain layer sees it.
///
/// `id` and `owner_id` are assigned at creation and never change afterwards.
/// Edits overwrite the remaining fields wholesale; there is no partial merge.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    /// Non-negative amount. Summed with plain f64 addition; aggregate results
    /// match a reference decimal sum within 1e-9 for realistic record counts.
    pub amount: f64,
    pub category: Category,
    /// Calendar date only, no time component.
    pub date: NaiveDate,
    pub note: String,
    /// RFC 3339 timestamp, also the tiebreaker for insertion ordering.
    pub created_at: String,
}

/// Validated field values for an expense that has not been persisted yet.
///
/// Produced by the validator, consumed by the expense service, which stamps
/// id, owner and creation time on top.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
    pub note: String,
}

impl Expense {
    /// Apply a full-overwrite edit to this record. Identity fields stay put.
    pub fn overwrite_with(&mut self, draft: ExpenseDraft) {
        self.title = draft.title;
        self.amount = draft.amount;
        self.category = draft.category;
        self.date = draft.date;
        self.note = draft.note;
    }
}
