//! Expense aggregation: grand total and per-category subtotals.
//!
//! Both functions are pure and side-effect-free, so they can be recomputed on
//! every view refresh without caching. Summation uses plain f64 addition in
//! the input's insertion order; results match a reference decimal sum within
//! 1e-9 for realistic record counts.

use std::collections::BTreeMap;

use shared::Category;

use crate::backend::domain::models::expense::Expense;

/// Category-to-amount mapping, recomputed per call and never mutated in
/// place. Categories without records are absent, never zero entries.
pub type CategoryTotals = BTreeMap<Category, f64>;

/// Sum of all amounts in the collection. Empty input sums to 0.
pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

/// Per-category sums over the collection.
///
/// Returns a fresh map on every call; only categories that actually occur in
/// the input appear as keys.
pub fn category_totals(expenses: &[Expense]) -> CategoryTotals {
    let mut totals = CategoryTotals::new();

    for expense in expenses {
        *totals.entry(expense.category).or_insert(0.0) += expense.amount;
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const TOLERANCE: f64 = 1e-9;

    fn expense(title: &str, amount: f64, category: Category) -> Expense {
        Expense {
            id: format!("expense::{}", title.len()),
            owner_id: "user::a".to_string(),
            title: title.to_string(),
            amount,
            category,
            date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            note: String::new(),
            created_at: "2025-06-10T12:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_total_of_empty_is_zero() {
        assert_eq!(total(&[]), 0.0);
        assert!(category_totals(&[]).is_empty());
    }

    #[test]
    fn test_totals_scenario() {
        // [{Food,100},{Food,50},{Transport,30}] -> total 180, Food 150, Transport 30
        let expenses = vec![
            expense("groceries", 100.0, Category::Food),
            expense("snacks", 50.0, Category::Food),
            expense("bus", 30.0, Category::Transport),
        ];

        assert!((total(&expenses) - 180.0).abs() < TOLERANCE);

        let by_category = category_totals(&expenses);
        assert_eq!(by_category.len(), 2);
        assert!((by_category[&Category::Food] - 150.0).abs() < TOLERANCE);
        assert!((by_category[&Category::Transport] - 30.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_absent_categories_are_omitted() {
        let expenses = vec![expense("rent", 800.0, Category::Bills)];
        let by_category = category_totals(&expenses);

        assert_eq!(by_category.len(), 1);
        assert!(!by_category.contains_key(&Category::Food));
    }

    #[test]
    fn test_categories_partition_the_total() {
        let expenses = vec![
            expense("groceries", 33.33, Category::Food),
            expense("bus", 2.75, Category::Transport),
            expense("power", 61.20, Category::Bills),
            expense("books", 19.99, Category::Education),
            expense("cinema", 12.00, Category::Luxuries),
            expense("misc", 0.01, Category::Others),
            expense("coffee", 4.50, Category::Food),
        ];

        let by_category = category_totals(&expenses);
        let partition_sum: f64 = by_category.values().sum();
        assert!((partition_sum - total(&expenses)).abs() < TOLERANCE);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let expenses = vec![
            expense("groceries", 100.0, Category::Food),
            expense("bus", 30.0, Category::Transport),
        ];

        assert_eq!(total(&expenses), total(&expenses));
        assert_eq!(category_totals(&expenses), category_totals(&expenses));
    }

    #[test]
    fn test_each_call_returns_a_fresh_map() {
        let expenses = vec![expense("groceries", 100.0, Category::Food)];

        let mut first = category_totals(&expenses);
        first.insert(Category::Others, 999.0);

        let second = category_totals(&expenses);
        assert!(!second.contains_key(&Category::Others));
    }

    #[test]
    fn test_zero_amount_records_still_appear() {
        let expenses = vec![expense("free sample", 0.0, Category::Food)];
        let by_category = category_totals(&expenses);

        // A present category with a zero sum is not the same as an absent one
        assert_eq!(by_category.get(&Category::Food), Some(&0.0));
    }
}
