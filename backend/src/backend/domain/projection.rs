//! View projection: shaping filtered, aggregated expenses for display.
//!
//! Pure formatting - no error conditions. The list keeps the collection's
//! stable insertion order (no re-sorting), and the chart gets one slice per
//! category present in the aggregation, colored by cycling a fixed palette.

use shared::{CategoryTotalEntry, ChartSlice, ExpenseFormConfig, ExpenseRow, ExpenseSummaryResponse};

use crate::backend::domain::aggregation::{self, CategoryTotals};
use crate::backend::domain::models::expense::Expense;

/// Chart palette, cycled by category index.
pub const CHART_PALETTE: [&str; 6] = [
    "rgba(255, 99, 132, 0.5)",
    "rgba(54, 162, 235, 0.5)",
    "rgba(255, 206, 86, 0.5)",
    "rgba(75, 192, 192, 0.5)",
    "rgba(153, 102, 255, 0.5)",
    "rgba(255, 159, 64, 0.5)",
];

/// Projection service for the expense list, summary and chart.
#[derive(Clone)]
pub struct ProjectionService {
    config: ExpenseFormConfig,
}

impl Default for ProjectionService {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectionService {
    pub fn new() -> Self {
        Self {
            config: ExpenseFormConfig::default(),
        }
    }

    pub fn with_config(config: ExpenseFormConfig) -> Self {
        Self { config }
    }

    /// Format amount for display
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.config.currency_symbol, amount)
    }

    /// Rows for the expense list, in the collection's own order.
    pub fn display_rows(&self, expenses: &[Expense]) -> Vec<ExpenseRow> {
        expenses
            .iter()
            .map(|e| ExpenseRow {
                id: e.id.clone(),
                title: e.title.clone(),
                formatted_amount: self.format_amount(e.amount),
                category: e.category.as_str().to_string(),
                date: e.date.format("%Y-%m-%d").to_string(),
                note: e.note.clone(),
            })
            .collect()
    }

    /// One label/value/color entry per category present in the aggregation.
    pub fn chart_series(&self, totals: &CategoryTotals) -> Vec<ChartSlice> {
        totals
            .iter()
            .map(|(category, amount)| ChartSlice {
                label: category.as_str().to_string(),
                value: *amount,
                color: CHART_PALETTE[category.index() % CHART_PALETTE.len()].to_string(),
            })
            .collect()
    }

    /// Full summary projection over an already-filtered collection.
    ///
    /// The aggregates are computed once and shared between the summary block
    /// and the chart series.
    pub fn project_summary(&self, expenses: &[Expense]) -> ExpenseSummaryResponse {
        let total = aggregation::total(expenses);
        let totals = aggregation::category_totals(expenses);

        ExpenseSummaryResponse {
            rows: self.display_rows(expenses),
            total,
            formatted_total: self.format_amount(total),
            category_totals: totals
                .iter()
                .map(|(category, amount)| CategoryTotalEntry {
                    category: *category,
                    amount: *amount,
                })
                .collect(),
            chart: self.chart_series(&totals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::Category;

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
    fn test_rows_preserve_insertion_order() {
        let projection = ProjectionService::new();
        let expenses = vec![
            expense("third", 3.0, Category::Bills),
            expense("first", 1.0, Category::Food),
            expense("second", 2.0, Category::Food),
        ];

        let rows = projection.display_rows(&expenses);
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "first", "second"]);
    }

    #[test]
    fn test_amount_formatting() {
        let projection = ProjectionService::new();
        assert_eq!(projection.format_amount(12.5), "$12.50");
        assert_eq!(projection.format_amount(0.0), "$0.00");
        assert_eq!(projection.format_amount(1234.567), "$1234.57");
    }

    #[test]
    fn test_chart_colors_follow_category_index() {
        let projection = ProjectionService::new();
        let expenses = vec![
            expense("groceries", 100.0, Category::Food),
            expense("cinema", 25.0, Category::Luxuries),
        ];

        let totals = aggregation::category_totals(&expenses);
        let chart = projection.chart_series(&totals);

        assert_eq!(chart.len(), 2);
        let food = chart.iter().find(|s| s.label == "Food").unwrap();
        assert_eq!(food.color, CHART_PALETTE[Category::Food.index()]);
        let luxuries = chart.iter().find(|s| s.label == "Luxuries").unwrap();
        assert_eq!(luxuries.color, CHART_PALETTE[Category::Luxuries.index()]);
    }

    #[test]
    fn test_chart_omits_absent_categories() {
        let projection = ProjectionService::new();
        let expenses = vec![expense("rent", 800.0, Category::Bills)];

        let totals = aggregation::category_totals(&expenses);
        let chart = projection.chart_series(&totals);

        assert_eq!(chart.len(), 1);
        assert_eq!(chart[0].label, "Bills");
        assert_eq!(chart[0].value, 800.0);
    }

    #[test]
    fn test_summary_chart_and_totals_agree() {
        let projection = ProjectionService::new();
        let expenses = vec![
            expense("groceries", 100.0, Category::Food),
            expense("snacks", 50.0, Category::Food),
            expense("bus", 30.0, Category::Transport),
        ];

        let summary = projection.project_summary(&expenses);

        assert_eq!(summary.total, 180.0);
        assert_eq!(summary.formatted_total, "$180.00");
        assert_eq!(summary.rows.len(), 3);

        let chart_sum: f64 = summary.chart.iter().map(|s| s.value).sum();
        assert!((chart_sum - summary.total).abs() < 1e-9);

        let entry_sum: f64 = summary.category_totals.iter().map(|e| e.amount).sum();
        assert!((entry_sum - summary.total).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let projection = ProjectionService::new();
        let summary = projection.project_summary(&[]);

        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.formatted_total, "$0.00");
        assert!(summary.rows.is_empty());
        assert!(summary.chart.is_empty());
        assert!(summary.category_totals.is_empty());
    }
}
