//! # REST API for the Expense Summary
//!
//! One endpoint returning the filtered expense rows together with the grand
//! total, per-category totals and the chart series - everything the list
//! page and the breakdown chart need, computed in a single pass.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use super::auth_apis::authenticate;
use super::expense_apis::parse_filter;
use shared::ExpenseListRequest;
use crate::backend::domain::commands::expenses::ExpenseSummaryQuery;
use crate::backend::AppState;

/// Filtered expenses plus aggregates, shaped for display
pub async fn get_expense_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ExpenseListRequest>,
) -> impl IntoResponse {
    info!("GET /api/expenses/summary - params: {:?}", params);

    let user = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let filter = match parse_filter(&params) {
        Ok(filter) => filter,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    match state.expense_service.summarize(ExpenseSummaryQuery {
        owner_id: user.id,
        filter,
    }) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!("Failed to build expense summary: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error building summary").into_response()
        }
    }
}
