//! # REST API for Expenses
//!
//! Endpoints for listing, creating, editing, deleting and validating
//! expenses. Every endpoint is session-scoped; a record is only ever visible
//! to its owner.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::NaiveDate;
use shared::{
    Category, CreateExpenseRequest, DeleteExpenseResponse, ExpenseListRequest,
    ExpenseListResponse, ExpenseResponse, UpdateExpenseRequest, ValidateExpenseRequest,
};
use tracing::{error, info};

use super::auth_apis::authenticate;
use super::mappers::ExpenseMapper;
use crate::backend::domain::commands::expenses::{
    CreateExpenseCommand, DeleteExpenseCommand, ExpenseListQuery, UpdateExpenseCommand,
};
use crate::backend::domain::errors::ExpenseServiceError;
use crate::backend::domain::filter::ExpenseFilter;
use crate::backend::AppState;

/// Build a domain filter from the listing request's query parameters.
///
/// Unparsable values are a 400; an inverted range is NOT - it simply matches
/// nothing.
pub fn parse_filter(params: &ExpenseListRequest) -> Result<ExpenseFilter, String> {
    let mut filter = ExpenseFilter::new();

    if let Some(start) = &params.start_date {
        filter.start_date = Some(
            NaiveDate::parse_from_str(start, "%Y-%m-%d")
                .map_err(|_| format!("Invalid start_date '{}'", start))?,
        );
    }
    if let Some(end) = &params.end_date {
        filter.end_date = Some(
            NaiveDate::parse_from_str(end, "%Y-%m-%d")
                .map_err(|_| format!("Invalid end_date '{}'", end))?,
        );
    }
    if let Some(category) = &params.category {
        filter.category =
            Some(Category::parse(category).ok_or_else(|| format!("Unknown category '{}'", category))?);
    }

    Ok(filter)
}

fn service_error_response(error: ExpenseServiceError) -> Response {
    match &error {
        ExpenseServiceError::Validation(message) => {
            (StatusCode::BAD_REQUEST, message.clone()).into_response()
        }
        ExpenseServiceError::NotFound => {
            (StatusCode::NOT_FOUND, error.to_string()).into_response()
        }
        ExpenseServiceError::Persistence(source) => {
            error!("Storage failure: {:?}", source);
            (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
        }
    }
}

/// List expenses with optional date-range and category filtering
pub async fn list_expenses(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ExpenseListRequest>,
) -> impl IntoResponse {
    info!("GET /api/expenses - params: {:?}", params);

    let user = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let filter = match parse_filter(&params) {
        Ok(filter) => filter,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    match state.expense_service.list_expenses(ExpenseListQuery {
        owner_id: user.id,
        filter,
    }) {
        Ok(result) => (
            StatusCode::OK,
            Json(ExpenseListResponse {
                expenses: result
                    .expenses
                    .into_iter()
                    .map(ExpenseMapper::to_dto)
                    .collect(),
            }),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}

/// Create a new expense
pub async fn create_expense(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    info!("POST /api/expenses - request: {:?}", request);

    let user = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match state.expense_service.create_expense(CreateExpenseCommand {
        owner_id: user.id,
        title: request.title,
        amount: request.amount,
        category: request.category,
        date: request.date,
        note: request.note,
    }) {
        Ok(expense) => (
            StatusCode::CREATED,
            Json(ExpenseResponse {
                expense: ExpenseMapper::to_dto(expense),
                success_message: "Expense added".to_string(),
            }),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}

/// Overwrite an existing expense
pub async fn update_expense(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(expense_id): Path<String>,
    Json(request): Json<UpdateExpenseRequest>,
) -> impl IntoResponse {
    info!("PUT /api/expenses/{} - request: {:?}", expense_id, request);

    let user = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match state.expense_service.update_expense(UpdateExpenseCommand {
        owner_id: user.id,
        expense_id,
        title: request.title,
        amount: request.amount,
        category: request.category,
        date: request.date,
        note: request.note,
    }) {
        Ok(expense) => (
            StatusCode::OK,
            Json(ExpenseResponse {
                expense: ExpenseMapper::to_dto(expense),
                success_message: "Expense updated".to_string(),
            }),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}

/// Delete an expense
pub async fn delete_expense(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(expense_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/expenses/{}", expense_id);

    let user = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match state.expense_service.delete_expense(DeleteExpenseCommand {
        owner_id: user.id,
        expense_id,
    }) {
        Ok(result) => (
            StatusCode::OK,
            Json(DeleteExpenseResponse {
                deleted: result.deleted,
                success_message: result.success_message,
            }),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}

/// Validate form input without persisting anything
pub async fn validate_expense(
    State(state): State<AppState>,
    Json(request): Json<ValidateExpenseRequest>,
) -> impl IntoResponse {
    let validation = state.expense_service.validator().validate_form(
        &request.title,
        &request.amount_input,
        &request.category,
        &request.date,
    );

    (StatusCode::OK, Json(validation)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_state;
    use axum::http::header;

    fn signed_in_headers(state: &AppState) -> HeaderMap {
        state
            .auth_service
            .sign_up(crate::backend::domain::commands::auth::SignUpCommand {
                email: "ada@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .unwrap();
        let result = state
            .auth_service
            .sign_in(crate::backend::domain::commands::auth::SignInCommand {
                email: "ada@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", result.session_token).parse().unwrap(),
        );
        headers
    }

    fn create_request(title: &str, amount: f64, category: &str) -> CreateExpenseRequest {
        CreateExpenseRequest {
            title: title.to_string(),
            amount,
            category: category.to_string(),
            date: Some("2025-06-10".to_string()),
            note: None,
        }
    }

    #[tokio::test]
    async fn test_create_expense_handler() {
        let (state, _env) = test_state();
        let headers = signed_in_headers(&state);

        let response = create_expense(
            State(state),
            headers,
            Json(create_request("Lunch", 12.0, "Food")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_create_expense_validation_error() {
        let (state, _env) = test_state();
        let headers = signed_in_headers(&state);

        // Empty title should fail validation
        let response = create_expense(
            State(state),
            headers,
            Json(create_request("", 12.0, "Food")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_endpoints_require_a_session() {
        let (state, _env) = test_state();

        let response = create_expense(
            State(state.clone()),
            HeaderMap::new(),
            Json(create_request("Lunch", 12.0, "Food")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = list_expenses(
            State(state),
            HeaderMap::new(),
            Query(ExpenseListRequest {
                start_date: None,
                end_date: None,
                category: None,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_filter_params() {
        let (state, _env) = test_state();
        let headers = signed_in_headers(&state);

        let response = list_expenses(
            State(state),
            headers,
            Query(ExpenseListRequest {
                start_date: Some("yesterday".to_string()),
                end_date: None,
                category: None,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_missing_expense_is_not_found() {
        let (state, _env) = test_state();
        let headers = signed_in_headers(&state);

        let response = update_expense(
            State(state),
            headers,
            Path("expense::404".to_string()),
            Json(UpdateExpenseRequest {
                title: "Dinner".to_string(),
                amount: 30.0,
                category: "Food".to_string(),
                date: "2025-06-10".to_string(),
                note: None,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validate_expense_handler() {
        let (state, _env) = test_state();

        let response = validate_expense(
            State(state),
            Json(ValidateExpenseRequest {
                title: String::new(),
                amount_input: "abc".to_string(),
                category: "Food".to_string(),
                date: "2025-06-10".to_string(),
            }),
        )
        .await
        .into_response();

        // Validation problems are reported in the body, not the status
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_parse_filter() {
        let filter = parse_filter(&ExpenseListRequest {
            start_date: Some("2025-05-01".to_string()),
            end_date: Some("2025-06-01".to_string()),
            category: Some("Food".to_string()),
        })
        .unwrap();
        assert_eq!(filter.category, Some(Category::Food));
        assert!(filter.start_date.is_some());
        assert!(filter.end_date.is_some());

        assert!(parse_filter(&ExpenseListRequest {
            start_date: None,
            end_date: None,
            category: Some("Groceries".to_string()),
        })
        .is_err());
    }
}
