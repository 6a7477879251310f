//! Monthly-expense ledger routes.
//!
//! The ledger is mostly written by the engine itself (loan and debt
//! mirrors); these routes expose it for reporting and allow one-off entries
//! that are not linked to a loan or debt.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{error_response, validation_response};
use crate::{AppState, middleware::AuthUser};
use ledgerly_db::entities::sea_orm_active_enums::ExpenseStatus;
use ledgerly_db::repositories::expense::{CreateExpenseInput, ExpenseRepository};
use ledgerly_shared::types::MonthKey;

/// Creates the expense routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses))
        .route("/expenses", post(create_expense))
        .route("/expenses/{expense_id}/paid", post(mark_expense_paid))
        .route("/expenses/{expense_id}", delete(delete_expense))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a one-off ledger entry.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Expense category.
    pub category: String,
    /// Amount due.
    pub amount: Decimal,
    /// Free-form description.
    pub description: Option<String>,
    /// Payment method label.
    pub payment_method: Option<String>,
    /// Due date; the month bucket is derived from it.
    pub due_date: NaiveDate,
}

/// Query parameters for ledger listings.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseListQuery {
    /// Month bucket in `YYYY-MM` form.
    pub month_year: Option<String>,
    /// Filter by entry status.
    pub status: Option<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts expense status string to enum value.
fn parse_expense_status(s: &str) -> Option<ExpenseStatus> {
    match s.to_lowercase().as_str() {
        "pending" => Some(ExpenseStatus::Pending),
        "paid" => Some(ExpenseStatus::Paid),
        _ => None,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/expenses` - List ledger entries with summary totals.
async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ExpenseListQuery>,
) -> impl IntoResponse {
    let month = match &query.month_year {
        Some(value) => match MonthKey::parse(value) {
            Ok(month) => Some(month),
            Err(e) => return validation_response(e),
        },
        None => None,
    };
    let status = match &query.status {
        Some(value) => match parse_expense_status(value) {
            Some(status) => Some(status),
            None => return validation_response(format!("Invalid status filter: {value}")),
        },
        None => None,
    };

    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.list(auth.user_id(), month, status).await {
        Ok((expenses, summary)) => (
            StatusCode::OK,
            Json(json!({
                "expenses": expenses,
                "summary": summary
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/expenses` - Create a one-off ledger entry.
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    let input = CreateExpenseInput {
        user_id: auth.user_id(),
        category: payload.category,
        amount: payload.amount,
        description: payload.description,
        payment_method: payload.payment_method,
        due_date: payload.due_date,
    };

    match repo.create(input).await {
        Ok(expense) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Monthly expense added successfully",
                "expense": expense
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/expenses/{expense_id}/paid` - Mark a ledger entry as paid.
async fn mark_expense_paid(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.mark_paid(auth.user_id(), expense_id).await {
        Ok(expense) => (
            StatusCode::OK,
            Json(json!({
                "message": "Expense marked as paid",
                "expense": expense
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE `/expenses/{expense_id}` - Delete a ledger entry.
async fn delete_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.delete(auth.user_id(), expense_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Monthly expense deleted successfully" })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expense_status() {
        assert_eq!(parse_expense_status("pending"), Some(ExpenseStatus::Pending));
        assert_eq!(parse_expense_status("Paid"), Some(ExpenseStatus::Paid));
        assert_eq!(parse_expense_status("overdue"), None);
    }
}
