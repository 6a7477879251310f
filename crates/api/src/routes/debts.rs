//! Debt management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{error_response, validation_response};
use crate::{AppState, middleware::AuthUser};
use ledgerly_db::entities::sea_orm_active_enums::DebtStatus;
use ledgerly_db::repositories::debt::{CreateDebtInput, DebtRepository, UpdateDebtInput};

/// Creates the debt routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/debts", get(list_debts))
        .route("/debts", post(create_debt))
        .route("/debts/{debt_id}", get(get_debt))
        .route("/debts/{debt_id}", put(update_debt))
        .route("/debts/{debt_id}", delete(delete_debt))
        .route("/debts/{debt_id}/payments", post(apply_payment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a debt.
#[derive(Debug, Deserialize)]
pub struct CreateDebtRequest {
    /// Debt display name.
    pub debt_name: String,
    /// Total owed.
    pub total_amount: Decimal,
    /// Who the debt is owed to.
    pub creditor: Option<String>,
    /// Optional settlement deadline.
    pub due_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for updating debt metadata.
#[derive(Debug, Deserialize)]
pub struct UpdateDebtRequest {
    /// New display name.
    pub debt_name: Option<String>,
    /// New creditor.
    pub creditor: Option<String>,
    /// New settlement deadline.
    pub due_date: Option<NaiveDate>,
    /// New notes.
    pub notes: Option<String>,
}

/// Request body for applying a payment. An absent amount settles the debt in
/// full.
#[derive(Debug, Default, Deserialize)]
pub struct ApplyPaymentRequest {
    /// Payment amount; clamped at the remaining balance.
    pub amount: Option<Decimal>,
}

/// Query parameters for debt listings.
#[derive(Debug, Default, Deserialize)]
pub struct DebtListQuery {
    /// Filter by debt status.
    pub status: Option<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts debt status string to enum value.
fn parse_debt_status(s: &str) -> Option<DebtStatus> {
    match s.to_lowercase().as_str() {
        "pending" => Some(DebtStatus::Pending),
        "partially_paid" => Some(DebtStatus::PartiallyPaid),
        "paid" => Some(DebtStatus::Paid),
        _ => None,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/debts` - Create a debt.
async fn create_debt(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateDebtRequest>,
) -> impl IntoResponse {
    let repo = DebtRepository::new((*state.db).clone());
    let input = CreateDebtInput {
        user_id: auth.user_id(),
        debt_name: payload.debt_name,
        total_amount: payload.total_amount,
        creditor: payload.creditor,
        due_date: payload.due_date,
        notes: payload.notes,
    };

    match repo.create_debt(input).await {
        Ok(debt) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Debt added successfully",
                "debt": debt
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/debts` - List debts.
async fn list_debts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DebtListQuery>,
) -> impl IntoResponse {
    let status = match &query.status {
        Some(value) => match parse_debt_status(value) {
            Some(status) => Some(status),
            None => {
                return validation_response(format!("Invalid status filter: {value}"));
            }
        },
        None => None,
    };

    let repo = DebtRepository::new((*state.db).clone());
    match repo.list_debts(auth.user_id(), status).await {
        Ok(debts) => (StatusCode::OK, Json(json!({ "debts": debts }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/debts/{debt_id}` - Get a single debt.
async fn get_debt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(debt_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DebtRepository::new((*state.db).clone());
    match repo.get_debt(auth.user_id(), debt_id).await {
        Ok(debt) => (StatusCode::OK, Json(json!({ "debt": debt }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT `/debts/{debt_id}` - Update debt metadata.
async fn update_debt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(debt_id): Path<Uuid>,
    Json(payload): Json<UpdateDebtRequest>,
) -> impl IntoResponse {
    let repo = DebtRepository::new((*state.db).clone());
    let input = UpdateDebtInput {
        debt_name: payload.debt_name,
        creditor: payload.creditor,
        due_date: payload.due_date,
        notes: payload.notes,
    };

    match repo.update_debt(auth.user_id(), debt_id, input).await {
        Ok(debt) => (
            StatusCode::OK,
            Json(json!({
                "message": "Debt updated successfully",
                "debt": debt
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE `/debts/{debt_id}` - Delete a debt; payment history survives.
async fn delete_debt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(debt_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DebtRepository::new((*state.db).clone());
    match repo.delete_debt(auth.user_id(), debt_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Debt deleted successfully" })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/debts/{debt_id}/payments` - Apply a partial or full payment.
async fn apply_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(debt_id): Path<Uuid>,
    payload: Option<Json<ApplyPaymentRequest>>,
) -> impl IntoResponse {
    let amount = payload.and_then(|Json(p)| p.amount);

    let repo = DebtRepository::new((*state.db).clone());
    match repo.apply_payment(auth.user_id(), debt_id, amount).await {
        Ok(receipt) => {
            info!(
                debt_id = %debt_id,
                applied = %receipt.applied_amount,
                "Debt payment applied"
            );
            let message = if !receipt.ledger_entry_created {
                "Debt already fully paid; nothing applied"
            } else if receipt.debt.status == DebtStatus::Paid {
                "Debt marked as fully paid"
            } else {
                "Partial payment recorded"
            };
            (
                StatusCode::OK,
                Json(json!({
                    "message": message,
                    "debt": receipt.debt,
                    "applied_amount": receipt.applied_amount,
                    "ledger_entry_created": receipt.ledger_entry_created
                })),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_debt_status() {
        assert_eq!(parse_debt_status("pending"), Some(DebtStatus::Pending));
        assert_eq!(
            parse_debt_status("partially_paid"),
            Some(DebtStatus::PartiallyPaid)
        );
        assert_eq!(parse_debt_status("PAID"), Some(DebtStatus::Paid));
        assert_eq!(parse_debt_status("settled"), None);
    }
}
