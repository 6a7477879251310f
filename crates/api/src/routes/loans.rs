//! Loan management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{error_response, validation_response};
use crate::{AppState, middleware::AuthUser};
use ledgerly_db::repositories::loan::{CreateLoanInput, LoanRepository, UpdateLoanInput};
use ledgerly_db::entities::sea_orm_active_enums::{InstallmentStatus, LoanStatus};

/// Creates the loan routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/loans", get(list_loans))
        .route("/loans", post(create_loan))
        .route("/loans/{loan_id}", get(get_loan))
        .route("/loans/{loan_id}", put(update_loan))
        .route("/loans/{loan_id}", delete(delete_loan))
        .route("/loans/{loan_id}/close", post(close_loan))
        .route("/loans/{loan_id}/payments", get(list_payments))
        .route(
            "/loans/{loan_id}/payments/{payment_id}/paid",
            post(mark_payment_paid),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a loan.
#[derive(Debug, Deserialize)]
pub struct CreateLoanRequest {
    /// Loan display name.
    pub loan_name: String,
    /// Borrowed principal.
    pub principal_amount: Decimal,
    /// Annual interest rate in percent.
    pub interest_rate: Decimal,
    /// Number of monthly installments.
    pub tenure_months: u32,
    /// First day of the loan; defaults to today. Past dates are allowed and
    /// backfill the schedule.
    pub start_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for updating loan metadata.
#[derive(Debug, Deserialize)]
pub struct UpdateLoanRequest {
    /// New display name.
    pub loan_name: Option<String>,
    /// New notes.
    pub notes: Option<String>,
}

/// Request body for closing a loan.
#[derive(Debug, Default, Deserialize)]
pub struct CloseLoanRequest {
    /// Close as foreclosed (early payoff) instead of closed.
    #[serde(default)]
    pub foreclosed: bool,
}

/// Query parameters for loan listings.
#[derive(Debug, Default, Deserialize)]
pub struct LoanListQuery {
    /// Filter by loan status.
    pub status: Option<String>,
}

/// Query parameters for installment listings.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentListQuery {
    /// Filter by installment status.
    pub status: Option<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts loan status string to enum value.
fn parse_loan_status(s: &str) -> Option<LoanStatus> {
    match s.to_lowercase().as_str() {
        "active" => Some(LoanStatus::Active),
        "closed" => Some(LoanStatus::Closed),
        "foreclosed" => Some(LoanStatus::Foreclosed),
        _ => None,
    }
}

/// Converts installment status string to enum value.
fn parse_installment_status(s: &str) -> Option<InstallmentStatus> {
    match s.to_lowercase().as_str() {
        "pending" => Some(InstallmentStatus::Pending),
        "paid" => Some(InstallmentStatus::Paid),
        "overdue" => Some(InstallmentStatus::Overdue),
        _ => None,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/loans` - Create a loan with its schedule and ledger mirror.
async fn create_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateLoanRequest>,
) -> impl IntoResponse {
    let repo = LoanRepository::new((*state.db).clone());

    let start_date = payload.start_date.unwrap_or_else(|| Utc::now().date_naive());
    let input = CreateLoanInput {
        user_id: auth.user_id(),
        loan_name: payload.loan_name,
        principal_amount: payload.principal_amount,
        interest_rate: payload.interest_rate,
        tenure_months: payload.tenure_months,
        start_date,
        notes: payload.notes,
    };

    match repo.create_loan(input).await {
        Ok(created) => {
            info!(
                loan_id = %created.loan.id,
                installments = created.installments.len(),
                backfilled = created.past_payments_auto_marked,
                "Loan created with payment schedule"
            );
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Loan added successfully with payment schedule",
                    "loan": created.loan,
                    "installments": created.installments,
                    "ledger_entries_created": created.ledger_entries_created,
                    "past_payments_auto_marked": created.past_payments_auto_marked,
                    "future_payments_pending": created.future_payments_pending
                })),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET `/loans` - List loans with per-loan payment summaries.
async fn list_loans(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LoanListQuery>,
) -> impl IntoResponse {
    let status = match &query.status {
        Some(value) => match parse_loan_status(value) {
            Some(status) => Some(status),
            None => return validation_response(format!("Invalid status filter: {value}")),
        },
        None => None,
    };

    let repo = LoanRepository::new((*state.db).clone());
    match repo.list_loans(auth.user_id(), status).await {
        Ok(loans) => {
            let payload: Vec<_> = loans
                .into_iter()
                .map(|l| {
                    json!({
                        "loan": l.loan,
                        "payment_summary": l.summary
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({ "loans": payload }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET `/loans/{loan_id}` - Get a loan with its full schedule.
async fn get_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(loan_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = LoanRepository::new((*state.db).clone());
    match repo.get_loan(auth.user_id(), loan_id).await {
        Ok((loan, payments)) => (
            StatusCode::OK,
            Json(json!({ "loan": loan, "payments": payments })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT `/loans/{loan_id}` - Update loan metadata.
async fn update_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(loan_id): Path<Uuid>,
    Json(payload): Json<UpdateLoanRequest>,
) -> impl IntoResponse {
    let repo = LoanRepository::new((*state.db).clone());
    let input = UpdateLoanInput {
        loan_name: payload.loan_name,
        notes: payload.notes,
    };

    match repo.update_loan(auth.user_id(), loan_id, input).await {
        Ok(loan) => (
            StatusCode::OK,
            Json(json!({
                "message": "Loan updated successfully",
                "loan": loan
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/loans/{loan_id}/close` - Close (or foreclose) a loan and purge its
/// pending ledger entries.
async fn close_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(loan_id): Path<Uuid>,
    payload: Option<Json<CloseLoanRequest>>,
) -> impl IntoResponse {
    let foreclosed = payload.map(|Json(p)| p.foreclosed).unwrap_or_default();

    let repo = LoanRepository::new((*state.db).clone());
    match repo.close_loan(auth.user_id(), loan_id, foreclosed).await {
        Ok(closed) => {
            info!(
                loan_id = %loan_id,
                purged = closed.pending_ledger_entries_deleted,
                "Loan closed"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Loan closed successfully",
                    "loan": closed.loan,
                    "pending_ledger_entries_deleted": closed.pending_ledger_entries_deleted
                })),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// DELETE `/loans/{loan_id}` - Delete a loan; paid ledger history survives.
async fn delete_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(loan_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = LoanRepository::new((*state.db).clone());
    match repo.delete_loan(auth.user_id(), loan_id).await {
        Ok(purged) => (
            StatusCode::OK,
            Json(json!({
                "message": "Loan deleted successfully",
                "pending_ledger_entries_deleted": purged
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/loans/{loan_id}/payments` - List a loan's installments.
async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(loan_id): Path<Uuid>,
    Query(query): Query<PaymentListQuery>,
) -> impl IntoResponse {
    let status = match &query.status {
        Some(value) => match parse_installment_status(value) {
            Some(status) => Some(status),
            None => return validation_response(format!("Invalid status filter: {value}")),
        },
        None => None,
    };

    let repo = LoanRepository::new((*state.db).clone());
    match repo
        .list_installments(auth.user_id(), loan_id, status)
        .await
    {
        Ok(payments) => (StatusCode::OK, Json(json!({ "payments": payments }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/loans/{loan_id}/payments/{payment_id}/paid` - Mark an installment
/// paid and flip its ledger mirror.
async fn mark_payment_paid(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((loan_id, payment_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = LoanRepository::new((*state.db).clone());
    match repo
        .mark_installment_paid(auth.user_id(), loan_id, payment_id)
        .await
    {
        Ok(outcome) => {
            let message = if outcome.already_paid {
                "Installment was already paid"
            } else {
                "Installment marked as paid"
            };
            (
                StatusCode::OK,
                Json(json!({
                    "message": message,
                    "installment": outcome.installment,
                    "ledger_entries_updated": outcome.ledger_entries_updated,
                    "already_paid": outcome.already_paid
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
    fn test_parse_loan_status() {
        assert_eq!(parse_loan_status("active"), Some(LoanStatus::Active));
        assert_eq!(parse_loan_status("CLOSED"), Some(LoanStatus::Closed));
        assert_eq!(parse_loan_status("foreclosed"), Some(LoanStatus::Foreclosed));
        assert_eq!(parse_loan_status("bogus"), None);
    }

    #[test]
    fn test_parse_installment_status() {
        assert_eq!(
            parse_installment_status("pending"),
            Some(InstallmentStatus::Pending)
        );
        assert_eq!(parse_installment_status("Paid"), Some(InstallmentStatus::Paid));
        assert_eq!(
            parse_installment_status("overdue"),
            Some(InstallmentStatus::Overdue)
        );
        assert_eq!(parse_installment_status(""), None);
    }
}
