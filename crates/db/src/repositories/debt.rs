//! Debt repository: debt CRUD and the partial-payment operation.
//!
//! A payment and its ledger mirror commit together or not at all. The debt
//! row is locked for the duration of the unit of work, so two simultaneous
//! payments against the same debt serialize and the second one plans
//! against the already-updated balance.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use ledgerly_core::debt::{PaymentError, plan_payment};
use ledgerly_core::ledger::debt_payment_mirror;

use crate::entities::{debts, sea_orm_active_enums::DebtStatus};
use crate::repositories::expense;

/// Error types for debt operations.
#[derive(Debug, thiserror::Error)]
pub enum DebtError {
    /// Debt not found.
    #[error("Debt not found: {0}")]
    NotFound(Uuid),

    /// Debt name is required.
    #[error("Debt name is required")]
    EmptyName,

    /// Payment input was rejected.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a debt.
#[derive(Debug, Clone)]
pub struct CreateDebtInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Display name; also seeds the ledger category.
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

/// Input for updating debt metadata.
#[derive(Debug, Clone, Default)]
pub struct UpdateDebtInput {
    /// New display name.
    pub debt_name: Option<String>,
    /// New creditor.
    pub creditor: Option<String>,
    /// New settlement deadline.
    pub due_date: Option<NaiveDate>,
    /// New notes.
    pub notes: Option<String>,
}

/// Outcome of applying one payment to a debt.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    /// The debt row after the payment.
    pub debt: debts::Model,
    /// Increment actually applied (clamped, never past the total).
    pub applied_amount: Decimal,
    /// True when a ledger row was written for this increment.
    pub ledger_entry_created: bool,
}

/// Debt repository for debt state and payments.
#[derive(Debug, Clone)]
pub struct DebtRepository {
    db: DatabaseConnection,
}

impl DebtRepository {
    /// Creates a new debt repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a debt in the pending state.
    ///
    /// # Errors
    ///
    /// Rejects blank names and non-positive totals before any storage
    /// access.
    pub async fn create_debt(&self, input: CreateDebtInput) -> Result<debts::Model, DebtError> {
        if input.debt_name.trim().is_empty() {
            return Err(DebtError::EmptyName);
        }
        let total = input.total_amount.round_dp(2);
        if total <= Decimal::ZERO {
            return Err(DebtError::Payment(PaymentError::NonPositiveTotal));
        }

        let now = Utc::now().into();
        let debt = debts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            debt_name: Set(input.debt_name),
            total_amount: Set(total),
            amount_paid: Set(Decimal::ZERO),
            creditor: Set(input.creditor),
            due_date: Set(input.due_date),
            notes: Set(input.notes),
            status: Set(DebtStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(debt.insert(&self.db).await?)
    }

    /// Lists a user's debts, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_debts(
        &self,
        user_id: Uuid,
        status: Option<DebtStatus>,
    ) -> Result<Vec<debts::Model>, DebtError> {
        let mut query = debts::Entity::find().filter(debts::Column::UserId.eq(user_id));
        if let Some(status) = status {
            query = query.filter(debts::Column::Status.eq(status));
        }

        Ok(query
            .order_by_asc(debts::Column::DueDate)
            .order_by_desc(debts::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Gets a single debt.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the debt does not exist or belongs to another
    /// user.
    pub async fn get_debt(&self, user_id: Uuid, debt_id: Uuid) -> Result<debts::Model, DebtError> {
        debts::Entity::find_by_id(debt_id)
            .filter(debts::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(DebtError::NotFound(debt_id))
    }

    /// Updates debt metadata. Amounts and status are only ever changed by
    /// payments.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing debt and `EmptyName` for a blank
    /// name.
    pub async fn update_debt(
        &self,
        user_id: Uuid,
        debt_id: Uuid,
        input: UpdateDebtInput,
    ) -> Result<debts::Model, DebtError> {
        if let Some(name) = &input.debt_name {
            if name.trim().is_empty() {
                return Err(DebtError::EmptyName);
            }
        }

        let debt = self.get_debt(user_id, debt_id).await?;

        let mut active: debts::ActiveModel = debt.into();
        if let Some(name) = input.debt_name {
            active.debt_name = Set(name);
        }
        if let Some(creditor) = input.creditor {
            active.creditor = Set(Some(creditor));
        }
        if let Some(due_date) = input.due_date {
            active.due_date = Set(Some(due_date));
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a debt. Paid ledger rows keep the history with their
    /// back-reference cleared.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the debt does not exist or belongs to another
    /// user.
    pub async fn delete_debt(&self, user_id: Uuid, debt_id: Uuid) -> Result<(), DebtError> {
        let result = debts::Entity::delete_many()
            .filter(debts::Column::Id.eq(debt_id))
            .filter(debts::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DebtError::NotFound(debt_id));
        }
        Ok(())
    }

    /// Applies a payment to a debt.
    ///
    /// With no amount the debt is settled in full. The applied increment is
    /// clamped at the remaining balance; the debt update and the ledger row
    /// for the increment commit in the same unit of work. A payment against
    /// an already-settled debt applies zero, writes nothing, and is safe to
    /// retry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing debt, a payment validation error
    /// before anything is written, or a database error after rollback.
    pub async fn apply_payment(
        &self,
        user_id: Uuid,
        debt_id: Uuid,
        amount: Option<Decimal>,
    ) -> Result<PaymentReceipt, DebtError> {
        let txn = self.db.begin().await?;

        let debt = debts::Entity::find_by_id(debt_id)
            .filter(debts::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DebtError::NotFound(debt_id))?;

        let plan = plan_payment(debt.total_amount, debt.amount_paid, amount)?;

        if plan.is_noop() {
            txn.commit().await?;
            return Ok(PaymentReceipt {
                debt,
                applied_amount: Decimal::ZERO,
                ledger_entry_created: false,
            });
        }

        let debt_name = debt.debt_name.clone();
        let mut active: debts::ActiveModel = debt.into();
        active.amount_paid = Set(plan.new_amount_paid);
        active.status = Set(plan.new_status.into());
        active.updated_at = Set(Utc::now().into());
        let debt = active.update(&txn).await?;

        let today = Utc::now().date_naive();
        let draft = debt_payment_mirror(&debt_name, plan.applied, today);
        expense::insert_debt_payment_mirror(&txn, user_id, debt.id, &draft).await?;

        txn.commit().await?;

        Ok(PaymentReceipt {
            debt,
            applied_amount: plan.applied,
            ledger_entry_created: true,
        })
    }
}

impl From<DebtError> for ledgerly_shared::AppError {
    fn from(e: DebtError) -> Self {
        match e {
            DebtError::NotFound(_) => Self::NotFound(e.to_string()),
            DebtError::EmptyName | DebtError::Payment(_) => Self::Validation(e.to_string()),
            DebtError::Database(_) => Self::Database(e.to_string()),
        }
    }
}
