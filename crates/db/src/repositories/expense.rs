//! Monthly-expense repository: the ledger mirror and the ledger API.
//!
//! The mirror helpers take a `DatabaseTransaction` because they only ever
//! run inside the unit of work of the loan or debt operation that triggered
//! them; a mirror row is never written on its own.

use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use ledgerly_core::ledger::LedgerDraft;
use ledgerly_shared::types::MonthKey;

use crate::entities::{loan_payments, monthly_expenses, sea_orm_active_enums::ExpenseStatus};

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Ledger entry not found.
    #[error("Ledger entry not found: {0}")]
    NotFound(Uuid),

    /// Category is required.
    #[error("Category is required")]
    EmptyCategory,

    /// Amount must be positive.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a one-off ledger entry.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Owning user.
    pub user_id: Uuid,
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

/// Summary totals over a set of ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ExpenseSummary {
    /// Number of entries.
    pub total_entries: usize,
    /// Number of pending entries.
    pub pending: usize,
    /// Number of paid entries.
    pub paid: usize,
    /// Sum of all amounts.
    pub total_amount: Decimal,
    /// Sum of paid amounts.
    pub paid_amount: Decimal,
    /// Sum of pending amounts.
    pub pending_amount: Decimal,
}

/// Folds a set of ledger entries into summary totals.
#[must_use]
pub fn summarize(entries: &[monthly_expenses::Model]) -> ExpenseSummary {
    let mut summary = ExpenseSummary {
        total_entries: entries.len(),
        pending: 0,
        paid: 0,
        total_amount: Decimal::ZERO,
        paid_amount: Decimal::ZERO,
        pending_amount: Decimal::ZERO,
    };
    for entry in entries {
        summary.total_amount += entry.amount;
        match entry.status {
            ExpenseStatus::Paid => {
                summary.paid += 1;
                summary.paid_amount += entry.amount;
            }
            ExpenseStatus::Pending => {
                summary.pending += 1;
                summary.pending_amount += entry.amount;
            }
        }
    }
    summary
}

fn day_start(date: NaiveDate) -> sea_orm::prelude::DateTimeWithTimeZone {
    date.and_time(NaiveTime::MIN).and_utc().into()
}

/// Inserts the mirror row for one installment inside the loan-creation
/// transaction. Status and settlement date come verbatim from the draft, so
/// backfilled installments land as already-paid history.
pub(crate) async fn insert_installment_mirror(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    installment_id: Uuid,
    draft: &LedgerDraft,
) -> Result<monthly_expenses::Model, DbErr> {
    let now = Utc::now().into();

    let entry = monthly_expenses::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        category: Set(draft.category.clone()),
        amount: Set(draft.amount),
        description: Set(draft.description.clone()),
        payment_method: Set(None),
        month_year: Set(draft.month_key.to_string()),
        due_date: Set(draft.due_date),
        status: Set(draft.status.into()),
        paid_on: Set(draft.paid_on.map(day_start)),
        loan_payment_id: Set(Some(installment_id)),
        debt_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    entry.insert(txn).await
}

/// Inserts the mirror row for one applied debt-payment increment inside the
/// payment transaction. Always lands as paid, dated now.
pub(crate) async fn insert_debt_payment_mirror(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    debt_id: Uuid,
    draft: &LedgerDraft,
) -> Result<monthly_expenses::Model, DbErr> {
    let now = Utc::now();

    let entry = monthly_expenses::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        category: Set(draft.category.clone()),
        amount: Set(draft.amount),
        description: Set(draft.description.clone()),
        payment_method: Set(None),
        month_year: Set(draft.month_key.to_string()),
        due_date: Set(draft.due_date),
        status: Set(ExpenseStatus::Paid),
        paid_on: Set(Some(now.into())),
        loan_payment_id: Set(None),
        debt_id: Set(Some(debt_id)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    entry.insert(txn).await
}

/// Deletes the loan's pending mirror rows inside the close/delete
/// transaction. Paid rows are never touched; they are permanent history.
///
/// Returns the number of rows deleted.
pub(crate) async fn purge_pending_for_loan(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    loan_id: Uuid,
) -> Result<u64, DbErr> {
    let installment_ids: Vec<Uuid> = loan_payments::Entity::find()
        .select_only()
        .column(loan_payments::Column::Id)
        .filter(loan_payments::Column::LoanId.eq(loan_id))
        .into_tuple()
        .all(txn)
        .await?;

    if installment_ids.is_empty() {
        return Ok(0);
    }

    let result = monthly_expenses::Entity::delete_many()
        .filter(monthly_expenses::Column::UserId.eq(user_id))
        .filter(monthly_expenses::Column::LoanPaymentId.is_in(installment_ids))
        .filter(monthly_expenses::Column::Status.eq(ExpenseStatus::Pending))
        .exec(txn)
        .await?;

    Ok(result.rows_affected)
}

/// Flips the mirror row of an installment to paid inside the mark-paid
/// transaction, matched by the stored installment identifier.
///
/// Returns the number of rows updated (0 when no mirror exists).
pub(crate) async fn mark_paid_for_installment(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    installment_id: Uuid,
) -> Result<u64, DbErr> {
    let entry = monthly_expenses::Entity::find()
        .filter(monthly_expenses::Column::UserId.eq(user_id))
        .filter(monthly_expenses::Column::LoanPaymentId.eq(installment_id))
        .one(txn)
        .await?;

    let Some(entry) = entry else {
        return Ok(0);
    };

    let now = Utc::now();
    let mut active: monthly_expenses::ActiveModel = entry.into();
    active.status = Set(ExpenseStatus::Paid);
    active.paid_on = Set(Some(now.into()));
    active.updated_at = Set(now.into());
    active.update(txn).await?;

    Ok(1)
}

/// Ledger repository for the monthly-expense API.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists ledger entries for a user with optional month/status filters,
    /// together with summary totals over the filtered set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        month: Option<MonthKey>,
        status: Option<ExpenseStatus>,
    ) -> Result<(Vec<monthly_expenses::Model>, ExpenseSummary), ExpenseError> {
        let mut query = monthly_expenses::Entity::find()
            .filter(monthly_expenses::Column::UserId.eq(user_id));

        if let Some(month) = month {
            query = query.filter(monthly_expenses::Column::MonthYear.eq(month.to_string()));
        }
        if let Some(status) = status {
            query = query.filter(monthly_expenses::Column::Status.eq(status));
        }

        let entries = query
            .order_by_asc(monthly_expenses::Column::DueDate)
            .order_by_desc(monthly_expenses::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let summary = summarize(&entries);
        Ok((entries, summary))
    }

    /// Creates a one-off ledger entry (not linked to a loan or debt).
    ///
    /// # Errors
    ///
    /// Rejects empty categories and non-positive amounts.
    pub async fn create(
        &self,
        input: CreateExpenseInput,
    ) -> Result<monthly_expenses::Model, ExpenseError> {
        if input.category.trim().is_empty() {
            return Err(ExpenseError::EmptyCategory);
        }
        let amount = input.amount.round_dp(2);
        if amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount);
        }

        let now = Utc::now().into();
        let entry = monthly_expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            category: Set(input.category),
            amount: Set(amount),
            description: Set(input.description),
            payment_method: Set(input.payment_method),
            month_year: Set(MonthKey::from_date(input.due_date).to_string()),
            due_date: Set(input.due_date),
            status: Set(ExpenseStatus::Pending),
            paid_on: Set(None),
            loan_payment_id: Set(None),
            debt_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(entry.insert(&self.db).await?)
    }

    /// Marks a ledger entry as paid. Marking an already-paid entry again is
    /// a benign no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist or belongs to another
    /// user.
    pub async fn mark_paid(
        &self,
        user_id: Uuid,
        expense_id: Uuid,
    ) -> Result<monthly_expenses::Model, ExpenseError> {
        let entry = monthly_expenses::Entity::find_by_id(expense_id)
            .filter(monthly_expenses::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(expense_id))?;

        if entry.status == ExpenseStatus::Paid {
            return Ok(entry);
        }

        let now = Utc::now();
        let mut active: monthly_expenses::ActiveModel = entry.into();
        active.status = Set(ExpenseStatus::Paid);
        active.paid_on = Set(Some(now.into()));
        active.updated_at = Set(now.into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a ledger entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist or belongs to another
    /// user.
    pub async fn delete(&self, user_id: Uuid, expense_id: Uuid) -> Result<(), ExpenseError> {
        let result = monthly_expenses::Entity::delete_many()
            .filter(monthly_expenses::Column::Id.eq(expense_id))
            .filter(monthly_expenses::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ExpenseError::NotFound(expense_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(amount: Decimal, status: ExpenseStatus) -> monthly_expenses::Model {
        let now = Utc::now().into();
        monthly_expenses::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category: "Rent".to_string(),
            amount,
            description: None,
            payment_method: None,
            month_year: "2026-08".to_string(),
            due_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            status,
            paid_on: None,
            loan_payment_id: None,
            debt_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_summarize_mixed_entries() {
        let entries = vec![
            entry(dec!(100), ExpenseStatus::Paid),
            entry(dec!(250.50), ExpenseStatus::Pending),
            entry(dec!(49.50), ExpenseStatus::Pending),
        ];

        let summary = summarize(&entries);
        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.paid, 1);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.total_amount, dec!(400));
        assert_eq!(summary.paid_amount, dec!(100));
        assert_eq!(summary.pending_amount, dec!(300));
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_entries, 0);
        assert_eq!(summary.total_amount, Decimal::ZERO);
    }
}

impl From<ExpenseError> for ledgerly_shared::AppError {
    fn from(e: ExpenseError) -> Self {
        match e {
            ExpenseError::NotFound(_) => Self::NotFound(e.to_string()),
            ExpenseError::EmptyCategory | ExpenseError::NonPositiveAmount => {
                Self::Validation(e.to_string())
            }
            ExpenseError::Database(_) => Self::Database(e.to_string()),
        }
    }
}
