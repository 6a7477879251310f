//! Loan repository: schedule creation, lifecycle, and installment payments.
//!
//! Every operation here that touches more than one row runs in a single
//! database transaction. The engine holds no state between calls; each
//! operation re-reads the rows it needs inside its own unit of work, and
//! concurrent mutations of the same row are serialized with `SELECT ... FOR
//! UPDATE`.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use ledgerly_core::ledger::installment_mirror;
use ledgerly_core::loan::{
    AmortizationError, LoanTerms, ScheduledInstallment, compute_emi, generate_schedule,
    loan_end_date,
};

use crate::entities::{
    loan_payments, loans,
    sea_orm_active_enums::{InstallmentStatus, LoanStatus},
};
use crate::repositories::expense;

/// Loans beyond a century of monthly payments are rejected as input errors.
const MAX_TENURE_MONTHS: u32 = 1200;

/// Error types for loan operations.
#[derive(Debug, thiserror::Error)]
pub enum LoanError {
    /// Loan not found.
    #[error("Loan not found: {0}")]
    NotFound(Uuid),

    /// Installment not found.
    #[error("Installment not found: {0}")]
    InstallmentNotFound(Uuid),

    /// Loan name is required.
    #[error("Loan name is required")]
    EmptyName,

    /// Tenure exceeds the supported maximum.
    #[error("Tenure cannot exceed {MAX_TENURE_MONTHS} months")]
    TenureTooLong,

    /// Amortization input was rejected.
    #[error(transparent)]
    Amortization(#[from] AmortizationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a loan.
#[derive(Debug, Clone)]
pub struct CreateLoanInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Display name; also seeds the ledger category.
    pub loan_name: String,
    /// Borrowed principal.
    pub principal_amount: Decimal,
    /// Annual interest rate in percent.
    pub interest_rate: Decimal,
    /// Number of monthly installments.
    pub tenure_months: u32,
    /// First day of the loan; installments fall due in the following months.
    pub start_date: chrono::NaiveDate,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating loan metadata.
#[derive(Debug, Clone, Default)]
pub struct UpdateLoanInput {
    /// New display name.
    pub loan_name: Option<String>,
    /// New notes.
    pub notes: Option<String>,
}

/// A freshly created loan with its schedule and mirror counts.
#[derive(Debug, Clone)]
pub struct CreatedLoan {
    /// The loan row.
    pub loan: loans::Model,
    /// All installments, ordered by payment number.
    pub installments: Vec<loan_payments::Model>,
    /// Ledger rows created (one per installment).
    pub ledger_entries_created: u64,
    /// Installments backfilled as paid because their due date had passed.
    pub past_payments_auto_marked: u64,
    /// Installments created pending.
    pub future_payments_pending: u64,
}

/// A closed (or foreclosed) loan with its purge count.
#[derive(Debug, Clone)]
pub struct ClosedLoan {
    /// The loan row after the status change.
    pub loan: loans::Model,
    /// Pending ledger rows removed from forward-looking reports.
    pub pending_ledger_entries_deleted: u64,
}

/// Outcome of marking an installment paid.
#[derive(Debug, Clone)]
pub struct InstallmentPaidOutcome {
    /// The installment row.
    pub installment: loan_payments::Model,
    /// Ledger rows flipped to paid (0 on a repeat call).
    pub ledger_entries_updated: u64,
    /// True when the installment was already paid and nothing changed.
    pub already_paid: bool,
}

/// Per-loan installment counters used by loan listings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PaymentSummary {
    /// Number of installments.
    pub total_payments: usize,
    /// Installments already settled.
    pub paid_count: usize,
    /// Installments still pending.
    pub pending_count: usize,
    /// Installments flagged overdue.
    pub overdue_count: usize,
    /// Sum of settled EMI amounts.
    pub total_paid: Decimal,
}

/// A loan together with its installment counters.
#[derive(Debug, Clone)]
pub struct LoanWithSummary {
    /// The loan row.
    pub loan: loans::Model,
    /// Counters over its installments.
    pub summary: PaymentSummary,
}

/// Folds installment rows into the counters shown on loan listings.
#[must_use]
pub fn summarize_payments(payments: &[loan_payments::Model]) -> PaymentSummary {
    let mut summary = PaymentSummary {
        total_payments: payments.len(),
        paid_count: 0,
        pending_count: 0,
        overdue_count: 0,
        total_paid: Decimal::ZERO,
    };
    for payment in payments {
        match payment.status {
            InstallmentStatus::Paid => {
                summary.paid_count += 1;
                summary.total_paid += payment.emi_amount;
            }
            InstallmentStatus::Pending => summary.pending_count += 1,
            InstallmentStatus::Overdue => summary.overdue_count += 1,
        }
    }
    summary
}

/// Loan repository for schedule and lifecycle operations.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    db: DatabaseConnection,
}

impl LoanRepository {
    /// Creates a new loan repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a loan with its full amortization schedule and ledger mirror.
    ///
    /// Validation and the schedule computation happen before the transaction
    /// opens. Inside one unit of work: the loan row, all installment rows,
    /// and one ledger row per installment. Installments whose due date has
    /// already passed are backfilled as paid, and their ledger rows land as
    /// paid too, so historical totals are correct from the first insert.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad terms, or a database error (after
    /// full rollback) if any insert fails.
    pub async fn create_loan(&self, input: CreateLoanInput) -> Result<CreatedLoan, LoanError> {
        if input.loan_name.trim().is_empty() {
            return Err(LoanError::EmptyName);
        }
        if input.tenure_months > MAX_TENURE_MONTHS {
            return Err(LoanError::TenureTooLong);
        }

        let principal = input.principal_amount.round_dp(2);
        let terms = LoanTerms::new(principal, input.interest_rate, input.tenure_months)?;
        let emi = compute_emi(&terms)?;
        let end_date = loan_end_date(input.start_date, input.tenure_months)?;

        let today = Utc::now().date_naive();
        let schedule = generate_schedule(&terms, input.start_date, emi, today)?;

        let txn = self.db.begin().await?;

        let now = Utc::now().into();
        let loan = loans::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            loan_name: Set(input.loan_name.clone()),
            principal_amount: Set(principal),
            interest_rate: Set(input.interest_rate),
            #[allow(clippy::cast_possible_wrap)]
            tenure_months: Set(input.tenure_months as i32),
            emi_amount: Set(emi),
            start_date: Set(input.start_date),
            end_date: Set(end_date),
            notes: Set(input.notes.clone()),
            status: Set(LoanStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut installments = Vec::with_capacity(schedule.len());
        let mut past_payments_auto_marked = 0u64;

        for scheduled in &schedule {
            let installment =
                insert_installment(&txn, loan.id, input.user_id, scheduled).await?;

            let draft = installment_mirror(&input.loan_name, scheduled);
            expense::insert_installment_mirror(&txn, input.user_id, installment.id, &draft)
                .await?;

            if scheduled.is_backfilled() {
                past_payments_auto_marked += 1;
            }
            installments.push(installment);
        }

        txn.commit().await?;

        let ledger_entries_created = installments.len() as u64;
        let future_payments_pending = ledger_entries_created - past_payments_auto_marked;

        Ok(CreatedLoan {
            loan,
            installments,
            ledger_entries_created,
            past_payments_auto_marked,
            future_payments_pending,
        })
    }

    /// Lists a user's loans, optionally filtered by status, each with its
    /// installment counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_loans(
        &self,
        user_id: Uuid,
        status: Option<LoanStatus>,
    ) -> Result<Vec<LoanWithSummary>, LoanError> {
        let mut query = loans::Entity::find().filter(loans::Column::UserId.eq(user_id));
        if let Some(status) = status {
            query = query.filter(loans::Column::Status.eq(status));
        }

        let loans = query
            .order_by_desc(loans::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(loans.len());
        for loan in loans {
            let payments = loan_payments::Entity::find()
                .filter(loan_payments::Column::LoanId.eq(loan.id))
                .all(&self.db)
                .await?;
            let summary = summarize_payments(&payments);
            result.push(LoanWithSummary { loan, summary });
        }

        Ok(result)
    }

    /// Gets a loan with its full schedule, ordered by payment number.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the loan does not exist or belongs to another
    /// user.
    pub async fn get_loan(
        &self,
        user_id: Uuid,
        loan_id: Uuid,
    ) -> Result<(loans::Model, Vec<loan_payments::Model>), LoanError> {
        let loan = loans::Entity::find_by_id(loan_id)
            .filter(loans::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(LoanError::NotFound(loan_id))?;

        let payments = loan_payments::Entity::find()
            .filter(loan_payments::Column::LoanId.eq(loan_id))
            .order_by_asc(loan_payments::Column::PaymentNumber)
            .all(&self.db)
            .await?;

        Ok((loan, payments))
    }

    /// Lists a loan's installments, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the loan does not exist or belongs to another
    /// user.
    pub async fn list_installments(
        &self,
        user_id: Uuid,
        loan_id: Uuid,
        status: Option<InstallmentStatus>,
    ) -> Result<Vec<loan_payments::Model>, LoanError> {
        // Ownership check before exposing any schedule rows.
        loans::Entity::find_by_id(loan_id)
            .filter(loans::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(LoanError::NotFound(loan_id))?;

        let mut query =
            loan_payments::Entity::find().filter(loan_payments::Column::LoanId.eq(loan_id));
        if let Some(status) = status {
            query = query.filter(loan_payments::Column::Status.eq(status));
        }

        Ok(query
            .order_by_asc(loan_payments::Column::PaymentNumber)
            .all(&self.db)
            .await?)
    }

    /// Updates loan metadata (name and notes only; terms are immutable).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing loan and `EmptyName` for a blank
    /// name.
    pub async fn update_loan(
        &self,
        user_id: Uuid,
        loan_id: Uuid,
        input: UpdateLoanInput,
    ) -> Result<loans::Model, LoanError> {
        if let Some(name) = &input.loan_name {
            if name.trim().is_empty() {
                return Err(LoanError::EmptyName);
            }
        }

        let loan = loans::Entity::find_by_id(loan_id)
            .filter(loans::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(LoanError::NotFound(loan_id))?;

        let mut active: loans::ActiveModel = loan.into();
        if let Some(name) = input.loan_name {
            active.loan_name = Set(name);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Closes (or forecloses) a loan and purges its pending ledger rows.
    ///
    /// Both status change and purge run in one transaction: future
    /// obligations disappear from forward-looking reports while settled
    /// history is preserved. Closing an already-terminal loan is a benign
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing loan, or a database error after
    /// rollback.
    pub async fn close_loan(
        &self,
        user_id: Uuid,
        loan_id: Uuid,
        foreclosed: bool,
    ) -> Result<ClosedLoan, LoanError> {
        let txn = self.db.begin().await?;

        let loan = loans::Entity::find_by_id(loan_id)
            .filter(loans::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LoanError::NotFound(loan_id))?;

        if loan.status != LoanStatus::Active {
            txn.commit().await?;
            return Ok(ClosedLoan {
                loan,
                pending_ledger_entries_deleted: 0,
            });
        }

        let mut active: loans::ActiveModel = loan.into();
        active.status = Set(if foreclosed {
            LoanStatus::Foreclosed
        } else {
            LoanStatus::Closed
        });
        active.updated_at = Set(Utc::now().into());
        let loan = active.update(&txn).await?;

        let pending_ledger_entries_deleted =
            expense::purge_pending_for_loan(&txn, user_id, loan_id).await?;

        txn.commit().await?;

        Ok(ClosedLoan {
            loan,
            pending_ledger_entries_deleted,
        })
    }

    /// Deletes a loan, its installments, and its pending ledger rows.
    ///
    /// Installments cascade with the loan. Paid ledger rows survive with
    /// their back-reference cleared; they are the user's spending history.
    ///
    /// Returns the number of pending ledger rows purged.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing loan, or a database error after
    /// rollback.
    pub async fn delete_loan(&self, user_id: Uuid, loan_id: Uuid) -> Result<u64, LoanError> {
        let txn = self.db.begin().await?;

        let loan = loans::Entity::find_by_id(loan_id)
            .filter(loans::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LoanError::NotFound(loan_id))?;

        // Purge before the delete so the pending mirrors are matched while
        // their installment back-references still resolve.
        let purged = expense::purge_pending_for_loan(&txn, user_id, loan_id).await?;

        loans::Entity::delete_by_id(loan.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(purged)
    }

    /// Marks an installment as paid and flips its ledger mirror, in one
    /// transaction.
    ///
    /// The transition is one-way. A repeat call observes the already-paid
    /// row under lock and returns without touching the ledger, so retries
    /// cannot produce divergent mirror state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` / `InstallmentNotFound` for missing rows, or a
    /// database error after rollback.
    pub async fn mark_installment_paid(
        &self,
        user_id: Uuid,
        loan_id: Uuid,
        installment_id: Uuid,
    ) -> Result<InstallmentPaidOutcome, LoanError> {
        let txn = self.db.begin().await?;

        // Ownership check always precedes the mutation.
        loans::Entity::find_by_id(loan_id)
            .filter(loans::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(LoanError::NotFound(loan_id))?;

        let installment = loan_payments::Entity::find_by_id(installment_id)
            .filter(loan_payments::Column::LoanId.eq(loan_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LoanError::InstallmentNotFound(installment_id))?;

        if installment.status == InstallmentStatus::Paid {
            txn.commit().await?;
            return Ok(InstallmentPaidOutcome {
                installment,
                ledger_entries_updated: 0,
                already_paid: true,
            });
        }

        let now = Utc::now();
        let mut active: loan_payments::ActiveModel = installment.into();
        active.status = Set(InstallmentStatus::Paid);
        active.paid_on = Set(Some(now.into()));
        let installment = active.update(&txn).await?;

        let ledger_entries_updated =
            expense::mark_paid_for_installment(&txn, user_id, installment_id).await?;

        txn.commit().await?;

        Ok(InstallmentPaidOutcome {
            installment,
            ledger_entries_updated,
            already_paid: false,
        })
    }
}

/// Inserts one installment row of a freshly generated schedule.
async fn insert_installment(
    txn: &DatabaseTransaction,
    loan_id: Uuid,
    user_id: Uuid,
    scheduled: &ScheduledInstallment,
) -> Result<loan_payments::Model, DbErr> {
    let now = Utc::now().into();
    let paid_on = scheduled
        .paid_on
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc().into());

    loan_payments::ActiveModel {
        id: Set(Uuid::new_v4()),
        loan_id: Set(loan_id),
        user_id: Set(user_id),
        #[allow(clippy::cast_possible_wrap)]
        payment_number: Set(scheduled.payment_number as i32),
        due_date: Set(scheduled.due_date),
        emi_amount: Set(scheduled.emi_amount),
        principal_portion: Set(scheduled.principal_portion),
        interest_portion: Set(scheduled.interest_portion),
        outstanding_balance: Set(scheduled.outstanding_balance),
        status: Set(scheduled.status.into()),
        paid_on: Set(paid_on),
        created_at: Set(now),
    }
    .insert(txn)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn payment(status: InstallmentStatus, emi: Decimal) -> loan_payments::Model {
        let now = Utc::now().into();
        loan_payments::Model {
            id: Uuid::new_v4(),
            loan_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            payment_number: 1,
            due_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            emi_amount: emi,
            principal_portion: dec!(0),
            interest_portion: dec!(0),
            outstanding_balance: dec!(0),
            status,
            paid_on: None,
            created_at: now,
        }
    }

    #[test]
    fn test_summarize_payments() {
        let payments = vec![
            payment(InstallmentStatus::Paid, dec!(1000)),
            payment(InstallmentStatus::Paid, dec!(1000)),
            payment(InstallmentStatus::Pending, dec!(1000)),
            payment(InstallmentStatus::Overdue, dec!(1000)),
        ];

        let summary = summarize_payments(&payments);
        assert_eq!(summary.total_payments, 4);
        assert_eq!(summary.paid_count, 2);
        assert_eq!(summary.pending_count, 1);
        assert_eq!(summary.overdue_count, 1);
        assert_eq!(summary.total_paid, dec!(2000));
    }

    #[test]
    fn test_summarize_payments_empty() {
        let summary = summarize_payments(&[]);
        assert_eq!(summary.total_payments, 0);
        assert_eq!(summary.total_paid, Decimal::ZERO);
    }
}

impl From<LoanError> for ledgerly_shared::AppError {
    fn from(e: LoanError) -> Self {
        match e {
            LoanError::NotFound(_) | LoanError::InstallmentNotFound(_) => {
                Self::NotFound(e.to_string())
            }
            LoanError::EmptyName | LoanError::TenureTooLong | LoanError::Amortization(_) => {
                Self::Validation(e.to_string())
            }
            LoanError::Database(_) => Self::Database(e.to_string()),
        }
    }
}
