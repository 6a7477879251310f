//! Construction of ledger mirror rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::loan::types::{InstallmentStatus, ScheduledInstallment};
use ledgerly_shared::types::MonthKey;

/// Status of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerEntryStatus {
    /// Obligation not yet settled.
    Pending,
    /// Settled; permanent history.
    Paid,
}

/// A ledger row ready to be persisted, minus identifiers.
///
/// The back-reference to the originating installment or debt is attached by
/// the database layer, which knows the generated row identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerDraft {
    /// Expense category shown in reports.
    pub category: String,
    /// Amount of this entry.
    pub amount: Decimal,
    /// Free-form description.
    pub description: Option<String>,
    /// Due date of the obligation.
    pub due_date: NaiveDate,
    /// Reporting bucket derived from the due date.
    pub month_key: MonthKey,
    /// Pending or paid.
    pub status: LedgerEntryStatus,
    /// Settlement date, when already paid.
    pub paid_on: Option<NaiveDate>,
}

/// Ledger category for a loan's installments.
#[must_use]
pub fn loan_category(loan_name: &str) -> String {
    format!("Loan EMI - {loan_name}")
}

/// Ledger category for a debt's payments.
#[must_use]
pub fn debt_category(debt_name: &str) -> String {
    format!("Debt Payment - {debt_name}")
}

/// Builds the mirror row for a single installment.
///
/// Status and settlement date are copied verbatim, so installments
/// backfilled as paid at schedule creation produce already-paid ledger rows
/// and historical totals are correct from the first insert.
#[must_use]
pub fn installment_mirror(loan_name: &str, installment: &ScheduledInstallment) -> LedgerDraft {
    let status = match installment.status {
        InstallmentStatus::Paid => LedgerEntryStatus::Paid,
        InstallmentStatus::Pending | InstallmentStatus::Overdue => LedgerEntryStatus::Pending,
    };
    LedgerDraft {
        category: loan_category(loan_name),
        amount: installment.emi_amount,
        description: Some(format!("EMI {} for {loan_name}", installment.payment_number)),
        due_date: installment.due_date,
        month_key: MonthKey::from_date(installment.due_date),
        status,
        paid_on: installment.paid_on,
    }
}

/// Builds the mirror rows for a whole schedule, one per installment.
#[must_use]
pub fn installment_mirrors(
    loan_name: &str,
    installments: &[ScheduledInstallment],
) -> Vec<LedgerDraft> {
    installments
        .iter()
        .map(|installment| installment_mirror(loan_name, installment))
        .collect()
}

/// Builds the mirror row for one applied debt-payment increment.
///
/// The amount is the increment actually applied, not the debt's new
/// cumulative total, so ledger totals reflect cash flow per event.
#[must_use]
pub fn debt_payment_mirror(debt_name: &str, applied: Decimal, today: NaiveDate) -> LedgerDraft {
    LedgerDraft {
        category: debt_category(debt_name),
        amount: applied,
        description: Some(format!("Payment towards {debt_name}")),
        due_date: today,
        month_key: MonthKey::from_date(today),
        status: LedgerEntryStatus::Paid,
        paid_on: Some(today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{compute_emi, generate_schedule, types::LoanTerms};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_one_mirror_per_installment() {
        let terms = LoanTerms::new(dec!(120000), dec!(12), 12).unwrap();
        let emi = compute_emi(&terms).unwrap();
        let schedule = generate_schedule(&terms, date(2026, 5, 1), emi, date(2026, 8, 7)).unwrap();

        let mirrors = installment_mirrors("Car Loan", &schedule);
        assert_eq!(mirrors.len(), schedule.len());

        for (mirror, installment) in mirrors.iter().zip(&schedule) {
            assert_eq!(mirror.amount, installment.emi_amount);
            assert_eq!(mirror.due_date, installment.due_date);
            assert_eq!(mirror.category, "Loan EMI - Car Loan");
            assert_eq!(mirror.month_key, MonthKey::from_date(installment.due_date));
        }
    }

    #[test]
    fn test_backfilled_installments_mirror_as_paid() {
        let terms = LoanTerms::new(dec!(120000), dec!(12), 12).unwrap();
        let emi = compute_emi(&terms).unwrap();
        let schedule = generate_schedule(&terms, date(2026, 5, 1), emi, date(2026, 8, 7)).unwrap();

        let mirrors = installment_mirrors("Car Loan", &schedule);
        let paid: Vec<_> = mirrors
            .iter()
            .filter(|m| m.status == LedgerEntryStatus::Paid)
            .collect();

        assert_eq!(paid.len(), 3);
        for mirror in paid {
            assert!(mirror.paid_on.is_some());
        }
        assert_eq!(
            mirrors
                .iter()
                .filter(|m| m.status == LedgerEntryStatus::Pending)
                .count(),
            9
        );
    }

    #[test]
    fn test_debt_payment_mirror_is_settled_cash_flow() {
        let today = date(2026, 8, 7);
        let mirror = debt_payment_mirror("Credit Card", dec!(5000), today);

        assert_eq!(mirror.category, "Debt Payment - Credit Card");
        assert_eq!(mirror.amount, dec!(5000));
        assert_eq!(mirror.status, LedgerEntryStatus::Paid);
        assert_eq!(mirror.paid_on, Some(today));
        assert_eq!(mirror.month_key.to_string(), "2026-08");
    }
}
