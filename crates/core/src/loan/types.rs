//! Domain types for loan amortization.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::AmortizationError;

/// Validated terms of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanTerms {
    /// Borrowed principal.
    pub principal: Decimal,
    /// Annual interest rate in percent (e.g. `12` for 12% p.a.).
    pub annual_rate_percent: Decimal,
    /// Number of monthly installments.
    pub tenure_months: u32,
}

impl LoanTerms {
    /// Validates and constructs loan terms.
    ///
    /// # Errors
    ///
    /// Rejects non-positive principal, zero tenure, and negative rates.
    pub fn new(
        principal: Decimal,
        annual_rate_percent: Decimal,
        tenure_months: u32,
    ) -> Result<Self, AmortizationError> {
        if principal <= Decimal::ZERO {
            return Err(AmortizationError::NonPositivePrincipal);
        }
        if tenure_months == 0 {
            return Err(AmortizationError::ZeroTenure);
        }
        if annual_rate_percent < Decimal::ZERO {
            return Err(AmortizationError::NegativeRate);
        }
        Ok(Self {
            principal,
            annual_rate_percent,
            tenure_months,
        })
    }
}

/// Status of a single installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    /// Not yet due or not yet paid.
    Pending,
    /// Paid (possibly backfilled at schedule creation).
    Paid,
    /// Due date passed without payment.
    Overdue,
}

/// One row of a generated amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    /// 1-based position within the loan.
    pub payment_number: u32,
    /// Calendar due date.
    pub due_date: NaiveDate,
    /// Amount due for this period.
    pub emi_amount: Decimal,
    /// Portion of the EMI that retires principal.
    pub principal_portion: Decimal,
    /// Portion of the EMI that covers interest.
    pub interest_portion: Decimal,
    /// Balance remaining after this installment.
    pub outstanding_balance: Decimal,
    /// Pending, or Paid when backfilled.
    pub status: InstallmentStatus,
    /// Settlement date; for backfilled installments this is the due date.
    pub paid_on: Option<NaiveDate>,
}

impl ScheduledInstallment {
    /// Returns true if this installment was marked paid at generation time.
    #[must_use]
    pub fn is_backfilled(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }
}
