//! Partial-payment state machine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::PaymentError;
use crate::loan::emi::CURRENCY_DP;

/// Status of a debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    /// Nothing paid yet.
    Pending,
    /// Some, but not all, of the total paid.
    PartiallyPaid,
    /// Fully settled.
    Paid,
}

impl DebtStatus {
    /// Derives the status implied by a paid amount against a total.
    #[must_use]
    pub fn for_amounts(amount_paid: Decimal, total: Decimal) -> Self {
        if amount_paid >= total {
            Self::Paid
        } else if amount_paid > Decimal::ZERO {
            Self::PartiallyPaid
        } else {
            Self::Pending
        }
    }
}

/// The outcome of planning one payment against a debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentPlan {
    /// Increment actually applied. Zero when the debt was already settled.
    pub applied: Decimal,
    /// Paid amount after applying the increment.
    pub new_amount_paid: Decimal,
    /// Status after applying the increment.
    pub new_status: DebtStatus,
}

impl PaymentPlan {
    /// Returns true if this plan changes nothing (redundant payment on a
    /// settled debt).
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.applied.is_zero()
    }
}

/// Plans a payment against a debt.
///
/// With no requested amount the debt is settled in full. A requested amount
/// is clamped so the recorded increment never pushes the paid amount past
/// the total; the ledger must reflect cash actually owed, not the raw
/// request. A payment against an already-settled debt applies zero and is a
/// no-op for both the debt and the ledger.
///
/// # Errors
///
/// Rejects non-positive requested amounts and totals, and refuses to touch
/// a debt whose stored paid amount is already outside `0..=total`.
pub fn plan_payment(
    total: Decimal,
    amount_paid: Decimal,
    requested: Option<Decimal>,
) -> Result<PaymentPlan, PaymentError> {
    if total <= Decimal::ZERO {
        return Err(PaymentError::NonPositiveTotal);
    }
    if amount_paid < Decimal::ZERO || amount_paid > total {
        return Err(PaymentError::CorruptBalance);
    }

    let remaining = total - amount_paid;
    let applied = match requested {
        None => remaining,
        Some(raw) => {
            let requested = raw.round_dp(CURRENCY_DP);
            if requested <= Decimal::ZERO {
                return Err(PaymentError::NonPositiveAmount);
            }
            requested.min(remaining)
        }
    };

    let new_amount_paid = amount_paid + applied;
    Ok(PaymentPlan {
        applied,
        new_amount_paid,
        new_status: DebtStatus::for_amounts(new_amount_paid, total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_payment() {
        let plan = plan_payment(dec!(12000), dec!(0), Some(dec!(5000))).unwrap();
        assert_eq!(plan.applied, dec!(5000));
        assert_eq!(plan.new_amount_paid, dec!(5000));
        assert_eq!(plan.new_status, DebtStatus::PartiallyPaid);
    }

    #[test]
    fn test_overpayment_is_clamped() {
        // 8000 against a 12000 debt with 5000 already paid: only the 7000
        // actually owed is applied and recorded.
        let plan = plan_payment(dec!(12000), dec!(5000), Some(dec!(8000))).unwrap();
        assert_eq!(plan.applied, dec!(7000));
        assert_eq!(plan.new_amount_paid, dec!(12000));
        assert_eq!(plan.new_status, DebtStatus::Paid);
    }

    #[test]
    fn test_pay_in_full_default() {
        let plan = plan_payment(dec!(12000), dec!(4500), None).unwrap();
        assert_eq!(plan.applied, dec!(7500));
        assert_eq!(plan.new_amount_paid, dec!(12000));
        assert_eq!(plan.new_status, DebtStatus::Paid);
    }

    #[test]
    fn test_exact_final_payment() {
        let plan = plan_payment(dec!(12000), dec!(5000), Some(dec!(7000))).unwrap();
        assert_eq!(plan.applied, dec!(7000));
        assert_eq!(plan.new_status, DebtStatus::Paid);
    }

    #[test]
    fn test_redundant_payment_is_noop() {
        let plan = plan_payment(dec!(12000), dec!(12000), None).unwrap();
        assert!(plan.is_noop());
        assert_eq!(plan.new_amount_paid, dec!(12000));
        assert_eq!(plan.new_status, DebtStatus::Paid);
    }

    #[test]
    fn test_explicit_amount_on_settled_debt_applies_zero() {
        let plan = plan_payment(dec!(12000), dec!(12000), Some(dec!(100))).unwrap();
        assert!(plan.is_noop());
        assert_eq!(plan.new_status, DebtStatus::Paid);
    }

    #[test]
    fn test_requested_amount_rounded_to_currency() {
        let plan = plan_payment(dec!(100), dec!(0), Some(dec!(10.005))).unwrap();
        assert_eq!(plan.applied, dec!(10.00));
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        assert_eq!(
            plan_payment(dec!(100), dec!(0), Some(dec!(0))).unwrap_err(),
            PaymentError::NonPositiveAmount
        );
        assert_eq!(
            plan_payment(dec!(100), dec!(0), Some(dec!(-5))).unwrap_err(),
            PaymentError::NonPositiveAmount
        );
        assert_eq!(
            plan_payment(dec!(0), dec!(0), None).unwrap_err(),
            PaymentError::NonPositiveTotal
        );
    }

    #[test]
    fn test_rejects_corrupt_balance() {
        assert_eq!(
            plan_payment(dec!(100), dec!(150), Some(dec!(10))).unwrap_err(),
            PaymentError::CorruptBalance
        );
        assert_eq!(
            plan_payment(dec!(100), dec!(-1), None).unwrap_err(),
            PaymentError::CorruptBalance
        );
    }

    #[test]
    fn test_status_for_amounts() {
        assert_eq!(DebtStatus::for_amounts(dec!(0), dec!(100)), DebtStatus::Pending);
        assert_eq!(
            DebtStatus::for_amounts(dec!(50), dec!(100)),
            DebtStatus::PartiallyPaid
        );
        assert_eq!(DebtStatus::for_amounts(dec!(100), dec!(100)), DebtStatus::Paid);
    }
}
