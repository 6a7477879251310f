//! Property tests for the debt payment state machine.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::payment::{DebtStatus, plan_payment};

/// Strategy for totals between 1.00 and 1,000,000.00.
fn total_strategy() -> impl Strategy<Value = Decimal> {
    (100i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for payment amounts between 0.01 and 2,000,000.00.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..200_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The paid amount never decreases and never exceeds the total.
    #[test]
    fn prop_paid_amount_monotone_and_bounded(
        total in total_strategy(),
        payments in prop::collection::vec(amount_strategy(), 1..8),
    ) {
        let mut paid = Decimal::ZERO;
        for request in payments {
            let plan = plan_payment(total, paid, Some(request)).unwrap();
            prop_assert!(plan.new_amount_paid >= paid);
            prop_assert!(plan.new_amount_paid <= total);
            prop_assert!(plan.applied >= Decimal::ZERO);
            paid = plan.new_amount_paid;
        }
    }

    /// The applied increment is exactly the change in the paid amount.
    #[test]
    fn prop_applied_equals_delta(
        total in total_strategy(),
        already in amount_strategy(),
        request in amount_strategy(),
    ) {
        let already = already.min(total);
        let plan = plan_payment(total, already, Some(request)).unwrap();
        prop_assert_eq!(plan.applied, plan.new_amount_paid - already);
    }

    /// Status always matches the amount relation.
    #[test]
    fn prop_status_matches_amounts(
        total in total_strategy(),
        already in amount_strategy(),
        request in amount_strategy(),
    ) {
        let already = already.min(total);
        let plan = plan_payment(total, already, Some(request)).unwrap();

        match plan.new_status {
            DebtStatus::Paid => prop_assert_eq!(plan.new_amount_paid, total),
            DebtStatus::PartiallyPaid => {
                prop_assert!(plan.new_amount_paid > Decimal::ZERO);
                prop_assert!(plan.new_amount_paid < total);
            }
            DebtStatus::Pending => prop_assert_eq!(plan.new_amount_paid, Decimal::ZERO),
        }
    }

    /// Pay-in-full always settles the debt in one step.
    #[test]
    fn prop_pay_in_full_settles(
        total in total_strategy(),
        already in amount_strategy(),
    ) {
        let already = already.min(total);
        let plan = plan_payment(total, already, None).unwrap();
        prop_assert_eq!(plan.new_amount_paid, total);
        prop_assert_eq!(plan.new_status, DebtStatus::Paid);
        prop_assert_eq!(plan.applied, total - already);
    }

    /// Planning a payment twice from the same state yields the same plan
    /// (the engine re-reads state per operation; retries are deterministic).
    #[test]
    fn prop_planning_is_deterministic(
        total in total_strategy(),
        already in amount_strategy(),
        request in amount_strategy(),
    ) {
        let already = already.min(total);
        let first = plan_payment(total, already, Some(request)).unwrap();
        let second = plan_payment(total, already, Some(request)).unwrap();
        prop_assert_eq!(first, second);
    }
}
