//! Property tests for EMI calculation and schedule generation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::emi::compute_emi;
use super::schedule::generate_schedule;
use super::types::LoanTerms;

/// Strategy for principal amounts between 1.00 and 10,000,000.00.
fn principal_strategy() -> impl Strategy<Value = Decimal> {
    (100i64..1_000_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for annual rates between 0% and 36%, in basis points.
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..3600i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for tenures between 1 and 120 months.
fn tenure_strategy() -> impl Strategy<Value = u32> {
    1u32..=120
}

fn start_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The EMI covers at least the principal over the full term, up to the
    /// half-cent rounding applied per installment.
    #[test]
    fn prop_emi_covers_principal(
        principal in principal_strategy(),
        rate in rate_strategy(),
        tenure in tenure_strategy(),
    ) {
        let terms = LoanTerms::new(principal, rate, tenure).unwrap();
        let emi = compute_emi(&terms).unwrap();

        let rounding_slack = Decimal::new(5, 3) * Decimal::from(tenure);
        prop_assert!(
            emi * Decimal::from(tenure) >= principal - rounding_slack,
            "emi {emi} x {tenure} fell short of principal {principal}"
        );
    }

    /// Zero-rate EMI is exactly principal / tenure at currency precision.
    #[test]
    fn prop_zero_rate_is_simple_division(
        principal in principal_strategy(),
        tenure in tenure_strategy(),
    ) {
        let terms = LoanTerms::new(principal, Decimal::ZERO, tenure).unwrap();
        let emi = compute_emi(&terms).unwrap();
        prop_assert_eq!(emi, (principal / Decimal::from(tenure)).round_dp(2));
    }

    /// Outstanding balances never increase and end at exactly zero.
    #[test]
    fn prop_balances_non_increasing_and_terminate(
        principal in principal_strategy(),
        rate in rate_strategy(),
        tenure in tenure_strategy(),
        start in start_date_strategy(),
    ) {
        let terms = LoanTerms::new(principal, rate, tenure).unwrap();
        let emi = compute_emi(&terms).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let schedule = generate_schedule(&terms, start, emi, today).unwrap();

        prop_assert_eq!(schedule.len(), tenure as usize);

        let mut previous = principal;
        for row in &schedule {
            prop_assert!(row.outstanding_balance >= Decimal::ZERO);
            prop_assert!(
                row.outstanding_balance <= previous,
                "balance rose at installment {}", row.payment_number
            );
            previous = row.outstanding_balance;
        }
        prop_assert_eq!(schedule.last().unwrap().outstanding_balance, Decimal::ZERO);
    }

    /// Principal portions telescope back to the loan principal exactly.
    #[test]
    fn prop_principal_portions_sum(
        principal in principal_strategy(),
        rate in rate_strategy(),
        tenure in tenure_strategy(),
        start in start_date_strategy(),
    ) {
        let terms = LoanTerms::new(principal, rate, tenure).unwrap();
        let emi = compute_emi(&terms).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let schedule = generate_schedule(&terms, start, emi, today).unwrap();

        let total: Decimal = schedule.iter().map(|r| r.principal_portion).sum();
        prop_assert_eq!(total, principal);
    }

    /// Backfilled rows carry their due date as settlement date; pending rows
    /// carry none.
    #[test]
    fn prop_backfill_paid_on_consistency(
        principal in principal_strategy(),
        rate in rate_strategy(),
        tenure in tenure_strategy(),
        start in start_date_strategy(),
    ) {
        let terms = LoanTerms::new(principal, rate, tenure).unwrap();
        let emi = compute_emi(&terms).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let schedule = generate_schedule(&terms, start, emi, today).unwrap();

        for row in &schedule {
            if row.due_date < today {
                prop_assert!(row.is_backfilled());
                prop_assert_eq!(row.paid_on, Some(row.due_date));
            } else {
                prop_assert_eq!(row.paid_on, None);
            }
        }
    }
}
