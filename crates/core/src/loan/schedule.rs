//! Payment-schedule generation.
//!
//! A schedule is fully determined by the loan terms, the start date, the EMI
//! and the date of generation. Loans can be registered retroactively, so any
//! installment whose due date is already in the past is created as paid with
//! its due date as the settlement date.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use super::emi::{CURRENCY_DP, monthly_rate, split_period};
use super::error::AmortizationError;
use super::types::{InstallmentStatus, LoanTerms, ScheduledInstallment};

/// Computes the end date of a loan: start date advanced by the full tenure.
///
/// # Errors
///
/// Returns `DateOutOfRange` if the date leaves the supported calendar.
pub fn loan_end_date(
    start_date: NaiveDate,
    tenure_months: u32,
) -> Result<NaiveDate, AmortizationError> {
    start_date
        .checked_add_months(Months::new(tenure_months))
        .ok_or(AmortizationError::DateOutOfRange)
}

/// Generates the full ordered installment list for a loan.
///
/// Due date of period `i` is the start date advanced by `i` calendar months
/// (same day of month, clamped at month end). The running balance starts at
/// the principal and is reduced by `split_period` each period; the final
/// period retires the entire remaining balance so the schedule converges to
/// exactly zero, with the recorded final EMI adjusted accordingly.
///
/// Installments due strictly before `today` are backfilled as paid.
///
/// # Errors
///
/// Returns `DateOutOfRange` when a due date cannot be represented.
pub fn generate_schedule(
    terms: &LoanTerms,
    start_date: NaiveDate,
    emi: Decimal,
    today: NaiveDate,
) -> Result<Vec<ScheduledInstallment>, AmortizationError> {
    let rate = monthly_rate(terms.annual_rate_percent);
    let mut outstanding = terms.principal;
    let mut schedule = Vec::with_capacity(terms.tenure_months as usize);

    for payment_number in 1..=terms.tenure_months {
        let due_date = start_date
            .checked_add_months(Months::new(payment_number))
            .ok_or(AmortizationError::DateOutOfRange)?;

        let split = split_period(outstanding, rate, emi);
        let is_final = payment_number == terms.tenure_months;

        let (emi_amount, principal_portion, interest_portion, new_balance) = if is_final {
            // Terminal adjustment: retire whatever balance is left.
            let principal = outstanding;
            let adjusted = (principal + split.interest).round_dp(CURRENCY_DP);
            (adjusted, principal, split.interest, Decimal::ZERO)
        } else {
            // Recorded principal is the effective balance reduction, so the
            // portions always telescope back to the loan principal even when
            // a rounded-up EMI overshoots a nearly-retired balance.
            let principal = split.principal.min(outstanding);
            (emi, principal, split.interest, split.new_balance)
        };

        let (status, paid_on) = if due_date < today {
            (InstallmentStatus::Paid, Some(due_date))
        } else {
            (InstallmentStatus::Pending, None)
        };

        schedule.push(ScheduledInstallment {
            payment_number,
            due_date,
            emi_amount,
            principal_portion,
            interest_portion,
            outstanding_balance: new_balance,
            status,
            paid_on,
        });

        outstanding = new_balance;
    }

    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn standard_terms() -> LoanTerms {
        LoanTerms::new(dec!(120000), dec!(12), 12).unwrap()
    }

    #[test]
    fn test_schedule_length_and_ordering() {
        let terms = standard_terms();
        let schedule =
            generate_schedule(&terms, date(2026, 1, 15), dec!(10661.85), date(2026, 1, 1)).unwrap();

        assert_eq!(schedule.len(), 12);
        for (i, row) in schedule.iter().enumerate() {
            assert_eq!(row.payment_number as usize, i + 1);
        }
    }

    #[test]
    fn test_schedule_balances_converge_to_zero() {
        let terms = standard_terms();
        let schedule =
            generate_schedule(&terms, date(2026, 1, 15), dec!(10661.85), date(2026, 1, 1)).unwrap();

        let mut previous = terms.principal;
        for row in &schedule {
            assert!(row.outstanding_balance <= previous);
            previous = row.outstanding_balance;
        }
        assert_eq!(schedule.last().unwrap().outstanding_balance, Decimal::ZERO);
    }

    #[test]
    fn test_principal_portions_sum_to_principal() {
        let terms = standard_terms();
        let schedule =
            generate_schedule(&terms, date(2026, 1, 15), dec!(10661.85), date(2026, 1, 1)).unwrap();

        let total: Decimal = schedule.iter().map(|r| r.principal_portion).sum();
        assert_eq!(total, terms.principal);
    }

    #[test]
    fn test_final_emi_adjustment_stays_close() {
        let terms = standard_terms();
        let schedule =
            generate_schedule(&terms, date(2026, 1, 15), dec!(10661.85), date(2026, 1, 1)).unwrap();

        let last = schedule.last().unwrap();
        let drift = (last.emi_amount - dec!(10661.85)).abs();
        assert!(drift < dec!(1), "final EMI drifted by {drift}");
    }

    #[test]
    fn test_backfill_past_installments() {
        // Registered today, started three months back: the three due dates
        // already behind us must come back pre-marked paid.
        let terms = standard_terms();
        let today = date(2026, 8, 7);
        let start = date(2026, 5, 1);
        let schedule = generate_schedule(&terms, start, dec!(10661.85), today).unwrap();

        let paid: Vec<_> = schedule.iter().filter(|r| r.is_backfilled()).collect();
        let pending = schedule
            .iter()
            .filter(|r| r.status == InstallmentStatus::Pending)
            .count();

        assert_eq!(paid.len(), 3);
        assert_eq!(pending, 9);
        for row in &paid {
            assert_eq!(row.paid_on, Some(row.due_date));
        }
    }

    #[test]
    fn test_due_date_on_today_stays_pending() {
        let terms = LoanTerms::new(dec!(1000), dec!(0), 2).unwrap();
        let start = date(2026, 7, 7);
        let today = date(2026, 8, 7);
        let schedule = generate_schedule(&terms, start, dec!(500), today).unwrap();

        // First due date equals today: strictly-before rule keeps it pending.
        assert_eq!(schedule[0].due_date, today);
        assert_eq!(schedule[0].status, InstallmentStatus::Pending);
        assert_eq!(schedule[0].paid_on, None);
    }

    #[rstest]
    #[case(date(2026, 1, 31), 1, date(2026, 2, 28))]
    #[case(date(2024, 1, 31), 1, date(2024, 2, 29))]
    #[case(date(2026, 1, 31), 2, date(2026, 3, 31))]
    #[case(date(2026, 8, 31), 1, date(2026, 9, 30))]
    fn test_month_end_clamping(
        #[case] start: NaiveDate,
        #[case] period: usize,
        #[case] expected: NaiveDate,
    ) {
        let terms = LoanTerms::new(dec!(1200), dec!(0), 3).unwrap();
        let schedule = generate_schedule(&terms, start, dec!(400), date(2020, 1, 1)).unwrap();
        assert_eq!(schedule[period - 1].due_date, expected);
    }

    #[test]
    fn test_zero_rate_schedule() {
        let terms = LoanTerms::new(dec!(1200), dec!(0), 12).unwrap();
        let schedule =
            generate_schedule(&terms, date(2026, 1, 1), dec!(100), date(2026, 1, 1)).unwrap();

        for row in &schedule {
            assert_eq!(row.interest_portion, Decimal::ZERO);
        }
        assert_eq!(schedule.last().unwrap().outstanding_balance, Decimal::ZERO);
        let total: Decimal = schedule.iter().map(|r| r.principal_portion).sum();
        assert_eq!(total, dec!(1200));
    }

    #[test]
    fn test_loan_end_date() {
        assert_eq!(loan_end_date(date(2026, 1, 15), 12).unwrap(), date(2027, 1, 15));
        assert_eq!(loan_end_date(date(2026, 1, 31), 1).unwrap(), date(2026, 2, 28));
    }
}
