//! EMI calculation with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations. Everything
//! here runs on `rust_decimal::Decimal`.

use rust_decimal::Decimal;

use super::error::AmortizationError;
use super::types::LoanTerms;

/// Currency precision in decimal places.
pub const CURRENCY_DP: u32 = 2;

/// Converts an annual percentage rate to a monthly fraction.
///
/// 12% p.a. becomes 0.01 per month.
#[must_use]
pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / Decimal::from(1200)
}

/// Computes the equated monthly installment for the given terms.
///
/// Zero-rate loans pay `principal / tenure`. Otherwise the standard
/// reducing-balance formula applies:
///
/// ```text
/// emi = P * r * (1+r)^n / ((1+r)^n - 1)
/// ```
///
/// where `r` is the monthly rate and `n` the tenure in months. The
/// compounding factor is built by repeated multiplication, which keeps the
/// whole computation in `Decimal` and makes the cost O(tenure).
///
/// # Errors
///
/// Rejects invalid terms, and surfaces `ArithmeticOverflow` instead of a
/// silently truncated result when the inputs exceed decimal range.
pub fn compute_emi(terms: &LoanTerms) -> Result<Decimal, AmortizationError> {
    let LoanTerms {
        principal,
        annual_rate_percent,
        tenure_months,
    } = *terms;

    if annual_rate_percent.is_zero() {
        let emi = principal
            .checked_div(Decimal::from(tenure_months))
            .ok_or(AmortizationError::ArithmeticOverflow)?;
        return Ok(emi.round_dp(CURRENCY_DP));
    }

    let rate = monthly_rate(annual_rate_percent);
    let one_plus = Decimal::ONE
        .checked_add(rate)
        .ok_or(AmortizationError::ArithmeticOverflow)?;

    let mut factor = Decimal::ONE;
    for _ in 0..tenure_months {
        factor = factor
            .checked_mul(one_plus)
            .ok_or(AmortizationError::ArithmeticOverflow)?;
    }

    let numerator = principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .ok_or(AmortizationError::ArithmeticOverflow)?;
    let denominator = factor - Decimal::ONE;

    let emi = numerator
        .checked_div(denominator)
        .ok_or(AmortizationError::ArithmeticOverflow)?;

    Ok(emi.round_dp(CURRENCY_DP))
}

/// Interest/principal split of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSplit {
    /// Interest accrued on the outstanding balance.
    pub interest: Decimal,
    /// Principal retired by this payment.
    pub principal: Decimal,
    /// Balance after this payment, clamped at zero.
    pub new_balance: Decimal,
}

/// Splits one EMI payment into interest and principal.
///
/// The clamp to zero absorbs terminal rounding drift so a schedule never
/// reports a negative balance.
#[must_use]
pub fn split_period(outstanding: Decimal, monthly_rate: Decimal, emi: Decimal) -> PeriodSplit {
    let interest = (outstanding * monthly_rate).round_dp(CURRENCY_DP);
    let principal = emi - interest;
    let new_balance = (outstanding - principal).max(Decimal::ZERO);
    PeriodSplit {
        interest,
        principal,
        new_balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn terms(principal: Decimal, rate: Decimal, tenure: u32) -> LoanTerms {
        LoanTerms::new(principal, rate, tenure).unwrap()
    }

    #[test]
    fn test_emi_standard_scenario() {
        // 120,000 over 12 months at 12% p.a.
        let emi = compute_emi(&terms(dec!(120000), dec!(12), 12)).unwrap();
        assert_eq!(emi, dec!(10661.85));
    }

    #[test]
    fn test_emi_zero_rate_is_simple_division() {
        let emi = compute_emi(&terms(dec!(12000), dec!(0), 12)).unwrap();
        assert_eq!(emi, dec!(1000));

        let emi = compute_emi(&terms(dec!(100), dec!(0), 3)).unwrap();
        assert_eq!(emi, dec!(33.33));
    }

    #[test]
    fn test_emi_rounded_to_currency_precision() {
        let emi = compute_emi(&terms(dec!(100000), dec!(12), 12)).unwrap();
        assert_eq!(emi, emi.round_dp(2));
        assert_eq!(emi, dec!(8884.88));
    }

    #[test]
    fn test_terms_validation() {
        assert_eq!(
            LoanTerms::new(dec!(0), dec!(10), 12).unwrap_err(),
            AmortizationError::NonPositivePrincipal
        );
        assert_eq!(
            LoanTerms::new(dec!(-5), dec!(10), 12).unwrap_err(),
            AmortizationError::NonPositivePrincipal
        );
        assert_eq!(
            LoanTerms::new(dec!(1000), dec!(10), 0).unwrap_err(),
            AmortizationError::ZeroTenure
        );
        assert_eq!(
            LoanTerms::new(dec!(1000), dec!(-1), 12).unwrap_err(),
            AmortizationError::NegativeRate
        );
    }

    #[test]
    fn test_emi_overflow_is_an_error() {
        let terms = terms(Decimal::MAX, dec!(99999), 600);
        assert_eq!(
            compute_emi(&terms).unwrap_err(),
            AmortizationError::ArithmeticOverflow
        );
    }

    #[test]
    fn test_split_period_basic() {
        // First period of the standard scenario.
        let split = split_period(dec!(120000), monthly_rate(dec!(12)), dec!(10661.85));
        assert_eq!(split.interest, dec!(1200));
        assert_eq!(split.principal, dec!(9461.85));
        assert_eq!(split.new_balance, dec!(110538.15));
    }

    #[test]
    fn test_split_period_clamps_negative_balance() {
        let split = split_period(dec!(50), dec!(0.01), dec!(10661.85));
        assert_eq!(split.new_balance, Decimal::ZERO);
    }

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(dec!(0)), Decimal::ZERO);
    }
}
