//! Error types for loan amortization.

use thiserror::Error;

/// Errors that can occur while computing an amortization schedule.
///
/// All of these are rejected before any storage access happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmortizationError {
    /// Principal must be positive.
    #[error("Principal must be positive")]
    NonPositivePrincipal,

    /// Tenure must be at least one month.
    #[error("Tenure must be at least one month")]
    ZeroTenure,

    /// Interest rate cannot be negative.
    #[error("Interest rate cannot be negative")]
    NegativeRate,

    /// Decimal arithmetic overflowed.
    ///
    /// Surfaced instead of silently producing a truncated EMI when the
    /// inputs are far outside any realistic loan.
    #[error("Amortization arithmetic overflowed")]
    ArithmeticOverflow,

    /// A due date fell outside the supported calendar range.
    #[error("Schedule date out of range")]
    DateOutOfRange,
}

impl AmortizationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositivePrincipal => "NON_POSITIVE_PRINCIPAL",
            Self::ZeroTenure => "ZERO_TENURE",
            Self::NegativeRate => "NEGATIVE_RATE",
            Self::ArithmeticOverflow => "ARITHMETIC_OVERFLOW",
            Self::DateOutOfRange => "DATE_OUT_OF_RANGE",
        }
    }
}
