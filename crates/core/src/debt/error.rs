//! Error types for debt payments.

use thiserror::Error;

/// Errors that can occur while planning a debt payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// Payment amount must be positive.
    #[error("Payment amount must be positive")]
    NonPositiveAmount,

    /// Debt total must be positive.
    #[error("Debt total must be positive")]
    NonPositiveTotal,

    /// Stored balance violates the debt invariants.
    ///
    /// The paid amount must stay within `0..=total`; anything else means the
    /// stored row is corrupt and no payment may be applied to it.
    #[error("Stored paid amount is outside 0..=total")]
    CorruptBalance,
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::NonPositiveTotal => "NON_POSITIVE_TOTAL",
            Self::CorruptBalance => "CORRUPT_BALANCE",
        }
    }
}
