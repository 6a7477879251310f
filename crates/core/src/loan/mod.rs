//! Loan amortization logic.
//!
//! This module implements the loan side of the engine:
//! - EMI calculation (reducing-balance formula)
//! - Per-period interest/principal splitting
//! - Payment-schedule generation with retroactive backfill
//! - Domain types and error types for loan operations

pub mod emi;
pub mod error;
pub mod schedule;
pub mod types;

#[cfg(test)]
mod schedule_props;

pub use emi::{PeriodSplit, compute_emi, monthly_rate, split_period};
pub use error::AmortizationError;
pub use schedule::{generate_schedule, loan_end_date};
pub use types::{InstallmentStatus, LoanTerms, ScheduledInstallment};
