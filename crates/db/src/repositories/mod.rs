//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! Every multi-row mutation is wrapped in a single database transaction;
//! either all of its rows land or none do.

pub mod debt;
pub mod expense;
pub mod loan;

pub use debt::{CreateDebtInput, DebtError, DebtRepository, PaymentReceipt, UpdateDebtInput};
pub use expense::{
    CreateExpenseInput, ExpenseError, ExpenseRepository, ExpenseSummary, summarize,
};
pub use loan::{
    ClosedLoan, CreateLoanInput, CreatedLoan, InstallmentPaidOutcome, LoanError, LoanRepository,
    LoanWithSummary, PaymentSummary, UpdateLoanInput, summarize_payments,
};
