//! Monthly-expense ledger mirroring.
//!
//! Every loan installment and every applied debt payment is mirrored into
//! the shared monthly-expense ledger. This module builds the mirror rows;
//! persistence happens in the database layer inside the same unit of work
//! as the originating write.

pub mod mirror;

pub use mirror::{
    LedgerDraft, LedgerEntryStatus, debt_category, debt_payment_mirror, installment_mirror,
    installment_mirrors, loan_category,
};
