//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a loan.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "loan_status")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Repayment in progress.
    #[sea_orm(string_value = "active")]
    Active,
    /// Ran to term or closed by the user.
    #[sea_orm(string_value = "closed")]
    Closed,
    /// Paid off early.
    #[sea_orm(string_value = "foreclosed")]
    Foreclosed,
}

/// Status of a loan installment.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "installment_status")]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    /// Not yet paid.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Settled; never reverted.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Due date passed without payment.
    #[sea_orm(string_value = "overdue")]
    Overdue,
}

/// Status of a debt.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "debt_status")]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    /// Nothing paid yet.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Some, but not all, of the total paid.
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    /// Fully settled.
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Status of a monthly-expense ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "expense_status")]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    /// Obligation not yet settled.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Settled; retained permanently as history.
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl From<ledgerly_core::loan::InstallmentStatus> for InstallmentStatus {
    fn from(status: ledgerly_core::loan::InstallmentStatus) -> Self {
        match status {
            ledgerly_core::loan::InstallmentStatus::Pending => Self::Pending,
            ledgerly_core::loan::InstallmentStatus::Paid => Self::Paid,
            ledgerly_core::loan::InstallmentStatus::Overdue => Self::Overdue,
        }
    }
}

impl From<ledgerly_core::debt::DebtStatus> for DebtStatus {
    fn from(status: ledgerly_core::debt::DebtStatus) -> Self {
        match status {
            ledgerly_core::debt::DebtStatus::Pending => Self::Pending,
            ledgerly_core::debt::DebtStatus::PartiallyPaid => Self::PartiallyPaid,
            ledgerly_core::debt::DebtStatus::Paid => Self::Paid,
        }
    }
}

impl From<ledgerly_core::ledger::LedgerEntryStatus> for ExpenseStatus {
    fn from(status: ledgerly_core::ledger::LedgerEntryStatus) -> Self {
        match status {
            ledgerly_core::ledger::LedgerEntryStatus::Pending => Self::Pending,
            ledgerly_core::ledger::LedgerEntryStatus::Paid => Self::Paid,
        }
    }
}
