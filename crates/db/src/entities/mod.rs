//! `SeaORM` entity definitions.

pub mod debts;
pub mod loan_payments;
pub mod loans;
pub mod monthly_expenses;
pub mod sea_orm_active_enums;
pub mod users;
