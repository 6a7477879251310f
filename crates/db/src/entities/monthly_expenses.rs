//! `SeaORM` Entity for the monthly_expenses table (the unified ledger).
//!
//! Rows mirrored from a loan installment carry `loan_payment_id`; rows
//! mirrored from a debt payment carry `debt_id`. The stored back-reference
//! is the only way mirror rows are matched; they are never re-derived from
//! loan and period number.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ExpenseStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub month_year: String,
    pub due_date: Date,
    pub status: ExpenseStatus,
    pub paid_on: Option<DateTimeWithTimeZone>,
    pub loan_payment_id: Option<Uuid>,
    pub debt_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::loan_payments::Entity",
        from = "Column::LoanPaymentId",
        to = "super::loan_payments::Column::Id"
    )]
    LoanPayments,
    #[sea_orm(
        belongs_to = "super::debts::Entity",
        from = "Column::DebtId",
        to = "super::debts::Column::Id"
    )]
    Debts,
}

impl Related<super::loan_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanPayments.def()
    }
}

impl Related<super::debts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Debts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
