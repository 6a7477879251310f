//! `SeaORM` Entity for the loan_payments table (installments).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::InstallmentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "loan_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub loan_id: Uuid,
    pub user_id: Uuid,
    pub payment_number: i32,
    pub due_date: Date,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub emi_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub principal_portion: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub interest_portion: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub outstanding_balance: Decimal,
    pub status: InstallmentStatus,
    pub paid_on: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::loans::Entity",
        from = "Column::LoanId",
        to = "super::loans::Column::Id"
    )]
    Loans,
    #[sea_orm(has_many = "super::monthly_expenses::Entity")]
    MonthlyExpenses,
}

impl Related<super::loans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl Related<super::monthly_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyExpenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
