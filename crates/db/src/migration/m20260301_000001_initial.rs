//! Initial database migration.
//!
//! Creates all enums, tables, indexes, and triggers for the ledger engine.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CORE TABLES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(LOANS_SQL).await?;
        db.execute_unprepared(LOAN_PAYMENTS_SQL).await?;
        db.execute_unprepared(DEBTS_SQL).await?;
        db.execute_unprepared(MONTHLY_EXPENSES_SQL).await?;

        // ============================================================
        // PART 3: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Loan lifecycle
CREATE TYPE loan_status AS ENUM (
    'active',
    'closed',
    'foreclosed'
);

-- Installment lifecycle (paid is terminal)
CREATE TYPE installment_status AS ENUM (
    'pending',
    'paid',
    'overdue'
);

-- Debt lifecycle (strictly forward)
CREATE TYPE debt_status AS ENUM (
    'pending',
    'partially_paid',
    'paid'
);

-- Ledger entry lifecycle
CREATE TYPE expense_status AS ENUM (
    'pending',
    'paid'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const LOANS_SQL: &str = r"
CREATE TABLE loans (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    loan_name VARCHAR(255) NOT NULL,
    principal_amount NUMERIC(14, 2) NOT NULL CHECK (principal_amount > 0),
    interest_rate NUMERIC(7, 4) NOT NULL CHECK (interest_rate >= 0),
    tenure_months INTEGER NOT NULL CHECK (tenure_months > 0),
    emi_amount NUMERIC(14, 2) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    notes TEXT,
    status loan_status NOT NULL DEFAULT 'active',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_loans_user ON loans(user_id);
CREATE INDEX idx_loans_user_status ON loans(user_id, status);
";

const LOAN_PAYMENTS_SQL: &str = r"
CREATE TABLE loan_payments (
    id UUID PRIMARY KEY,
    loan_id UUID NOT NULL REFERENCES loans(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    payment_number INTEGER NOT NULL CHECK (payment_number > 0),
    due_date DATE NOT NULL,
    emi_amount NUMERIC(14, 2) NOT NULL,
    principal_portion NUMERIC(14, 2) NOT NULL,
    interest_portion NUMERIC(14, 2) NOT NULL,
    outstanding_balance NUMERIC(14, 2) NOT NULL CHECK (outstanding_balance >= 0),
    status installment_status NOT NULL DEFAULT 'pending',
    paid_on TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    UNIQUE (loan_id, payment_number)
);

CREATE INDEX idx_loan_payments_loan ON loan_payments(loan_id);
CREATE INDEX idx_loan_payments_user_due ON loan_payments(user_id, due_date);
";

const DEBTS_SQL: &str = r"
CREATE TABLE debts (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    debt_name VARCHAR(255) NOT NULL,
    total_amount NUMERIC(14, 2) NOT NULL CHECK (total_amount > 0),
    amount_paid NUMERIC(14, 2) NOT NULL DEFAULT 0
        CHECK (amount_paid >= 0 AND amount_paid <= total_amount),
    creditor VARCHAR(255),
    due_date DATE,
    notes TEXT,
    status debt_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_debts_user ON debts(user_id);
CREATE INDEX idx_debts_user_status ON debts(user_id, status);
";

const MONTHLY_EXPENSES_SQL: &str = r"
CREATE TABLE monthly_expenses (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category VARCHAR(255) NOT NULL,
    amount NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
    description TEXT,
    payment_method VARCHAR(50),
    month_year CHAR(7) NOT NULL,
    due_date DATE NOT NULL,
    status expense_status NOT NULL DEFAULT 'pending',
    paid_on TIMESTAMPTZ,
    -- Mirror back-references. SET NULL keeps paid history alive after the
    -- originating loan or debt is deleted.
    loan_payment_id UUID REFERENCES loan_payments(id) ON DELETE SET NULL,
    debt_id UUID REFERENCES debts(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_monthly_expenses_user_month ON monthly_expenses(user_id, month_year);
CREATE INDEX idx_monthly_expenses_user_status ON monthly_expenses(user_id, status);
CREATE INDEX idx_monthly_expenses_loan_payment ON monthly_expenses(loan_payment_id)
    WHERE loan_payment_id IS NOT NULL;
CREATE INDEX idx_monthly_expenses_debt ON monthly_expenses(debt_id)
    WHERE debt_id IS NOT NULL;
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_loans_updated_at
    BEFORE UPDATE ON loans
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_debts_updated_at
    BEFORE UPDATE ON debts
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_monthly_expenses_updated_at
    BEFORE UPDATE ON monthly_expenses
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS monthly_expenses CASCADE;
DROP TABLE IF EXISTS loan_payments CASCADE;
DROP TABLE IF EXISTS debts CASCADE;
DROP TABLE IF EXISTS loans CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP FUNCTION IF EXISTS set_updated_at CASCADE;

DROP TYPE IF EXISTS expense_status;
DROP TYPE IF EXISTS debt_status;
DROP TYPE IF EXISTS installment_status;
DROP TYPE IF EXISTS loan_status;
";
