//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! All multi-row mutations run inside a single database transaction; the
//! engine keeps no state between calls, so every operation re-reads the
//! rows it needs under that transaction.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{DebtRepository, ExpenseRepository, LoanRepository};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
