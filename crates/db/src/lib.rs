//! Database layer of the Sarraf treasury.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - PostgreSQL migrations
//! - The transactional unit of work with conflict retry
//! - The balance mutation protocol and the repositories built on it

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;
pub mod unit_of_work;

pub use error::TreasuryError;
pub use repositories::{
    CurrencyRepository, CustomerRepository, DebtRepository, ExchangeRepository,
    ReconciliationRepository, TreasuryRepository, UserRepository,
};
pub use unit_of_work::UnitOfWork;

use std::time::Duration;

use sarraf_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection from configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .sqlx_logging(false);

    Database::connect(options).await
}
