//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the
//! schema builder. Money columns are `NUMERIC(19, 4)`.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_reference_data;
mod m20260301_000002_treasury;
mod m20260301_000003_trades;
mod m20260301_000004_debts;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_reference_data::Migration),
            Box::new(m20260301_000002_treasury::Migration),
            Box::new(m20260301_000003_trades::Migration),
            Box::new(m20260301_000004_debts::Migration),
        ]
    }
}
