//! Database migration runner for Sarraf.
//!
//! Reads `DATABASE_URL` (or `-u <url>`) and applies the treasury schema.
//!
//! Usage:
//!   migrator up      - Apply all pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show which migrations are applied
//!   migrator fresh   - Drop every table and re-apply from scratch

use sarraf_db::migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The migration CLI installs its own subscriber.
    cli::run_cli(Migrator).await;
}
