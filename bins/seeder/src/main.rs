//! Development data seeder for Sarraf.
//!
//! Creates an `admin` cashier, a few customers and the common currencies, then
//! funds the currencies through the treasury so every opening balance has a
//! journal entry. Running it twice is harmless: existing rows are skipped.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sarraf_db::repositories::{CreateCurrencyInput, CreateCustomerInput};
use sarraf_db::{CurrencyRepository, CustomerRepository, TreasuryRepository, UserRepository};
use sarraf_shared::AppConfig;
use sarraf_shared::types::{CurrencyId, UserId};
use sea_orm::DatabaseConnection;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ADMIN_USERNAME: &str = "admin";

/// Currencies with their opening cash.
const CURRENCIES: &[(&str, &str, Decimal)] = &[
    ("Libyan Dinar", "LYD", dec!(250000)),
    ("US Dollar", "USD", dec!(20000)),
    ("Euro", "EUR", dec!(15000)),
    ("Tunisian Dinar", "TND", dec!(30000)),
    ("Egyptian Pound", "EGP", dec!(400000)),
];

const CUSTOMERS: &[(&str, &str)] = &[
    ("Walk-in customer", "LY"),
    ("Ahmed Salem", "LY"),
    ("Nour Trading Co.", "TN"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sarraf=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = sarraf_db::connect_with(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let (admin, created) = seed_admin(&db).await?;
    if created {
        seed_customers(&db).await?;
    } else {
        info!("Admin user already exists, skipping customers");
    }
    seed_currencies(&db, &config, admin).await?;

    info!("Seeding complete");
    Ok(())
}

/// Returns the admin user, creating it on first run.
async fn seed_admin(db: &DatabaseConnection) -> anyhow::Result<(UserId, bool)> {
    let users = UserRepository::new(db.clone());

    if let Some(user) = users.find_by_username(ADMIN_USERNAME).await? {
        return Ok((UserId::from_uuid(user.id), false));
    }

    let user = users.create(ADMIN_USERNAME, "Head Cashier").await?;
    info!(username = ADMIN_USERNAME, "Created admin user");
    Ok((UserId::from_uuid(user.id), true))
}

async fn seed_customers(db: &DatabaseConnection) -> anyhow::Result<()> {
    let customers = CustomerRepository::new(db.clone());

    for (name, nationality) in CUSTOMERS {
        customers
            .create(CreateCustomerInput {
                name: (*name).to_string(),
                nationality: Some((*nationality).to_string()),
                ..Default::default()
            })
            .await?;
        info!(name, "Created customer");
    }
    Ok(())
}

/// Creates missing currencies and funds each new one with its opening cash.
async fn seed_currencies(
    db: &DatabaseConnection,
    config: &AppConfig,
    admin: UserId,
) -> anyhow::Result<()> {
    let currencies = CurrencyRepository::new(db.clone(), config.ledger);
    let treasury = TreasuryRepository::new(db.clone(), config.ledger);

    let existing = currencies.list(false).await?;

    for (name, code, opening) in CURRENCIES {
        if existing.iter().any(|c| c.code == *code) {
            info!(code, "Currency already exists, skipping");
            continue;
        }

        let currency = currencies
            .create(CreateCurrencyInput {
                name: (*name).to_string(),
                code: (*code).to_string(),
            })
            .await?;
        let funded = treasury
            .add_currency_balance(CurrencyId::from_uuid(currency.id), *opening, admin)
            .await
            .with_context(|| format!("failed to fund {code}"))?;
        info!(code, balance = %funded.new_balance, "Created currency");
    }
    Ok(())
}
