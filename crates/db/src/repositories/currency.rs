//! Currency catalogue.
//!
//! Currencies are created with a zero balance and only the treasury
//! protocol changes that balance afterwards.

use chrono::Utc;
use rust_decimal::Decimal;
use sarraf_shared::LedgerConfig;
use sarraf_shared::types::CurrencyId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use crate::entities::currencies;
use crate::entities::debts;
use crate::entities::sea_orm_active_enums::{DebtStatus, RecordState};
use crate::error::TreasuryError;
use crate::unit_of_work::UnitOfWork;

/// Input for creating a currency.
#[derive(Debug, Clone)]
pub struct CreateCurrencyInput {
    /// Display name, e.g. "US Dollar".
    pub name: String,
    /// Short code, e.g. "USD". Stored upper-cased.
    pub code: String,
}

/// Currency repository.
#[derive(Debug, Clone)]
pub struct CurrencyRepository {
    uow: UnitOfWork,
}

impl CurrencyRepository {
    /// Creates a new currency repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LedgerConfig) -> Self {
        Self {
            uow: UnitOfWork::new(db, policy),
        }
    }

    /// Creates a currency with a zero balance.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if name or code is blank, or the code is taken by an active currency
    pub async fn create(
        &self,
        input: CreateCurrencyInput,
    ) -> Result<currencies::Model, TreasuryError> {
        let name = input.name.trim().to_string();
        let code = input.code.trim().to_uppercase();
        if name.is_empty() || code.is_empty() {
            return Err(TreasuryError::InvalidInput(
                "Currency name and code are required".to_string(),
            ));
        }

        let currency = self
            .uow
            .run("create_currency", move |txn| {
                let name = name.clone();
                let code = code.clone();
                Box::pin(async move {
                    let taken = currencies::Entity::find()
                        .filter(currencies::Column::Code.eq(code.as_str()))
                        .filter(currencies::Column::State.eq(RecordState::Active))
                        .count(txn)
                        .await?;
                    if taken > 0 {
                        return Err(TreasuryError::InvalidInput(format!(
                            "Currency code {code} already exists"
                        )));
                    }

                    let now = Utc::now().into();
                    let currency = currencies::ActiveModel {
                        id: Set(CurrencyId::new().into_inner()),
                        name: Set(name),
                        code: Set(code),
                        balance: Set(Decimal::ZERO),
                        state: Set(RecordState::Active),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    Ok(currency)
                })
            })
            .await?;

        info!(currency_id = %currency.id, code = %currency.code, "currency created");
        Ok(currency)
    }

    /// Gets an active currency.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the currency does not exist or is deleted.
    pub async fn get(&self, id: CurrencyId) -> Result<currencies::Model, TreasuryError> {
        Self::find_active(self.uow.connection(), id).await
    }

    /// Loads an active currency through any connection.
    pub(crate) async fn find_active<C: ConnectionTrait>(
        conn: &C,
        id: CurrencyId,
    ) -> Result<currencies::Model, TreasuryError> {
        currencies::Entity::find_by_id(id.into_inner())
            .filter(currencies::Column::State.eq(RecordState::Active))
            .one(conn)
            .await?
            .ok_or_else(|| TreasuryError::not_found("currency", id))
    }

    /// Lists currencies ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        include_deleted: bool,
    ) -> Result<Vec<currencies::Model>, TreasuryError> {
        let mut query = currencies::Entity::find();
        if !include_deleted {
            query = query.filter(currencies::Column::State.eq(RecordState::Active));
        }

        Ok(query
            .order_by_asc(currencies::Column::Code)
            .all(self.uow.connection())
            .await?)
    }

    /// Soft-deletes a currency that holds nothing and is owed nothing.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the currency does not exist or is already deleted
    /// - `CurrencyNotEmpty` if its balance is not zero
    /// - `InvalidInput` if an ACTIVE or PARTIAL debt is still held in it
    pub async fn delete(&self, id: CurrencyId) -> Result<currencies::Model, TreasuryError> {
        let currency = self
            .uow
            .run("delete_currency", move |txn| {
                Box::pin(async move {
                    let currency = currencies::Entity::find_by_id(id.into_inner())
                        .filter(currencies::Column::State.eq(RecordState::Active))
                        .lock_exclusive()
                        .one(txn)
                        .await?
                        .ok_or_else(|| TreasuryError::not_found("currency", id))?;

                    if !currency.balance.is_zero() {
                        return Err(TreasuryError::CurrencyNotEmpty {
                            currency_id: id,
                            balance: currency.balance,
                        });
                    }

                    let open_debts = debts::Entity::find()
                        .filter(debts::Column::CurrencyId.eq(id.into_inner()))
                        .filter(debts::Column::State.eq(RecordState::Active))
                        .filter(debts::Column::Status.is_in([DebtStatus::Active, DebtStatus::Partial]))
                        .count(txn)
                        .await?;
                    if open_debts > 0 {
                        return Err(TreasuryError::InvalidInput(format!(
                            "Currency {} has {open_debts} open debts",
                            currency.code
                        )));
                    }

                    let mut active: currencies::ActiveModel = currency.into();
                    active.state = Set(RecordState::Deleted);
                    active.updated_at = Set(Utc::now().into());
                    Ok(active.update(txn).await?)
                })
            })
            .await?;

        info!(currency_id = %currency.id, "currency deleted");
        Ok(currency)
    }
}
