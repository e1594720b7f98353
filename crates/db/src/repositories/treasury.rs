//! Treasury repository: the balance mutation protocol and the movement journal.
//!
//! [`TreasuryRepository::mutate`] is the only code path that writes
//! `currencies.balance`. It runs inside a caller-provided transaction:
//!
//! 1. Read the currency row with an exclusive lock
//! 2. Compute `new = current - credit + debit`, rejecting a negative result
//! 3. Write the new balance
//! 4. Append a movement with the next per-currency sequence number
//!
//! The lock is held until the caller commits or rolls back, so concurrent
//! mutations of the same currency serialize while different currencies
//! proceed in parallel. Operations touching several currencies take the
//! locks up front through [`TreasuryRepository::lock_currencies`], in
//! ascending id order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sarraf_core::ledger::{BalanceMutation, CurrencyPosition};
use sarraf_core::money::check_amount;
use sarraf_shared::LedgerConfig;
use sarraf_shared::types::{CurrencyId, MovementId, PageRequest, PageResponse, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::{debug, info};

use crate::entities::{currencies, sea_orm_active_enums::RecordState, treasury_movements};
use crate::error::TreasuryError;
use crate::unit_of_work::UnitOfWork;

/// Statement journaled for manual top-ups.
pub const MANUAL_TOP_UP_STATEMENT: &str = "Manual balance addition";

/// Result of one protocol call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationResult {
    /// Balance after the mutation.
    pub new_balance: Decimal,
    /// The journaled movement.
    pub movement_id: MovementId,
    /// Per-currency sequence of the movement.
    pub sequence: i64,
}

/// Filter options for listing movements.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// Filter by currency.
    pub currency_id: Option<CurrencyId>,
    /// Filter by acting user.
    pub user_id: Option<UserId>,
    /// Movements created at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Movements created at or before this instant.
    pub to: Option<DateTime<Utc>>,
}

/// Treasury repository.
#[derive(Debug, Clone)]
pub struct TreasuryRepository {
    uow: UnitOfWork,
}

impl TreasuryRepository {
    /// Creates a new treasury repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LedgerConfig) -> Self {
        Self {
            uow: UnitOfWork::new(db, policy),
        }
    }

    /// Applies one balance mutation and journals it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the currency does not exist or is deleted
    /// - `InsufficientFunds` if the new balance would be negative
    /// - `InvalidInput` if an amount is negative
    ///
    /// On error nothing has been written; the caller's transaction must be
    /// rolled back.
    pub async fn mutate(
        txn: &DatabaseTransaction,
        currency_id: CurrencyId,
        credit: Decimal,
        debit: Decimal,
        statement: &str,
        user_id: UserId,
    ) -> Result<MutationResult, TreasuryError> {
        let currency = currencies::Entity::find_by_id(currency_id.into_inner())
            .filter(currencies::Column::State.eq(RecordState::Active))
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| TreasuryError::not_found("currency", currency_id))?;

        let outcome = CurrencyPosition::new(currency_id, currency.balance)
            .apply(&BalanceMutation { credit, debit })?;

        let sequence = Self::last_sequence(txn, currency_id).await? + 1;
        let now = Utc::now().into();

        let mut active: currencies::ActiveModel = currency.into();
        active.balance = Set(outcome.final_balance);
        active.updated_at = Set(now);
        active.update(txn).await?;

        let movement_id = MovementId::new();
        treasury_movements::ActiveModel {
            id: Set(movement_id.into_inner()),
            currency_id: Set(currency_id.into_inner()),
            sequence: Set(sequence),
            open_balance: Set(outcome.open_balance),
            credit: Set(outcome.credit),
            debit: Set(outcome.debit),
            final_balance: Set(outcome.final_balance),
            statement: Set(statement.to_string()),
            user_id: Set(user_id.into_inner()),
            created_at: Set(now),
        }
        .insert(txn)
        .await?;

        debug!(
            %currency_id,
            sequence,
            open_balance = %outcome.open_balance,
            credit = %outcome.credit,
            debit = %outcome.debit,
            final_balance = %outcome.final_balance,
            "treasury movement recorded"
        );

        Ok(MutationResult {
            new_balance: outcome.final_balance,
            movement_id,
            sequence,
        })
    }

    /// Locks several currency rows in ascending id order.
    ///
    /// Two operations over the same pair of currencies then queue on the
    /// same first row instead of holding one each.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if a currency does not exist or is deleted.
    pub(crate) async fn lock_currencies(
        txn: &DatabaseTransaction,
        ids: &[CurrencyId],
    ) -> Result<(), TreasuryError> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        for currency_id in ids {
            currencies::Entity::find_by_id(currency_id.into_inner())
                .filter(currencies::Column::State.eq(RecordState::Active))
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or_else(|| TreasuryError::not_found("currency", currency_id))?;
        }

        Ok(())
    }

    /// Returns the highest journal sequence of a currency, 0 if none.
    async fn last_sequence<C: ConnectionTrait>(
        conn: &C,
        currency_id: CurrencyId,
    ) -> Result<i64, TreasuryError> {
        let last = treasury_movements::Entity::find()
            .filter(treasury_movements::Column::CurrencyId.eq(currency_id.into_inner()))
            .order_by_desc(treasury_movements::Column::Sequence)
            .one(conn)
            .await?;

        Ok(last.map_or(0, |m| m.sequence))
    }

    /// Adds funds to a currency by hand.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `amount <= 0`, has more than four decimals, or the
    ///   new balance would not fit
    /// - `NotFound` if the currency does not exist or is deleted
    pub async fn add_currency_balance(
        &self,
        currency_id: CurrencyId,
        amount: Decimal,
        user_id: UserId,
    ) -> Result<MutationResult, TreasuryError> {
        if amount <= Decimal::ZERO {
            return Err(TreasuryError::InvalidInput(format!(
                "Top-up amount must be positive, got {amount}"
            )));
        }
        check_amount("amount", amount)?;

        let result = self
            .uow
            .run("add_currency_balance", move |txn| {
                Box::pin(async move {
                    Self::mutate(
                        txn,
                        currency_id,
                        Decimal::ZERO,
                        amount,
                        MANUAL_TOP_UP_STATEMENT,
                        user_id,
                    )
                    .await
                })
            })
            .await?;

        info!(%currency_id, %amount, new_balance = %result.new_balance, "currency balance topped up");
        Ok(result)
    }

    /// Lists movements, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_movements(
        &self,
        filter: &MovementFilter,
        page: PageRequest,
    ) -> Result<PageResponse<treasury_movements::Model>, TreasuryError> {
        let mut query = treasury_movements::Entity::find();

        if let Some(currency_id) = filter.currency_id {
            query = query.filter(treasury_movements::Column::CurrencyId.eq(currency_id.into_inner()));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(treasury_movements::Column::UserId.eq(user_id.into_inner()));
        }
        if let Some(from) = filter.from {
            query = query.filter(treasury_movements::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(treasury_movements::Column::CreatedAt.lte(to));
        }

        let paginator = query
            .order_by_desc(treasury_movements::Column::CreatedAt)
            .order_by_desc(treasury_movements::Column::Sequence)
            .order_by_desc(treasury_movements::Column::Id)
            .paginate(self.uow.connection(), page.limit());

        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.index()).await?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Returns the full journal of one currency in sequence order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn currency_journal<C: ConnectionTrait>(
        conn: &C,
        currency_id: CurrencyId,
    ) -> Result<Vec<treasury_movements::Model>, TreasuryError> {
        Ok(treasury_movements::Entity::find()
            .filter(treasury_movements::Column::CurrencyId.eq(currency_id.into_inner()))
            .order_by_asc(treasury_movements::Column::Sequence)
            .all(conn)
            .await?)
    }
}
