//! Exchange repository: currency buys and sales.
//!
//! Each trade runs in one transaction:
//! 1. Lock both currency rows, lowest id first
//! 2. Issue the next bill number of its series (locked counter row)
//! 3. Insert the buy/sale record
//! 4. Mutate the traded currency by `value`
//! 5. Mutate the payment currency by `total_price`
//!
//! If either leg fails the whole trade rolls back, bill number included.

use chrono::Utc;
use rust_decimal::Decimal;
use sarraf_core::exchange::{TradeSide, TradeTerms, next_bill_number};
use sarraf_shared::LedgerConfig;
use sarraf_shared::types::{
    BuyId, CurrencyId, CustomerId, PageRequest, PageResponse, SaleId, UserId,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use crate::entities::{bill_sequences, buys, sales, sea_orm_active_enums::RecordState};
use crate::error::TreasuryError;
use crate::repositories::currency::CurrencyRepository;
use crate::repositories::customer::CustomerRepository;
use crate::repositories::treasury::TreasuryRepository;
use crate::unit_of_work::UnitOfWork;

/// Input for creating a buy or a sale.
#[derive(Debug, Clone, Copy)]
pub struct CreateTradeInput {
    /// Counterparty.
    pub customer_id: CustomerId,
    /// Currency bought or sold.
    pub currency_id: CurrencyId,
    /// Quantity of `currency_id`.
    pub value: Decimal,
    /// Rate in payment currency per unit.
    pub price: Decimal,
    /// `value * price`, in payment currency.
    pub total_price: Decimal,
    /// Currency the customer pays or is paid in.
    pub payment_currency_id: CurrencyId,
    /// Acting user.
    pub user_id: UserId,
}

impl CreateTradeInput {
    fn terms(&self) -> TradeTerms {
        TradeTerms {
            traded_currency_id: self.currency_id,
            payment_currency_id: self.payment_currency_id,
            value: self.value,
            price: self.price,
            total_price: self.total_price,
        }
    }

    const fn currencies(&self) -> [CurrencyId; 2] {
        [self.currency_id, self.payment_currency_id]
    }
}

/// Currency codes resolved before the transaction, used in statements.
#[derive(Debug, Clone)]
struct TradeContext {
    traded_code: String,
}

/// Exchange repository.
#[derive(Debug, Clone)]
pub struct ExchangeRepository {
    uow: UnitOfWork,
}

impl ExchangeRepository {
    /// Creates a new exchange repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LedgerConfig) -> Self {
        Self {
            uow: UnitOfWork::new(db, policy),
        }
    }

    /// Buys foreign currency from a customer.
    ///
    /// The traded currency increases by `value`; the payment currency
    /// decreases by `total_price`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the terms are invalid
    /// - `NotFound` if the customer or a currency does not exist
    /// - `InsufficientFunds` if the payment currency cannot cover the total
    pub async fn create_buy(&self, input: CreateTradeInput) -> Result<buys::Model, TreasuryError> {
        let ctx = self.prepare(TradeSide::Buy, &input).await?;

        let buy = self
            .uow
            .run("create_buy", move |txn| {
                let ctx = ctx.clone();
                Box::pin(async move {
                    TreasuryRepository::lock_currencies(txn, &input.currencies()).await?;
                    let bill_number = Self::issue_bill_number(txn, TradeSide::Buy).await?;

                    let buy = buys::ActiveModel {
                        id: Set(BuyId::new().into_inner()),
                        bill_number: Set(bill_number),
                        customer_id: Set(input.customer_id.into_inner()),
                        currency_id: Set(input.currency_id.into_inner()),
                        value: Set(input.value),
                        price: Set(input.price),
                        total_price: Set(input.total_price),
                        payment_currency_id: Set(input.payment_currency_id.into_inner()),
                        user_id: Set(input.user_id.into_inner()),
                        state: Set(RecordState::Active),
                        created_at: Set(Utc::now().into()),
                    }
                    .insert(txn)
                    .await?;

                    Self::post_legs(txn, TradeSide::Buy, &input, &ctx, bill_number).await?;
                    Ok(buy)
                })
            })
            .await?;

        info!(bill_number = buy.bill_number, buy_id = %buy.id, value = %buy.value, "buy recorded");
        Ok(buy)
    }

    /// Sells foreign currency to a customer.
    ///
    /// The traded currency decreases by `value`; the payment currency
    /// increases by `total_price`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the terms are invalid
    /// - `NotFound` if the customer or a currency does not exist
    /// - `InsufficientFunds` if the traded currency holds less than `value`
    pub async fn create_sale(&self, input: CreateTradeInput) -> Result<sales::Model, TreasuryError> {
        let ctx = self.prepare(TradeSide::Sale, &input).await?;

        let sale = self
            .uow
            .run("create_sale", move |txn| {
                let ctx = ctx.clone();
                Box::pin(async move {
                    TreasuryRepository::lock_currencies(txn, &input.currencies()).await?;
                    let bill_number = Self::issue_bill_number(txn, TradeSide::Sale).await?;

                    let sale = sales::ActiveModel {
                        id: Set(SaleId::new().into_inner()),
                        bill_number: Set(bill_number),
                        customer_id: Set(input.customer_id.into_inner()),
                        currency_id: Set(input.currency_id.into_inner()),
                        value: Set(input.value),
                        price: Set(input.price),
                        total_price: Set(input.total_price),
                        payment_currency_id: Set(input.payment_currency_id.into_inner()),
                        user_id: Set(input.user_id.into_inner()),
                        state: Set(RecordState::Active),
                        created_at: Set(Utc::now().into()),
                    }
                    .insert(txn)
                    .await?;

                    Self::post_legs(txn, TradeSide::Sale, &input, &ctx, bill_number).await?;
                    Ok(sale)
                })
            })
            .await?;

        info!(bill_number = sale.bill_number, sale_id = %sale.id, value = %sale.value, "sale recorded");
        Ok(sale)
    }

    /// Validates a trade and resolves its references before any transaction is opened.
    async fn prepare(
        &self,
        side: TradeSide,
        input: &CreateTradeInput,
    ) -> Result<TradeContext, TreasuryError> {
        input.terms().validate()?;

        let conn = self.uow.connection();
        if !CustomerRepository::exists_on(conn, input.customer_id).await? {
            return Err(TreasuryError::not_found("customer", input.customer_id));
        }

        let traded = CurrencyRepository::find_active(conn, input.currency_id).await?;
        CurrencyRepository::find_active(conn, input.payment_currency_id).await?;

        // Fail fast; the protocol re-checks under lock.
        if side == TradeSide::Sale && traded.balance < input.value {
            return Err(TreasuryError::InsufficientFunds {
                currency_id: input.currency_id,
                required: input.value,
                available: traded.balance,
            });
        }

        Ok(TradeContext {
            traded_code: traded.code,
        })
    }

    /// Takes the next number of a bill series under a row lock.
    async fn issue_bill_number(
        txn: &DatabaseTransaction,
        side: TradeSide,
    ) -> Result<i64, TreasuryError> {
        let counter = bill_sequences::Entity::find_by_id(side.series().to_string())
            .lock_exclusive()
            .one(txn)
            .await?;

        match counter {
            Some(counter) => {
                let next = next_bill_number(side, counter.last_value)?;
                let mut active: bill_sequences::ActiveModel = counter.into();
                active.last_value = Set(next);
                active.update(txn).await?;
                Ok(next)
            }
            None => {
                let next = next_bill_number(side, 0)?;
                bill_sequences::ActiveModel {
                    series: Set(side.series().to_string()),
                    last_value: Set(next),
                }
                .insert(txn)
                .await?;
                Ok(next)
            }
        }
    }

    /// Applies both currency legs of a trade.
    async fn post_legs(
        txn: &DatabaseTransaction,
        side: TradeSide,
        input: &CreateTradeInput,
        ctx: &TradeContext,
        bill_number: i64,
    ) -> Result<(), TreasuryError> {
        let legs = side.legs(&input.terms());

        TreasuryRepository::mutate(
            txn,
            input.currency_id,
            legs.traded.credit,
            legs.traded.debit,
            &side.traded_statement(input.value, &ctx.traded_code, bill_number),
            input.user_id,
        )
        .await?;

        TreasuryRepository::mutate(
            txn,
            input.payment_currency_id,
            legs.payment.credit,
            legs.payment.debit,
            &side.payment_statement(input.value, &ctx.traded_code, bill_number),
            input.user_id,
        )
        .await?;

        Ok(())
    }

    /// Gets an active buy.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the buy does not exist or is deleted.
    pub async fn get_buy(&self, id: BuyId) -> Result<buys::Model, TreasuryError> {
        buys::Entity::find_by_id(id.into_inner())
            .filter(buys::Column::State.eq(RecordState::Active))
            .one(self.uow.connection())
            .await?
            .ok_or_else(|| TreasuryError::not_found("buy", id))
    }

    /// Gets an active sale.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the sale does not exist or is deleted.
    pub async fn get_sale(&self, id: SaleId) -> Result<sales::Model, TreasuryError> {
        sales::Entity::find_by_id(id.into_inner())
            .filter(sales::Column::State.eq(RecordState::Active))
            .one(self.uow.connection())
            .await?
            .ok_or_else(|| TreasuryError::not_found("sale", id))
    }

    /// Lists active buys, highest bill number first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_buys(
        &self,
        page: PageRequest,
    ) -> Result<PageResponse<buys::Model>, TreasuryError> {
        let paginator = buys::Entity::find()
            .filter(buys::Column::State.eq(RecordState::Active))
            .order_by_desc(buys::Column::BillNumber)
            .paginate(self.uow.connection(), page.limit());

        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.index()).await?;
        Ok(PageResponse::new(data, page, total))
    }

    /// Lists active sales, highest bill number first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_sales(
        &self,
        page: PageRequest,
    ) -> Result<PageResponse<sales::Model>, TreasuryError> {
        let paginator = sales::Entity::find()
            .filter(sales::Column::State.eq(RecordState::Active))
            .order_by_desc(sales::Column::BillNumber)
            .paginate(self.uow.connection(), page.limit());

        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.index()).await?;
        Ok(PageResponse::new(data, page, total))
    }
}
