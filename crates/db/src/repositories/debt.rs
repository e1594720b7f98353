//! Debt repository: IOUs taken and given.
//!
//! The state machine in `sarraf_core::debt` decides every transition; this
//! repository loads the debt under lock, applies the decision, and posts
//! the matching balance mutation in the same transaction.

use chrono::Utc;
use rust_decimal::Decimal;
use sarraf_core::debt::{DebtAmounts, DebtService, DebtSnapshot};
use sarraf_shared::LedgerConfig;
use sarraf_shared::types::{
    CurrencyId, DebtId, DebtPaymentId, MovementId, PageRequest, PageResponse, UserId,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use crate::entities::{
    debt_payments, debts,
    sea_orm_active_enums::{DebtStatus, DebtType, PaymentType, RecordState},
};
use crate::error::TreasuryError;
use crate::repositories::currency::CurrencyRepository;
use crate::repositories::treasury::TreasuryRepository;
use crate::unit_of_work::UnitOfWork;

/// Input for creating a debt.
#[derive(Debug, Clone)]
pub struct CreateDebtInput {
    /// TAKEN (we borrowed) or GIVEN (we lent).
    pub debt_type: DebtType,
    /// Counterparty name, used in journal statements.
    pub debtor_name: String,
    /// Counterparty phone.
    pub debtor_phone: Option<String>,
    /// Currency of the debt.
    pub currency_id: CurrencyId,
    /// Original amount.
    pub amount: Decimal,
    /// Free-text note.
    pub description: Option<String>,
    /// Acting user.
    pub user_id: UserId,
}

/// Input for paying part or all of a debt.
#[derive(Debug, Clone)]
pub struct AddDebtPaymentInput {
    /// The debt being paid.
    pub debt_id: DebtId,
    /// Payment amount.
    pub amount: Decimal,
    /// Free-text note.
    pub description: Option<String>,
    /// Acting user.
    pub user_id: UserId,
}

/// A debt after a payment, with the payment itself.
#[derive(Debug, Clone)]
pub struct DebtPaymentResult {
    /// Updated debt.
    pub debt: debts::Model,
    /// Recorded payment.
    pub payment: debt_payments::Model,
}

/// A debt with its payment history, oldest payment first.
#[derive(Debug, Clone)]
pub struct DebtWithPayments {
    /// The debt.
    pub debt: debts::Model,
    /// Its payments.
    pub payments: Vec<debt_payments::Model>,
}

/// Filter options for listing debts.
#[derive(Debug, Clone, Default)]
pub struct DebtFilter {
    /// Filter by direction.
    pub debt_type: Option<DebtType>,
    /// Filter by status.
    pub status: Option<DebtStatus>,
    /// Filter by currency.
    pub currency_id: Option<CurrencyId>,
}

/// Debt repository.
#[derive(Debug, Clone)]
pub struct DebtRepository {
    uow: UnitOfWork,
}

fn snapshot(debt: &debts::Model) -> DebtSnapshot {
    DebtSnapshot {
        id: DebtId::from_uuid(debt.id),
        debt_type: debt.debt_type.into(),
        status: debt.status.into(),
        amounts: DebtAmounts {
            amount: debt.amount,
            paid_amount: debt.paid_amount,
            remaining_amount: debt.remaining_amount,
        },
    }
}

impl DebtRepository {
    /// Creates a new debt repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LedgerConfig) -> Self {
        Self {
            uow: UnitOfWork::new(db, policy),
        }
    }

    /// Opens a debt and posts its balance effect.
    ///
    /// TAKEN debts increase the currency balance, GIVEN debts decrease it.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the debtor name is blank or the amount is not positive
    /// - `NotFound` if the currency does not exist
    /// - `InsufficientFunds` if a GIVEN debt exceeds the balance
    pub async fn create(&self, input: CreateDebtInput) -> Result<debts::Model, TreasuryError> {
        let debtor_name = input.debtor_name.trim().to_string();
        if debtor_name.is_empty() {
            return Err(TreasuryError::InvalidInput(
                "Debtor name is required".to_string(),
            ));
        }
        let opening = DebtService::open(input.debt_type.into(), input.amount)?;
        CurrencyRepository::find_active(self.uow.connection(), input.currency_id).await?;

        let debt = self
            .uow
            .run("create_debt", move |txn| {
                let input = input.clone();
                let debtor_name = debtor_name.clone();
                Box::pin(async move {
                    let now = Utc::now().into();
                    let debt = debts::ActiveModel {
                        id: Set(DebtId::new().into_inner()),
                        debt_type: Set(input.debt_type),
                        debtor_name: Set(debtor_name.clone()),
                        debtor_phone: Set(input.debtor_phone),
                        currency_id: Set(input.currency_id.into_inner()),
                        amount: Set(opening.amounts.amount),
                        paid_amount: Set(opening.amounts.paid_amount),
                        remaining_amount: Set(opening.amounts.remaining_amount),
                        status: Set(opening.status.into()),
                        description: Set(input.description),
                        user_id: Set(input.user_id.into_inner()),
                        state: Set(RecordState::Active),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    TreasuryRepository::mutate(
                        txn,
                        input.currency_id,
                        opening.mutation.credit,
                        opening.mutation.debit,
                        &DebtService::creation_statement(input.debt_type.into(), &debtor_name),
                        input.user_id,
                    )
                    .await?;

                    Ok(debt)
                })
            })
            .await?;

        info!(debt_id = %debt.id, debt_type = ?debt.debt_type, amount = %debt.amount, "debt created");
        Ok(debt)
    }

    /// Records a payment against a debt.
    ///
    /// Paying back a TAKEN debt decreases the balance; collecting on a GIVEN
    /// debt increases it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the debt does not exist or is deleted
    /// - `AlreadySettled` if the debt is PAID or RECEIVED
    /// - `InvalidPaymentAmount` if the amount is not positive or exceeds the remainder
    /// - `InsufficientFunds` if repaying a TAKEN debt overdraws the currency
    pub async fn add_payment(
        &self,
        input: AddDebtPaymentInput,
    ) -> Result<DebtPaymentResult, TreasuryError> {
        let result = self
            .uow
            .run("add_debt_payment", move |txn| {
                let input = input.clone();
                Box::pin(async move {
                    let debt = Self::lock_debt(txn, input.debt_id).await?;
                    let transition = DebtService::apply_payment(&snapshot(&debt), input.amount)?;

                    let statement = DebtService::payment_statement(
                        debt.debt_type.into(),
                        &debt.debtor_name,
                        transition.settles(),
                    );
                    let currency_id = CurrencyId::from_uuid(debt.currency_id);
                    let mutation = TreasuryRepository::mutate(
                        txn,
                        currency_id,
                        transition.mutation.credit,
                        transition.mutation.debit,
                        &statement,
                        input.user_id,
                    )
                    .await?;

                    let now = Utc::now().into();
                    let mut active: debts::ActiveModel = debt.into();
                    active.paid_amount = Set(transition.amounts.paid_amount);
                    active.remaining_amount = Set(transition.amounts.remaining_amount);
                    active.status = Set(transition.new_status.into());
                    active.updated_at = Set(now);
                    let debt = active.update(txn).await?;

                    let payment = Self::insert_payment(
                        txn,
                        &input,
                        transition.payment_type.into(),
                        mutation.movement_id,
                    )
                    .await?;

                    Ok((DebtPaymentResult { debt, payment }, transition))
                })
            })
            .await;

        let (result, transition) = result?;
        info!(
            debt_id = %result.debt.id,
            amount = %result.payment.amount,
            from = %transition.from_status,
            to = %transition.new_status,
            "debt payment recorded"
        );
        Ok(result)
    }

    async fn insert_payment(
        txn: &DatabaseTransaction,
        input: &AddDebtPaymentInput,
        payment_type: PaymentType,
        movement_id: MovementId,
    ) -> Result<debt_payments::Model, TreasuryError> {
        Ok(debt_payments::ActiveModel {
            id: Set(DebtPaymentId::new().into_inner()),
            debt_id: Set(input.debt_id.into_inner()),
            amount: Set(input.amount),
            payment_type: Set(payment_type),
            movement_id: Set(movement_id.into_inner()),
            description: Set(input.description.clone()),
            user_id: Set(input.user_id.into_inner()),
            created_at: Set(Utc::now().into()),
        }
        .insert(txn)
        .await?)
    }

    /// Deletes an ACTIVE debt and reverses its opening balance effect.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the debt does not exist or is deleted
    /// - `NotActive` if any payment has been recorded
    /// - `InsufficientFunds` if reversing a TAKEN debt would overdraw the currency
    pub async fn delete(
        &self,
        debt_id: DebtId,
        user_id: UserId,
    ) -> Result<debts::Model, TreasuryError> {
        let debt = self
            .uow
            .run("delete_debt", move |txn| {
                Box::pin(async move {
                    let debt = Self::lock_debt(txn, debt_id).await?;
                    let reversal = DebtService::deletion(&snapshot(&debt))?;

                    TreasuryRepository::mutate(
                        txn,
                        CurrencyId::from_uuid(debt.currency_id),
                        reversal.credit,
                        reversal.debit,
                        &DebtService::reversal_statement(debt.debt_type.into(), &debt.debtor_name),
                        user_id,
                    )
                    .await?;

                    let mut active: debts::ActiveModel = debt.into();
                    active.state = Set(RecordState::Deleted);
                    active.updated_at = Set(Utc::now().into());
                    Ok(active.update(txn).await?)
                })
            })
            .await?;

        info!(debt_id = %debt.id, "debt deleted and reversed");
        Ok(debt)
    }

    async fn lock_debt(
        txn: &DatabaseTransaction,
        debt_id: DebtId,
    ) -> Result<debts::Model, TreasuryError> {
        debts::Entity::find_by_id(debt_id.into_inner())
            .filter(debts::Column::State.eq(RecordState::Active))
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| TreasuryError::not_found("debt", debt_id))
    }

    /// Gets an active debt with its payments.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the debt does not exist or is deleted.
    pub async fn get(&self, debt_id: DebtId) -> Result<DebtWithPayments, TreasuryError> {
        let conn = self.uow.connection();
        let debt = debts::Entity::find_by_id(debt_id.into_inner())
            .filter(debts::Column::State.eq(RecordState::Active))
            .one(conn)
            .await?
            .ok_or_else(|| TreasuryError::not_found("debt", debt_id))?;

        let payments = debt_payments::Entity::find()
            .filter(debt_payments::Column::DebtId.eq(debt.id))
            .order_by_asc(debt_payments::Column::CreatedAt)
            .order_by_asc(debt_payments::Column::Id)
            .all(conn)
            .await?;

        Ok(DebtWithPayments { debt, payments })
    }

    /// Lists active debts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &DebtFilter,
        page: PageRequest,
    ) -> Result<PageResponse<debts::Model>, TreasuryError> {
        let mut query = debts::Entity::find().filter(debts::Column::State.eq(RecordState::Active));

        if let Some(debt_type) = filter.debt_type {
            query = query.filter(debts::Column::DebtType.eq(debt_type));
        }
        if let Some(status) = filter.status {
            query = query.filter(debts::Column::Status.eq(status));
        }
        if let Some(currency_id) = filter.currency_id {
            query = query.filter(debts::Column::CurrencyId.eq(currency_id.into_inner()));
        }

        let paginator = query
            .order_by_desc(debts::Column::CreatedAt)
            .order_by_desc(debts::Column::Id)
            .paginate(self.uow.connection(), page.limit());

        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.index()).await?;
        Ok(PageResponse::new(data, page, total))
    }
}
