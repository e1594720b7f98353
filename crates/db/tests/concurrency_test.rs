//! Concurrent operations against the same currencies.
//!
//! Every test starts its tasks behind a barrier on a multi-connection pool,
//! so the transactions genuinely overlap in the database.

#![allow(clippy::items_after_statements)]

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sarraf_db::TreasuryError;
use sarraf_db::entities::sea_orm_active_enums::{DebtStatus, DebtType};
use sarraf_db::repositories::{AddDebtPaymentInput, CreateDebtInput, CreateTradeInput};
use sarraf_shared::LedgerConfig;
use sarraf_shared::types::DebtId;
use tokio::sync::Barrier;

use common::{Fixture, fixture, fixture_with};

fn buy_usd_for_lyd(fx: &Fixture) -> CreateTradeInput {
    CreateTradeInput {
        customer_id: fx.customer_id,
        currency_id: fx.usd,
        value: dec!(10),
        price: dec!(5),
        total_price: dec!(50),
        payment_currency_id: fx.lyd,
        user_id: fx.user_id,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_top_ups_all_land() {
    let Some(fx) = fixture().await else { return };
    let fx = Arc::new(fx);

    const NUM_TOP_UPS: usize = 20;
    let barrier = Arc::new(Barrier::new(NUM_TOP_UPS));

    let mut handles = Vec::with_capacity(NUM_TOP_UPS);
    for _ in 0..NUM_TOP_UPS {
        let fx_clone = Arc::clone(&fx);
        let barrier_clone = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier_clone.wait().await;
            fx_clone
                .treasury
                .add_currency_balance(fx_clone.usd, dec!(5), fx_clone.user_id)
                .await
        }));
    }

    let results = join_all(handles).await;
    for result in &results {
        assert!(matches!(result, Ok(Ok(_))), "top-up failed: {result:?}");
    }

    assert_eq!(fx.balance(fx.usd).await, dec!(100));
    assert_eq!(fx.movement_count(fx.usd).await, 20);

    let sequences: Vec<i64> = fx.journal(fx.usd).await.iter().map(|m| m.sequence).collect();
    let expected: Vec<i64> = (1..=20).collect();
    assert_eq!(sequences, expected);

    fx.assert_reconciled().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_buys_get_unique_bill_numbers() {
    let Some(fx) = fixture().await else { return };
    fx.fund(fx.lyd, dec!(10000)).await;
    let fx = Arc::new(fx);

    const NUM_BUYS: usize = 10;
    let barrier = Arc::new(Barrier::new(NUM_BUYS));

    let mut handles = Vec::with_capacity(NUM_BUYS);
    for _ in 0..NUM_BUYS {
        let fx_clone = Arc::clone(&fx);
        let barrier_clone = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier_clone.wait().await;
            fx_clone.exchange.create_buy(buy_usd_for_lyd(&fx_clone)).await
        }));
    }

    let bills: BTreeSet<i64> = join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap().bill_number)
        .collect();

    assert_eq!(bills, (1..=10).collect::<BTreeSet<_>>());
    assert_eq!(fx.balance(fx.usd).await, dec!(100));
    assert_eq!(fx.balance(fx.lyd).await, dec!(9500));
    fx.assert_reconciled().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_opposite_trades_do_not_deadlock() {
    // A single attempt: a deadlock would surface as a conflict, not be retried away.
    let policy = LedgerConfig {
        max_attempts: 1,
        ..LedgerConfig::default()
    };
    let Some(fx) = fixture_with(policy).await else { return };
    fx.fund(fx.usd, dec!(10000)).await;
    fx.fund(fx.lyd, dec!(10000)).await;
    let fx = Arc::new(fx);

    const PAIRS: usize = 10;
    let barrier = Arc::new(Barrier::new(PAIRS * 2));

    let mut handles = Vec::with_capacity(PAIRS * 2);
    for _ in 0..PAIRS {
        // Buy USD paying LYD: USD leg first, then LYD.
        let fx_clone = Arc::clone(&fx);
        let barrier_clone = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier_clone.wait().await;
            fx_clone
                .exchange
                .create_buy(buy_usd_for_lyd(&fx_clone))
                .await
                .map(|buy| buy.bill_number)
        }));

        // Sell LYD for USD: LYD leg first, then USD.
        let fx_clone = Arc::clone(&fx);
        let barrier_clone = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier_clone.wait().await;
            fx_clone
                .exchange
                .create_sale(CreateTradeInput {
                    customer_id: fx_clone.customer_id,
                    currency_id: fx_clone.lyd,
                    value: dec!(50),
                    price: dec!(0.2),
                    total_price: dec!(10),
                    payment_currency_id: fx_clone.usd,
                    user_id: fx_clone.user_id,
                })
                .await
                .map(|sale| sale.bill_number)
        }));
    }

    let results = join_all(handles).await;
    for result in &results {
        assert!(matches!(result, Ok(Ok(_))), "trade failed: {result:?}");
    }

    assert_eq!(fx.balance(fx.usd).await, dec!(10200));
    assert_eq!(fx.balance(fx.lyd).await, dec!(9000));
    fx.assert_reconciled().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_competing_sales_never_overdraw() {
    let Some(fx) = fixture().await else { return };
    fx.fund(fx.usd, dec!(100)).await;
    let fx = Arc::new(fx);

    const NUM_SALES: usize = 5;
    let barrier = Arc::new(Barrier::new(NUM_SALES));

    let mut handles = Vec::with_capacity(NUM_SALES);
    for _ in 0..NUM_SALES {
        let fx_clone = Arc::clone(&fx);
        let barrier_clone = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier_clone.wait().await;
            fx_clone
                .exchange
                .create_sale(CreateTradeInput {
                    customer_id: fx_clone.customer_id,
                    currency_id: fx_clone.usd,
                    value: dec!(30),
                    price: dec!(2),
                    total_price: dec!(60),
                    payment_currency_id: fx_clone.lyd,
                    user_id: fx_clone.user_id,
                })
                .await
        }));
    }

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|r| r.expect("sale task panicked"))
        .collect();
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 3);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, TreasuryError::InsufficientFunds { .. }))
    );

    assert_eq!(fx.balance(fx.usd).await, dec!(10));
    assert_eq!(fx.balance(fx.lyd).await, dec!(180));
    fx.assert_reconciled().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_payments_settle_exactly_once() {
    let Some(fx) = fixture().await else { return };
    fx.fund(fx.usd, dec!(100)).await;

    let debt = fx
        .debts
        .create(CreateDebtInput {
            debt_type: DebtType::Given,
            debtor_name: "Omar".to_string(),
            debtor_phone: None,
            currency_id: fx.usd,
            amount: dec!(100),
            description: None,
            user_id: fx.user_id,
        })
        .await
        .unwrap();
    let debt_id = DebtId::from_uuid(debt.id);
    let fx = Arc::new(fx);

    const NUM_PAYMENTS: usize = 12;
    let barrier = Arc::new(Barrier::new(NUM_PAYMENTS));

    let mut handles = Vec::with_capacity(NUM_PAYMENTS);
    for _ in 0..NUM_PAYMENTS {
        let fx_clone = Arc::clone(&fx);
        let barrier_clone = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier_clone.wait().await;
            fx_clone
                .debts
                .add_payment(AddDebtPaymentInput {
                    debt_id,
                    amount: dec!(10),
                    description: None,
                    user_id: fx_clone.user_id,
                })
                .await
        }));
    }

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|r| r.expect("payment task panicked"))
        .collect();
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 10);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, TreasuryError::AlreadySettled(_)))
    );

    let stored = fx.debts.get(debt_id).await.unwrap();
    assert_eq!(stored.debt.status, DebtStatus::Received);
    assert_eq!(stored.debt.remaining_amount, Decimal::ZERO);
    assert_eq!(stored.payments.len(), 10);
    assert_eq!(fx.balance(fx.usd).await, dec!(100));
    fx.assert_reconciled().await;
}
