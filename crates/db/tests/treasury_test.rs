//! Integration tests for the balance mutation protocol and the journal.

mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sarraf_db::repositories::{CreateCurrencyInput, MANUAL_TOP_UP_STATEMENT, MovementFilter};
use sarraf_db::{TreasuryError, TreasuryRepository, UnitOfWork};
use sarraf_shared::LedgerConfig;
use sarraf_shared::types::{CurrencyId, PageRequest};

use common::fixture;

// ============================================================================
// Manual top-up
// ============================================================================

#[tokio::test]
async fn test_add_currency_balance_journals_movement() {
    let Some(fx) = fixture().await else { return };

    let result = fx
        .treasury
        .add_currency_balance(fx.usd, dec!(250), fx.user_id)
        .await
        .unwrap();
    assert_eq!(result.new_balance, dec!(250));
    assert_eq!(result.sequence, 1);

    let second = fx
        .treasury
        .add_currency_balance(fx.usd, dec!(50), fx.user_id)
        .await
        .unwrap();
    assert_eq!(second.new_balance, dec!(300));
    assert_eq!(second.sequence, 2);

    let journal = fx.journal(fx.usd).await;
    assert_eq!(journal.len(), 2);
    assert_eq!(journal[0].id, result.movement_id.into_inner());
    assert_eq!(journal[0].open_balance, Decimal::ZERO);
    assert_eq!(journal[0].debit, dec!(250));
    assert_eq!(journal[0].credit, Decimal::ZERO);
    assert_eq!(journal[0].final_balance, dec!(250));
    assert_eq!(journal[0].statement, MANUAL_TOP_UP_STATEMENT);
    assert_eq!(journal[1].open_balance, dec!(250));
    assert_eq!(journal[1].final_balance, dec!(300));

    assert_eq!(fx.balance(fx.usd).await, dec!(300));
    fx.assert_reconciled().await;
}

#[tokio::test]
async fn test_add_currency_balance_rejects_non_positive() {
    let Some(fx) = fixture().await else { return };

    for amount in [Decimal::ZERO, dec!(-10)] {
        let err = fx
            .treasury
            .add_currency_balance(fx.usd, amount, fx.user_id)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
    assert_eq!(fx.movement_count(fx.usd).await, 0);
}

#[tokio::test]
async fn test_add_currency_balance_unknown_currency() {
    let Some(fx) = fixture().await else { return };
    let missing = CurrencyId::new();

    let err = fx
        .treasury
        .add_currency_balance(missing, dec!(10), fx.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, TreasuryError::NotFound { entity: "currency", .. }));
}

#[tokio::test]
async fn test_balances_round_trip_without_loss() {
    let Some(fx) = fixture().await else { return };

    fx.fund(fx.usd, dec!(0.0001)).await;
    fx.fund(fx.lyd, dec!(123456789012345.1234)).await;
    fx.fund(fx.lyd, dec!(0.0001)).await;

    assert_eq!(fx.balance(fx.usd).await, dec!(0.0001));
    assert_eq!(fx.balance(fx.lyd).await, dec!(123456789012345.1235));

    let journal = fx.journal(fx.lyd).await;
    assert_eq!(journal[1].open_balance, dec!(123456789012345.1234));
    assert_eq!(journal[1].debit, dec!(0.0001));
    fx.assert_reconciled().await;
}

#[tokio::test]
async fn test_add_currency_balance_rejects_unstorable_amounts() {
    let Some(fx) = fixture().await else { return };
    fx.fund(fx.usd, dec!(999999999999999)).await;

    for amount in [dec!(0.00001), dec!(1.23456), dec!(100000000000000000000), dec!(1)] {
        let err = fx
            .treasury
            .add_currency_balance(fx.usd, amount, fx.user_id)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT", "amount {amount}");
    }

    assert_eq!(fx.balance(fx.usd).await, dec!(999999999999999));
    assert_eq!(fx.movement_count(fx.usd).await, 1);
}

// ============================================================================
// Protocol atomicity
// ============================================================================

#[tokio::test]
async fn test_failed_credit_leaves_balance_and_journal_unchanged() {
    let Some(fx) = fixture().await else { return };
    fx.fund(fx.usd, dec!(50)).await;
    let before_count = fx.movement_count(fx.usd).await;

    let uow = UnitOfWork::new(fx.db.clone(), LedgerConfig::default());
    let (usd, user_id) = (fx.usd, fx.user_id);
    let err = uow
        .run("overdraw", move |txn| {
            Box::pin(async move {
                TreasuryRepository::mutate(txn, usd, dec!(100), Decimal::ZERO, "Overdraw", user_id)
                    .await
            })
        })
        .await
        .unwrap_err();

    match err {
        TreasuryError::InsufficientFunds {
            currency_id,
            required,
            available,
        } => {
            assert_eq!(currency_id, fx.usd);
            assert_eq!(required, dec!(100));
            assert_eq!(available, dec!(50));
        }
        other => panic!("expected InsufficientFunds, got {other:?}"),
    }

    assert_eq!(fx.balance(fx.usd).await, dec!(50));
    assert_eq!(fx.movement_count(fx.usd).await, before_count);
}

#[tokio::test]
async fn test_second_leg_failure_rolls_back_first_leg() {
    let Some(fx) = fixture().await else { return };
    fx.fund(fx.lyd, dec!(10)).await;

    let uow = UnitOfWork::new(fx.db.clone(), LedgerConfig::default());
    let (usd, lyd, user_id) = (fx.usd, fx.lyd, fx.user_id);
    let result = uow
        .run("two_legs", move |txn| {
            Box::pin(async move {
                TreasuryRepository::mutate(txn, usd, Decimal::ZERO, dec!(100), "Leg A", user_id)
                    .await?;
                TreasuryRepository::mutate(txn, lyd, dec!(500), Decimal::ZERO, "Leg B", user_id)
                    .await
            })
        })
        .await;

    assert!(matches!(result, Err(TreasuryError::InsufficientFunds { .. })));
    assert_eq!(fx.balance(fx.usd).await, Decimal::ZERO);
    assert_eq!(fx.movement_count(fx.usd).await, 0);
    assert_eq!(fx.balance(fx.lyd).await, dec!(10));
    fx.assert_reconciled().await;
}

#[tokio::test]
async fn test_credit_to_zero_is_allowed() {
    let Some(fx) = fixture().await else { return };
    fx.fund(fx.usd, dec!(75)).await;

    let uow = UnitOfWork::new(fx.db.clone(), LedgerConfig::default());
    let (usd, user_id) = (fx.usd, fx.user_id);
    let result = uow
        .run("drain", move |txn| {
            Box::pin(async move {
                TreasuryRepository::mutate(txn, usd, dec!(75), Decimal::ZERO, "Drain", user_id)
                    .await
            })
        })
        .await
        .unwrap();

    assert_eq!(result.new_balance, Decimal::ZERO);
    assert_eq!(fx.balance(fx.usd).await, Decimal::ZERO);
    fx.assert_reconciled().await;
}

// ============================================================================
// Currency catalogue
// ============================================================================

#[tokio::test]
async fn test_currency_codes_are_normalized_and_unique() {
    let Some(fx) = fixture().await else { return };

    let usd = fx.currencies.get(fx.usd).await.unwrap();
    assert_eq!(usd.code, "USD");
    assert_eq!(usd.balance, Decimal::ZERO);

    let err = fx
        .currencies
        .create(CreateCurrencyInput {
            name: "Dollar again".to_string(),
            code: " Usd ".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");
}

#[tokio::test]
async fn test_delete_currency_requires_zero_balance() {
    let Some(fx) = fixture().await else { return };
    fx.fund(fx.usd, dec!(5)).await;

    let err = fx.currencies.delete(fx.usd).await.unwrap_err();
    assert!(matches!(err, TreasuryError::CurrencyNotEmpty { balance, .. } if balance == dec!(5)));

    let deleted = fx.currencies.delete(fx.lyd).await.unwrap();
    assert_eq!(deleted.id, fx.lyd.into_inner());

    // Deleted currencies disappear from default reads and new operations.
    assert!(matches!(
        fx.currencies.get(fx.lyd).await,
        Err(TreasuryError::NotFound { .. })
    ));
    let err = fx
        .treasury
        .add_currency_balance(fx.lyd, dec!(1), fx.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, TreasuryError::NotFound { .. }));

    assert_eq!(fx.currencies.list(false).await.unwrap().len(), 1);
    assert_eq!(fx.currencies.list(true).await.unwrap().len(), 2);
}

// ============================================================================
// Journal reads
// ============================================================================

#[tokio::test]
async fn test_list_movements_filters_and_paginates() {
    let Some(fx) = fixture().await else { return };
    for _ in 0..5 {
        fx.fund(fx.usd, dec!(10)).await;
    }
    fx.fund(fx.lyd, dec!(1000)).await;

    let all = fx
        .treasury
        .list_movements(&MovementFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(all.meta.total, 6);

    let filter = MovementFilter {
        currency_id: Some(fx.usd),
        ..Default::default()
    };
    let first_page = fx
        .treasury
        .list_movements(&filter, PageRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(first_page.meta.total, 5);
    assert_eq!(first_page.meta.total_pages, 3);
    assert_eq!(first_page.data.len(), 2);
    // Newest first.
    assert_eq!(first_page.data[0].sequence, 5);
    assert_eq!(first_page.data[1].sequence, 4);

    let last_page = fx
        .treasury
        .list_movements(&filter, PageRequest::new(3, 2))
        .await
        .unwrap();
    assert_eq!(last_page.data.len(), 1);
    assert_eq!(last_page.data[0].sequence, 1);

    let by_user = MovementFilter {
        user_id: Some(fx.user_id),
        ..Default::default()
    };
    let mine = fx
        .treasury
        .list_movements(&by_user, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(mine.meta.total, 6);
}

#[tokio::test]
async fn test_reconcile_empty_currencies() {
    let Some(fx) = fixture().await else { return };

    let report = fx.reconciliation.reconcile().await.unwrap();
    assert_eq!(report.currencies.len(), 2);
    assert!(report.currencies.iter().all(|c| c.audit.entries == 0));
    assert!(report.is_clean());
}
