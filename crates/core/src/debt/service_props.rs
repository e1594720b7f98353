//! Property-based tests for the debt state machine.

use proptest::prelude::*;
use rust_decimal::Decimal;
use sarraf_shared::types::DebtId;

use crate::debt::error::DebtError;
use crate::debt::service::DebtService;
use crate::debt::types::{DebtAmounts, DebtSnapshot, DebtStatus, DebtType};

/// Strategy for generating debt types.
fn arb_debt_type() -> impl Strategy<Value = DebtType> {
    prop_oneof![Just(DebtType::Taken), Just(DebtType::Given)]
}

/// Strategy for positive amounts with 2 decimal places.
fn arb_positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any sequence of payment attempts keeps paid + remaining == amount,
    /// and the stored status is always the one implied by the amounts.
    #[test]
    fn prop_payments_conserve_amount(
        debt_type in arb_debt_type(),
        amount in arb_positive_amount(),
        payments in prop::collection::vec(arb_positive_amount(), 0..20)
    ) {
        let opening = DebtService::open(debt_type, amount).unwrap();
        let mut debt = DebtSnapshot {
            id: DebtId::new(),
            debt_type,
            status: opening.status,
            amounts: opening.amounts,
        };

        for payment in payments {
            match DebtService::apply_payment(&debt, payment) {
                Ok(transition) => {
                    prop_assert_eq!(transition.mutation.net_change().abs(), payment);
                    debt.status = transition.new_status;
                    debt.amounts = transition.amounts;
                }
                Err(DebtError::AlreadySettled(_)) => prop_assert!(debt.status.is_terminal()),
                Err(DebtError::InvalidPaymentAmount { remaining, .. }) => {
                    prop_assert!(payment > remaining);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
            prop_assert!(debt.amounts.is_conserved());
            prop_assert!(debt.amounts.remaining_amount >= Decimal::ZERO);
            prop_assert_eq!(debt.status, DebtService::status_for(debt_type, &debt.amounts));
        }
    }

    /// Paying exactly the remaining amount always settles with the right terminal status.
    #[test]
    fn prop_paying_remaining_settles(
        debt_type in arb_debt_type(),
        amount in arb_positive_amount(),
        paid_ratio in 0u32..100
    ) {
        let paid = (amount * Decimal::from(paid_ratio) / Decimal::from(100)).round_dp(2);
        let amounts = DebtAmounts { amount, paid_amount: paid, remaining_amount: amount - paid };
        let status = DebtService::status_for(debt_type, &amounts);
        prop_assume!(!status.is_terminal());

        let debt = DebtSnapshot { id: DebtId::new(), debt_type, status, amounts };
        let transition = DebtService::apply_payment(&debt, amounts.remaining_amount).unwrap();
        prop_assert_eq!(transition.new_status, debt_type.settled_status());
        prop_assert_eq!(transition.amounts.paid_amount, amount);
    }

    /// Opening then deleting a debt has zero net balance effect.
    #[test]
    fn prop_deletion_reverses_opening(debt_type in arb_debt_type(), amount in arb_positive_amount()) {
        let opening = DebtService::open(debt_type, amount).unwrap();
        let debt = DebtSnapshot {
            id: DebtId::new(),
            debt_type,
            status: opening.status,
            amounts: opening.amounts,
        };
        let reversal = DebtService::deletion(&debt).unwrap();
        prop_assert_eq!(opening.mutation.net_change() + reversal.net_change(), Decimal::ZERO);
    }
}
