//! `SeaORM` entity definitions.

pub mod prelude;

pub mod bill_sequences;
pub mod buys;
pub mod currencies;
pub mod customers;
pub mod debt_payments;
pub mod debts;
pub mod sales;
pub mod sea_orm_active_enums;
pub mod treasury_movements;
pub mod users;
