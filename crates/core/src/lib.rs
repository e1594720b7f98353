//! Core treasury rules for Sarraf.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Balance arithmetic, trade validation and the debt lifecycle live here; the
//! `sarraf-db` crate applies them inside database transactions.
//!
//! # Modules
//!
//! - `ledger` - Balance mutation arithmetic and journal chain auditing
//! - `exchange` - Buy/sale terms, currency legs and bill numbering
//! - `debt` - Debt lifecycle state machine
//! - `money` - Scale and range of storable amounts

pub mod debt;
pub mod exchange;
pub mod ledger;
pub mod money;
