//! Currency buy/sale rules.

pub mod error;
pub mod trade;

pub use error::TradeError;
pub use trade::{TradeLegs, TradeSide, TradeTerms, expected_total, next_bill_number};
