//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every operation that moves money goes through [`TreasuryRepository::mutate`].

pub mod currency;
pub mod customer;
pub mod debt;
pub mod exchange;
pub mod reconciliation;
pub mod treasury;
pub mod user;

pub use currency::{CreateCurrencyInput, CurrencyRepository};
pub use customer::{CreateCustomerInput, CustomerRepository};
pub use debt::{
    AddDebtPaymentInput, CreateDebtInput, DebtFilter, DebtPaymentResult, DebtRepository,
    DebtWithPayments,
};
pub use exchange::{CreateTradeInput, ExchangeRepository};
pub use reconciliation::{
    CurrencyReconciliation, DebtReconciliation, ReconciliationReport, ReconciliationRepository,
};
pub use treasury::{MANUAL_TOP_UP_STATEMENT, MovementFilter, MutationResult, TreasuryRepository};
pub use user::UserRepository;
