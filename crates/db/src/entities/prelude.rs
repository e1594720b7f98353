//! Entity re-exports.

pub use super::bill_sequences::Entity as BillSequences;
pub use super::buys::Entity as Buys;
pub use super::currencies::Entity as Currencies;
pub use super::customers::Entity as Customers;
pub use super::debt_payments::Entity as DebtPayments;
pub use super::debts::Entity as Debts;
pub use super::sales::Entity as Sales;
pub use super::treasury_movements::Entity as TreasuryMovements;
pub use super::users::Entity as Users;
