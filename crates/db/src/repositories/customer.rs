//! Customer reference data.
//!
//! The treasury only needs to know that a customer exists; full customer
//! management lives outside this crate.

use chrono::Utc;
use sarraf_shared::types::CustomerId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};

use crate::entities::{customers, sea_orm_active_enums::RecordState};
use crate::error::TreasuryError;

/// Input for creating a customer.
#[derive(Debug, Clone, Default)]
pub struct CreateCustomerInput {
    /// Full name.
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Nationality label.
    pub nationality: Option<String>,
    /// Passport or ID number.
    pub document_number: Option<String>,
}

/// Customer repository.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the name is blank.
    pub async fn create(
        &self,
        input: CreateCustomerInput,
    ) -> Result<customers::Model, TreasuryError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(TreasuryError::InvalidInput(
                "Customer name is required".to_string(),
            ));
        }

        let customer = customers::ActiveModel {
            id: Set(CustomerId::new().into_inner()),
            name: Set(name.to_string()),
            phone: Set(input.phone),
            nationality: Set(input.nationality),
            document_number: Set(input.document_number),
            state: Set(RecordState::Active),
            created_at: Set(Utc::now().into()),
        };

        Ok(customer.insert(&self.db).await?)
    }

    /// Gets an active customer.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the customer does not exist or is deleted.
    pub async fn get(&self, id: CustomerId) -> Result<customers::Model, TreasuryError> {
        customers::Entity::find_by_id(id.into_inner())
            .filter(customers::Column::State.eq(RecordState::Active))
            .one(&self.db)
            .await?
            .ok_or_else(|| TreasuryError::not_found("customer", id))
    }

    /// Returns true if an active customer with this id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn exists(&self, id: CustomerId) -> Result<bool, TreasuryError> {
        Self::exists_on(&self.db, id).await
    }

    pub(crate) async fn exists_on<C: ConnectionTrait>(
        conn: &C,
        id: CustomerId,
    ) -> Result<bool, TreasuryError> {
        let count = customers::Entity::find_by_id(id.into_inner())
            .filter(customers::Column::State.eq(RecordState::Active))
            .count(conn)
            .await?;
        Ok(count > 0)
    }

    /// Soft-deletes a customer. Their trades stay on record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the customer does not exist or is already deleted.
    pub async fn delete(&self, id: CustomerId) -> Result<customers::Model, TreasuryError> {
        let customer = self.get(id).await?;
        let mut active: customers::ActiveModel = customer.into();
        active.state = Set(RecordState::Deleted);
        Ok(active.update(&self.db).await?)
    }
}
