//! User repository for database operations.
//!
//! Authentication is handled elsewhere; users exist here so that every
//! treasury movement names its actor.

use chrono::Utc;
use sarraf_shared::types::UserId;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::users;
use crate::error::TreasuryError;

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<users::Model>, TreasuryError> {
        Ok(users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, TreasuryError> {
        Ok(users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the username is blank or taken
    pub async fn create(
        &self,
        username: &str,
        full_name: &str,
    ) -> Result<users::Model, TreasuryError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(TreasuryError::InvalidInput("Username is required".to_string()));
        }
        if self.find_by_username(username).await?.is_some() {
            return Err(TreasuryError::InvalidInput(format!(
                "Username {username} is already taken"
            )));
        }

        let user = users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            username: Set(username.to_string()),
            full_name: Set(full_name.to_string()),
            created_at: Set(Utc::now().into()),
        };

        Ok(user.insert(&self.db).await?)
    }
}
