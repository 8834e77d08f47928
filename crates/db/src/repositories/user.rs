//! User repository for database operations.

use aerodesk_core::{
    auth::verify_password,
    directory::{DirectoryError, DirectoryService},
};
use aerodesk_shared::types::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{airports, users};
use crate::error::{StoreResult, unique_violation};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plain-text password, hashed before storage.
    pub password: String,
    /// Role tag, e.g. `cashier`.
    pub role: String,
    /// Home airport; required for cashiers.
    pub airport_id: Option<Uuid>,
}

/// User repository.
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

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Validation errors from [`DirectoryService::prepare_user`],
    /// `AirportNotFound`, or `EmailTaken`.
    pub async fn create(&self, input: CreateUserInput) -> StoreResult<users::Model> {
        let new_user = DirectoryService::prepare_user(
            &input.name,
            &input.email,
            &input.password,
            &input.role,
            input.airport_id,
        )?;

        let txn = self.db.begin().await?;

        if let Some(airport_id) = new_user.airport_id {
            if airports::Entity::find_by_id(airport_id).one(&txn).await?.is_none() {
                return Err(DirectoryError::AirportNotFound(airport_id).into());
            }
        }

        let taken = users::Entity::find()
            .filter(users::Column::Email.eq(&new_user.email))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(DirectoryError::EmailTaken(new_user.email).into());
        }

        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_user.name),
            email: Set(new_user.email.clone()),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.into()),
            airport_id: Set(new_user.airport_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let user = match user.insert(&txn).await {
            Ok(user) => user,
            Err(e) if unique_violation(&e).is_some() => {
                return Err(DirectoryError::EmailTaken(new_user.email).into());
            }
            Err(e) => return Err(e.into()),
        };
        txn.commit().await?;

        info!(user_id = %user.id, role = ?user.role, "User created");
        Ok(user)
    }

    /// Lists users ordered by name, with the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, page: &PageRequest) -> StoreResult<(Vec<users::Model>, u64)> {
        let total = users::Entity::find().count(&self.db).await?;
        let users = users::Entity::find()
            .order_by_asc(users::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((users, total))
    }

    /// Gets a user by ID.
    ///
    /// # Errors
    ///
    /// `UserNotFound`.
    pub async fn get(&self, id: Uuid) -> StoreResult<users::Model> {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DirectoryError::UserNotFound(id).into())
    }

    /// Checks an email/password pair.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for an unknown email or a wrong password.
    pub async fn authenticate(&self, email: &str, password: &str) -> StoreResult<users::Model> {
        let email = DirectoryService::normalize_email(email)
            .map_err(|_| DirectoryError::InvalidCredentials)?;
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(&email))
            .one(&self.db)
            .await?
            .ok_or(DirectoryError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|e| DirectoryError::PasswordHash(e.to_string()))?;
        if !valid {
            return Err(DirectoryError::InvalidCredentials.into());
        }
        Ok(user)
    }

    /// Sets a new password without checking the current one.
    ///
    /// # Errors
    ///
    /// `UserNotFound` or `WeakPassword`.
    pub async fn set_password(&self, user_id: Uuid, new_password: &str) -> StoreResult<()> {
        let password_hash = DirectoryService::hash_new_password(new_password)?;
        let txn = self.db.begin().await?;
        let user = users::Entity::find_by_id(user_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DirectoryError::UserNotFound(user_id))?;
        Self::store_password(&txn, user, password_hash).await?;
        txn.commit().await?;

        info!(user_id = %user_id, "Password reset");
        Ok(())
    }

    /// Changes the caller's own password after checking the current one.
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `WrongCurrentPassword` or `WeakPassword`.
    pub async fn change_own_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> StoreResult<()> {
        let password_hash = DirectoryService::hash_new_password(new_password)?;
        let txn = self.db.begin().await?;
        let user = users::Entity::find_by_id(user_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DirectoryError::UserNotFound(user_id))?;

        let valid = verify_password(current_password, &user.password_hash)
            .map_err(|e| DirectoryError::PasswordHash(e.to_string()))?;
        if !valid {
            return Err(DirectoryError::WrongCurrentPassword.into());
        }
        Self::store_password(&txn, user, password_hash).await?;
        txn.commit().await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    async fn store_password<C: sea_orm::ConnectionTrait>(
        conn: &C,
        user: users::Model,
        password_hash: String,
    ) -> StoreResult<()> {
        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(conn).await?;
        Ok(())
    }
}
