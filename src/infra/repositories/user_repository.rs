//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;
use domain::{NewUser, ProfileUpdate, Role, User, UserStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by (normalized) email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user; `DuplicateEmail` if the address is taken
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply profile changes
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<User>;

    /// Replace the stored password hash
    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;

    /// Activate or suspend an account
    async fn set_status(&self, id: Uuid, status: UserStatus) -> AppResult<User>;

    /// List users, newest first, optionally restricted to one role
    async fn list(
        &self,
        role: Option<Role>,
        params: PaginationParams,
    ) -> AppResult<(Vec<User>, u64)>;

    /// Count accounts holding a role
    async fn count_by_role(&self, role: Role) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<User>> {
    UserEntity::find_by_id(id)
        .one(db)
        .await?
        .map(User::try_from)
        .transpose()
}

async fn find_model<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<user::Model> {
    UserEntity::find_by_id(id).one(db).await?.ok_or_not_found("User")
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            phone: Set(new_user.phone),
            address: Set(new_user.address),
            role: Set(new_user.role.as_str().to_string()),
            status: Set(UserStatus::Active.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            // Lost a race with a concurrent registration
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::DuplicateEmail
            } else {
                AppError::from(e)
            }
        })?;

        User::try_from(model)
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        let mut active: ActiveModel = find_model(&self.db, id).await?.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(phone) = update.phone {
            active.phone = Set(Some(phone).filter(|p| !p.is_empty()));
        }
        if let Some(address) = update.address {
            active.address = Set(Some(address).filter(|a| !a.is_empty()));
        }
        active.updated_at = Set(Utc::now());

        User::try_from(active.update(&self.db).await?)
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let mut active: ActiveModel = find_model(&self.db, id).await?.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: UserStatus) -> AppResult<User> {
        let mut active: ActiveModel = find_model(&self.db, id).await?.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());

        User::try_from(active.update(&self.db).await?)
    }

    async fn list(
        &self,
        role: Option<Role>,
        params: PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        let mut query = UserEntity::find().order_by_desc(user::Column::CreatedAt);
        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role.as_str()));
        }

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let users = paginator
            .fetch_page(params.page_index())
            .await?
            .into_iter()
            .map(User::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((users, total))
    }

    async fn count_by_role(&self, role: Role) -> AppResult<u64> {
        UserEntity::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
