//! User service - Account administration.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::Actor;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};
use domain::{Role, User, UserResponse, UserStatus};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// List accounts, optionally of one role
    async fn list_users(
        &self,
        role: Option<Role>,
        params: PaginationParams,
    ) -> AppResult<Paginated<UserResponse>>;

    /// Activate or suspend an account
    async fn set_status(&self, actor: Actor, id: Uuid, status: UserStatus) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User")
    }

    async fn list_users(
        &self,
        role: Option<Role>,
        params: PaginationParams,
    ) -> AppResult<Paginated<UserResponse>> {
        let (users, total) = self.uow.users().list(role, params).await?;
        let users = users.into_iter().map(UserResponse::from).collect();
        Ok(Paginated::new(users, &params, total))
    }

    async fn set_status(&self, actor: Actor, id: Uuid, status: UserStatus) -> AppResult<User> {
        if actor.id == id && status == UserStatus::Suspended {
            return Err(AppError::validation("You cannot suspend your own account"));
        }

        // Existence first so a missing account reads as NotFound
        self.get_user(id).await?;
        let user = self.uow.users().set_status(id, status).await?;

        tracing::info!(user_id = %id, status = %status, by = %actor.id, "User status changed");
        Ok(user)
    }
}
