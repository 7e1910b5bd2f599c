//! Notification repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::notification::{self, ActiveModel, Entity as NotificationEntity};
use super::entities::user::{self, Entity as UserEntity};
use crate::config::NOTIFICATION_INSERT_BATCH_SIZE;
use crate::errors::{AppError, AppResult};
use domain::{Notification, NotificationDraft, NotificationTarget};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Notification repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Find notification by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>>;

    /// A user's inbox, newest first
    async fn list_for_user(&self, user_id: Uuid, unread_only: bool)
        -> AppResult<Vec<Notification>>;

    /// Number of unread notifications
    async fn unread_count(&self, user_id: Uuid) -> AppResult<u64>;

    /// Flag one notification as read
    async fn mark_read(&self, id: Uuid) -> AppResult<()>;

    /// Flag every notification of a user as read; returns how many changed
    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64>;

    /// Remove a notification
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of NotificationRepository
pub struct NotificationStore {
    db: DatabaseConnection,
}

impl NotificationStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn draft_row(user_id: Uuid, draft: &NotificationDraft, now: chrono::DateTime<Utc>) -> ActiveModel {
    ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        title: Set(draft.title.clone()),
        message: Set(draft.message.clone()),
        kind: Set(draft.kind.as_str().to_string()),
        is_read: Set(false),
        created_at: Set(now),
    }
}

/// Deliver a notification to one user
pub(crate) async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    draft: &NotificationDraft,
) -> AppResult<Notification> {
    let model = draft_row(user_id, draft, Utc::now()).insert(db).await?;
    Notification::try_from(model)
}

/// Materialize one row per recipient of `target`; returns the recipient count
pub(crate) async fn fan_out<C: ConnectionTrait>(
    db: &C,
    target: NotificationTarget,
    draft: &NotificationDraft,
) -> AppResult<u64> {
    let recipients: Vec<Uuid> = match target {
        NotificationTarget::User(id) => UserEntity::find_by_id(id)
            .select_only()
            .column(user::Column::Id)
            .into_tuple()
            .all(db)
            .await?,
        NotificationTarget::Role(role) => UserEntity::find()
            .select_only()
            .column(user::Column::Id)
            .filter(user::Column::Role.eq(role.as_str()))
            .into_tuple()
            .all(db)
            .await?,
        NotificationTarget::All => UserEntity::find()
            .select_only()
            .column(user::Column::Id)
            .into_tuple()
            .all(db)
            .await?,
    };

    if recipients.is_empty() {
        return Ok(0);
    }

    let now = Utc::now();
    let count = recipients.len() as u64;
    // Each row binds several parameters; keep every statement under the driver limits
    for batch in recipients.chunks(NOTIFICATION_INSERT_BATCH_SIZE) {
        NotificationEntity::insert_many(
            batch.iter().map(|user_id| draft_row(*user_id, draft, now)),
        )
        .exec(db)
        .await?;
    }

    Ok(count)
}

#[async_trait]
impl NotificationRepository for NotificationStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>> {
        NotificationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Notification::try_from)
            .transpose()
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
    ) -> AppResult<Vec<Notification>> {
        let mut query = NotificationEntity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt);
        if unread_only {
            query = query.filter(notification::Column::IsRead.eq(false));
        }

        query
            .all(&self.db)
            .await?
            .into_iter()
            .map(Notification::try_from)
            .collect()
    }

    async fn unread_count(&self, user_id: Uuid) -> AppResult<u64> {
        NotificationEntity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<()> {
        NotificationEntity::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = NotificationEntity::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = NotificationEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Notification"));
        }
        Ok(())
    }
}
