//! Notification service - In-app inbox and broadcasts.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::Actor;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use domain::{Notification, NotificationDraft, NotificationTarget};

/// Notification service trait for dependency injection.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Deliver a notification to every recipient of `target`; returns how many got it
    async fn send(&self, target: NotificationTarget, draft: NotificationDraft) -> AppResult<u64>;

    /// A user's inbox, newest first
    async fn list_for_user(&self, user_id: Uuid, unread_only: bool)
        -> AppResult<Vec<Notification>>;

    /// Unread notifications of a user
    async fn unread_count(&self, user_id: Uuid) -> AppResult<u64>;

    /// Mark one of the actor's notifications as read
    async fn mark_read(&self, actor: Actor, id: Uuid) -> AppResult<Notification>;

    /// Mark all of a user's notifications as read; returns how many changed
    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64>;

    /// Delete a notification (recipient or admin)
    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of NotificationService using Unit of Work.
pub struct NotificationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> NotificationManager<U> {
    /// Create new notification service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find(&self, id: Uuid) -> AppResult<Notification> {
        self.uow
            .notifications()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Notification")
    }
}

#[async_trait]
impl<U: UnitOfWork> NotificationService for NotificationManager<U> {
    async fn send(&self, target: NotificationTarget, draft: NotificationDraft) -> AppResult<u64> {
        let draft = draft.validated()?;

        let recipients = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move { ctx.notifications().fan_out(target, &draft).await })
            })
            .await?;

        tracing::info!(?target, recipients, "Notification sent");
        Ok(recipients)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
    ) -> AppResult<Vec<Notification>> {
        self.uow
            .notifications()
            .list_for_user(user_id, unread_only)
            .await
    }

    async fn unread_count(&self, user_id: Uuid) -> AppResult<u64> {
        self.uow.notifications().unread_count(user_id).await
    }

    async fn mark_read(&self, actor: Actor, id: Uuid) -> AppResult<Notification> {
        let mut notification = self.find(id).await?;
        if notification.user_id != actor.id {
            return Err(AppError::NotOwner);
        }

        if !notification.is_read {
            self.uow.notifications().mark_read(id).await?;
            notification.is_read = true;
        }
        Ok(notification)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        self.uow.notifications().mark_all_read(user_id).await
    }

    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        let notification = self.find(id).await?;
        if notification.user_id != actor.id && !actor.is_admin() {
            return Err(AppError::NotOwner);
        }
        self.uow.notifications().delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockNotificationRepository, StubPersistence};
    use chrono::Utc;
    use domain::{NotificationKind, Role};
    use mockall::predicate::eq;

    fn notification(user_id: Uuid, is_read: bool) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id,
            title: "Welcome".to_string(),
            message: "Hello there".to_string(),
            kind: NotificationKind::General,
            is_read,
            created_at: Utc::now(),
        }
    }

    fn service(repo: MockNotificationRepository) -> NotificationManager<StubPersistence> {
        NotificationManager::new(Arc::new(StubPersistence {
            notifications: Arc::new(repo),
            ..Default::default()
        }))
    }

    fn returning(n: Notification) -> MockNotificationRepository {
        let mut repo = MockNotificationRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(n.clone())));
        repo
    }

    #[tokio::test]
    async fn test_send_rejects_empty_title() {
        let draft = NotificationDraft::new(NotificationKind::General, "", "body");
        let result = service(MockNotificationRepository::new())
            .send(NotificationTarget::All, draft)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_mark_read_of_missing_notification() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = service(repo)
            .mark_read(Actor::new(Uuid::new_v4(), Role::User), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound("Notification"))));
    }

    #[tokio::test]
    async fn test_mark_read_of_foreign_notification() {
        let mut repo = returning(notification(Uuid::new_v4(), false));
        repo.expect_mark_read().never();

        let result = service(repo)
            .mark_read(Actor::new(Uuid::new_v4(), Role::User), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotOwner)));
    }

    #[tokio::test]
    async fn test_mark_read_own_notification() {
        let user = Actor::new(Uuid::new_v4(), Role::User);
        let n = notification(user.id, false);
        let id = n.id;
        let mut repo = returning(n);
        repo.expect_mark_read()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(()));

        let updated = service(repo).mark_read(user, id).await.unwrap();
        assert!(updated.is_read);
    }

    #[tokio::test]
    async fn test_admin_may_delete_any_notification() {
        let mut repo = returning(notification(Uuid::new_v4(), true));
        repo.expect_delete().times(1).returning(|_| Ok(()));

        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        assert!(service(repo).delete(admin, Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_user_cannot_delete_foreign_notification() {
        let mut repo = returning(notification(Uuid::new_v4(), true));
        repo.expect_delete().never();

        let result = service(repo)
            .delete(Actor::new(Uuid::new_v4(), Role::Hotelier), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotOwner)));
    }
}
