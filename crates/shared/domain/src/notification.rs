//! In-app notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::role::Role;
use crate::validation::require_text;

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Booking,
    Payment,
    Approval,
    #[default]
    General,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Booking => "booking",
            NotificationKind::Payment => "payment",
            NotificationKind::Approval => "approval",
            NotificationKind::General => "general",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booking" => Ok(NotificationKind::Booking),
            "payment" => Ok(NotificationKind::Payment),
            "approval" => Ok(NotificationKind::Approval),
            "general" => Ok(NotificationKind::General),
            other => Err(DomainError::unknown("notification type", other)),
        }
    }
}

/// Who receives a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTarget {
    /// Every user on the platform
    All,
    /// Every user holding a role
    Role(Role),
    /// One user
    User(Uuid),
}

/// Notification domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification content before fan-out
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

impl NotificationDraft {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }

    pub fn validated(self) -> DomainResult<Self> {
        require_text("Title", &self.title)?;
        require_text("Message", &self.message)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_requires_title_and_message() {
        assert!(NotificationDraft::new(NotificationKind::General, "", "body")
            .validated()
            .is_err());
        assert!(NotificationDraft::new(NotificationKind::General, "Hi", " ")
            .validated()
            .is_err());
        assert!(NotificationDraft::new(NotificationKind::General, "Hi", "there")
            .validated()
            .is_ok());
    }
}
