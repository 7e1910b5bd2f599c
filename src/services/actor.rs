//! Identity of the caller as seen by services.

use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use domain::{Capability, Role};

/// Who is performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail with `Forbidden` unless the role grants `capability`
    pub fn require(&self, capability: Capability) -> AppResult<()> {
        if self.role.can(capability) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}
