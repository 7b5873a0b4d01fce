use uuid::Uuid;

use crate::{AppError, AppResult};

/// The authenticated caller, as resolved from the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub is_staff: bool,
}

impl Actor {
    pub fn new(user_id: Uuid, is_staff: bool) -> Self {
        Self { user_id, is_staff }
    }

    /// Staff may modify anything; everyone else only what they own or take
    /// part in.
    pub fn can_modify(&self, owners: &[Uuid]) -> bool {
        self.is_staff || owners.contains(&self.user_id)
    }

    pub fn can_modify_optional(&self, owner: Option<Uuid>) -> bool {
        self.is_staff || owner == Some(self.user_id)
    }
}

/// Rejects the mutation with 403 unless the caller may modify the resource.
pub fn ensure_can_modify(actor: &Actor, owners: &[Uuid], message: &str) -> AppResult<()> {
    if actor.can_modify(owners) {
        Ok(())
    } else {
        tracing::warn!(user_id = %actor.user_id, "{}", message);
        Err(AppError::Authorization(message.to_string()))
    }
}

pub fn ensure_staff(actor: &Actor, message: &str) -> AppResult<()> {
    if actor.is_staff {
        Ok(())
    } else {
        tracing::warn!(user_id = %actor.user_id, "{}", message);
        Err(AppError::Authorization(message.to_string()))
    }
}
