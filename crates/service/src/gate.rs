//! Role checks that run before any entity lookup.

use models::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Authenticated caller, produced once per request from the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: Uuid, role: Role) -> Self { Self { user_id, role } }

    pub fn is(&self, role: Role) -> bool { self.role == role }
}

pub fn require(ctx: &AuthContext, role: Role) -> Result<(), ServiceError> {
    require_any(ctx, &[role])
}

pub fn require_any(ctx: &AuthContext, roles: &[Role]) -> Result<(), ServiceError> {
    if roles.contains(&ctx.role) {
        return Ok(());
    }
    tracing::debug!(user_id = %ctx.user_id, role = %ctx.role, "role_refused");
    let wanted: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
    Err(ServiceError::Unauthorized(format!("requires role {}", wanted.join(" or "))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_role_passes() {
        let ctx = AuthContext::new(Uuid::new_v4(), Role::Admin);
        assert!(require(&ctx, Role::Admin).is_ok());
        assert!(require_any(&ctx, &[Role::Professional, Role::Admin]).is_ok());
    }

    #[test]
    fn mismatched_role_is_unauthorized() {
        let ctx = AuthContext::new(Uuid::new_v4(), Role::Customer);
        let err = require(&ctx, Role::Professional).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
        let err = require_any(&ctx, &[Role::Professional, Role::Admin]).unwrap_err();
        assert_eq!(err.to_string(), "unauthorized: requires role professional or admin");
    }
}
