use models::errors::ModelError;
use models::RequestStatus;
use thiserror::Error;

use crate::auth::errors::AuthError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("cannot {action} a request in state {from}")]
    InvalidTransition { from: RequestStatus, action: &'static str },
    #[error("database error: {0}")]
    Db(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ServiceError::Conflict(_) | ServiceError::InvalidTransition { .. })
    }
}

// 模型层校验错误直接映射为业务校验错误
impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::Duplicate(_) => ServiceError::Conflict("already exists".into()),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { ModelError::from(e).into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_validation_maps_to_validation() {
        let e: ServiceError = ModelError::Validation("bad".into()).into();
        assert!(matches!(e, ServiceError::Validation(m) if m == "bad"));
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let e: ServiceError = ModelError::Duplicate("review.service_request_id".into()).into();
        assert!(e.is_conflict());
    }

    #[test]
    fn invalid_transition_is_a_conflict() {
        let e = ServiceError::InvalidTransition { from: RequestStatus::Accepted, action: "cancel" };
        assert!(e.is_conflict());
        assert_eq!(e.to_string(), "cannot cancel a request in state accepted");
    }
}
