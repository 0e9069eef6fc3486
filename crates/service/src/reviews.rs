//! Customer reviews on closed requests.

use models::{customer, professional, review, service, service_request, RequestStatus, Role};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::gate::{self, AuthContext};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewInput {
    pub service_request_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

/// Record a review and refresh the assigned professional's average rating.
#[instrument(skip(db, input), fields(user_id = %ctx.user_id, request_id = %input.service_request_id))]
pub async fn submit(
    db: &DatabaseConnection,
    ctx: &AuthContext,
    service_id: Uuid,
    input: ReviewInput,
) -> Result<review::Model, ServiceError> {
    gate::require(ctx, Role::Customer)?;
    review::validate_rating(input.rating)?;
    if input.comment.trim().is_empty() {
        return Err(ServiceError::Validation("comment required".into()));
    }
    let cust = customer::find_by_user(db, ctx.user_id)
        .await?
        .ok_or_else(|| ServiceError::Forbidden("customer profile missing".into()))?;
    let req = service_request::Entity::find_by_id(input.service_request_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("service request"))?;
    if req.service_id != service_id {
        return Err(ServiceError::Validation("request does not belong to this service".into()));
    }
    if req.customer_id != cust.id {
        return Err(ServiceError::Forbidden("not your request".into()));
    }
    if req.status != RequestStatus::Closed {
        return Err(ServiceError::InvalidTransition { from: req.status, action: "review" });
    }
    let existing = review::Entity::find()
        .filter(review::Column::ServiceRequestId.eq(req.id))
        .filter(review::Column::CustomerId.eq(cust.id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(ServiceError::Conflict("request already reviewed".into()));
    }

    let txn = db.begin().await?;
    let created = review::create(&txn, req.id, cust.id, input.rating, &input.comment).await?;
    if let Some(pid) = req.professional_id {
        if let Some(avg) = review::average_for_professional(&txn, pid).await? {
            professional::set_rating(&txn, pid, avg).await?;
        }
    }
    txn.commit().await?;
    info!(review_id = %created.id, rating = created.rating, "review_submitted");
    Ok(created)
}

pub async fn list_for_service(db: &DatabaseConnection, service_id: Uuid) -> Result<Vec<review::Model>, ServiceError> {
    if service::Entity::find_by_id(service_id).one(db).await?.is_none() {
        return Err(ServiceError::not_found("service"));
    }
    Ok(review::list_for_service(db, service_id).await?)
}
