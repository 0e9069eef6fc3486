//! Service catalog maintained by admins.

use models::{professional, service, Role};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::gate::{self, AuthContext};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    pub price: f64,
    pub description: String,
}

#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn add_service(db: &DatabaseConnection, ctx: &AuthContext, input: ServiceInput) -> Result<service::Model, ServiceError> {
    gate::require(ctx, Role::Admin)?;
    service::validate(&input.name, input.price, &input.description)?;
    let created = service::create(db, &input.name, input.price, &input.description).await?;
    info!(service_id = %created.id, "service_added");
    Ok(created)
}

#[instrument(skip(db, input))]
pub async fn edit_service(
    db: &DatabaseConnection,
    ctx: &AuthContext,
    id: Uuid,
    input: ServiceInput,
) -> Result<service::Model, ServiceError> {
    gate::require(ctx, Role::Admin)?;
    let existing = get_service(db, id).await?;
    let updated = service::update(db, existing, &input.name, input.price, &input.description).await?;
    info!(service_id = %id, "service_updated");
    Ok(updated)
}

/// Refused while any professional offers the service; requests and their
/// reviews go with it otherwise.
#[instrument(skip(db))]
pub async fn delete_service(db: &DatabaseConnection, ctx: &AuthContext, id: Uuid) -> Result<(), ServiceError> {
    gate::require(ctx, Role::Admin)?;
    get_service(db, id).await?;
    let n = professional::count_for_service(db, id).await?;
    if n > 0 {
        return Err(ServiceError::Conflict(format!("service has {} registered professional(s)", n)));
    }
    service::Entity::delete_by_id(id).exec(db).await?;
    info!(service_id = %id, "service_deleted");
    Ok(())
}

pub async fn list_services(db: &DatabaseConnection) -> Result<Vec<service::Model>, ServiceError> {
    Ok(service::Entity::find().order_by_asc(service::Column::Name).all(db).await?)
}

pub async fn get_service(db: &DatabaseConnection, id: Uuid) -> Result<service::Model, ServiceError> {
    service::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))
}
