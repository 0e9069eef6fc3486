use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{customer, errors::ModelError, service_request};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
/// Column width of `comment`, in characters.
pub const MAX_COMMENT_LEN: usize = 255;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_request_id: Uuid,
    pub customer_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { ServiceRequest, Customer }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ServiceRequest => Entity::belongs_to(service_request::Entity)
                .from(Column::ServiceRequestId)
                .to(service_request::Column::Id)
                .into(),
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
        }
    }
}

impl Related<service_request::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceRequest.def() }
}

impl Related<customer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Customer.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_rating(rating: i32) -> Result<(), ModelError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ModelError::Validation(format!("rating must be between {MIN_RATING} and {MAX_RATING}")));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    service_request_id: Uuid,
    customer_id: Uuid,
    rating: i32,
    comment: &str,
) -> Result<Model, ModelError> {
    validate_rating(rating)?;
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(ModelError::Validation("comment required".into()));
    }
    if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(ModelError::Validation(format!("comment too long (<={MAX_COMMENT_LEN})")));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        service_request_id: Set(service_request_id),
        customer_id: Set(customer_id),
        rating: Set(rating),
        comment: Set(Some(comment.to_string())),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(ModelError::from)
}

/// Reviews left on any request of the given service.
pub async fn list_for_service<C: ConnectionTrait>(db: &C, service_id: Uuid) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .inner_join(service_request::Entity)
        .filter(service_request::Column::ServiceId.eq(service_id))
        .all(db)
        .await?)
}

/// Mean rating over reviews of requests handled by a professional.
pub async fn average_for_professional<C: ConnectionTrait>(db: &C, professional_id: Uuid) -> Result<Option<f64>, ModelError> {
    let reviews = Entity::find()
        .inner_join(service_request::Entity)
        .filter(service_request::Column::ProfessionalId.eq(professional_id))
        .all(db)
        .await?;
    if reviews.is_empty() {
        return Ok(None);
    }
    let sum: i64 = reviews.iter().map(|r| r.rating as i64).sum();
    Ok(Some(sum as f64 / reviews.len() as f64))
}
