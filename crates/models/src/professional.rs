use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, PaginatorTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, service, service_request, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_professional")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub service_type: String,
    pub experience: f64,
    pub rating: f64,
    pub resume_ref: Option<String>,
    pub address: Option<String>,
    pub pin_code: Option<String>,
    pub description: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User, Service, ServiceRequest }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::Service => Entity::belongs_to(service::Entity)
                .from(Column::ServiceId)
                .to(service::Column::Id)
                .into(),
            Relation::ServiceRequest => Entity::has_many(service_request::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl Related<service_request::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceRequest.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewProfessional<'a> {
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub service_type: &'a str,
    pub experience: f64,
    pub resume_ref: Option<&'a str>,
    pub address: Option<&'a str>,
    pub pin_code: Option<&'a str>,
    pub description: Option<&'a str>,
}

pub fn validate_experience(years: f64) -> Result<(), ModelError> {
    if !years.is_finite() || years < 0.0 {
        return Err(ModelError::Validation("experience must be a non-negative number".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewProfessional<'_>) -> Result<Model, ModelError> {
    if new.service_type.trim().is_empty() {
        return Err(ModelError::Validation("service_type required".into()));
    }
    validate_experience(new.experience)?;
    if let Some(pin) = new.pin_code { crate::customer::validate_pin_code(pin)?; }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(new.user_id),
        service_id: Set(new.service_id),
        service_type: Set(new.service_type.trim().to_string()),
        experience: Set(new.experience),
        rating: Set(0.0),
        resume_ref: Set(new.resume_ref.map(|r| r.to_string())),
        address: Set(new.address.map(|a| a.trim().to_string())),
        pin_code: Set(new.pin_code.map(|p| p.to_string())),
        description: Set(new.description.map(|d| d.trim().to_string())),
        is_approved: Set(false),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(ModelError::from)
}

pub async fn find_by_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}

/// Set `is_approved`; returns false when already in that state.
pub async fn set_approved<C: ConnectionTrait>(db: &C, id: Uuid, approved: bool) -> Result<bool, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::IsApproved, Expr::value(approved))
        .filter(Column::Id.eq(id))
        .filter(Column::IsApproved.eq(!approved))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

pub async fn set_rating<C: ConnectionTrait>(db: &C, id: Uuid, rating: f64) -> Result<(), ModelError> {
    Entity::update_many()
        .col_expr(Column::Rating, Expr::value(rating))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn count_for_service<C: ConnectionTrait>(db: &C, service_id: Uuid) -> Result<u64, ModelError> {
    Ok(Entity::find().filter(Column::ServiceId.eq(service_id)).count(db).await?)
}

pub async fn count_pending_approval<C: ConnectionTrait>(db: &C) -> Result<u64, ModelError> {
    Ok(Entity::find().filter(Column::IsApproved.eq(false)).count(db).await?)
}
