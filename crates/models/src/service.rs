//! Service catalog entries.
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, professional, service_request};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Professional, ServiceRequest }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Professional => Entity::has_many(professional::Entity).into(),
            Relation::ServiceRequest => Entity::has_many(service_request::Entity).into(),
        }
    }
}

impl Related<professional::Entity> for Entity {
    fn to() -> RelationDef { Relation::Professional.def() }
}

impl Related<service_request::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceRequest.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate(name: &str, price: f64, description: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() || description.trim().is_empty() {
        return Err(ModelError::Validation("name and description required".into()));
    }
    if name.trim().len() > 120 {
        return Err(ModelError::Validation("name too long (<=120)".into()));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(ModelError::Validation("price must be a non-negative number".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str, price: f64, description: &str) -> Result<Model, ModelError> {
    validate(name, price, description)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        price: Set(price),
        description: Set(Some(description.trim().to_string())),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(ModelError::from)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    existing: Model,
    name: &str,
    price: f64,
    description: &str,
) -> Result<Model, ModelError> {
    validate(name, price, description)?;
    let mut am: ActiveModel = existing.into();
    am.name = Set(name.trim().to_string());
    am.price = Set(price);
    am.description = Set(Some(description.trim().to_string()));
    am.update(db).await.map_err(ModelError::from)
}
