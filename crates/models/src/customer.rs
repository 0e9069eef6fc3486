use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, service_request, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub address: Option<String>,
    pub pin_code: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User, ServiceRequest }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::ServiceRequest => Entity::has_many(service_request::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<service_request::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceRequest.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_pin_code(pin: &str) -> Result<(), ModelError> {
    if pin.is_empty() || pin.len() > 10 || !pin.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ModelError::Validation("invalid pin code".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    address: Option<&str>,
    pin_code: Option<&str>,
) -> Result<Model, ModelError> {
    if let Some(pin) = pin_code { validate_pin_code(pin)?; }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        address: Set(address.map(|a| a.trim().to_string())),
        pin_code: Set(pin_code.map(|p| p.to_string())),
    };
    am.insert(db).await.map_err(ModelError::from)
}

pub async fn find_by_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}
