use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::enums::Role;
use crate::errors::ModelError;
use crate::{admin, customer, professional};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone_number: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Admin,
    Customer,
    Professional,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Admin => Entity::has_one(admin::Entity).into(),
            Relation::Customer => Entity::has_one(customer::Entity).into(),
            Relation::Professional => Entity::has_one(professional::Entity).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields of a new account; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub phone_number: Option<&'a str>,
    pub password_hash: String,
    pub role: Role,
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') || email.len() > 120 {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_username(name: &str) -> Result<(), ModelError> {
    let name = name.trim();
    if name.is_empty() { return Err(ModelError::Validation("username required".into())); }
    if name.len() > 80 { return Err(ModelError::Validation("username too long (<=80)".into())); }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ModelError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if phone.len() > 15 || digits < 7 || !phone.chars().all(|c| c.is_ascii_digit() || c == '+' || c == '-') {
        return Err(ModelError::Validation("invalid phone number".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewUser<'_>) -> Result<Model, ModelError> {
    validate_username(new.username)?;
    validate_email(new.email)?;
    if let Some(p) = new.phone_number { validate_phone(p)?; }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(new.username.trim().to_string()),
        email: Set(new.email.trim().to_lowercase()),
        phone_number: Set(new.phone_number.map(|p| p.to_string())),
        password_hash: Set(new.password_hash),
        role: Set(new.role),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(ModelError::from)
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await?)
}

/// Name of the first unique field already taken, if any.
pub async fn taken_field<C: ConnectionTrait>(
    db: &C,
    username: &str,
    email: &str,
    phone_number: Option<&str>,
) -> Result<Option<&'static str>, ModelError> {
    if Entity::find().filter(Column::Username.eq(username.trim())).one(db).await?.is_some() {
        return Ok(Some("username"));
    }
    if find_by_email(db, email).await?.is_some() {
        return Ok(Some("email"));
    }
    if let Some(phone) = phone_number {
        if Entity::find().filter(Column::PhoneNumber.eq(phone)).one(db).await?.is_some() {
            return Ok(Some("phone_number"));
        }
    }
    Ok(None)
}

/// Set `is_active`; returns false when the flag already had that value.
pub async fn set_active<C: ConnectionTrait>(db: &C, id: Uuid, active: bool) -> Result<bool, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::IsActive, Expr::value(active))
        .filter(Column::Id.eq(id))
        .filter(Column::IsActive.eq(!active))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

pub async fn count_by_role<C: ConnectionTrait>(db: &C, role: Role) -> Result<u64, ModelError> {
    use sea_orm::PaginatorTrait;
    Ok(Entity::find().filter(Column::Role.eq(role)).count(db).await?)
}
