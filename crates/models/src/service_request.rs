//! The workflow entity. Status changes go through the conditional helpers
//! below so that a transition only applies from its expected source state.
use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::RequestStatus;
use crate::{customer, errors::ModelError, professional, review, service};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_id: Uuid,
    pub customer_id: Uuid,
    pub professional_id: Option<Uuid>,
    pub status: RequestStatus,
    pub remarks: Option<String>,
    pub date_of_request: DateTimeWithTimeZone,
    pub date_of_completion: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Service, Customer, Professional, Review }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(service::Entity)
                .from(Column::ServiceId)
                .to(service::Column::Id)
                .into(),
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
            Relation::Professional => Entity::belongs_to(professional::Entity)
                .from(Column::ProfessionalId)
                .to(professional::Column::Id)
                .into(),
            Relation::Review => Entity::has_many(review::Entity).into(),
        }
    }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl Related<customer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Customer.def() }
}

impl Related<professional::Entity> for Entity {
    fn to() -> RelationDef { Relation::Professional.def() }
}

impl Related<review::Entity> for Entity {
    fn to() -> RelationDef { Relation::Review.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Column width of `remarks`, in characters.
pub const MAX_REMARKS_LEN: usize = 255;

/// Insert a new request in state `requested` with no professional.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    service_id: Uuid,
    customer_id: Uuid,
    remarks: Option<&str>,
) -> Result<Model, ModelError> {
    let remarks = remarks.map(str::trim).filter(|r| !r.is_empty());
    if remarks.is_some_and(|r| r.chars().count() > MAX_REMARKS_LEN) {
        return Err(ModelError::Validation(format!("remarks too long (<={MAX_REMARKS_LEN})")));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        service_id: Set(service_id),
        customer_id: Set(customer_id),
        professional_id: Set(None),
        status: Set(RequestStatus::Requested),
        remarks: Set(remarks.map(str::to_string)),
        date_of_request: Set(Utc::now().into()),
        date_of_completion: Set(None),
    };
    am.insert(db).await.map_err(ModelError::from)
}

/// `requested -> accepted` as a single conditional update; false if the row
/// was not in `requested` (or does not exist).
pub async fn accept_if_requested<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    professional_id: Uuid,
) -> Result<bool, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(RequestStatus::Accepted))
        .col_expr(Column::ProfessionalId, Expr::value(Some(professional_id)))
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(RequestStatus::Requested))
        .exec(db)
        .await?;
    Ok(res.rows_affected == 1)
}

/// `accepted -> closed`, stamping the completion time.
pub async fn close_if_accepted<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    completed_at: DateTime<FixedOffset>,
) -> Result<bool, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(RequestStatus::Closed))
        .col_expr(Column::DateOfCompletion, Expr::value(Some(completed_at)))
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(RequestStatus::Accepted))
        .exec(db)
        .await?;
    Ok(res.rows_affected == 1)
}

/// Remove a request that is still `requested`.
pub async fn delete_if_requested<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(RequestStatus::Requested))
        .exec(db)
        .await?;
    Ok(res.rows_affected == 1)
}
