use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use models::service_request::{self, Model as ServiceRequest};
use models::{customer, professional, service};

use crate::errors::ServiceError;
use crate::lifecycle::repository::{ProfessionalInfo, RequestFilter, RequestRepository};
use crate::pagination::Pagination;

pub struct SeaOrmRequestRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmRequestRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl RequestRepository for SeaOrmRequestRepository {
    async fn service_exists(&self, service_id: Uuid) -> Result<bool, ServiceError> {
        Ok(service::Entity::find_by_id(service_id).one(&self.db).await?.is_some())
    }

    async fn customer_for_user(&self, user_id: Uuid) -> Result<Option<Uuid>, ServiceError> {
        Ok(customer::find_by_user(&self.db, user_id).await?.map(|c| c.id))
    }

    async fn professional_for_user(&self, user_id: Uuid) -> Result<Option<ProfessionalInfo>, ServiceError> {
        let p = professional::find_by_user(&self.db, user_id).await?;
        Ok(p.map(|p| ProfessionalInfo { id: p.id, service_id: p.service_id, is_approved: p.is_approved }))
    }

    async fn insert(&self, service_id: Uuid, customer_id: Uuid, remarks: Option<&str>) -> Result<ServiceRequest, ServiceError> {
        Ok(service_request::create(&self.db, service_id, customer_id, remarks).await?)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ServiceRequest>, ServiceError> {
        Ok(service_request::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list(&self, filter: RequestFilter, page: Pagination) -> Result<Vec<ServiceRequest>, ServiceError> {
        let (idx, per) = page.normalize();
        let mut q = service_request::Entity::find();
        if let Some(c) = filter.customer_id {
            q = q.filter(service_request::Column::CustomerId.eq(c));
        }
        if let Some(p) = filter.professional_id {
            q = q.filter(service_request::Column::ProfessionalId.eq(p));
        }
        if let Some(s) = filter.service_id {
            q = q.filter(service_request::Column::ServiceId.eq(s));
        }
        if let Some(st) = filter.status {
            q = q.filter(service_request::Column::Status.eq(st));
        }
        let pages = q
            .order_by_desc(service_request::Column::DateOfRequest)
            .paginate(&self.db, per);
        Ok(pages.fetch_page(idx).await?)
    }

    async fn accept_if_requested(&self, id: Uuid, professional_id: Uuid) -> Result<bool, ServiceError> {
        Ok(service_request::accept_if_requested(&self.db, id, professional_id).await?)
    }

    async fn close_if_accepted(&self, id: Uuid, completed_at: DateTimeWithTimeZone) -> Result<bool, ServiceError> {
        Ok(service_request::close_if_accepted(&self.db, id, completed_at).await?)
    }

    async fn delete_if_requested(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(service_request::delete_if_requested(&self.db, id).await?)
    }
}
