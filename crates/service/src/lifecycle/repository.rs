use async_trait::async_trait;
use models::service_request::Model as ServiceRequest;
use models::RequestStatus;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// Professional profile fields the lifecycle rules depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfessionalInfo {
    pub id: Uuid,
    pub service_id: Uuid,
    pub is_approved: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestFilter {
    pub customer_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub status: Option<RequestStatus>,
}

impl RequestFilter {
    pub fn matches(&self, r: &ServiceRequest) -> bool {
        self.customer_id.map_or(true, |c| r.customer_id == c)
            && self.professional_id.map_or(true, |p| r.professional_id == Some(p))
            && self.service_id.map_or(true, |s| r.service_id == s)
            && self.status.map_or(true, |s| r.status == s)
    }
}

/// Persistence used by the lifecycle manager. The `*_if_*` methods must be
/// atomic conditional writes returning whether the row changed.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn service_exists(&self, service_id: Uuid) -> Result<bool, ServiceError>;
    async fn customer_for_user(&self, user_id: Uuid) -> Result<Option<Uuid>, ServiceError>;
    async fn professional_for_user(&self, user_id: Uuid) -> Result<Option<ProfessionalInfo>, ServiceError>;

    async fn insert(&self, service_id: Uuid, customer_id: Uuid, remarks: Option<&str>) -> Result<ServiceRequest, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<ServiceRequest>, ServiceError>;
    async fn list(&self, filter: RequestFilter, page: Pagination) -> Result<Vec<ServiceRequest>, ServiceError>;

    async fn accept_if_requested(&self, id: Uuid, professional_id: Uuid) -> Result<bool, ServiceError>;
    async fn close_if_accepted(&self, id: Uuid, completed_at: DateTimeWithTimeZone) -> Result<bool, ServiceError>;
    async fn delete_if_requested(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// In-memory repository for unit tests
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockRequestRepository {
        requests: Mutex<HashMap<Uuid, ServiceRequest>>,
        customers: Mutex<HashMap<Uuid, Uuid>>, // key: user_id
        professionals: Mutex<HashMap<Uuid, ProfessionalInfo>>, // key: user_id
        services: Mutex<HashSet<Uuid>>,
    }

    impl MockRequestRepository {
        pub fn add_service(&self) -> Uuid {
            let id = Uuid::new_v4();
            self.services.lock().unwrap().insert(id);
            id
        }

        pub fn add_customer(&self, user_id: Uuid) -> Uuid {
            let id = Uuid::new_v4();
            self.customers.lock().unwrap().insert(user_id, id);
            id
        }

        pub fn add_professional(&self, user_id: Uuid, service_id: Uuid, is_approved: bool) -> ProfessionalInfo {
            let info = ProfessionalInfo { id: Uuid::new_v4(), service_id, is_approved };
            self.professionals.lock().unwrap().insert(user_id, info);
            info
        }
    }

    #[async_trait]
    impl RequestRepository for MockRequestRepository {
        async fn service_exists(&self, service_id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.services.lock().unwrap().contains(&service_id))
        }

        async fn customer_for_user(&self, user_id: Uuid) -> Result<Option<Uuid>, ServiceError> {
            Ok(self.customers.lock().unwrap().get(&user_id).copied())
        }

        async fn professional_for_user(&self, user_id: Uuid) -> Result<Option<ProfessionalInfo>, ServiceError> {
            Ok(self.professionals.lock().unwrap().get(&user_id).copied())
        }

        async fn insert(&self, service_id: Uuid, customer_id: Uuid, remarks: Option<&str>) -> Result<ServiceRequest, ServiceError> {
            let r = ServiceRequest {
                id: Uuid::new_v4(),
                service_id,
                customer_id,
                professional_id: None,
                status: RequestStatus::Requested,
                remarks: remarks.map(str::to_string),
                date_of_request: chrono::Utc::now().into(),
                date_of_completion: None,
            };
            self.requests.lock().unwrap().insert(r.id, r.clone());
            Ok(r)
        }

        async fn get(&self, id: Uuid) -> Result<Option<ServiceRequest>, ServiceError> {
            Ok(self.requests.lock().unwrap().get(&id).cloned())
        }

        async fn list(&self, filter: RequestFilter, page: Pagination) -> Result<Vec<ServiceRequest>, ServiceError> {
            let (skip, take) = page.window();
            let mut all: Vec<ServiceRequest> =
                self.requests.lock().unwrap().values().filter(|r| filter.matches(r)).cloned().collect();
            all.sort_by(|a, b| b.date_of_request.cmp(&a.date_of_request));
            Ok(all.into_iter().skip(skip).take(take).collect())
        }

        async fn accept_if_requested(&self, id: Uuid, professional_id: Uuid) -> Result<bool, ServiceError> {
            let mut map = self.requests.lock().unwrap();
            match map.get_mut(&id) {
                Some(r) if r.status == RequestStatus::Requested => {
                    r.status = RequestStatus::Accepted;
                    r.professional_id = Some(professional_id);
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn close_if_accepted(&self, id: Uuid, completed_at: DateTimeWithTimeZone) -> Result<bool, ServiceError> {
            let mut map = self.requests.lock().unwrap();
            match map.get_mut(&id) {
                Some(r) if r.status == RequestStatus::Accepted => {
                    r.status = RequestStatus::Closed;
                    r.date_of_completion = Some(completed_at);
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn delete_if_requested(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut map = self.requests.lock().unwrap();
            if map.get(&id).is_some_and(|r| r.status == RequestStatus::Requested) {
                map.remove(&id);
                return Ok(true);
            }
            Ok(false)
        }
    }
}
