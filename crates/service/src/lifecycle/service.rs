use std::sync::Arc;

use chrono::Utc;
use models::service_request::Model as ServiceRequest;
use models::{RequestStatus, Role};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::repository::{ProfessionalInfo, RequestFilter, RequestRepository};
use crate::errors::ServiceError;
use crate::gate::{self, AuthContext};
use crate::pagination::Pagination;

/// Outcome of a close/complete call.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "request", rename_all = "snake_case")]
pub enum Transition {
    Applied(ServiceRequest),
    /// The request was already closed; nothing changed.
    AlreadyClosed(ServiceRequest),
}

impl Transition {
    pub fn request(&self) -> &ServiceRequest {
        match self {
            Transition::Applied(r) | Transition::AlreadyClosed(r) => r,
        }
    }

    pub fn was_applied(&self) -> bool { matches!(self, Transition::Applied(_)) }
}

pub struct LifecycleService<R: RequestRepository> {
    repo: Arc<R>,
}

impl<R: RequestRepository> LifecycleService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    async fn customer_id(&self, ctx: &AuthContext) -> Result<Uuid, ServiceError> {
        self.repo
            .customer_for_user(ctx.user_id)
            .await?
            .ok_or_else(|| ServiceError::Forbidden("customer profile missing".into()))
    }

    async fn professional(&self, ctx: &AuthContext) -> Result<ProfessionalInfo, ServiceError> {
        self.repo
            .professional_for_user(ctx.user_id)
            .await?
            .ok_or_else(|| ServiceError::Forbidden("professional profile missing".into()))
    }

    async fn load(&self, id: Uuid) -> Result<ServiceRequest, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("service request"))
    }

    /// Conditional write lost: report the state that beat us.
    async fn lost_race(&self, id: Uuid, action: &'static str) -> ServiceError {
        match self.repo.get(id).await {
            Ok(Some(r)) => ServiceError::InvalidTransition { from: r.status, action },
            Ok(None) => ServiceError::not_found("service request"),
            Err(e) => e,
        }
    }

    #[instrument(skip(self, remarks), fields(user_id = %ctx.user_id))]
    pub async fn create(&self, ctx: &AuthContext, service_id: Uuid, remarks: Option<&str>) -> Result<ServiceRequest, ServiceError> {
        gate::require(ctx, Role::Customer)?;
        let customer_id = self.customer_id(ctx).await?;
        if !self.repo.service_exists(service_id).await? {
            return Err(ServiceError::not_found("service"));
        }
        let req = self.repo.insert(service_id, customer_id, remarks).await?;
        info!(request_id = %req.id, %service_id, "request_created");
        Ok(req)
    }

    #[instrument(skip(self), fields(user_id = %ctx.user_id))]
    pub async fn accept(&self, ctx: &AuthContext, request_id: Uuid) -> Result<ServiceRequest, ServiceError> {
        gate::require(ctx, Role::Professional)?;
        let pro = self.professional(ctx).await?;
        if !pro.is_approved {
            return Err(ServiceError::Forbidden("professional not approved yet".into()));
        }
        let req = self.load(request_id).await?;
        if req.service_id != pro.service_id {
            return Err(ServiceError::Forbidden("request is for a different service".into()));
        }
        if req.status != RequestStatus::Requested {
            return Err(ServiceError::InvalidTransition { from: req.status, action: "accept" });
        }
        if !self.repo.accept_if_requested(request_id, pro.id).await? {
            warn!(%request_id, "accept_lost_race");
            return Err(self.lost_race(request_id, "accept").await);
        }
        info!(%request_id, professional_id = %pro.id, "request_accepted");
        self.load(request_id).await
    }

    /// Close an accepted request. Only the assigned professional or an admin may close.
    #[instrument(skip(self), fields(user_id = %ctx.user_id, role = %ctx.role))]
    pub async fn close(&self, ctx: &AuthContext, request_id: Uuid) -> Result<Transition, ServiceError> {
        gate::require_any(ctx, &[Role::Professional, Role::Admin])?;
        let pro = match ctx.role {
            Role::Professional => Some(self.professional(ctx).await?),
            _ => None,
        };
        let req = self.load(request_id).await?;
        if req.status == RequestStatus::Requested {
            return Err(ServiceError::InvalidTransition { from: req.status, action: "close" });
        }
        if let Some(pro) = pro {
            if req.professional_id != Some(pro.id) {
                return Err(ServiceError::Forbidden("request is assigned to another professional".into()));
            }
        }
        if req.status == RequestStatus::Closed {
            return Ok(Transition::AlreadyClosed(req));
        }
        if !self.repo.close_if_accepted(request_id, Utc::now().into()).await? {
            // 并发关闭：对方已完成同一转换
            let current = self.load(request_id).await?;
            if current.status == RequestStatus::Closed {
                return Ok(Transition::AlreadyClosed(current));
            }
            return Err(ServiceError::InvalidTransition { from: current.status, action: "close" });
        }
        info!(%request_id, "request_closed");
        Ok(Transition::Applied(self.load(request_id).await?))
    }

    /// Alias of [`Self::close`] used by the professional "complete" action.
    pub async fn complete(&self, ctx: &AuthContext, request_id: Uuid) -> Result<Transition, ServiceError> {
        self.close(ctx, request_id).await
    }

    #[instrument(skip(self), fields(user_id = %ctx.user_id))]
    pub async fn cancel(&self, ctx: &AuthContext, request_id: Uuid) -> Result<(), ServiceError> {
        gate::require(ctx, Role::Customer)?;
        let customer_id = self.customer_id(ctx).await?;
        let req = self.load(request_id).await?;
        if req.customer_id != customer_id {
            return Err(ServiceError::Forbidden("not your request".into()));
        }
        if req.status != RequestStatus::Requested {
            return Err(ServiceError::InvalidTransition { from: req.status, action: "cancel" });
        }
        if !self.repo.delete_if_requested(request_id).await? {
            return Err(self.lost_race(request_id, "cancel").await);
        }
        info!(%request_id, "request_cancelled");
        Ok(())
    }

    pub async fn list_for_customer(&self, ctx: &AuthContext, page: Pagination) -> Result<Vec<ServiceRequest>, ServiceError> {
        gate::require(ctx, Role::Customer)?;
        let customer_id = self.customer_id(ctx).await?;
        self.repo.list(RequestFilter { customer_id: Some(customer_id), ..Default::default() }, page).await
    }

    /// Unassigned requests for the service this professional offers.
    pub async fn list_open_for_professional(&self, ctx: &AuthContext, page: Pagination) -> Result<Vec<ServiceRequest>, ServiceError> {
        gate::require(ctx, Role::Professional)?;
        let pro = self.professional(ctx).await?;
        let filter = RequestFilter {
            service_id: Some(pro.service_id),
            status: Some(RequestStatus::Requested),
            ..Default::default()
        };
        self.repo.list(filter, page).await
    }

    pub async fn list_jobs_for_professional(&self, ctx: &AuthContext, page: Pagination) -> Result<Vec<ServiceRequest>, ServiceError> {
        gate::require(ctx, Role::Professional)?;
        let pro = self.professional(ctx).await?;
        self.repo.list(RequestFilter { professional_id: Some(pro.id), ..Default::default() }, page).await
    }

    pub async fn list_all(&self, ctx: &AuthContext, status: Option<RequestStatus>, page: Pagination) -> Result<Vec<ServiceRequest>, ServiceError> {
        gate::require(ctx, Role::Admin)?;
        self.repo.list(RequestFilter { status, ..Default::default() }, page).await
    }

    /// Requests the caller may see: own (customer), assigned (professional) or all (admin).
    pub async fn list_visible(&self, ctx: &AuthContext, page: Pagination) -> Result<Vec<ServiceRequest>, ServiceError> {
        match ctx.role {
            Role::Customer => self.list_for_customer(ctx, page).await,
            Role::Professional => self.list_jobs_for_professional(ctx, page).await,
            Role::Admin => self.list_all(ctx, None, page).await,
        }
    }
}
