//! Admin moderation and the admin dashboard summary.

use common::types::SetOutcome;
use models::{professional, service, service_request, user, RequestStatus, Role};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog;
use crate::errors::ServiceError;
use crate::gate::{self, AuthContext};
use crate::pagination::Pagination;

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct RoleCounts {
    pub admin: u64,
    pub customer: u64,
    pub professional: u64,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct StatusCounts {
    pub requested: u64,
    pub accepted: u64,
    pub closed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub users: RoleCounts,
    pub pending_approvals: u64,
    pub requests: StatusCounts,
    pub services: Vec<service::Model>,
    pub pending_professionals: Vec<professional::Model>,
}

async fn load_user(db: &DatabaseConnection, user_id: Uuid) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))
}

/// Approve a professional account (by user id). Re-approving is `Unchanged`.
#[instrument(skip(db))]
pub async fn approve_professional(db: &DatabaseConnection, ctx: &AuthContext, user_id: Uuid) -> Result<SetOutcome, ServiceError> {
    gate::require(ctx, Role::Admin)?;
    let u = load_user(db, user_id).await?;
    if u.role != Role::Professional {
        return Err(ServiceError::Validation(format!("user is a {}, not a professional", u.role)));
    }
    let pro = professional::find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("professional profile"))?;
    let outcome = SetOutcome::from_changed(professional::set_approved(db, pro.id, true).await?);
    info!(%user_id, ?outcome, "professional_approved");
    Ok(outcome)
}

async fn set_active(db: &DatabaseConnection, ctx: &AuthContext, user_id: Uuid, active: bool) -> Result<SetOutcome, ServiceError> {
    gate::require(ctx, Role::Admin)?;
    let u = load_user(db, user_id).await?;
    if u.role == Role::Admin {
        return Err(ServiceError::Forbidden("admin accounts cannot be blocked".into()));
    }
    let outcome = SetOutcome::from_changed(user::set_active(db, user_id, active).await?);
    info!(%user_id, active, ?outcome, "user_active_changed");
    Ok(outcome)
}

#[instrument(skip(db))]
pub async fn block_user(db: &DatabaseConnection, ctx: &AuthContext, user_id: Uuid) -> Result<SetOutcome, ServiceError> {
    set_active(db, ctx, user_id, false).await
}

#[instrument(skip(db))]
pub async fn unblock_user(db: &DatabaseConnection, ctx: &AuthContext, user_id: Uuid) -> Result<SetOutcome, ServiceError> {
    set_active(db, ctx, user_id, true).await
}

pub async fn list_users(db: &DatabaseConnection, ctx: &AuthContext, page: Pagination) -> Result<Vec<user::Model>, ServiceError> {
    gate::require(ctx, Role::Admin)?;
    let (idx, per) = page.normalize();
    Ok(user::Entity::find()
        .order_by_asc(user::Column::CreatedAt)
        .paginate(db, per)
        .fetch_page(idx)
        .await?)
}

async fn count_status(db: &DatabaseConnection, status: RequestStatus) -> Result<u64, ServiceError> {
    Ok(service_request::Entity::find()
        .filter(service_request::Column::Status.eq(status))
        .count(db)
        .await?)
}

pub async fn dashboard(db: &DatabaseConnection, ctx: &AuthContext) -> Result<AdminDashboard, ServiceError> {
    gate::require(ctx, Role::Admin)?;
    let users = RoleCounts {
        admin: user::count_by_role(db, Role::Admin).await?,
        customer: user::count_by_role(db, Role::Customer).await?,
        professional: user::count_by_role(db, Role::Professional).await?,
    };
    let requests = StatusCounts {
        requested: count_status(db, RequestStatus::Requested).await?,
        accepted: count_status(db, RequestStatus::Accepted).await?,
        closed: count_status(db, RequestStatus::Closed).await?,
    };
    let pending_professionals = professional::Entity::find()
        .filter(professional::Column::IsApproved.eq(false))
        .order_by_asc(professional::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(AdminDashboard {
        users,
        pending_approvals: professional::count_pending_approval(db).await?,
        requests,
        services: catalog::list_services(db).await?,
        pending_professionals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_customer, seed_professional, seed_service, seed_user};

    fn admin() -> AuthContext { AuthContext::new(Uuid::new_v4(), Role::Admin) }

    #[tokio::test]
    async fn approve_is_idempotent() -> anyhow::Result<()> {
        let db = get_db().await?;
        let s = seed_service(&db, "Plumbing").await?;
        let (pu, _) = seed_professional(&db, "pro", s.id, false).await?;
        assert_eq!(approve_professional(&db, &admin(), pu.id).await?, SetOutcome::Changed);
        assert_eq!(approve_professional(&db, &admin(), pu.id).await?, SetOutcome::Unchanged);
        Ok(())
    }

    #[tokio::test]
    async fn approving_a_customer_is_a_validation_error() -> anyhow::Result<()> {
        let db = get_db().await?;
        let (cu, _) = seed_customer(&db, "cust").await?;
        let err = approve_professional(&db, &admin(), cu.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(matches!(approve_professional(&db, &admin(), Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn block_and_unblock() -> anyhow::Result<()> {
        let db = get_db().await?;
        let (cu, _) = seed_customer(&db, "cust").await?;
        assert_eq!(block_user(&db, &admin(), cu.id).await?, SetOutcome::Changed);
        assert_eq!(block_user(&db, &admin(), cu.id).await?, SetOutcome::Unchanged);
        assert!(!load_user(&db, cu.id).await?.is_active);
        assert_eq!(unblock_user(&db, &admin(), cu.id).await?, SetOutcome::Changed);

        let root = seed_user(&db, "root", Role::Admin).await?;
        assert!(matches!(block_user(&db, &admin(), root.id).await, Err(ServiceError::Forbidden(_))));
        Ok(())
    }

    #[tokio::test]
    async fn dashboard_counts() -> anyhow::Result<()> {
        let db = get_db().await?;
        let s = seed_service(&db, "Plumbing").await?;
        seed_customer(&db, "c1").await?;
        seed_customer(&db, "c2").await?;
        seed_professional(&db, "p1", s.id, false).await?;
        seed_professional(&db, "p2", s.id, true).await?;

        let d = dashboard(&db, &admin()).await?;
        assert_eq!(d.users, RoleCounts { admin: 0, customer: 2, professional: 2 });
        assert_eq!(d.pending_approvals, 1);
        assert_eq!(d.requests, StatusCounts::default());
        assert_eq!(d.services.len(), 1);
        assert_eq!(list_users(&db, &admin(), Pagination::default()).await?.len(), 4);

        let cust = AuthContext::new(Uuid::new_v4(), Role::Customer);
        assert!(matches!(dashboard(&db, &cust).await, Err(ServiceError::Unauthorized(_))));
        Ok(())
    }
}
