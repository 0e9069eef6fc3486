use axum::{
    extract::{Path, Query, State},
    response::Response,
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use common::types::SetOutcome;
use serde::Serialize;
use uuid::Uuid;

use models::service_request::Model as ServiceRequest;
use models::user;
use service::admin::{self as moderation, AdminDashboard};
use service::catalog::{self, ServiceInput};
use service::ServiceError;

use crate::errors::form_failure;
use crate::flash::{self, Flash};
use crate::routes::{page, PageQuery};
use crate::session::Session;
use crate::state::AppState;

const BACK: &str = "/admin_dashboard";

#[derive(Serialize)]
struct AdminDashboardView {
    #[serde(flatten)]
    summary: AdminDashboard,
    accounts: Vec<user::Model>,
    service_requests: Vec<ServiceRequest>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Query(q): Query<PageQuery>,
) -> Response {
    let view = async {
        let summary = moderation::dashboard(&state.db, &ctx).await?;
        let accounts = moderation::list_users(&state.db, &ctx, q.pagination()).await?;
        let service_requests = state.lifecycle.list_all(&ctx, None, q.pagination()).await?;
        Ok::<_, ServiceError>(AdminDashboardView { summary, accounts, service_requests })
    }
    .await;
    page(jar, view)
}

fn outcome_redirect(jar: CookieJar, result: Result<SetOutcome, ServiceError>, changed: &str, unchanged: &str) -> Response {
    match result {
        Ok(SetOutcome::Changed) => flash::redirect(jar, BACK, Flash::success(changed)),
        Ok(SetOutcome::Unchanged) => flash::redirect(jar, BACK, Flash::info(unchanged)),
        Err(e) => form_failure(jar, BACK, e),
    }
}

pub async fn approve_professional(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Path(user_id): Path<Uuid>,
) -> Response {
    let result = moderation::approve_professional(&state.db, &ctx, user_id).await;
    outcome_redirect(jar, result, "Professional approved", "Professional was already approved")
}

pub async fn block_user(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Path(user_id): Path<Uuid>,
) -> Response {
    let result = moderation::block_user(&state.db, &ctx, user_id).await;
    outcome_redirect(jar, result, "User blocked", "User was already blocked")
}

pub async fn unblock_user(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Path(user_id): Path<Uuid>,
) -> Response {
    let result = moderation::unblock_user(&state.db, &ctx, user_id).await;
    outcome_redirect(jar, result, "User unblocked", "User was not blocked")
}

pub async fn add_service(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Form(input): Form<ServiceInput>,
) -> Response {
    match catalog::add_service(&state.db, &ctx, input).await {
        Ok(s) => flash::redirect(jar, BACK, Flash::success(format!("Service {} added", s.name))),
        Err(e) => form_failure(jar, BACK, e),
    }
}

pub async fn edit_service(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Form(input): Form<ServiceInput>,
) -> Response {
    match catalog::edit_service(&state.db, &ctx, id, input).await {
        Ok(s) => flash::redirect(jar, BACK, Flash::success(format!("Service {} updated", s.name))),
        Err(e) => form_failure(jar, BACK, e),
    }
}

pub async fn delete_service(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Response {
    match catalog::delete_service(&state.db, &ctx, id).await {
        Ok(()) => flash::redirect(jar, BACK, Flash::success("Service deleted")),
        Err(e) => form_failure(jar, BACK, e),
    }
}
