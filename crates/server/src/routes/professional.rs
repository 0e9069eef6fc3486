use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use uuid::Uuid;

use models::professional;
use models::service_request::Model as ServiceRequest;
use service::lifecycle::Transition;
use service::ServiceError;

use crate::errors::form_failure;
use crate::flash::{self, Flash};
use crate::metrics;
use crate::routes::{page, PageQuery, RequestList};
use crate::session::Session;
use crate::state::AppState;

#[derive(Serialize)]
struct ProfessionalDashboard {
    profile: Option<professional::Model>,
    open_requests: Vec<ServiceRequest>,
    jobs: Vec<ServiceRequest>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Query(q): Query<PageQuery>,
) -> Response {
    let view = async {
        let open_requests = state.lifecycle.list_open_for_professional(&ctx, q.pagination()).await?;
        let jobs = state.lifecycle.list_jobs_for_professional(&ctx, q.pagination()).await?;
        let profile = professional::find_by_user(&state.db, ctx.user_id).await?;
        Ok::<_, ServiceError>(ProfessionalDashboard { profile, open_requests, jobs })
    }
    .await;
    page(jar, view)
}

pub async fn open_requests(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Query(q): Query<PageQuery>,
) -> Response {
    let list = state.lifecycle.list_open_for_professional(&ctx, q.pagination()).await;
    page(jar, list.map(|service_requests| RequestList { service_requests }))
}

pub async fn my_jobs(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Query(q): Query<PageQuery>,
) -> Response {
    let list = state.lifecycle.list_jobs_for_professional(&ctx, q.pagination()).await;
    page(jar, list.map(|service_requests| RequestList { service_requests }))
}

pub async fn accept_request(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Response {
    let back = ctx.role.dashboard_path();
    match state.lifecycle.accept(&ctx, id).await {
        Ok(_) => {
            metrics::transition("accepted");
            flash::redirect(jar, back, Flash::success("Service request accepted"))
        }
        Err(e) => form_failure(jar, back, e),
    }
}

/// Serves both `/complete_request/:id` and `/close_request/:id`.
pub async fn close_request(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Response {
    let back = ctx.role.dashboard_path();
    match state.lifecycle.close(&ctx, id).await {
        Ok(Transition::Applied(_)) => {
            metrics::transition("closed");
            flash::redirect(jar, back, Flash::success("Service request closed"))
        }
        Ok(Transition::AlreadyClosed(_)) => flash::redirect(jar, back, Flash::info("Service request was already closed")),
        Err(e) => form_failure(jar, back, e),
    }
}
