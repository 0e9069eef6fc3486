//! JSON API: the same service layer as the form routes, bearer token or cookie auth.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::service_request::Model as ServiceRequest;
use models::{review, service as service_entity, Role};
use service::auth::domain::LoginInput;
use service::lifecycle::Transition;
use service::reviews::{self, ReviewInput};
use service::catalog;

use crate::errors::ApiError;
use crate::metrics;
use crate::routes::PageQuery;
use crate::session::{self, Session};
use crate::state::AppState;

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub role: Role,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    pub service_id: Uuid,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewBody {
    pub service_id: Uuid,
    pub service_request_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

/// Role-scoped groups are guarded before their JSON body or path is parsed.
pub fn routes(state: &AppState) -> Router<AppState> {
    let customer = Router::new()
        .route("/api/service_request", post(create_request))
        .route("/api/service_requests/:id/cancel", post(cancel_request))
        .route("/api/reviews", post(submit_review))
        .route_layer(middleware::from_fn_with_state(state.clone(), session::customer_only));
    let professional = Router::new()
        .route("/api/service_requests/:id/accept", post(accept_request))
        .route_layer(middleware::from_fn_with_state(state.clone(), session::professional_only));
    let staff = Router::new()
        .route("/api/service_requests/:id/close", post(close_request))
        .route_layer(middleware::from_fn_with_state(state.clone(), session::staff_only));

    Router::new()
        .route("/api/login", post(login))
        .route("/api/services", get(list_services))
        .route("/api/service_requests", get(list_requests))
        .merge(customer)
        .merge(professional)
        .merge(staff)
}

#[utoipa::path(post, path = "/api/login", tag = "auth", request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Token issued"), (status = 401, description = "Invalid credentials"), (status = 403, description = "Account blocked")))]
pub async fn login(State(state): State<AppState>, Json(input): Json<LoginInput>) -> Result<Json<LoginOutput>, ApiError> {
    match state.auth.login(input).await {
        Ok(session) => {
            metrics::LOGINS_TOTAL.inc();
            Ok(Json(LoginOutput { user_id: session.user.id, role: session.user.role, token: session.token }))
        }
        Err(e) => {
            metrics::LOGIN_FAILURES_TOTAL.inc();
            Err(e.into())
        }
    }
}

#[utoipa::path(get, path = "/api/services", tag = "catalog", responses((status = 200, description = "Service catalog")))]
pub async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<service_entity::Model>>, ApiError> {
    Ok(Json(catalog::list_services(&state.db).await?))
}

#[utoipa::path(post, path = "/api/service_request", tag = "requests", request_body = crate::openapi::CreateServiceRequestDoc,
    responses((status = 201, description = "Request created"), (status = 401, description = "Not a customer"), (status = 404, description = "Unknown service")))]
pub async fn create_request(
    State(state): State<AppState>,
    Session(ctx): Session,
    Json(body): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<ServiceRequest>), ApiError> {
    let req = state.lifecycle.create(&ctx, body.service_id, body.remarks.as_deref()).await?;
    metrics::transition("created");
    Ok((StatusCode::CREATED, Json(req)))
}

#[utoipa::path(get, path = "/api/service_requests", tag = "requests",
    params(("page" = Option<u32>, Query, description = "1-based page"), ("per_page" = Option<u32>, Query, description = "Items per page (<=100)")),
    responses((status = 200, description = "Requests visible to the caller"), (status = 401, description = "Not logged in")))]
pub async fn list_requests(
    State(state): State<AppState>,
    Session(ctx): Session,
    Query(q): Query<PageQuery>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    Ok(Json(state.lifecycle.list_visible(&ctx, q.pagination()).await?))
}

#[utoipa::path(post, path = "/api/service_requests/{id}/accept", tag = "requests",
    params(("id" = Uuid, Path, description = "Service request id")),
    responses((status = 200, description = "Accepted"), (status = 409, description = "Not in requested state")))]
pub async fn accept_request(
    State(state): State<AppState>,
    Session(ctx): Session,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceRequest>, ApiError> {
    let req = state.lifecycle.accept(&ctx, id).await?;
    metrics::transition("accepted");
    Ok(Json(req))
}

#[utoipa::path(post, path = "/api/service_requests/{id}/close", tag = "requests",
    params(("id" = Uuid, Path, description = "Service request id")),
    responses((status = 200, description = "Closed, or already closed"), (status = 409, description = "Not accepted yet")))]
pub async fn close_request(
    State(state): State<AppState>,
    Session(ctx): Session,
    Path(id): Path<Uuid>,
) -> Result<Json<Transition>, ApiError> {
    let outcome = state.lifecycle.close(&ctx, id).await?;
    if outcome.was_applied() {
        metrics::transition("closed");
    }
    Ok(Json(outcome))
}

#[utoipa::path(post, path = "/api/service_requests/{id}/cancel", tag = "requests",
    params(("id" = Uuid, Path, description = "Service request id")),
    responses((status = 204, description = "Cancelled"), (status = 403, description = "Not the owner"), (status = 409, description = "Already accepted")))]
pub async fn cancel_request(
    State(state): State<AppState>,
    Session(ctx): Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.lifecycle.cancel(&ctx, id).await?;
    metrics::transition("cancelled");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/reviews", tag = "reviews", request_body = crate::openapi::ReviewRequestDoc,
    responses((status = 201, description = "Review stored"), (status = 400, description = "Rating outside 1..=5"), (status = 409, description = "Request not closed or already reviewed")))]
pub async fn submit_review(
    State(state): State<AppState>,
    Session(ctx): Session,
    Json(body): Json<ReviewBody>,
) -> Result<(StatusCode, Json<review::Model>), ApiError> {
    let input = ReviewInput { service_request_id: body.service_request_id, rating: body.rating, comment: body.comment };
    let created = reviews::submit(&state.db, &ctx, body.service_id, input).await?;
    metrics::REVIEWS_TOTAL.inc();
    Ok((StatusCode::CREATED, Json(created)))
}
