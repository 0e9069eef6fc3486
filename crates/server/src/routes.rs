use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use service::{Pagination, ServiceError};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::errors::ApiError;
use crate::flash::{self, Flash};
use crate::metrics;
use crate::openapi::ApiDoc;
use crate::session;
use crate::state::AppState;

pub mod admin;
pub mod api;
pub mod auth;
pub mod catalog;
pub mod customer;
pub mod professional;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_query(self.page, self.per_page)
    }
}

/// Bare listing page of service requests.
#[derive(Serialize)]
pub(crate) struct RequestList {
    pub service_requests: Vec<models::service_request::Model>,
}

/// JSON view model of a page plus the pending flash message.
#[derive(Serialize)]
struct PageView<T: Serialize> {
    flash: Option<Flash>,
    #[serde(flatten)]
    body: T,
}

/// Render a GET page: consume the flash cookie, send the view as JSON.
pub(crate) fn page<T: Serialize>(jar: CookieJar, result: Result<T, ServiceError>) -> Response {
    page_with(jar, result, |_| None)
}

/// Like [`page`], with a notice derived from the view when no flash is pending.
pub(crate) fn page_with<T: Serialize>(
    jar: CookieJar,
    result: Result<T, ServiceError>,
    notice: impl FnOnce(&T) -> Option<Flash>,
) -> Response {
    let (jar, flash) = flash::take(jar);
    match result {
        Ok(body) => {
            let flash = flash.or_else(|| notice(&body));
            (jar, Json(PageView { flash, body })).into_response()
        }
        Err(ServiceError::Unauthorized(msg)) => flash::redirect(jar, "/login", Flash::danger(msg)),
        Err(e) => (jar, ApiError::from(e)).into_response(),
    }
}

/// Build the full application router: form routes, JSON API, docs and ops endpoints
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/register/customer", get(auth::register_page).post(auth::register_customer))
        .route("/register/professional", get(auth::register_page).post(auth::register_professional))
        .route("/services", get(catalog::list_services))
        .route("/reviews/:service_id", get(catalog::service_reviews));

    let admin_routes = Router::new()
        .route("/admin_dashboard", get(admin::dashboard))
        .route("/admin/approve_professional/:id", post(admin::approve_professional))
        .route("/admin/block/:user_id", post(admin::block_user))
        .route("/admin/unblock/:user_id", post(admin::unblock_user))
        .route("/service/add", post(admin::add_service))
        .route("/service/:id/edit", post(admin::edit_service))
        .route("/service/:id/delete", post(admin::delete_service))
        .route_layer(middleware::from_fn_with_state(state.clone(), session::admin_only));

    let customer_routes = Router::new()
        .route("/customer_dashboard", get(customer::dashboard))
        .route("/service_request/:service_id", post(customer::create_request))
        .route("/cancel_request/:id", post(customer::cancel_request))
        .route("/my_requests", get(customer::my_requests))
        .route("/submit_review/:service_id", post(customer::submit_review))
        .route_layer(middleware::from_fn_with_state(state.clone(), session::customer_only));

    let professional_routes = Router::new()
        .route("/professional_dashboard", get(professional::dashboard))
        .route("/requests", get(professional::open_requests))
        .route("/my_jobs", get(professional::my_jobs))
        .route("/accept_request/:id", post(professional::accept_request))
        .route_layer(middleware::from_fn_with_state(state.clone(), session::professional_only));

    let staff_routes = Router::new()
        .route("/complete_request/:id", post(professional::close_request))
        .route("/close_request/:id", post(professional::close_request))
        .route_layer(middleware::from_fn_with_state(state.clone(), session::staff_only));

    public
        .merge(admin_routes)
        .merge(customer_routes)
        .merge(professional_routes)
        .merge(staff_routes)
        .merge(api::routes(&state))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
