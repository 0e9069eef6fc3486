use axum::{
    extract::{Path, Query, State},
    response::Response,
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::service_request::Model as ServiceRequest;
use models::service::Model as CatalogService;
use service::reviews::{self, ReviewInput};
use service::{catalog, ServiceError};

use crate::errors::form_failure;
use crate::flash::{self, Flash};
use crate::metrics;
use crate::routes::{page, PageQuery, RequestList};
use crate::session::Session;
use crate::state::AppState;

const BACK: &str = "/customer_dashboard";

#[derive(Serialize)]
struct CustomerDashboard {
    services: Vec<CatalogService>,
    service_requests: Vec<ServiceRequest>,
}

#[derive(Debug, Deserialize)]
pub struct RequestForm {
    pub remarks: Option<String>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Query(q): Query<PageQuery>,
) -> Response {
    let view = async {
        let service_requests = state.lifecycle.list_for_customer(&ctx, q.pagination()).await?;
        let services = catalog::list_services(&state.db).await?;
        Ok::<_, ServiceError>(CustomerDashboard { services, service_requests })
    }
    .await;
    page(jar, view)
}

pub async fn my_requests(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Query(q): Query<PageQuery>,
) -> Response {
    let list = state.lifecycle.list_for_customer(&ctx, q.pagination()).await;
    page(jar, list.map(|service_requests| RequestList { service_requests }))
}

pub async fn create_request(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Path(service_id): Path<Uuid>,
    form: Option<Form<RequestForm>>,
) -> Response {
    let remarks = form.and_then(|Form(f)| f.remarks);
    match state.lifecycle.create(&ctx, service_id, remarks.as_deref()).await {
        Ok(_) => {
            metrics::transition("created");
            flash::redirect(jar, BACK, Flash::success("Service requested"))
        }
        Err(e) => form_failure(jar, BACK, e),
    }
}

pub async fn cancel_request(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Response {
    match state.lifecycle.cancel(&ctx, id).await {
        Ok(()) => {
            metrics::transition("cancelled");
            flash::redirect(jar, BACK, Flash::success("Service request cancelled"))
        }
        Err(e) => form_failure(jar, BACK, e),
    }
}

pub async fn submit_review(
    State(state): State<AppState>,
    Session(ctx): Session,
    jar: CookieJar,
    Path(service_id): Path<Uuid>,
    Form(input): Form<ReviewInput>,
) -> Response {
    match reviews::submit(&state.db, &ctx, service_id, input).await {
        Ok(_) => {
            metrics::REVIEWS_TOTAL.inc();
            flash::redirect(jar, BACK, Flash::success("Review submitted"))
        }
        Err(e) => form_failure(jar, BACK, e),
    }
}
