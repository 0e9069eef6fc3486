use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use uuid::Uuid;

use models::{review, service as service_entity};
use service::{catalog, reviews, ServiceError};

use crate::errors::ApiError;
use crate::flash::Flash;
use crate::routes::page_with;
use crate::state::AppState;

pub async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<service_entity::Model>>, ApiError> {
    Ok(Json(catalog::list_services(&state.db).await?))
}

#[derive(Serialize)]
struct ReviewsView {
    service: service_entity::Model,
    reviews: Vec<review::Model>,
}

pub async fn service_reviews(State(state): State<AppState>, jar: CookieJar, Path(service_id): Path<Uuid>) -> Response {
    let view = async {
        let service = catalog::get_service(&state.db, service_id).await?;
        let reviews = reviews::list_for_service(&state.db, service_id).await?;
        Ok::<_, ServiceError>(ReviewsView { service, reviews })
    }
    .await;
    page_with(jar, view, |v| v.reviews.is_empty().then(|| Flash::info("No reviews found")))
}
