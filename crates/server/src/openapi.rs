use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct CreateServiceRequestDoc {
    pub service_id: Uuid,
    pub remarks: Option<String>,
}

#[derive(ToSchema)]
pub struct ReviewRequestDoc {
    pub service_id: Uuid,
    pub service_request_id: Uuid,
    /// 1..=5
    pub rating: i32,
    pub comment: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::api::login,
        crate::routes::api::list_services,
        crate::routes::api::create_request,
        crate::routes::api::list_requests,
        crate::routes::api::accept_request,
        crate::routes::api::close_request,
        crate::routes::api::cancel_request,
        crate::routes::api::submit_review,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            CreateServiceRequestDoc,
            ReviewRequestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "catalog"),
        (name = "requests"),
        (name = "reviews")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_json_api_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/service_request"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/service_requests/{id}/accept"));
        assert!(paths.iter().any(|p| p.as_str() == "/health"));
    }
}
