//! API routes
//!
//! `POST /bundle` does the work; `/health` and the Swagger UI under
//! `/swagger-ui` (document at `/api-docs/openapi.json`) sit alongside it.

pub mod bundle;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::bundle::{BundleRequest, BundleResponse, ErrorResponse},
    handlers, AppState,
};

/// OpenAPI document served next to the Swagger UI
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::bundle::bundle_handler,
        health_handler
    ),
    components(
        schemas(BundleRequest, BundleResponse, ErrorResponse)
    ),
    tags(
        (name = "bundle", description = "Download a list of URLs, zip whatever arrived and publish it"),
        (name = "health", description = "Liveness check for load balancers")
    ),
    info(
        title = "Smushit",
        version = "0.1.0",
        description = "Send a list of file URLs and an archive name. Smushit downloads the files \
            concurrently, packs the ones that arrived into a zip stored under a per-API-key \
            prefix in S3, and answers with a presigned link. URLs that fail to download are \
            counted in the response instead of failing the request."
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(bundle::routes())
        .route("/health", axum::routing::get(health_handler))
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    ),
    tag = "health"
)]
async fn health_handler() -> &'static str {
    "OK"
}
