//! Bundle handler

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use smushit_domain::{BundleError, BundleReceipt, CallerIdentity};
use tracing::{error, info};

use crate::{
    dto::bundle::{BundleRequest, BundleResponse, ErrorResponse},
    AppState,
};

/// Header carrying the caller's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Handle bundle requests
#[utoipa::path(
    post,
    path = "/bundle",
    request_body = BundleRequest,
    params(
        ("X-Api-Key" = Option<String>, Header, description = "Caller key; archives are stored under its hash")
    ),
    responses(
        (status = 200, description = "Archive uploaded, download link minted", body = BundleResponse),
        (status = 400, description = "Invalid request, nothing downloaded, or archive/upload failure", body = ErrorResponse)
    ),
    tag = "bundle"
)]
pub async fn bundle_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let caller = caller_identity(&headers);
    info!(namespace = %caller.namespace(), body_size = body.len(), "Received bundle request");

    match handle(&state, &caller, &body).await {
        Ok(receipt) => {
            info!(
                batch_id = %receipt.batch_id(),
                key = %receipt.address(),
                "Successfully bundled request"
            );
            (StatusCode::OK, Json(BundleResponse::from(&receipt))).into_response()
        }
        Err(err) => {
            error!(error = ?err, "Failed to bundle request");
            error_response(&err)
        }
    }
}

async fn handle(
    state: &AppState,
    caller: &CallerIdentity,
    body: &[u8],
) -> Result<BundleReceipt, BundleError> {
    let request = BundleRequest::from_body(body)?.into_batch()?;
    state.bundle_service.bundle(request, caller).await
}

/// The API key, or an empty identity when the header is absent or unreadable
fn caller_identity(headers: &HeaderMap) -> CallerIdentity {
    let key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    CallerIdentity::new(key)
}

/// Every failure category shares one status and one body shape
fn error_response(err: &BundleError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}
