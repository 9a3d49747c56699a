//! Bundle routes

use axum::{routing::post, Router};

use crate::{handlers::bundle::bundle_handler, AppState};

/// Create bundle routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/bundle", post(bundle_handler))
}
