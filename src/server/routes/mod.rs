//! API routes for the analysis server

pub mod analyze;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::server::state::AppState;

/// Build all API routes.
///
/// Each endpoint is registered with and without a trailing slash: the
/// original front end calls the slash-terminated form.
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload_nf",
            post(analyze::analyze_pdf).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route(
            "/upload_nf/",
            post(analyze::analyze_pdf).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/upload_nf_texto", post(analyze::analyze_text))
        .route("/upload_nf_texto/", post(analyze::analyze_text))
}
