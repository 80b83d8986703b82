//! HTTP surface: DTOs, handlers and the router with its OpenAPI document.

pub mod dtos;
pub mod handlers;

use axum::{Router, extract::DefaultBodyLimit};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::{app_state::AppState, health};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MagCraft API",
        description = "Extracts readable content from web pages, PDF uploads and RSS/Atom feeds"
    ),
    tags(
        (name = "extract", description = "Content extraction"),
        (name = "health", description = "Liveness and connectivity checks")
    )
)]
pub struct ApiDoc;

/// Build the application router with every route, middleware and the
/// Swagger UI mounted.
pub fn router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(handlers::extract_url))
        .routes(routes!(handlers::extract_pdf))
        .routes(routes!(handlers::extract_rss))
        .routes(routes!(handlers::ping))
        .routes(routes!(health::health_check))
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
