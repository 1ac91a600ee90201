use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::cors::CorsLayers;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod product;
pub mod user;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// `/api/producto` routes, with and without the trailing slash.
fn producto_routes() -> Router<ServerState> {
    Router::new()
        .route("/api/producto", get(product::list_productos).post(product::create_producto))
        .route("/api/producto/", get(product::list_productos).post(product::create_producto))
        .route(
            "/api/producto/:id",
            get(product::get_producto).put(product::update_producto).delete(product::delete_producto),
        )
        .route("/api/producto/:id/productos", post(product::add_producto))
        .route("/api/producto/:id/productos/:producto_id", put(product::update_producto_de_usuario))
        .route("/api/producto/usuario/:usuario_id", get(product::list_productos_por_usuario))
}

/// `/api/usuario` routes.
fn usuario_routes() -> Router<ServerState> {
    Router::new()
        .route("/api/usuario", get(user::list_usuarios).post(user::create_usuario))
        .route("/api/usuario/", get(user::list_usuarios).post(user::create_usuario))
        .route("/api/usuario/:id", put(user::update_usuario).delete(user::delete_usuario))
}

/// Build the full application router. Each controller gets its own CORS policy.
pub fn build_router(state: ServerState, cors: CorsLayers) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(producto_routes().layer(cors.producto))
        .merge(usuario_routes().layer(cors.usuario))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
