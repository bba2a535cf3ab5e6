//! HTTP routes for the marketplace API

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, HeaderValue, Method, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{config::ApiConfig, middleware::require_admin, state::AppState};

pub mod admin;
pub mod market;
pub mod nfts;
pub mod users;

/// Create the router for the marketplace API service
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let uploads = ServeDir::new(state.config.upload_dir.clone());

    let admin_routes = Router::new()
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:uid", put(admin::update_user))
        .route("/admin/users/:uid/flags", put(admin::set_user_flags))
        .route(
            "/admin/nfts/:id",
            put(admin::update_nft).delete(admin::delete_nft),
        )
        .route("/admin/nfts/:id/status", put(admin::set_nft_status))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/nfts", get(market::list_collections))
        .route(
            "/api/nfts/:collection_id/tokens",
            get(market::list_collection_tokens),
        )
        .route("/api/trending-nfts", get(market::trending_tokens))
        .route("/api/doodles-collection", get(market::doodles_collection))
        .route("/users", post(users::create_user))
        .route("/users/upload-image", post(users::upload_profile_image))
        .route("/users/:uid", get(users::get_user).put(users::update_user))
        .route("/nfts", post(nfts::create_nft).get(nfts::list_nfts))
        .merge(admin_routes)
        .nest_service("/uploads", uploads)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(crate::middleware::USER_UID_HEADER),
        ])
}

/// Service banner
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "service": "marketplace-api",
        "status": "ok"
    }))
}

/// Liveness endpoint, including database connectivity
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool).await.is_ok();

    Json(json!({
        "status": if database { "ok" } else { "degraded" },
        "service": "marketplace-api",
        "database": database
    }))
}

/// Shorthand used by delete-style handlers
pub(crate) fn message(text: &str) -> Json<serde_json::Value> {
    Json(json!({ "message": text }))
}
