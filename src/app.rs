use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Json;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::TokenVerifier;
use crate::database::DrinkStore;
use crate::error::ApiError;
use crate::handlers::drinks;
use crate::middleware::auth::require_permission;

/// Shared application state, handed to every handler explicitly.
#[derive(Clone)]
pub struct AppState {
    pub store: DrinkStore,
    pub verifier: Arc<TokenVerifier>,
}

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(drink_routes(&state))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Drink routes. Each protected route names its required permission here,
/// at the router, rather than inside the handler.
fn drink_routes(state: &AppState) -> Router<AppState> {
    let guard = |permission: &'static str| {
        let verifier = state.verifier.clone();
        middleware::from_fn(move |request: Request, next: Next| {
            require_permission(verifier.clone(), permission, request, next)
        })
    };

    Router::new()
        .route("/drinks", get(drinks::list))
        .route(
            "/drinks",
            post(drinks::create).route_layer(guard("post:drinks")),
        )
        .route(
            "/drinks-detail",
            get(drinks::list_detail).route_layer(guard("get:drinks-detail")),
        )
        .route(
            "/drinks/:id",
            patch(drinks::update).route_layer(guard("patch:drinks")),
        )
        .route(
            "/drinks/:id",
            delete(drinks::delete).route_layer(guard("delete:drinks")),
        )
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "name": "Barista API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Drink menu CRUD API gated by token permissions",
        "endpoints": {
            "drinks": "GET /drinks (public)",
            "drinks_detail": "GET /drinks-detail (get:drinks-detail)",
            "create": "POST /drinks (post:drinks)",
            "update": "PATCH /drinks/:id (patch:drinks)",
            "delete": "DELETE /drinks/:id (delete:drinks)",
            "health": "GET /health (public)"
        }
    }))
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Err(e) = state.store.health_check().await {
        tracing::error!(error = %e, "health check failed");
        return Err(ApiError::service_unavailable("database unavailable"));
    }

    Ok(Json(json!({
        "success": true,
        "status": "healthy",
        "database": "ok",
        "timestamp": chrono::Utc::now(),
    })))
}

async fn not_found() -> ApiError {
    ApiError::not_found("resource not found")
}
