// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router for the auth service.
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{handlers::auth, AppState};

/// Path the auth routes are mounted under
pub const AUTH_PREFIX: &str = "/api/auth";

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest(AUTH_PREFIX, auth_routes())
        .route("/health", get(auth::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The register / login / logout routes, unmounted
pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
}
