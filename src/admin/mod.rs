pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

/// Routes mounted under `/api/admin`.
pub fn setup_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/sites", get(list_sites))
        .route("/sites/{*name}", get(get_site).put(put_site))
        .route("/reload", post(reload))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ))
        .with_state(state)
}
