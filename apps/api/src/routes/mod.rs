pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::arc::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Arc sessions
        .route("/api/v1/arcs", post(handlers::handle_create_arc))
        .route(
            "/api/v1/arcs/:id",
            get(handlers::handle_get_arc)
                .patch(handlers::handle_reconfigure_arc)
                .delete(handlers::handle_delete_arc),
        )
        .route(
            "/api/v1/arcs/:id/disable",
            post(handlers::handle_disable_arc),
        )
        .route("/api/v1/arcs/:id/ops/:op", post(handlers::handle_dispatch_op))
        // Host signals
        .route("/api/v1/viewport/resize", post(handlers::handle_viewport_resize))
        .with_state(state)
}
