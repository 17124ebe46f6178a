use crate::{controller::page_controller, sse::handler::sse_handler, AppState};
use axum::{routing::get, Router};

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(page_routes())
        .merge(sse_routes(app_state))
}

fn page_routes() -> Router {
    Router::new().route("/", get(page_controller::index))
}

/// Long-lived event stream; every request gets its own session.
fn sse_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/events", get(sse_handler))
        .with_state(app_state)
}
