// src/routes/mod.rs
pub mod chat;
pub mod lite;

use crate::state::SharedState;
use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use chat::{chat_handler, chat_method_not_allowed, get_metrics_handler};
use lite::{lite_chat_handler, lite_method_not_allowed};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    let admin_routes = Router::new()
        .route("/metrics", get(get_metrics_handler))
        .layer(middleware::from_fn(auth_middleware));

    Router::new()
        .route(
            "/api/chat",
            post(chat_handler).fallback(chat_method_not_allowed),
        )
        .route(
            "/functions/chat",
            post(lite_chat_handler).fallback(lite_method_not_allowed),
        )
        .nest("/admin", admin_routes)
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
}

async fn auth_middleware(req: Request, next: Next) -> Result<Response, StatusCode> {
    // API key check; an unset ADMIN_API_KEY disables the admin surface.
    let expected = std::env::var("ADMIN_API_KEY").unwrap_or_default();
    match req.headers().get("x-admin-key") {
        Some(val) if !expected.is_empty() && val.as_bytes() == expected.as_bytes() => {
            Ok(next.run(req).await)
        }
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
