use axum::{
    Json,
    extract::State,
    extract::rejection::JsonRejection,
    http::StatusCode,
};
use tracing::debug;

use crate::{
    error::ChatError,
    message::{ChatRequest, ChatResponse},
    services::chat::handle_chat,
    services::metrics_manager::MetricsData,
    state::SharedState,
};

/// `POST /api/chat`: the full-envelope adapter.
///
/// Body-parse rejections (missing `message`, non-string `message`, invalid
/// JSON) are translated into the contract's own 400 payload instead of
/// axum's plain-text rejection, so the client always gets a renderable
/// `reply`.
pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatResponse>) {
    state.metrics.increment_endpoint("standard").await;

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(%rejection, "rejecting unparseable chat request body");
            let err = ChatError::InvalidMessage;
            state.metrics.increment_outcome(err.label()).await;
            return failure(err, None);
        }
    };

    // Failure payloads echo the caller's identifier.
    let echo_id = request.conversation_id.clone();

    match handle_chat(&state.profiles.standard, state.gateway.as_ref(), request).await {
        Ok(response) => {
            state.metrics.increment_outcome("success").await;
            (StatusCode::OK, Json(response))
        }
        Err(err) => {
            state.metrics.increment_outcome(err.label()).await;
            failure(err, echo_id)
        }
    }
}

/// Answers any non-POST method on the chat route.
pub async fn chat_method_not_allowed() -> (StatusCode, Json<ChatResponse>) {
    failure(ChatError::MethodNotAllowed, None)
}

fn failure(err: ChatError, conversation_id: Option<String>) -> (StatusCode, Json<ChatResponse>) {
    (
        err.status(),
        Json(ChatResponse::failure(err.user_reply(), conversation_id)),
    )
}

pub async fn get_metrics_handler(State(state): State<SharedState>) -> Json<MetricsData> {
    Json(state.metrics.get_metrics().await)
}
