use axum::{
    Json,
    extract::State,
    extract::rejection::JsonRejection,
    http::StatusCode,
};
use serde::Serialize;
use tracing::debug;

use crate::{
    error::ChatError,
    message::ChatRequest,
    services::chat::handle_chat,
    state::SharedState,
};

/// The lite envelope carries the reply and nothing else.
#[derive(Debug, Serialize)]
pub struct LiteChatResponse {
    pub reply: String,
}

/// `POST /functions/chat`: the lite-envelope adapter.
///
/// Same pipeline as the full adapter, different profile and a reply-only
/// response body. Status codes match the full adapter since both come from
/// the shared contract.
pub async fn lite_chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<LiteChatResponse>) {
    state.metrics.increment_endpoint("lite").await;

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(%rejection, "rejecting unparseable lite chat request body");
            let err = ChatError::InvalidMessage;
            state.metrics.increment_outcome(err.label()).await;
            return failure(err);
        }
    };

    match handle_chat(&state.profiles.lite, state.gateway.as_ref(), request).await {
        Ok(response) => {
            state.metrics.increment_outcome("success").await;
            (
                StatusCode::OK,
                Json(LiteChatResponse {
                    reply: response.reply,
                }),
            )
        }
        Err(err) => {
            state.metrics.increment_outcome(err.label()).await;
            failure(err)
        }
    }
}

/// The lite platform historically answered wrong methods with plain text.
pub async fn lite_method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

fn failure(err: ChatError) -> (StatusCode, Json<LiteChatResponse>) {
    (
        err.status(),
        Json(LiteChatResponse {
            reply: err.user_reply().to_string(),
        }),
    )
}
