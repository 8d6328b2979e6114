// src/services/chat.rs
use tracing::error;

use crate::config::ChatProfile;
use crate::error::ChatError;
use crate::message::{ChatRequest, ChatResponse, MAX_MESSAGE_CHARS, mint_conversation_id};
use crate::services::gateway::{CompletionGateway, GatewayError};

/// The platform-agnostic chat contract: validate, call the gateway,
/// normalize. Adapters translate their hosting envelope to and from this
/// function; everything here is shared so the envelopes cannot drift.
pub async fn handle_chat(
    profile: &ChatProfile,
    gateway: &dyn CompletionGateway,
    request: ChatRequest,
) -> Result<ChatResponse, ChatError> {
    if request.message.trim().is_empty() {
        return Err(ChatError::InvalidMessage);
    }
    if request.message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ChatError::MessageTooLong);
    }
    if !gateway.is_configured() {
        error!("completion credential is not set; refusing to call the gateway");
        return Err(ChatError::Misconfigured);
    }

    let reply = match gateway.complete(profile, &request.message).await {
        Ok(reply) => reply,
        Err(GatewayError::RateLimited) => return Err(ChatError::RateLimited),
        Err(GatewayError::MissingCredential) => {
            error!("completion credential disappeared between check and call");
            return Err(ChatError::Misconfigured);
        }
        Err(err @ GatewayError::Malformed(_)) => {
            error!(error = %err, "completion gateway returned a malformed payload");
            return Err(ChatError::MalformedUpstream);
        }
        Err(err) => {
            error!(error = %err, "completion gateway call failed");
            return Err(ChatError::Upstream);
        }
    };

    let conversation_id = request
        .conversation_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(mint_conversation_id);

    Ok(ChatResponse::success(reply, conversation_id))
}
