// src/message.rs
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum accepted message length, in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl ChatResponse {
    pub fn success(reply: impl Into<String>, conversation_id: String) -> Self {
        Self {
            success: true,
            reply: reply.into(),
            conversation_id: Some(conversation_id),
        }
    }

    pub fn failure(reply: impl Into<String>, conversation_id: Option<String>) -> Self {
        Self {
            success: false,
            reply: reply.into(),
            conversation_id,
        }
    }
}

/// Mint a fresh conversation identifier: wall-clock millis plus a short
/// random suffix so concurrent requests cannot collide.
pub fn mint_conversation_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("conv_{}_{}", millis, &suffix[..9])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_ids_are_prefixed_and_unique() {
        let a = mint_conversation_id();
        let b = mint_conversation_id();
        assert!(a.starts_with("conv_"));
        assert_ne!(a, b);
    }

    #[test]
    fn failure_response_skips_absent_conversation_id() {
        let json = serde_json::to_string(&ChatResponse::failure("nope", None)).unwrap();
        assert!(!json.contains("conversationId"));
    }
}
