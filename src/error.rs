// src/error.rs
use axum::http::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while answering a chat request.
///
/// Each variant carries a fixed HTTP status and a user-safe reply; raw
/// upstream detail never leaves the server logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("missing or invalid message")]
    InvalidMessage,
    #[error("message exceeds the length limit")]
    MessageTooLong,
    #[error("completion credential is not configured")]
    Misconfigured,
    #[error("completion API rate limited")]
    RateLimited,
    #[error("completion API returned a malformed payload")]
    MalformedUpstream,
    #[error("completion API call failed")]
    Upstream,
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ChatError::InvalidMessage | ChatError::MessageTooLong => StatusCode::BAD_REQUEST,
            ChatError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ChatError::Misconfigured | ChatError::MalformedUpstream | ChatError::Upstream => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The sentence the client renders as a normal bot message.
    pub fn user_reply(&self) -> &'static str {
        match self {
            ChatError::MethodNotAllowed => "I can only process chat messages via POST requests.",
            ChatError::InvalidMessage => "Please provide a valid message.",
            ChatError::MessageTooLong => {
                "Your message is too long. Please keep it under 1000 characters."
            }
            ChatError::Misconfigured => {
                "I'm currently experiencing technical difficulties. Please try again later."
            }
            ChatError::RateLimited => {
                "I'm getting too many requests right now. Please try again in a moment."
            }
            ChatError::MalformedUpstream => {
                "I received an unexpected reply from my assistant service. Please try again."
            }
            ChatError::Upstream => {
                "I apologize, but I'm having trouble processing your request right now. Please try again in a few moments."
            }
        }
    }

    /// Stable label for the metrics counters.
    pub fn label(&self) -> &'static str {
        match self {
            ChatError::MethodNotAllowed => "method_not_allowed",
            ChatError::InvalidMessage => "invalid_message",
            ChatError::MessageTooLong => "message_too_long",
            ChatError::Misconfigured => "misconfigured",
            ChatError::RateLimited => "rate_limited",
            ChatError::MalformedUpstream => "malformed_upstream",
            ChatError::Upstream => "upstream_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_a_non_empty_reply() {
        let all = [
            ChatError::MethodNotAllowed,
            ChatError::InvalidMessage,
            ChatError::MessageTooLong,
            ChatError::Misconfigured,
            ChatError::RateLimited,
            ChatError::MalformedUpstream,
            ChatError::Upstream,
        ];
        for err in all {
            assert!(!err.user_reply().is_empty());
            assert!(err.status().is_client_error() || err.status().is_server_error());
        }
    }
}
