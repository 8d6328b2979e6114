// src/client/mod.rs
pub mod history;
pub mod transport;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::warn;

use crate::message::ChatRequest;
use history::{HistoryEntry, HistoryLog, HistoryStore};
use transport::ChatTransport;

/// Shown when the backend cannot be reached at all. Handled API errors are
/// rendered verbatim instead; to the user the two are just bot messages.
const CONNECTIVITY_REPLY: &str =
    "I'm having trouble connecting. Please check your internet connection and try again.";
/// Last-resort text if a failure payload arrives with an empty reply.
const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Pre-send rejections surfaced to the user as warnings, not bot messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Please type a message")]
    EmptyMessage,
    #[error("Please wait for the current response")]
    Busy,
}

/// The widget's conversation logic with its collaborators injected:
/// a transport to reach the backend and a store for local continuity.
/// Holds no global state, so multiple independent instances can coexist.
pub struct ChatClient {
    transport: Box<dyn ChatTransport>,
    history: HistoryLog,
    conversation_id: Mutex<Option<String>>,
    in_flight: AtomicBool,
}

impl ChatClient {
    /// Restores the bounded history and resumes the most recent
    /// conversation identifier from the store.
    pub fn new(transport: Box<dyn ChatTransport>, store: Arc<dyn HistoryStore>) -> Self {
        let history = HistoryLog::new(store);
        let conversation_id = Mutex::new(history.last_conversation_id());
        Self {
            transport,
            history,
            conversation_id,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn conversation_id(&self) -> Option<String> {
        self.conversation_id.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.entries()
    }

    /// Send one message and return the text to render as the bot's answer.
    ///
    /// A second call while one is outstanding is rejected with
    /// [`ClientError::Busy`], never queued. Transport failures resolve to a
    /// fixed connectivity message; handled backend failures are rendered
    /// verbatim and kept out of the history, which only records successful
    /// exchanges.
    pub async fn send_message(&self, text: &str) -> Result<String, ClientError> {
        let message = text.trim();
        if message.is_empty() {
            return Err(ClientError::EmptyMessage);
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(ClientError::Busy);
        }

        let rendered = self.dispatch(message).await;
        self.in_flight.store(false, Ordering::SeqCst);
        Ok(rendered)
    }

    async fn dispatch(&self, message: &str) -> String {
        let request = ChatRequest {
            message: message.to_string(),
            conversation_id: self.conversation_id(),
        };

        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "chat transport failed");
                return CONNECTIVITY_REPLY.to_string();
            }
        };

        if !response.success {
            if response.reply.trim().is_empty() {
                return FALLBACK_REPLY.to_string();
            }
            return response.reply;
        }

        if let Ok(mut guard) = self.conversation_id.lock() {
            guard.clone_from(&response.conversation_id);
        }
        self.history.append(HistoryEntry::new(
            message,
            response.reply.clone(),
            response.conversation_id,
        ));
        response.reply
    }

    /// Forget the stored exchanges and the conversation identifier.
    pub fn clear_history(&self) {
        self.history.clear();
        if let Ok(mut guard) = self.conversation_id.lock() {
            *guard = None;
        }
    }
}
