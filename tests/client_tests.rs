use support_chat_backend::client::history::{HISTORY_LIMIT, HistoryStore, MemoryStore};
use support_chat_backend::client::transport::{ChatTransport, TransportError};
use support_chat_backend::client::{ChatClient, ClientError};
use support_chat_backend::message::{ChatRequest, ChatResponse};

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Behaves like the backend: echoes a supplied conversation id, mints one
/// otherwise.
struct ServerLikeTransport {
    minted: AtomicUsize,
}

impl ServerLikeTransport {
    fn new() -> Self {
        Self {
            minted: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ChatTransport for ServerLikeTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        let id = request.conversation_id.clone().unwrap_or_else(|| {
            format!("conv_test_{}", self.minted.fetch_add(1, Ordering::SeqCst))
        });
        Ok(ChatResponse::success(
            format!("echo: {}", request.message),
            id,
        ))
    }
}

struct FailingTransport;

#[async_trait]
impl ChatTransport for FailingTransport {
    async fn send(&self, _request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        Err(TransportError::Decode("connection reset".into()))
    }
}

struct HandledFailureTransport;

#[async_trait]
impl ChatTransport for HandledFailureTransport {
    async fn send(&self, _request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        Ok(ChatResponse::failure("Please provide a valid message.", None))
    }
}

struct SlowTransport;

#[async_trait]
impl ChatTransport for SlowTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(ChatResponse::success(
            format!("echo: {}", request.message),
            "conv_slow".to_string(),
        ))
    }
}

fn client_with(transport: impl ChatTransport + 'static) -> ChatClient {
    ChatClient::new(Box::new(transport), Arc::new(MemoryStore::default()))
}

#[tokio::test]
async fn test_success_records_history_and_id() {
    let client = client_with(ServerLikeTransport::new());

    let reply = client.send_message("hi there").await.unwrap();
    assert_eq!(reply, "echo: hi there");
    assert_eq!(client.conversation_id().as_deref(), Some("conv_test_0"));

    let history = client.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user, "hi there");
    assert_eq!(history[0].bot, "echo: hi there");
    assert_eq!(history[0].conversation_id.as_deref(), Some("conv_test_0"));
    assert!(history[0].timestamp > 0);
}

#[tokio::test]
async fn test_conversation_id_is_reused_across_sends() {
    let client = client_with(ServerLikeTransport::new());

    client.send_message("first").await.unwrap();
    client.send_message("second").await.unwrap();

    // Only the first send minted an id; the second echoed it back.
    assert_eq!(client.conversation_id().as_deref(), Some("conv_test_0"));
    assert_eq!(client.history().len(), 2);
}

#[tokio::test]
async fn test_empty_message_is_rejected_before_sending() {
    let client = client_with(ServerLikeTransport::new());

    assert_eq!(
        client.send_message("").await.unwrap_err(),
        ClientError::EmptyMessage
    );
    assert_eq!(
        client.send_message("   ").await.unwrap_err(),
        ClientError::EmptyMessage
    );
    assert!(client.history().is_empty());
}

#[tokio::test]
async fn test_second_send_while_in_flight_is_rejected() {
    let client = Arc::new(client_with(SlowTransport));

    let first = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.send_message("slow one").await })
    };

    // Give the first send time to claim the in-flight flag.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(
        client.send_message("impatient").await.unwrap_err(),
        ClientError::Busy
    );

    let reply = first.await.unwrap().unwrap();
    assert_eq!(reply, "echo: slow one");

    // The flag clears once the response settles.
    assert!(client.send_message("after").await.is_ok());
}

#[tokio::test]
async fn test_transport_failure_renders_connectivity_message() {
    let client = client_with(FailingTransport);

    let reply = client.send_message("hello?").await.unwrap();
    assert!(reply.contains("trouble connecting"));
    assert!(client.history().is_empty());
    assert_eq!(client.conversation_id(), None);
}

#[tokio::test]
async fn test_handled_failure_is_rendered_verbatim() {
    let client = client_with(HandledFailureTransport);

    let reply = client.send_message("hello?").await.unwrap();
    assert_eq!(reply, "Please provide a valid message.");
    // Failed exchanges are not persisted.
    assert!(client.history().is_empty());
}

#[tokio::test]
async fn test_history_is_capped_at_fifty_entries() {
    let client = client_with(ServerLikeTransport::new());

    for i in 0..(HISTORY_LIMIT + 5) {
        client.send_message(&format!("msg {i}")).await.unwrap();
    }

    let history = client.history();
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history[0].user, "msg 5");
}

#[tokio::test]
async fn test_conversation_resumes_after_restart() {
    let store: Arc<dyn HistoryStore> = Arc::new(MemoryStore::default());

    let client = ChatClient::new(Box::new(ServerLikeTransport::new()), Arc::clone(&store));
    client.send_message("before restart").await.unwrap();
    let id = client.conversation_id();
    drop(client);

    let revived = ChatClient::new(Box::new(ServerLikeTransport::new()), store);
    assert_eq!(revived.conversation_id(), id);
    assert_eq!(revived.history().len(), 1);
}

#[tokio::test]
async fn test_clear_history_forgets_everything() {
    let store: Arc<dyn HistoryStore> = Arc::new(MemoryStore::default());

    let client = ChatClient::new(Box::new(ServerLikeTransport::new()), Arc::clone(&store));
    client.send_message("hello").await.unwrap();
    client.clear_history();

    assert!(client.history().is_empty());
    assert_eq!(client.conversation_id(), None);

    // The store was emptied too, so a new client starts fresh.
    let revived = ChatClient::new(Box::new(ServerLikeTransport::new()), store);
    assert!(revived.history().is_empty());
    assert_eq!(revived.conversation_id(), None);
}
