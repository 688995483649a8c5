//! Integration tests for the HTTP transport.
//!
//! Each test binds a one-shot TCP listener that records the request it
//! receives and answers with a canned response, so the real reqwest client is
//! exercised end to end without a chat server.

use std::time::Duration;

use chatsync_client::{
    ApiError, ChatApi,
    http::{HttpClient, HttpConfig},
};
use chatsync_proto::{
    MessageId, MessageStatus, TypingAction,
    payloads::{SendMessageRequest, StatusUpdateRequest, TypingRequest},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

/// Request as seen by the canned server.
#[derive(Debug)]
struct Recorded {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}

/// Serve exactly one request with `status` and `body`.
async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let head_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap().to_string();
        let mut parts = request_line.split(' ');
        let method = parts.next().unwrap().to_string();
        let target = parts.next().unwrap().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();

        let content_length = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .map_or(0, |(_, v)| v.parse::<usize>().unwrap());
        while buf.len() < head_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
        }
        let request_body =
            String::from_utf8_lossy(&buf[head_end..head_end + content_length]).to_string();

        let response = format!(
            "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();

        Recorded { method, target, headers, body: request_body }
    });

    (base, handle)
}

fn client(base: &str) -> HttpClient {
    let config = HttpConfig {
        session_cookie: Some("session=abc123".into()),
        timeout: Duration::from_secs(5),
        ..HttpConfig::new(base)
    };
    HttpClient::new(&config).unwrap()
}

#[tokio::test]
async fn list_users_sends_cookie_and_decodes() {
    let (base, server) =
        serve_once(200, r#"{"users":[{"username":"bob","ip":"10.0.0.2"}]}"#).await;

    let users = client(&base).list_users().await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(request.method, "GET");
    assert_eq!(request.target, "/api/users");
    assert_eq!(request.header("cookie"), Some("session=abc123"));
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "bob");
    assert_eq!(users[0].ip.as_deref(), Some("10.0.0.2"));
}

#[tokio::test]
async fn fetch_messages_encodes_peer_in_query() {
    let (base, server) = serve_once(200, r#"{"messages":[]}"#).await;

    let messages = client(&base).fetch_messages("bob smith").await.unwrap();
    let request = server.await.unwrap();

    assert!(messages.is_empty());
    assert_eq!(request.method, "GET");
    assert!(
        request.target == "/api/messages?with=bob+smith"
            || request.target == "/api/messages?with=bob%20smith",
        "unexpected target {}",
        request.target
    );
}

#[tokio::test]
async fn send_message_posts_json_body() {
    let (base, server) = serve_once(200, r#"{"success":true,"message_id":9}"#).await;

    let reply = client(&base)
        .send_message(&SendMessageRequest { recipient: "bob".into(), message: "hi".into() })
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert_eq!(reply.message_id, Some(MessageId(9)));
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/api/messages");
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body, serde_json::json!({"recipient": "bob", "message": "hi"}));
}

#[tokio::test]
async fn send_message_surfaces_server_error() {
    let (base, server) = serve_once(403, r#"{"error":"blocked"}"#).await;

    let err = client(&base)
        .send_message(&SendMessageRequest { recipient: "bob".into(), message: "hi".into() })
        .await
        .unwrap_err();
    server.await.unwrap();

    assert_eq!(err, ApiError::Rejected { status: 403, message: "blocked".into() });
}

#[tokio::test]
async fn acknowledgement_endpoints_ignore_body() {
    let (base, server) = serve_once(200, "not json").await;
    client(&base)
        .set_typing(&TypingRequest { recipient: "bob".into(), action: TypingAction::Stop })
        .await
        .unwrap();
    let request = server.await.unwrap();
    assert_eq!(request.target, "/api/typing");

    let (base, server) = serve_once(200, "{}").await;
    client(&base)
        .update_status(&StatusUpdateRequest {
            message_id: MessageId(1),
            status: MessageStatus::Read,
        })
        .await
        .unwrap();
    let request = server.await.unwrap();
    assert_eq!(request.target, "/api/update_status");
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body, serde_json::json!({"message_id": 1, "status": "read"}));
}

#[tokio::test]
async fn malformed_success_body_is_decode_error() {
    let (base, server) = serve_once(200, r#"{"typing":"bob"}"#).await;

    let err = client(&base).typing_users().await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&base).list_users().await.unwrap_err();

    assert!(err.is_network(), "got {err:?}");
}
