//! `HttpAuthApi` against canned HTTP responses

use chrono::Utc;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use uuid::Uuid;

use sg_client::{AuthApi, ClientConfig, ClientError, HttpAuthApi, RejectionReason};

/// Serves one connection with a fixed response and returns the base URL
/// together with a handle yielding the raw request head.
async fn serve_once(
    status: &'static str,
    body: String,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}"), handle)
}

fn api(base_url: &str) -> HttpAuthApi {
    HttpAuthApi::new(ClientConfig::new(base_url)).unwrap()
}

#[tokio::test]
async fn test_me_unwraps_envelope_and_sends_bearer() {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let body = json!({
        "data": {
            "id": id,
            "email": "a@x.com",
            "role": "ADMIN",
            "createdAt": now,
            "updatedAt": now,
        },
        "message": "User retrieved successfully",
    })
    .to_string();
    let (base_url, server) = serve_once("200 OK", body).await;

    let user = api(&base_url).me("token-123").await.unwrap();

    assert_eq!(user.id, id);
    assert_eq!(user.role, sg_shared::Role::Admin);

    let request = server.await.unwrap().to_lowercase();
    assert!(request.starts_with("get /auth/me "), "{request}");
    assert!(request.contains("authorization: bearer token-123"), "{request}");
}

#[tokio::test]
async fn test_expired_token_is_classified() {
    let body = json!({
        "message": "Access token expired",
        "statusCode": 401,
        "error": "TOKEN_EXPIRED",
    })
    .to_string();
    let (base_url, _server) = serve_once("401 Unauthorized", body).await;

    let err = api(&base_url).me("stale").await.unwrap_err();

    assert_eq!(err, ClientError::TokenRejected(RejectionReason::Expired));
}

#[tokio::test]
async fn test_refresh_posts_camel_case_body() {
    let body = json!({
        "data": { "accessToken": "a2", "refreshToken": "r2" },
        "message": "Token refreshed successfully",
    })
    .to_string();
    let (base_url, server) = serve_once("200 OK", body).await;

    let tokens = api(&base_url).refresh("r1").await.unwrap();

    assert_eq!(tokens.access_token, "a2");
    assert_eq!(tokens.refresh_token, "r2");
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /auth/refresh "), "{request}");
}

#[tokio::test]
async fn test_non_json_error_is_kept_as_api_error() {
    let (base_url, _server) = serve_once("502 Bad Gateway", "upstream down".to_string()).await;

    match api(&base_url).list_users("token").await {
        Err(ClientError::Api { status, code, message }) => {
            assert_eq!(status, 502);
            assert_eq!(code, "UNKNOWN");
            assert_eq!(message, "upstream down");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = api(&format!("http://{addr}")).me("token").await.unwrap_err();

    assert!(matches!(err, ClientError::Network(_)), "{err:?}");
}
