//! Integration tests for the transport layer: session cookie capture,
//! replacement, and error classification against a mock server.
//!
//! The client is blocking, so every exchange runs inside
//! `spawn_blocking` while wiremock lives on the tokio test runtime.

use trivia_cli::api::{ApiClient, ApiError, QuestionRound};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn session_cookie_round_trips_on_the_next_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc123; HttpOnly; Path=/")
                .set_body_json(serde_json::json!({"status": "started", "level": 0, "score": 0})),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Only matches when the exact pre-semicolon cookie pair comes back.
    Mock::given(method("GET"))
        .and(path("/question"))
        .and(header("cookie", "session=abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "win", "score": 500})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (api, round) = tokio::task::spawn_blocking(move || {
        let mut api = ApiClient::with_base_url(uri);
        api.start().expect("start should succeed");
        let round = api.question().expect("question should carry the cookie");
        (api, round)
    })
    .await
    .unwrap();

    assert_eq!(api.session_token(), Some("session=abc123"));
    assert!(matches!(round, QuestionRound::Win { score: 500 }));
}

#[tokio::test]
async fn a_new_set_cookie_replaces_the_old_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=first; Path=/")
                .set_body_json(serde_json::json!({"status": "started"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/question"))
        .and(header("cookie", "session=first"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=second; Path=/")
                .set_body_json(serde_json::json!({
                    "level": 1,
                    "text": "q",
                    "answers": ["a", "b", "c", "d"],
                })),
        )
        .mount(&server)
        .await;

    // The submission must carry the refreshed cookie, not the first one.
    Mock::given(method("POST"))
        .and(path("/answer"))
        .and(header("cookie", "session=second"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"correct": true, "score": 100, "level": 2})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let api = tokio::task::spawn_blocking(move || {
        let mut api = ApiClient::with_base_url(uri);
        api.start().expect("start should succeed");
        api.question().expect("question should succeed");
        api.answer(0).expect("answer should carry the new cookie");
        api
    })
    .await
    .unwrap();

    assert_eq!(api.session_token(), Some("session=second"));
}

#[tokio::test]
async fn error_message_is_taken_from_the_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/question"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({"error": "Game not started"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        let mut api = ApiClient::with_base_url(uri);
        api.question().unwrap_err()
    })
    .await
    .unwrap();

    match err {
        ApiError::Status { code, message } => {
            assert_eq!(code, 400);
            assert_eq!(message, "Game not started");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_the_status_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/question"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        let mut api = ApiClient::with_base_url(uri);
        api.question().unwrap_err()
    })
    .await
    .unwrap();

    match err {
        ApiError::Status { code, message } => {
            assert_eq!(code, 502);
            assert_eq!(message, "HTTP 502");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[test]
fn unreachable_server_is_a_network_error() {
    // Nothing listens on port 1; the connection is refused outright.
    let mut api = ApiClient::with_base_url("http://127.0.0.1:1");
    let err = api.start().unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
