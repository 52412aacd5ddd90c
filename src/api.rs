// API client module: a small blocking HTTP client that talks to the
// quiz server's REST API. It is intentionally synchronous; the game is
// one request at a time anyway.

use anyhow::{Context, Result};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Everything that can go wrong talking to the server. All variants end
/// the current game the same way; the split exists so callers and tests
/// can tell a dead server from a confused one.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("{message}")]
    Status { code: u16, message: String },
    /// A 2xx payload that itself reports a failure via an `error` field.
    #[error("{0}")]
    Game(String),
    /// JSON that did not match the shape we expected.
    #[error("malformed server response: {0}")]
    Malformed(String),
}

/// Quiz API client. Holds a reqwest blocking client, the base URL of the
/// server and the session cookie for the current game, if the server has
/// issued one yet.
///
/// The session cookie is owned here and nowhere else: it is written only
/// in [`ApiClient::call`] when a response carries `set-cookie`, and read
/// only when attaching it to the next request. It is never persisted.
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Option<String>,
}

/// One quiz question as served by `GET /question`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Question {
    pub level: i64,
    pub text: String,
    pub answers: Vec<String>,
}

/// Result of asking for the next question: either a question to play, or
/// the server telling us the bank is exhausted and we won.
#[derive(Debug)]
pub enum QuestionRound {
    Ask(Question),
    Win { score: i64 },
}

/// Result of submitting an answer.
#[derive(Debug)]
pub enum AnswerOutcome {
    Correct { score: i64, level: i64 },
    GameOver { score: i64 },
}

/// Response to `POST /start`.
#[derive(Deserialize, Debug)]
pub struct StartedGame {
    pub status: String,
    #[serde(default)]
    pub level: i64,
    #[serde(default)]
    pub score: i64,
}

#[derive(Deserialize)]
struct AnswerReply {
    #[serde(default)]
    correct: bool,
    #[serde(default)]
    game_over: bool,
    score: Option<i64>,
    level: Option<i64>,
}

/// A question record as stored on the server, used by the management
/// surface. `answers` is the shuffled display order; `correct_answer` is
/// the one that scores.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuestionRecord {
    pub id: i64,
    pub level: i64,
    pub text: String,
    #[serde(default)]
    pub answers: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub info: String,
}

/// Payload for creating a question.
#[derive(Serialize, Debug)]
pub struct NewQuestion {
    pub level: i64,
    pub text: String,
    pub correct_answer: String,
    pub wrong_answers: Vec<String>,
    pub info: String,
}

/// Partial update for a question; only the fields that are set are sent.
#[derive(Serialize, Debug, Default)]
pub struct QuestionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrong_answers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl ApiClient {
    /// Create an ApiClient configured from the environment variable
    /// `TRIVIA_API_URL` or fallback to the local development server.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("TRIVIA_API_URL").unwrap_or_else(|_| "http://127.0.0.1:5000/api".into());
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url,
            session: None,
        })
    }

    /// Create a client against an explicit base URL (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ApiClient {
            client: Client::new(),
            base_url: base_url.into(),
            session: None,
        }
    }

    /// The session cookie currently held, if any.
    pub fn session_token(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Issue one request against the API. Attaches the session cookie when
    /// one is held, captures a new one from `set-cookie` (last writer
    /// wins), and classifies the response into [`ApiError`] instead of
    /// letting reqwest/serde errors leak out. No retries.
    pub fn call(
        &mut self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{} {}", method, url);

        let mut req = self.client.request(method, &url);
        if let Some(cookie) = &self.session {
            req = req.header(COOKIE, cookie);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req.send().map_err(|e| ApiError::Network(e.to_string()))?;

        // The server refreshes the session on failure responses too, so
        // capture the cookie before looking at the status.
        if let Some(raw) = res.headers().get(SET_COOKIE).and_then(|v| v.to_str().ok()) {
            self.session = Some(cookie_pair(raw).to_string());
        }

        let status = res.status();
        debug!("-> {}", status);
        let text = res.text().map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                code: status.as_u16(),
                message: status_message(status.as_u16(), &text),
            });
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Start a fresh game. Any previous game on this session is discarded
    /// by the server; the cookie it returns supersedes the one we held.
    pub fn start(&mut self) -> Result<StartedGame, ApiError> {
        let payload = self.call(Method::POST, "/start", None)?;
        reject_game_error(&payload)?;
        serde_json::from_value(payload).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Fetch the next question for the current game.
    pub fn question(&mut self) -> Result<QuestionRound, ApiError> {
        let payload = self.call(Method::GET, "/question", None)?;
        classify_question(payload)
    }

    /// Submit the chosen answer index for the current question.
    pub fn answer(&mut self, index: usize) -> Result<AnswerOutcome, ApiError> {
        let body = serde_json::json!({ "answer_index": index });
        let payload = self.call(Method::POST, "/answer", Some(&body))?;
        classify_answer(payload)
    }

    // --- question bank management ---

    /// Fetch every question in the bank.
    pub fn list_questions(&mut self) -> Result<Vec<QuestionRecord>, ApiError> {
        let payload = self.call(Method::GET, "/questions", None)?;
        serde_json::from_value(payload).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Fetch a single question by id.
    pub fn get_question(&mut self, id: i64) -> Result<QuestionRecord, ApiError> {
        let payload = self.call(Method::GET, &format!("/questions/{id}"), None)?;
        serde_json::from_value(payload).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Create a new question and return the stored record.
    pub fn create_question(&mut self, question: &NewQuestion) -> Result<QuestionRecord, ApiError> {
        let body = to_body(question)?;
        let payload = self.call(Method::POST, "/questions", Some(&body))?;
        serde_json::from_value(payload).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Apply a partial update to a question and return the updated record.
    pub fn update_question(
        &mut self,
        id: i64,
        update: &QuestionUpdate,
    ) -> Result<QuestionRecord, ApiError> {
        let body = to_body(update)?;
        let payload = self.call(Method::PUT, &format!("/questions/{id}"), Some(&body))?;
        serde_json::from_value(payload).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Delete a question, returning the server's confirmation message.
    pub fn delete_question(&mut self, id: i64) -> Result<String, ApiError> {
        let payload = self.call(Method::DELETE, &format!("/questions/{id}"), None)?;
        Ok(payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("deleted")
            .to_string())
    }

    /// Search question text and answers for a substring.
    pub fn search_questions(&mut self, query: &str) -> Result<Vec<QuestionRecord>, ApiError> {
        let payload = self.call(Method::GET, &format!("/questions/search/{query}"), None)?;
        serde_json::from_value(payload).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

/// Extract the cookie-pair from a `set-cookie` header value, dropping the
/// attributes (`Path`, `HttpOnly`, ...) after the first semicolon.
fn cookie_pair(header: &str) -> &str {
    match header.split_once(';') {
        Some((pair, _)) => pair.trim(),
        None => header.trim(),
    }
}

/// Error message for a non-success status: the JSON body's `error` field
/// when there is one, otherwise a generic status line.
fn status_message(code: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {code}"))
}

/// A 2xx payload can still report a failure through an `error` field.
fn reject_game_error(payload: &Value) -> Result<(), ApiError> {
    match payload.get("error").and_then(Value::as_str) {
        Some(msg) => Err(ApiError::Game(msg.to_string())),
        None => Ok(()),
    }
}

fn classify_question(payload: Value) -> Result<QuestionRound, ApiError> {
    reject_game_error(&payload)?;
    if payload.get("status").and_then(Value::as_str) == Some("win") {
        let score = payload.get("score").and_then(Value::as_i64).unwrap_or(0);
        return Ok(QuestionRound::Win { score });
    }
    let question: Question =
        serde_json::from_value(payload).map_err(|e| ApiError::Malformed(e.to_string()))?;
    if question.answers.is_empty() {
        return Err(ApiError::Malformed("question carried no answer options".into()));
    }
    Ok(QuestionRound::Ask(question))
}

fn classify_answer(payload: Value) -> Result<AnswerOutcome, ApiError> {
    reject_game_error(&payload)?;
    let reply: AnswerReply =
        serde_json::from_value(payload).map_err(|e| ApiError::Malformed(e.to_string()))?;
    // game_over wins over correct: a losing reply carries both fields.
    if reply.game_over {
        Ok(AnswerOutcome::GameOver {
            score: reply.score.unwrap_or(0),
        })
    } else if reply.correct {
        Ok(AnswerOutcome::Correct {
            score: reply.score.unwrap_or(0),
            level: reply.level.unwrap_or(0),
        })
    } else {
        Err(ApiError::Malformed(
            "answer reply carried neither correct nor game_over".into(),
        ))
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Malformed(format!("request body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cookie_pair_strips_attributes() {
        assert_eq!(
            cookie_pair("session=abc123; HttpOnly; Path=/"),
            "session=abc123"
        );
    }

    #[test]
    fn cookie_pair_without_attributes() {
        assert_eq!(cookie_pair("session=abc123"), "session=abc123");
        assert_eq!(cookie_pair("  session=abc123  "), "session=abc123");
    }

    #[test]
    fn status_message_prefers_error_field() {
        assert_eq!(
            status_message(400, r#"{"error": "Game not started"}"#),
            "Game not started"
        );
    }

    #[test]
    fn status_message_falls_back_to_code() {
        assert_eq!(status_message(502, "<html>bad gateway</html>"), "HTTP 502");
        assert_eq!(status_message(404, r#"{"message": "nope"}"#), "HTTP 404");
    }

    #[test]
    fn question_payload_is_a_round() {
        let round = classify_question(json!({
            "level": 2,
            "text": "What is the capital of France?",
            "answers": ["Paris", "London", "Berlin", "Madrid"],
        }))
        .unwrap();
        match round {
            QuestionRound::Ask(q) => {
                assert_eq!(q.level, 2);
                assert_eq!(q.answers.len(), 4);
            }
            other => panic!("expected a question, got {other:?}"),
        }
    }

    #[test]
    fn win_payload_ends_the_game() {
        let round = classify_question(json!({ "status": "win", "score": 500 })).unwrap();
        match round {
            QuestionRound::Win { score } => assert_eq!(score, 500),
            other => panic!("expected a win, got {other:?}"),
        }
    }

    #[test]
    fn question_without_options_is_malformed() {
        let err = classify_question(json!({ "level": 1, "text": "q", "answers": [] })).unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[test]
    fn error_field_in_success_payload_is_a_game_error() {
        let err = classify_question(json!({ "error": "Game not started" })).unwrap_err();
        match err {
            ApiError::Game(msg) => assert_eq!(msg, "Game not started"),
            other => panic!("expected a game error, got {other:?}"),
        }
    }

    #[test]
    fn correct_answer_keeps_playing() {
        let outcome = classify_answer(json!({ "correct": true, "score": 100, "level": 1 })).unwrap();
        match outcome {
            AnswerOutcome::Correct { score, level } => {
                assert_eq!(score, 100);
                assert_eq!(level, 1);
            }
            other => panic!("expected correct, got {other:?}"),
        }
    }

    #[test]
    fn game_over_beats_correct_flag() {
        let outcome =
            classify_answer(json!({ "correct": false, "game_over": true, "score": 300 })).unwrap();
        match outcome {
            AnswerOutcome::GameOver { score } => assert_eq!(score, 300),
            other => panic!("expected game over, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_answer_shape_is_malformed() {
        let err = classify_answer(json!({ "shrug": true })).unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[test]
    fn partial_update_serializes_only_set_fields() {
        let update = QuestionUpdate {
            text: Some("New text".into()),
            ..QuestionUpdate::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, json!({ "text": "New text" }));
    }
}
