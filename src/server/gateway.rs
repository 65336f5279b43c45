//! Completion gateway: validates a user query, relays it upstream with the
//! system instruction and maps the outcome onto a uniform reply envelope.

use axum::http::StatusCode;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::ai::{format_upstream_failure, CompletionBackend, SystemInstruction};

pub const EMPTY_QUERY_MESSAGE: &str = "The question is empty. Please describe the symptom.";

/// Response body of `POST /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AskResponse {
    Reply(String),
    Error(String),
}

impl AskResponse {
    pub fn text(&self) -> &str {
        match self {
            AskResponse::Reply(text) | AskResponse::Error(text) => text,
        }
    }
}

pub struct Gateway {
    instruction: SystemInstruction,
    backend: Arc<dyn CompletionBackend>,
}

impl Gateway {
    pub fn new(instruction: SystemInstruction, backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            instruction,
            backend,
        }
    }

    pub fn instruction(&self) -> &SystemInstruction {
        &self.instruction
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Handles a raw `/ask` body.
    pub async fn handle(&self, raw: &[u8]) -> (StatusCode, AskResponse) {
        let message = extract_message(raw);
        self.ask(&message).await
    }

    /// Relays an already extracted message. Upstream failures come back as
    /// ordinary reply text with a success status.
    pub async fn ask(&self, message: &str) -> (StatusCode, AskResponse) {
        let query = message.trim();
        if query.is_empty() {
            debug!("Rejected empty query");
            return (
                StatusCode::BAD_REQUEST,
                AskResponse::Error(EMPTY_QUERY_MESSAGE.to_string()),
            );
        }

        debug!("Relaying query of {} chars to {}", query.len(), self.model());

        match self.backend.complete(&self.instruction, query).await {
            Ok(text) => (StatusCode::OK, AskResponse::Reply(text)),
            Err(e) => {
                warn!("Completion request failed: {e}");
                (StatusCode::OK, AskResponse::Reply(format_upstream_failure(&e)))
            }
        }
    }
}

/// Pulls the `message` string out of a JSON body. Anything else (invalid JSON,
/// a non-object, a missing or non-string field) yields an empty message.
pub fn extract_message(raw: &[u8]) -> String {
    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(mut fields)) => match fields.remove("message") {
            Some(Value::String(message)) => message.trim().to_string(),
            _ => String::new(),
        },
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{compose, SYSTEM_TEMPLATE};
    use crate::context::ReferenceContext;
    use crate::error::{CompletionError, CompletionResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        calls: Mutex<Vec<(String, String)>>,
        fail_with_auth: bool,
    }

    #[async_trait]
    impl CompletionBackend for RecordingBackend {
        async fn complete(&self, system: &str, user: &str) -> CompletionResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            if self.fail_with_auth {
                Err(CompletionError::Unauthorized(
                    "Incorrect API key provided: sk-bad".into(),
                ))
            } else {
                Ok(format!("advice for: {user}"))
            }
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    fn gateway(backend: Arc<RecordingBackend>) -> Gateway {
        let instruction = compose(SYSTEM_TEMPLATE, &ReferenceContext::new("known faults"));
        Gateway::new(instruction, backend)
    }

    #[tokio::test]
    async fn relays_trimmed_query_with_system_instruction() {
        let backend = Arc::new(RecordingBackend::default());
        let gateway = gateway(backend.clone());
        let message = "2015 Sonata, rattling noise from front wheel at low speed";

        let body = serde_json::json!({ "message": format!("  {message}\n") }).to_string();
        let (status, response) = gateway.handle(body.as_bytes()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response, AskResponse::Reply(format!("advice for: {message}")));

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, gateway.instruction().as_str());
        assert_eq!(calls[0].1, message);
    }

    #[tokio::test]
    async fn empty_and_whitespace_queries_never_reach_upstream() {
        let backend = Arc::new(RecordingBackend::default());
        let gateway = gateway(backend.clone());

        for body in [
            r#"{"message": ""}"#,
            r#"{"message": "   \n\t "}"#,
            r#"{}"#,
            r#"{"message": 42}"#,
            r#"["message"]"#,
            "not json",
            "",
        ] {
            let (status, response) = gateway.handle(body.as_bytes()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
            assert_eq!(response, AskResponse::Error(EMPTY_QUERY_MESSAGE.to_string()));
        }

        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_becomes_warning_reply() {
        let backend = Arc::new(RecordingBackend {
            fail_with_auth: true,
            ..Default::default()
        });
        let gateway = gateway(backend.clone());

        let (status, response) = gateway.ask("brake pedal feels soft").await;

        assert_eq!(status, StatusCode::OK);
        match response {
            AskResponse::Reply(text) => {
                assert!(text.starts_with(crate::ai::WARNING_MARKER));
                assert!(text.contains("Incorrect API key provided"));
            }
            other => panic!("expected reply, got {other:?}"),
        }
        assert_eq!(backend.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn identical_queries_are_independent() {
        let backend = Arc::new(RecordingBackend::default());
        let gateway = gateway(backend.clone());

        let first = gateway.ask("engine light is on").await;
        let second = gateway.ask("engine light is on").await;

        assert_eq!(first, second);
        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[test]
    fn response_serializes_to_single_field() {
        assert_eq!(
            serde_json::to_value(AskResponse::Reply("ok".into())).unwrap(),
            serde_json::json!({"reply": "ok"})
        );
        assert_eq!(
            serde_json::to_value(AskResponse::Error("empty".into())).unwrap(),
            serde_json::json!({"error": "empty"})
        );
    }
}
