use crate::{Result, VeraError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Configuration for the answer backend
#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// Origin the backend listens on
    pub base_url: String,

    /// Per-request timeout. A request that neither resolves nor fails within
    /// this window is treated as a connection failure, so the UI always
    /// settles back into an actionable state.
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl BackendConfig {
    /// Full URL of the ask endpoint
    pub fn ask_url(&self) -> String {
        format!("{}/ask", self.base_url.trim_end_matches('/'))
    }
}

/// Request body for `POST /ask`
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    pub message: String,
}

/// Expected success response from `POST /ask`
#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    pub reply: String,
}

/// Issue one request to the backend and return the reply text.
///
/// Transport failures and non-success statuses are folded into a single
/// error class; the caller does not distinguish by status code.
pub async fn ask(client: &reqwest::Client, config: &BackendConfig, message: String) -> Result<String> {
    debug!("Sending message to backend ({} chars)", message.len());

    let response = client
        .post(config.ask_url())
        .json(&AskRequest { message })
        .send()
        .await
        .map_err(|e| VeraError::BackendError(format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(VeraError::BackendError(format!(
            "backend returned status {status}"
        )));
    }

    let body: AskResponse = response
        .json()
        .await
        .map_err(|e| VeraError::BackendError(format!("invalid response body: {e}")))?;

    Ok(body.reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_ask_url_join() {
        let config = BackendConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.ask_url(), "http://localhost:5000/ask");
    }

    #[test]
    fn test_request_wire_format() {
        let body = serde_json::to_value(AskRequest {
            message: "hello".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"message": "hello"}));
    }

    #[test]
    fn test_response_wire_format() {
        let response: AskResponse =
            serde_json::from_str(r#"{"reply": "Hi there!"}"#).unwrap();
        assert_eq!(response.reply, "Hi there!");
    }

    #[test]
    fn test_response_missing_reply_is_error() {
        let result: std::result::Result<AskResponse, _> =
            serde_json::from_str(r#"{"answer": "nope"}"#);
        assert!(result.is_err());
    }
}
