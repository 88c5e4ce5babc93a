use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Substituted for `detail` when a failure response carries none.
pub const GENERIC_SERVER_DETAIL: &str = "Error connecting to server.";

#[derive(Serialize)]
struct ChatRequest {
    message: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    // The reply is trusted as-is; a missing field reads as empty
    #[serde(default)]
    reply: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {detail}")]
    Server { status: StatusCode, detail: String },
    #[error("malformed response body: {0}")]
    Malformed(#[source] serde_json::Error),
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint_url: String,
}

impl ChatClient {
    pub fn new(endpoint_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint_url: endpoint_url.to_string(),
        }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Sends one message to the chat endpoint and returns the assistant reply.
    ///
    /// Exactly one request per call, no retry, no timeout beyond the
    /// transport default.
    pub async fn send(&self, message: &str) -> Result<String, ChatError> {
        let request = ChatRequest {
            message: message.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|e| e.detail)
                .unwrap_or_else(|| GENERIC_SERVER_DETAIL.to_string());
            return Err(ChatError::Server { status, detail });
        }

        let body = response.text().await?;
        let chat_response: ChatResponse =
            serde_json::from_str(&body).map_err(ChatError::Malformed)?;
        Ok(chat_response.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn send_returns_reply_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"message": "Hello"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"reply": "Hi there!"})),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new(&format!("{}/chat", server.uri()));
        let reply = client.send("Hello").await.unwrap();
        assert_eq!(reply, "Hi there!");
    }

    #[tokio::test]
    async fn missing_reply_field_reads_as_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = ChatClient::new(&format!("{}/chat", server.uri()));
        let reply = client.send("Hello").await.unwrap();
        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn server_failure_carries_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"detail": "overloaded"})),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new(&format!("{}/chat", server.uri()));
        let err = client.send("Hello").await.unwrap_err();
        match err {
            ChatError::Server { status, ref detail } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(detail, "overloaded");
            }
            ref other => panic!("expected server error, got {other:?}"),
        }
        // The detail surfaces in the log line, never in the chat panel
        assert!(err.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn server_failure_without_detail_uses_generic_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = ChatClient::new(&format!("{}/chat", server.uri()));
        match client.send("test").await.unwrap_err() {
            ChatError::Server { detail, .. } => assert_eq!(detail, GENERIC_SERVER_DETAIL),
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_failure_body_uses_generic_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = ChatClient::new(&format!("{}/chat", server.uri()));
        match client.send("test").await.unwrap_err() {
            ChatError::Server { detail, .. } => assert_eq!(detail, GENERIC_SERVER_DETAIL),
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_success_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ChatClient::new(&format!("{}/chat", server.uri()));
        let err = client.send("test").await.unwrap_err();
        assert!(matches!(err, ChatError::Malformed(_)));
    }

    #[tokio::test]
    async fn connection_refused_is_transport() {
        let server = MockServer::start().await;
        let url = format!("{}/chat", server.uri());
        drop(server);

        let client = ChatClient::new(&url);
        let err = client.send("test").await.unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)));
    }
}
