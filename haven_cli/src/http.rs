//! HTTPS transport for the chat assistant.

use haven_core::chat::{parse_completion, ChatBackend, ChatError, ChatRequest};
use reqwest::blocking::Client;

/// Posts chat-completions requests to a fixed endpoint
pub struct HttpBackend {
    client: Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

fn transport_error(e: reqwest::Error) -> ChatError {
    if e.is_timeout() {
        ChatError::Timeout
    } else {
        ChatError::Network(e.to_string())
    }
}

impl ChatBackend for HttpBackend {
    fn complete(&mut self, api_key: &str, request: &ChatRequest) -> Result<String, ChatError> {
        tracing::debug!("Posting chat request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .timeout(request.timeout)
            .json(request)
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        tracing::debug!("Chat response status: {}", status);
        let body = response.text().map_err(transport_error)?;

        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_completion(&body)
    }
}
