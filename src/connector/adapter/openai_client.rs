use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::{
    ApiKey, CompletionError, CompletionRequest, CompletionResponse, TokenLimitParam,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Chat Completions request payload. Exactly one of the two limit fields is set.
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> ApiRequest<'a> {
    fn from_request(request: &'a CompletionRequest) -> Self {
        let limit = request.max_output_tokens();
        let (max_tokens, max_completion_tokens) = match request.token_limit_param() {
            TokenLimitParam::MaxTokens => (Some(limit), None),
            TokenLimitParam::MaxCompletionTokens => (None, Some(limit)),
        };

        Self {
            model: request.model(),
            messages: request
                .messages()
                .iter()
                .map(|turn| ApiMessage {
                    role: turn.role().as_str(),
                    content: turn.content(),
                })
                .collect(),
            temperature: request.temperature(),
            max_tokens,
            max_completion_tokens,
        }
    }
}

/// Minimal subset of the Chat Completions response we care about.
#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    model: String,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// HTTP client for the OpenAI Chat Completions API and compatible servers.
///
/// One request per call, no retries, and no timeout beyond reqwest's default.
/// Point `base_url` at any compatible endpoint (a proxy, a local server).
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: ApiKey,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
}

impl OpenAiClient {
    pub fn new(api_key: ApiKey, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH);
        Self {
            client: reqwest::Client::new(),
            api_key,
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn parse_response(body: &str) -> Result<CompletionResponse, CompletionError> {
        let parsed: ApiResponse = serde_json::from_str(body)
            .map_err(|e| CompletionError::malformed(format!("failed to parse response: {e}")))?;

        let choices = parsed
            .choices
            .into_iter()
            .map(|c| c.message.content.unwrap_or_default())
            .collect();

        Ok(CompletionResponse::new(choices, parsed.model))
    }

    fn classify_status(status: u16, body: &str) -> CompletionError {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            401 | 403 => CompletionError::Authentication(message),
            429 => CompletionError::RateLimited(message),
            _ => CompletionError::Api { status, message },
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let payload = ApiRequest::from_request(request);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.api_key.expose())
            .json(&payload)
            .send()
            .await
            .map_err(|e| CompletionError::network(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::network(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            warn!("OpenAiClient: API returned {status}: {body}");
            return Err(Self::classify_status(status.as_u16(), &body));
        }

        let parsed = Self::parse_response(&body)?;
        debug!(
            "OpenAiClient: {} choice(s) from {}",
            parsed.choices().len(),
            parsed.model()
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelProfile, Turn};

    fn request_for(profile: &ModelProfile) -> CompletionRequest {
        CompletionRequest::new(profile, vec![Turn::system("sys"), Turn::user("hi")])
    }

    #[test]
    fn serializes_max_tokens_for_chat_models() {
        let profile = ModelProfile::new("gpt-4o-mini", 500).with_temperature(0.7);
        let request = request_for(&profile);

        let json = serde_json::to_value(ApiRequest::from_request(&request)).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 500);
        assert!(json.get("max_completion_tokens").is_none());
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn serializes_completion_limit_for_reasoning_models() {
        let profile = ModelProfile::new("gpt-5-mini", 2000);
        let request = request_for(&profile);

        let json = serde_json::to_value(ApiRequest::from_request(&request)).unwrap();

        assert_eq!(json["max_completion_tokens"], 2000);
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn parse_response_reads_choices_and_model() {
        let body = r#"{
            "id": "chatcmpl-1",
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello"}}]
        }"#;

        let parsed = OpenAiClient::parse_response(body).unwrap();

        assert_eq!(parsed.model(), "gpt-4o-mini-2024-07-18");
        assert_eq!(parsed.first_choice(), Some("Hello"));
    }

    #[test]
    fn parse_response_tolerates_null_content_and_no_choices() {
        let null_content = r#"{"model": "m", "choices": [{"message": {"content": null}}]}"#;
        assert_eq!(
            OpenAiClient::parse_response(null_content).unwrap().first_choice(),
            Some("")
        );

        let no_choices = r#"{"model": "m", "choices": []}"#;
        assert!(OpenAiClient::parse_response(no_choices)
            .unwrap()
            .choices()
            .is_empty());
    }

    #[test]
    fn parse_response_rejects_garbage() {
        let err = OpenAiClient::parse_response("<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
    }

    #[test]
    fn classify_status_maps_auth_and_rate_limits() {
        let body = r#"{"error": {"message": "Incorrect API key provided"}}"#;
        assert_eq!(
            OpenAiClient::classify_status(401, body),
            CompletionError::Authentication("Incorrect API key provided".into())
        );
        assert_eq!(OpenAiClient::classify_status(429, "slow").kind(), "rate_limited");
        assert_eq!(
            OpenAiClient::classify_status(500, "oops"),
            CompletionError::Api {
                status: 500,
                message: "oops".into()
            }
        );
    }

    #[test]
    fn url_joins_base_and_path() {
        let client = OpenAiClient::new(ApiKey::new("k").unwrap(), "http://localhost:8080/");
        assert_eq!(client.url(), "http://localhost:8080/v1/chat/completions");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        // Port 9 (discard) is essentially never listening on loopback.
        let client = OpenAiClient::new(ApiKey::new("k").unwrap(), "http://127.0.0.1:9");
        let profile = ModelProfile::new("fast", 10);

        let err = client.complete(&request_for(&profile)).await.unwrap_err();

        assert_eq!(err.kind(), "network");
    }
}
