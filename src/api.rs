use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{ApiConfig, ProviderKind};
use crate::error::AnalysisError;

// Framing the user text the same way for every provider
const ARTICLE_PREFIX: &str = "ARTICLE TEXT:\n\n";
const JSON_MIME_TYPE: &str = "application/json";

/// One outbound generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub api_key: &'a str,
    pub system_instruction: &'a str,
    pub user_content: &'a str,
}

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Sends exactly one request and returns the generated text as-is.
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, AnalysisError>;
}

// Gemini generateContent wire format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub system_instruction: GeminiContent,
    pub contents: Vec<GeminiContent>,
    pub generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    pub response_mime_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    pub block_reason: Option<String>,
}

// OpenRouter chat-completions wire format
#[derive(Debug, Serialize)]
pub struct OpenRouterRequest {
    pub model: String,
    pub messages: Vec<RequestMessage>,
    pub response_format: ResponseFormat,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct RequestMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct OpenRouterResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Message,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub content: Option<String>,
}

// Both providers report failures as {"error": {"message": ...}}
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn build_http_client(timeout_seconds: Option<u64>) -> Result<Client, AnalysisError> {
    let mut builder = ClientBuilder::new();
    if let Some(seconds) = timeout_seconds {
        builder = builder.timeout(Duration::from_secs(seconds));
    }
    builder
        .build()
        .map_err(|e| AnalysisError::UnknownError(format!("failed to build HTTP client: {e}")))
}

// Turns a provider response into its body text or a ProviderError
async fn read_body(response: Response) -> Result<String, AnalysisError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(body);
    }

    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);
    Err(AnalysisError::provider(Some(status.as_u16()), message))
}

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(client: Client, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        GeminiProvider {
            client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, AnalysisError> {
        let body = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: request.system_instruction.to_string(),
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: format!("{ARTICLE_PREFIX}{}", request.user_content),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: JSON_MIME_TYPE.to_string(),
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", request.api_key)
            .json(&body)
            .send()
            .await?;
        let text = read_body(response).await?;

        let parsed: GeminiResponse = serde_json::from_str(&text)
            .map_err(|e| AnalysisError::UnknownError(format!("unreadable Gemini response: {e}")))?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_ref())
        {
            return Err(AnalysisError::provider(None, format!("prompt blocked: {reason}")));
        }

        let generated: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if generated.is_empty() {
            return Err(AnalysisError::UnknownError(
                "Gemini returned no generated text".to_string(),
            ));
        }
        Ok(generated)
    }
}

pub struct OpenRouterProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OpenRouterProvider {
    pub fn new(client: Client, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        OpenRouterProvider {
            client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl GenerationProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, AnalysisError> {
        let body = OpenRouterRequest {
            model: self.model.clone(),
            messages: vec![
                RequestMessage {
                    role: "system".to_string(),
                    content: request.system_instruction.to_string(),
                },
                RequestMessage {
                    role: "user".to_string(),
                    content: format!("{ARTICLE_PREFIX}{}", request.user_content),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
            temperature: 0.1,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", request.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;
        let text = read_body(response).await?;

        let parsed: OpenRouterResponse = serde_json::from_str(&text).map_err(|e| {
            AnalysisError::UnknownError(format!("unreadable OpenRouter response: {e}"))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                AnalysisError::UnknownError("OpenRouter returned no generated text".to_string())
            })
    }
}

/// Single-attempt analysis call in front of a [`GenerationProvider`].
pub struct ApiClient {
    provider: Box<dyn GenerationProvider>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, AnalysisError> {
        let client = build_http_client(config.request_timeout_seconds)?;
        let provider: Box<dyn GenerationProvider> = match config.provider {
            ProviderKind::Gemini => Box::new(GeminiProvider::new(
                client,
                config.base_url(),
                config.model(),
            )),
            ProviderKind::OpenRouter => Box::new(OpenRouterProvider::new(
                client,
                config.base_url(),
                config.model(),
            )),
        };

        Ok(ApiClient { provider })
    }

    pub fn with_provider(provider: Box<dyn GenerationProvider>) -> Self {
        ApiClient { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Sends `prompt` and `user_text` to the provider once and returns the raw
    /// reply. Credential and input checks happen before any network call.
    pub async fn analyze(
        &self,
        api_key: &str,
        prompt: &str,
        user_text: &str,
    ) -> Result<String, AnalysisError> {
        if api_key.trim().is_empty() {
            return Err(AnalysisError::MissingCredential);
        }
        if user_text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        tracing::debug!(
            provider = self.provider.name(),
            prompt_chars = prompt.chars().count(),
            text_chars = user_text.chars().count(),
            "sending analysis request"
        );

        let request = GenerationRequest {
            api_key: api_key.trim(),
            system_instruction: prompt,
            user_content: user_text,
        };

        match self.provider.generate(&request).await {
            Ok(raw) => {
                tracing::debug!(response_chars = raw.chars().count(), "provider responded");
                Ok(raw)
            }
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "analysis request failed");
                Err(e)
            }
        }
    }
}
