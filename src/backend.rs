//! Text Generation Backend
//!
//! The orchestrator depends only on [`TextBackend`]: a prompt goes in, raw text comes
//! out, and any failure is a [`BackendError`]. Concrete HTTP clients for OpenAI,
//! Anthropic and Ollama live here, plus an offline echo backend for dry runs.

use crate::error::BackendError;
use crate::types::GenerationOptions;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// Text generation backend trait
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Turn a prompt into raw text
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, BackendError>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Backend selection, as read from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    OpenAI {
        model: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default)]
        base_url: Option<String>, // For compatible endpoints (e.g., Azure OpenAI, vLLM)
    },
    Anthropic {
        model: String,
        #[serde(default)]
        api_key: Option<String>,
    },
    Ollama {
        model: String,
        #[serde(default)]
        base_url: Option<String>, // Default: http://localhost:11434
    },
    Echo,
}

impl BackendConfig {
    pub fn model(&self) -> Option<&str> {
        match self {
            BackendConfig::OpenAI { model, .. }
            | BackendConfig::Anthropic { model, .. }
            | BackendConfig::Ollama { model, .. } => Some(model),
            BackendConfig::Echo => None,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::OpenAI {
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            base_url: None,
        }
    }
}

// OpenAI-compatible API request/response structures
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

// Helper function to map transport errors to BackendError
fn map_http_error(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Request(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        BackendError::Request(format!("Connection error: {}", error))
    } else {
        BackendError::Client(format!("HTTP error: {}", error))
    }
}

fn map_status(status: reqwest::StatusCode, body: String) -> BackendError {
    match status.as_u16() {
        401 | 403 => BackendError::AuthFailed(format!("status {}: {}", status, body)),
        404 => BackendError::ModelNotFound(format!("status {}: {}", status, body)),
        429 => BackendError::RateLimited(format!("status {}: {}", status, body)),
        _ => BackendError::Request(format!("status {}: {}", status, body)),
    }
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(map_status(status, body))
}

const BACKEND_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const BACKEND_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

fn build_http_client() -> Result<Client, BackendError> {
    Client::builder()
        .connect_timeout(BACKEND_HTTP_CONNECT_TIMEOUT)
        .timeout(BACKEND_HTTP_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| BackendError::Client(format!("Failed to create HTTP client: {}", e)))
}

async fn post_chat_completion(
    client: &Client,
    url: &str,
    api_key: Option<&str>,
    model: &str,
    prompt: &str,
    options: &GenerationOptions,
) -> Result<String, BackendError> {
    let request = ChatCompletionRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        temperature: options.temperature,
        max_tokens: options.max_tokens,
        stream: false,
    };

    let mut builder = client
        .post(url)
        .header("Content-Type", "application/json")
        .json(&request);
    if let Some(key) = api_key {
        builder = builder.header("Authorization", format!("Bearer {}", key));
    }

    let response = builder.send().await.map_err(map_http_error)?;
    let response = error_for_status(response).await?;

    let completion: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| BackendError::InvalidResponse("No choices in response".to_string()))
}

/// OpenAI (or OpenAI-compatible) chat completions backend
pub struct OpenAIBackend {
    client: Client,
    model: String,
    api_key: String,
    base_url: String,
}

impl OpenAIBackend {
    pub fn new(
        model: String,
        api_key: String,
        base_url: Option<String>,
    ) -> Result<Self, BackendError> {
        let client = build_http_client()?;
        let base_url = base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string());

        Ok(Self {
            client,
            model,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TextBackend for OpenAIBackend {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        let url = format!("{}/chat/completions", self.base_url);
        post_chat_completion(
            &self.client,
            &url,
            Some(&self.api_key),
            &self.model,
            prompt,
            options,
        )
        .await
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Anthropic messages API backend
pub struct AnthropicBackend {
    client: Client,
    model: String,
    api_key: String,
}

impl AnthropicBackend {
    const MESSAGES_URL: &'static str = "https://api.anthropic.com/v1/messages";

    pub fn new(model: String, api_key: String) -> Result<Self, BackendError> {
        let client = build_http_client()?;
        Ok(Self {
            client,
            model,
            api_key,
        })
    }
}

#[async_trait]
impl TextBackend for AnthropicBackend {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        let mut request_body = json!({
            "model": self.model,
            "max_tokens": options.max_tokens.unwrap_or(1024),
            "messages": [{"role": "user", "content": prompt}],
        });
        if let Some(temp) = options.temperature {
            // Anthropic caps temperature at 1.0
            request_body["temperature"] = json!(temp.min(1.0));
        }

        let response = self
            .client
            .post(Self::MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(map_http_error)?;
        let response = error_for_status(response).await?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text: String = body["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|block| block["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(BackendError::InvalidResponse(
                "No text content in response".to_string(),
            ));
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Ollama backend (local models, OpenAI-compatible endpoint)
pub struct OllamaBackend {
    client: Client,
    model: String,
    base_url: String,
}

impl OllamaBackend {
    pub fn new(model: String, base_url: Option<String>) -> Result<Self, BackendError> {
        let base_url = base_url.unwrap_or_else(|| "http://localhost:11434".to_string());
        let client = build_http_client()?;

        Ok(Self {
            client,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TextBackend for OllamaBackend {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        post_chat_completion(&self.client, &url, None, &self.model, prompt, options).await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Returns the prompt unchanged. Useful for inspecting prompts without network access.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoBackend;

#[async_trait]
impl TextBackend for EchoBackend {
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        Ok(prompt.to_string())
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Backend factory for creating clients from configuration
pub struct BackendFactory;

impl BackendFactory {
    pub fn create(config: &BackendConfig) -> Result<Box<dyn TextBackend>, BackendError> {
        match config {
            BackendConfig::OpenAI {
                model,
                api_key,
                base_url,
            } => {
                let api_key = resolve_api_key(api_key.as_deref(), "OPENAI_API_KEY")?;
                Ok(Box::new(OpenAIBackend::new(
                    model.clone(),
                    api_key,
                    base_url.clone(),
                )?))
            }
            BackendConfig::Anthropic { model, api_key } => {
                let api_key = resolve_api_key(api_key.as_deref(), "ANTHROPIC_API_KEY")?;
                Ok(Box::new(AnthropicBackend::new(model.clone(), api_key)?))
            }
            BackendConfig::Ollama { model, base_url } => Ok(Box::new(OllamaBackend::new(
                model.clone(),
                base_url.clone(),
            )?)),
            BackendConfig::Echo => Ok(Box::new(EchoBackend)),
        }
    }
}

fn resolve_api_key(configured: Option<&str>, env_var: &str) -> Result<String, BackendError> {
    match configured {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => std::env::var(env_var).map_err(|_| {
            BackendError::AuthFailed(format!(
                "No API key configured and {} is not set",
                env_var
            ))
        }),
    }
}
