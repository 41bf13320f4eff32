use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Completion service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Completion service rate limit reached: {0}")]
    RateLimited(String),

    #[error("Model not available: {0}")]
    InvalidModel(String),

    #[error("Unexpected completion output: {0}")]
    MalformedCompletion(String),
}

/// Text completion capability. One attempt per call; failures are returned as is.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete_text(
        &self,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    pub display_name: Option<String>,
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// Model id without the `models/` prefix, usable in a generate call.
    pub fn id(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }

    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(?timeout, error = %e, "could not build HTTP client, timeout not applied");
                Client::new()
            });
        self
    }

    /// Same credentials and endpoint, different model. Used when probing model ids.
    pub fn with_model(&self, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..self.clone()
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, CompletionError> {
        let url = format!("{}/models", self.base_url);
        let res = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("pageSize", "1000")])
            .send()
            .await
            .map_err(|e| CompletionError::UpstreamUnavailable(e.to_string()))?;
        let v = read_json(res).await?;

        let models = v["models"]
            .as_array()
            .map(|items| items.iter().filter_map(model_info).collect())
            .unwrap_or_default();
        Ok(models)
    }
}

#[async_trait]
impl CompletionService for GeminiClient {
    async fn complete_text(
        &self,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, CompletionError> {
        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });
        if format == ResponseFormat::Json {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        tracing::debug!(model = %self.model, prompt_chars = prompt.chars().count(), "calling Gemini");
        let res = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(model = %self.model, error = %e, "Gemini request failed");
                CompletionError::UpstreamUnavailable(e.to_string())
            })?;
        let v = read_json(res).await?;
        extract_text(&v)
    }
}

async fn read_json(res: reqwest::Response) -> Result<Value, CompletionError> {
    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        let message = upstream_message(status, &text);
        tracing::warn!(%status, %message, "Gemini returned an error");
        return Err(match status {
            StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited(message),
            StatusCode::NOT_FOUND => CompletionError::InvalidModel(message),
            _ => CompletionError::UpstreamUnavailable(message),
        });
    }
    res.json()
        .await
        .map_err(|e| CompletionError::MalformedCompletion(format!("invalid JSON body: {e}")))
}

/// Prefer Gemini's `error.message`; fall back to the raw body.
fn upstream_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    if detail.is_empty() {
        status.to_string()
    } else {
        format!("{status} - {detail}")
    }
}

fn extract_text(v: &Value) -> Result<String, CompletionError> {
    if let Some(reason) = v["promptFeedback"]["blockReason"].as_str() {
        return Err(CompletionError::MalformedCompletion(format!(
            "prompt blocked: {reason}"
        )));
    }
    let parts = v["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| CompletionError::MalformedCompletion("no candidates in response".into()))?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        return Err(CompletionError::MalformedCompletion("empty completion".into()));
    }
    Ok(text)
}

fn model_info(v: &Value) -> Option<ModelInfo> {
    Some(ModelInfo {
        name: v["name"].as_str()?.to_string(),
        display_name: v["displayName"].as_str().map(str::to_string),
        supported_generation_methods: v["supportedGenerationMethods"]
            .as_array()
            .map(|m| m.iter().filter_map(|s| s.as_str().map(str::to_string)).collect())
            .unwrap_or_default(),
    })
}
