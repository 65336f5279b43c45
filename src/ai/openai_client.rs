// External dependencies
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use url::Url;

// Internal dependencies
use crate::ai::response::{first_choice_text, ChatMessage, ChatRequest, ChatResponse};
use crate::ai::CompletionBackend;
use crate::config::Settings;
use crate::error::{CompletionError, CompletionResult};

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiClient {
    client: Client,
    base_url: Url,
    model_name: String,
    api_key: Option<String>,
}

// ============================================================================
// Client Implementation
// ============================================================================

impl OpenAiClient {
    /// Creates a client from the upstream section of the settings
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::from_parts(
            &settings.upstream.base_url,
            &settings.upstream.model,
            settings.upstream.api_key.clone(),
        )
    }

    pub fn from_parts(base_url: &str, model: &str, api_key: Option<String>) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends with '/'
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("Invalid completion service URL: {base_url}"))?;

        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Ok(Self {
            client: Client::new(),
            base_url,
            model_name: model.to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, path: &str) -> CompletionResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CompletionError::Transport(format!("failed to build {path} URL: {e}")))
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Verifies that the completion service is reachable and accepts the key
    pub async fn verify_connection(&self) -> Result<()> {
        debug!("Verifying completion service connection");

        let url = self.endpoint("models")?;
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .context("Failed to connect to completion service")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::from_status(status.as_u16(), body).into());
        }

        info!("Completion service connection verified");
        Ok(())
    }
}

// ============================================================================
// Completion
// ============================================================================

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> CompletionResult<String> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingApiKey)?;
        let url = self.endpoint("chat/completions")?;

        let request = ChatRequest {
            model: &self.model_name,
            messages: [ChatMessage::system(system), ChatMessage::user(user)],
        };

        debug!(
            "Sending completion request to {}, system length: {}, user length: {}",
            url,
            system.len(),
            user.len()
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::from_status(status.as_u16(), body));
        }

        let parsed: ChatResponse = response.json().await?;
        let text = first_choice_text(parsed)?;

        debug!("Completion response length: {}", text.len());
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model_name
    }
}
