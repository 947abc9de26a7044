//! Throttled generator calls

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::throttle::{Throttle, ThrottleGuard};
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message, StopReason};

/// Default cap on tokens per completion
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Why a generate call produced no text
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Transport or service failure; never retried here
    #[error("Upstream generator failed: {0}")]
    Upstream(#[from] LlmError),

    /// Non-blocking mode only: the interval has not elapsed yet
    #[error("Generator throttled, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },
}

impl GenerateError {
    /// How long to wait before asking again, from the throttle or the provider
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GenerateError::RateLimited { retry_after } => Some(*retry_after),
            GenerateError::Upstream(e) => e.retry_after(),
        }
    }
}

/// Sends directives to the generator no faster than the throttle allows
pub struct RateLimitedGenerator {
    client: Arc<dyn LlmClient>,
    throttle: Arc<Throttle>,
    system_prompt: String,
    max_tokens: u32,
    json_mode: bool,
}

impl RateLimitedGenerator {
    pub fn new(client: Arc<dyn LlmClient>, throttle: Arc<Throttle>) -> Self {
        debug!(min_interval = ?throttle.min_interval(), "RateLimitedGenerator::new: called");
        Self {
            client,
            throttle,
            system_prompt: String::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
            json_mode: false,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Ask the provider for a JSON object response
    pub fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }

    pub fn throttle(&self) -> &Arc<Throttle> {
        &self.throttle
    }

    /// Generate text for `directive`, waiting out the throttle if needed
    pub async fn generate(&self, directive: &str) -> Result<String, GenerateError> {
        debug!(directive_len = directive.len(), "RateLimitedGenerator::generate: called");
        let permit = self.throttle.acquire().await;
        self.call(permit, directive).await
    }

    /// Generate text for `directive`, failing fast when throttled
    pub async fn try_generate(&self, directive: &str) -> Result<String, GenerateError> {
        debug!(directive_len = directive.len(), "RateLimitedGenerator::try_generate: called");
        let permit = self
            .throttle
            .try_acquire()
            .map_err(|retry_after| GenerateError::RateLimited { retry_after })?;
        self.call(permit, directive).await
    }

    async fn call(&self, permit: ThrottleGuard<'_>, directive: &str) -> Result<String, GenerateError> {
        let request = CompletionRequest {
            system_prompt: self.system_prompt.clone(),
            messages: vec![Message::user(directive)],
            max_tokens: self.max_tokens,
            json_mode: self.json_mode,
        };

        let response = self.client.complete(request).await.inspect_err(|e| {
            debug!(error = %e, "RateLimitedGenerator::call: upstream error");
        })?;

        let content = response
            .content
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("Generator returned an empty completion".to_string()))?;

        permit.mark();

        match response.stop_reason {
            StopReason::MaxTokens => warn!(
                max_tokens = self.max_tokens,
                "Completion hit the token limit, output is probably truncated"
            ),
            StopReason::ContentFilter => warn!("Completion was cut by the provider's content filter"),
            StopReason::EndTurn => {}
        }
        info!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Generator call complete"
        );

        Ok(content)
    }
}
