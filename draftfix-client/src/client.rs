use crate::config::{ANTHROPIC_VERSION, ClientConfig, RetryPolicy};
use crate::wire::{ErrorEnvelope, Message, MessagesRequest, MessagesResponse, SystemBlock};
use async_trait::async_trait;
use draftfix_core::RepairServiceError;
use draftfix_core::ports::RepairRequester;
use draftfix_types::{Artifact, Platform};
use rand::Rng;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Longest slice of an error body carried into an error message.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// User prompt for a first draft.
pub fn generation_prompt(pillar: &str, platform: Platform) -> String {
    format!(
        "Write a {platform} post for the '{pillar}' content pillar. \
         Target length: {} words. \
         Use only verified facts from the profile. No fabrication.",
        platform.word_target()
    )
}

/// Messages-API client with retry and backoff.
///
/// Cheap to share by reference across concurrent runs; the inner HTTP client pools
/// connections.
#[derive(Debug)]
pub struct MessagesClient {
    http: Client,
    endpoint: String,
    config: ClientConfig,
    retry: RetryPolicy,
}

impl MessagesClient {
    /// # Errors
    ///
    /// [`RepairServiceError::Configuration`] when the key is blank, the retry policy allows
    /// no attempts, or the HTTP client cannot be built.
    pub fn new(config: ClientConfig, retry: RetryPolicy) -> Result<Self, RepairServiceError> {
        if config.api_key.trim().is_empty() {
            return Err(RepairServiceError::Configuration {
                message: "API key is empty".to_string(),
            });
        }
        if retry.max_attempts == 0 {
            return Err(RepairServiceError::Configuration {
                message: "retry.max_attempts must be at least 1".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key).map_err(|_| {
            RepairServiceError::Configuration {
                message: "API key is not a valid header value".to_string(),
            }
        })?;
        headers.insert("x-api-key", key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| RepairServiceError::Configuration {
                message: err.to_string(),
            })?;

        let endpoint = format!("{}/v1/messages", config.base_url.trim_end_matches('/'));
        Ok(Self {
            http,
            endpoint,
            config,
            retry,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Generate a first draft for `pillar` on `platform`.
    pub async fn generate(
        &self,
        pillar: &str,
        platform: Platform,
    ) -> Result<String, RepairServiceError> {
        self.complete(&generation_prompt(pillar, platform)).await
    }

    /// Send `prompt` as a single user message and return the reply text, retrying
    /// per the configured [`RetryPolicy`].
    pub async fn complete(&self, prompt: &str) -> Result<String, RepairServiceError> {
        let mut attempt = 0;
        loop {
            let err = match self.send_once(prompt).await {
                Ok(text) => return Ok(text),
                Err(err) => err,
            };

            let Some(delay) = self.retry.delay_after(attempt, &err, self.jitter()) else {
                if attempt > 0 {
                    warn!(attempts = attempt + 1, error = %err, "giving up after retries");
                }
                return Err(err);
            };
            warn!(
                attempt = attempt + 1,
                max_attempts = self.retry.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "request failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    fn jitter(&self) -> Duration {
        let max = self.retry.base_backoff.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max))
    }

    async fn send_once(&self, prompt: &str) -> Result<String, RepairServiceError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: vec![SystemBlock::cached(&self.config.system_prompt)],
            messages: vec![Message::user(prompt)],
        };

        debug!(endpoint = %self.endpoint, model = %self.config.model, "sending messages request");
        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| RepairServiceError::Transport {
                message: err.to_string(),
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| RepairServiceError::Transport {
                message: err.to_string(),
            })?;

        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        let parsed: MessagesResponse =
            serde_json::from_str(&text).map_err(|err| RepairServiceError::MalformedResponse {
                message: err.to_string(),
            })?;
        parsed
            .first_text()
            .ok_or_else(|| RepairServiceError::MalformedResponse {
                message: "first content block has no text".to_string(),
            })
    }
}

fn status_error(status: StatusCode, body: &str) -> RepairServiceError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if envelope.error.kind.is_empty() => envelope.error.message,
        Ok(envelope) => format!("{}: {}", envelope.error.kind, envelope.error.message),
        Err(_) => body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    };
    if status == StatusCode::TOO_MANY_REQUESTS {
        RepairServiceError::RateLimited { message }
    } else {
        RepairServiceError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl RepairRequester for MessagesClient {
    async fn repair(
        &self,
        instruction: &str,
        current: &Artifact,
    ) -> Result<Artifact, RepairServiceError> {
        let text = self.complete(instruction).await?;
        Ok(current.with_content(text))
    }
}
