use draftfix_core::RepairServiceError;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-6";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Connection and request settings for [`MessagesClient`](crate::MessagesClient).
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    /// Sent as a cached system block on every call.
    pub system_prompt: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: system_prompt.into(),
            request_timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

// The key never reaches logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("system_prompt_len", &self.system_prompt.len())
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// How many times a call is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following failed attempt `attempt` (0-based), or `None`
    /// when the error is final.
    ///
    /// Rate limits back off exponentially; `jitter` is added on top and should lie in
    /// `0..=base_backoff`. Other retryable failures wait the base delay.
    pub fn delay_after(
        &self,
        attempt: u32,
        err: &RepairServiceError,
        jitter: Duration,
    ) -> Option<Duration> {
        if attempt + 1 >= self.max_attempts || !err.is_retryable() {
            return None;
        }
        match err {
            RepairServiceError::RateLimited { .. } => {
                let factor = 2u32.saturating_pow(attempt);
                Some(self.base_backoff.saturating_mul(factor) + jitter)
            }
            _ => Some(self.base_backoff),
        }
    }
}
