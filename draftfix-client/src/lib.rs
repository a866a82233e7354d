//! Production [`RepairRequester`](draftfix_core::ports::RepairRequester) for draftfix.
//!
//! [`MessagesClient`] talks to a Messages-style text-generation endpoint. Retries,
//! rate-limit backoff and the prompt-caching flag live here so the repair loop never
//! sees them.

mod client;
mod config;
mod wire;

pub use client::{MessagesClient, generation_prompt};
pub use config::{
    ANTHROPIC_VERSION, ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    RetryPolicy,
};
