//! Configuration file loading for draftfix.
//!
//! Discovers and loads `draftfix.toml` from the working root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use draftfix_client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, RetryPolicy};
use draftfix_domain::{DEFAULT_MIN_CHARS, RuleConfig};
use draftfix_types::Platform;
use fs_err as fs;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "draftfix.toml";

/// System prompt used when `client.system_prompt_path` is not set.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You write and edit professional social posts for a \
single author. Use only facts present in the author's profile. Never invent anecdotes, \
quotes, mentees, or personal history. Keep the tone direct and respectful, and write in the \
requested locale.";

/// Top-level configuration from draftfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DraftfixConfig {
    pub client: ClientSection,
    pub retry: RetrySection,
    pub rules: RulesSection,
}

/// `[client]`: the text-generation endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientSection {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub base_url: Option<String>,

    /// Relative paths resolve against the directory holding draftfix.toml.
    pub system_prompt_path: Option<Utf8PathBuf>,

    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

/// `[retry]`: per-request retry policy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySection {
    pub max_attempts: Option<u32>,
    pub base_backoff_ms: Option<u64>,
}

/// `[rules]`: built-in rule knobs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesSection {
    pub min_chars: Option<usize>,
    pub extra_fabrication_markers: Vec<String>,
    pub disabled: Vec<String>,
}

/// Discover the draftfix.toml config file.
///
/// Returns `None` if no config file is found in `root`.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a draftfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<DraftfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<DraftfixConfig> {
    let config: DraftfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `root`, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<DraftfixConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(DraftfixConfig::default()),
    }
}

/// Values supplied on the command line. `None` and empty lists leave the file value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub platform: Option<Platform>,
    pub min_chars: Option<usize>,
    pub disabled: Vec<String>,
    pub markers: Vec<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_attempts: Option<u32>,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub rules: RuleConfig,
    pub model: String,
    pub max_tokens: u32,
    pub base_url: String,
    pub system_prompt_path: Option<Utf8PathBuf>,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub retry: RetryPolicy,
}

impl MergedConfig {
    /// Rule settings for `platform`, keeping everything else.
    pub fn rules_for(&self, platform: Option<Platform>) -> RuleConfig {
        RuleConfig {
            platform,
            ..self.rules.clone()
        }
    }

    pub fn client_config(&self, api_key: String, system_prompt: String) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            api_key,
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system_prompt,
            request_timeout: self.request_timeout,
            connect_timeout: self.connect_timeout,
        }
    }

    /// Read the configured system prompt, or fall back to [`DEFAULT_SYSTEM_PROMPT`].
    pub fn load_system_prompt(&self) -> anyhow::Result<String> {
        match &self.system_prompt_path {
            Some(path) => {
                fs::read_to_string(path).with_context(|| format!("read system prompt {}", path))
            }
            None => Ok(DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: DraftfixConfig,
    root: Utf8PathBuf,
}

impl ConfigMerger {
    /// `root` is where the config was looked up; relative paths in it resolve there.
    pub fn new(config: DraftfixConfig, root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
        }
    }

    /// Scalars from the CLI replace file values; CLI lists extend file lists.
    pub fn merge(self, cli: &CliOverrides) -> MergedConfig {
        let DraftfixConfig {
            client,
            retry,
            rules,
        } = self.config;

        let mut disabled = rules.disabled;
        for id in &cli.disabled {
            if !disabled.contains(id) {
                disabled.push(id.clone());
            }
        }
        let mut markers = rules.extra_fabrication_markers;
        for marker in &cli.markers {
            if !markers.contains(marker) {
                markers.push(marker.clone());
            }
        }

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_attempts: cli
                .max_attempts
                .or(retry.max_attempts)
                .unwrap_or(defaults.max_attempts),
            base_backoff: retry
                .base_backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.base_backoff),
        };

        let system_prompt_path = client.system_prompt_path.map(|p| {
            if p.is_absolute() {
                p
            } else {
                self.root.join(p)
            }
        });

        MergedConfig {
            rules: RuleConfig {
                platform: cli.platform,
                min_chars: cli
                    .min_chars
                    .or(rules.min_chars)
                    .unwrap_or(DEFAULT_MIN_CHARS),
                extra_fabrication_markers: markers,
                disabled,
            },
            model: cli
                .model
                .clone()
                .or(client.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: client.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            base_url: cli
                .base_url
                .clone()
                .or(client.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            system_prompt_path,
            request_timeout: Duration::from_secs(client.request_timeout_secs.unwrap_or(120)),
            connect_timeout: Duration::from_secs(client.connect_timeout_secs.unwrap_or(10)),
            retry,
        }
    }
}
