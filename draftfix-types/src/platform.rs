use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Publishing destination an artifact is written for.
///
/// draftfix never publishes; the platform only selects length limits for
/// validation and a word target for generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Linkedin,
    Medium,
    X,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Linkedin, Platform::Medium, Platform::X];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Medium => "medium",
            Platform::X => "x",
        }
    }

    /// Hard character cap enforced by the platform-length rule.
    pub fn max_chars(self) -> usize {
        match self {
            Platform::X => 280,
            Platform::Linkedin => 3000,
            Platform::Medium => 50_000,
        }
    }

    /// Soft length target passed to the generation prompt.
    pub fn word_target(self) -> u32 {
        match self {
            Platform::Linkedin => 750,
            Platform::Medium => 1500,
            Platform::X => 280,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform '{0}' (expected one of: linkedin, medium, x)")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linkedin" => Ok(Platform::Linkedin),
            "medium" => Ok(Platform::Medium),
            "x" | "twitter" => Ok(Platform::X),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}
