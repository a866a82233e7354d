use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for one logical content unit.
///
/// The id survives repair rounds: a repaired artifact is a new value but the same
/// logical story, so [`Artifact::with_content`] carries the id forward.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id for content that arrives without one.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Language/region tag selecting which locale rules apply (e.g. `en-US`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub const DEFAULT: &'static str = "en-US";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A generated content item under validation.
///
/// Fields are private so an artifact can only change by producing a new value:
/// `content` is replaced wholesale through [`Artifact::with_content`], while `id`
/// and `locale` stay fixed for the lifetime of a repair run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    id: ArtifactId,
    content: String,
    #[serde(default)]
    locale: Locale,
    /// Number of repairs that produced this snapshot (0 for caller-supplied content).
    #[serde(default)]
    revision: u32,
}

impl Artifact {
    pub fn new(id: ArtifactId, content: impl Into<String>, locale: Locale) -> Self {
        Self {
            id,
            content: content.into(),
            locale,
            revision: 0,
        }
    }

    pub fn id(&self) -> &ArtifactId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Next snapshot of the same logical artifact with its body replaced.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            id: self.id.clone(),
            content: content.into(),
            locale: self.locale.clone(),
            revision: self.revision.saturating_add(1),
        }
    }
}
