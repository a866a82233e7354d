//! Reading artifacts from disk.

use anyhow::Context;
use camino::Utf8Path;
use draftfix_types::{Artifact, ArtifactId, Locale};
use fs_err as fs;
use tracing::debug;

/// Load an artifact from `path`.
///
/// A file whose first non-blank character is `{` must be an artifact JSON document.
/// Anything else is taken as plain text and wrapped in a new artifact with a generated
/// id and `locale` (or the default locale).
pub fn load_artifact(path: &Utf8Path, locale: Option<&Locale>) -> anyhow::Result<Artifact> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path))?;
    parse_artifact(&raw, locale).with_context(|| format!("load artifact {}", path))
}

pub fn parse_artifact(raw: &str, locale: Option<&Locale>) -> anyhow::Result<Artifact> {
    if raw.trim_start().starts_with('{') {
        let artifact: Artifact = serde_json::from_str(raw).context("parse artifact JSON")?;
        if let Some(locale) = locale
            && locale != artifact.locale()
        {
            debug!(
                artifact_id = %artifact.id(),
                "--locale ignored for JSON artifact with locale {}",
                artifact.locale()
            );
        }
        return Ok(artifact);
    }

    let id = ArtifactId::generate();
    debug!(artifact_id = %id, "wrapping plain text input");
    Ok(Artifact::new(
        id,
        raw.trim_end(),
        locale.cloned().unwrap_or_default(),
    ))
}

/// File-name-safe form of an artifact id.
pub fn file_stem(id: &ArtifactId) -> String {
    let stem: String = id
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "artifact".to_string()
    } else {
        stem
    }
}
