use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::MAX_SEQUENCE_LEN;

/// A mapping table as written in TOML.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MappingConfig {
    pub profile: ProfileHeader,
    #[serde(default)]
    pub mappings: BTreeMap<String, GlyphPair>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileHeader {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Lower- and optional upper-case output for one key sequence.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlyphPair {
    pub lower: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum MappingConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("[profile] code is empty")]
    EmptyCode,
    #[error("empty key in [mappings]")]
    EmptyKey,
    #[error("key must be lower-case: {0}")]
    UppercaseKey(String),
    #[error("key {key:?} is longer than {max} characters")]
    SequenceTooLong { key: String, max: usize },
    #[error("glyph for key {key:?} must be exactly one character, got {glyph:?}")]
    MultiCharGlyph { key: String, glyph: String },
}

/// Parse and validate a mapping table TOML document.
pub fn parse_mapping_toml(toml_str: &str) -> Result<MappingConfig, MappingConfigError> {
    let config: MappingConfig =
        toml::from_str(toml_str).map_err(|e| MappingConfigError::Parse(e.to_string()))?;

    if config.profile.code.trim().is_empty() {
        return Err(MappingConfigError::EmptyCode);
    }

    for (key, glyphs) in &config.mappings {
        if key.is_empty() {
            return Err(MappingConfigError::EmptyKey);
        }
        if key.chars().any(|c| crate::unicode::fold_key(c) != c) {
            return Err(MappingConfigError::UppercaseKey(key.clone()));
        }
        if key.chars().count() > MAX_SEQUENCE_LEN {
            return Err(MappingConfigError::SequenceTooLong {
                key: key.clone(),
                max: MAX_SEQUENCE_LEN,
            });
        }
        for glyph in std::iter::once(&glyphs.lower).chain(glyphs.upper.as_ref()) {
            if glyph.chars().count() != 1 {
                return Err(MappingConfigError::MultiCharGlyph {
                    key: key.clone(),
                    glyph: glyph.clone(),
                });
            }
        }
    }

    Ok(config)
}

/// First character of a validated glyph string.
pub(super) fn glyph_char(s: &str) -> char {
    s.chars().next().unwrap_or_default()
}
