//! Process-wide compositor settings.
//!
//! The embedded `default_settings.toml` is used unless a host installs its
//! own document with `init_custom` before anything calls `settings()`.

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::mapping::MAX_SEQUENCE_LEN;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static OVERRIDE_TOML: OnceLock<String> = OnceLock::new();
static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Install a custom settings document. Fails if it does not validate or if
/// one was installed already.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    OVERRIDE_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Settings in effect, parsed on first use.
pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| {
        let source = OVERRIDE_TOML
            .get()
            .map_or(DEFAULT_SETTINGS_TOML, String::as_str);
        // Custom documents are checked in init_custom; the default by build.rs.
        parse_settings_toml(source).expect("settings TOML must be valid")
    })
}

pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub composition: CompositionSettings,
    pub input: InputSettings,
    pub focus: FocusSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompositionSettings {
    /// Raw keys one buffer may hold before it is committed.
    pub max_sequence_len: usize,
}

/// Modifiers whose keystrokes skip composition.
#[derive(Debug, Clone, Deserialize)]
pub struct InputSettings {
    pub bypass_alt: bool,
    pub bypass_ctrl: bool,
    pub bypass_meta: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FocusSettings {
    pub refocus_on_enter: bool,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let parsed: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    check_range(
        "composition.max_sequence_len",
        parsed.composition.max_sequence_len,
        1..=MAX_SEQUENCE_LEN,
    )?;
    Ok(parsed)
}

fn check_range(
    field: &str,
    value: usize,
    range: RangeInclusive<usize>,
) -> Result<(), SettingsError> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(SettingsError::InvalidValue {
        field: field.to_string(),
        reason: format!("must be in {}..={}, got {value}", range.start(), range.end()),
    })
}
