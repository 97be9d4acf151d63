//! Global settings loaded from TOML, following the same OnceLock pattern as the
//! transliteration tables.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
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
    pub judge: JudgeSettings,
    pub romaji: RomajiSettings,
    pub stats: StatsSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JudgeSettings {
    pub flexible_input: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RomajiSettings {
    pub geminate_consonants: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsSettings {
    pub chars_per_word: usize,
    #[serde(default)]
    pub important_kana: Vec<String>,
    #[serde(default)]
    pub categories: Vec<KanaCategory>,
}

/// A named group of kana, e.g. a gojūon row.
#[derive(Debug, Clone, Deserialize)]
pub struct KanaCategory {
    pub name: String,
    pub kana: Vec<String>,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn invalid(field: impl Into<String>, reason: &str) -> SettingsError {
    SettingsError::InvalidValue {
        field: field.into(),
        reason: reason.to_string(),
    }
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    let geminate = &s.romaji.geminate_consonants;
    if !geminate.bytes().all(|b| b.is_ascii_lowercase()) {
        return Err(invalid(
            "romaji.geminate_consonants",
            "must be lowercase ASCII letters",
        ));
    }
    if geminate.bytes().any(|b| matches!(b, b'a' | b'i' | b'u' | b'e' | b'o')) {
        return Err(invalid(
            "romaji.geminate_consonants",
            "must not contain vowels",
        ));
    }

    if s.stats.chars_per_word == 0 {
        return Err(invalid("stats.chars_per_word", "must be positive"));
    }
    if s.stats.important_kana.iter().any(|k| k.is_empty()) {
        return Err(invalid("stats.important_kana", "entries must not be empty"));
    }

    let mut names = HashSet::new();
    for (i, cat) in s.stats.categories.iter().enumerate() {
        if cat.name.is_empty() {
            return Err(invalid(
                format!("stats.categories[{i}].name"),
                "must not be empty",
            ));
        }
        if !names.insert(cat.name.as_str()) {
            return Err(invalid(
                format!("stats.categories[{i}].name"),
                "duplicate category name",
            ));
        }
        if cat.kana.is_empty() {
            return Err(invalid(
                format!("stats.categories[{i}].kana"),
                "must not be empty",
            ));
        }
    }

    Ok(())
}
