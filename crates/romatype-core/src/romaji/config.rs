use std::collections::BTreeMap;

use serde::Deserialize;

/// Longest romaji key accepted in the forward table.
pub const MAX_ROMAJI_KEY_LEN: usize = 4;

/// Longest kana unit (in codepoints) on either side of a table.
pub const MAX_KANA_UNIT_CHARS: usize = 2;

#[derive(Deserialize)]
struct MappingConfig {
    mappings: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TableConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("[mappings] table is empty")]
    Empty,
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },
    #[error("invalid value for key {key:?}: {reason}")]
    InvalidValue { key: String, reason: &'static str },
    #[error("table already initialized")]
    AlreadyInitialized,
}

fn parse_mappings(toml_str: &str) -> Result<BTreeMap<String, String>, TableConfigError> {
    let config: MappingConfig =
        toml::from_str(toml_str).map_err(|e| TableConfigError::Parse(e.to_string()))?;
    if config.mappings.is_empty() {
        return Err(TableConfigError::Empty);
    }
    Ok(config.mappings)
}

fn is_kana_unit(s: &str) -> bool {
    let n = s.chars().count();
    (1..=MAX_KANA_UNIT_CHARS).contains(&n)
}

/// Parse forward-table TOML into a sorted `BTreeMap<romaji, kana>`.
///
/// Keys must be 1-4 lowercase ASCII letters; values must be 1-2 codepoints.
pub fn parse_romaji_toml(toml_str: &str) -> Result<BTreeMap<String, String>, TableConfigError> {
    let mappings = parse_mappings(toml_str)?;

    for (key, value) in &mappings {
        if key.is_empty() || key.len() > MAX_ROMAJI_KEY_LEN {
            return Err(TableConfigError::InvalidKey {
                key: key.clone(),
                reason: "must be 1-4 letters long",
            });
        }
        if !key.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(TableConfigError::InvalidKey {
                key: key.clone(),
                reason: "must be lowercase ASCII letters",
            });
        }
        if !is_kana_unit(value) {
            return Err(TableConfigError::InvalidValue {
                key: key.clone(),
                reason: "must be 1-2 characters",
            });
        }
    }

    Ok(mappings)
}

/// Parse reverse-table TOML into a sorted `BTreeMap<kana, romaji>`.
///
/// Keys must be 1-2 codepoints; values must be non-empty lowercase ASCII
/// letters or `-`.
pub fn parse_kana_toml(toml_str: &str) -> Result<BTreeMap<String, String>, TableConfigError> {
    let mappings = parse_mappings(toml_str)?;

    for (key, value) in &mappings {
        if !is_kana_unit(key) {
            return Err(TableConfigError::InvalidKey {
                key: key.clone(),
                reason: "must be 1-2 characters",
            });
        }
        if value.is_empty() {
            return Err(TableConfigError::InvalidValue {
                key: key.clone(),
                reason: "must not be empty",
            });
        }
        if !value.bytes().all(|b| b.is_ascii_lowercase() || b == b'-') {
            return Err(TableConfigError::InvalidValue {
                key: key.clone(),
                reason: "must be lowercase ASCII letters or '-'",
            });
        }
    }

    Ok(mappings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_toml() {
        let toml = r#"
[mappings]
a = "あ"
ka = "か"
"#;
        let map = parse_romaji_toml(toml).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], "あ");
        assert_eq!(map["ka"], "か");
    }

    #[test]
    fn parse_default_toml() {
        let map = parse_romaji_toml(super::super::table::DEFAULT_TOML).unwrap();
        assert!(map.len() > 150, "expected 150+ mappings, got {}", map.len());
    }

    #[test]
    fn parse_default_kana_toml() {
        let map = parse_kana_toml(crate::kana::DEFAULT_KANA_TOML).unwrap();
        assert_eq!(map["し"], "shi");
        assert_eq!(map["ん"], "nn");
        assert!(!map.contains_key("っ"));
    }

    #[test]
    fn error_empty_mappings() {
        let toml = "[mappings]\n";
        let err = parse_romaji_toml(toml).unwrap_err();
        assert!(matches!(err, TableConfigError::Empty));
    }

    #[test]
    fn error_non_ascii_key() {
        let toml = "
[mappings]
\"あ\" = \"a\"
";
        let err = parse_romaji_toml(toml).unwrap_err();
        assert!(matches!(err, TableConfigError::InvalidKey { .. }));
    }

    #[test]
    fn error_key_too_long() {
        let toml = r#"
[mappings]
xxtsu = "っ"
"#;
        let err = parse_romaji_toml(toml).unwrap_err();
        assert!(err.to_string().contains("xxtsu"));
    }

    #[test]
    fn error_uppercase_key() {
        let toml = r#"
[mappings]
Ka = "か"
"#;
        let err = parse_romaji_toml(toml).unwrap_err();
        assert!(matches!(err, TableConfigError::InvalidKey { .. }));
    }

    #[test]
    fn error_empty_value() {
        let toml = r#"
[mappings]
a = ""
"#;
        let err = parse_romaji_toml(toml).unwrap_err();
        assert!(matches!(err, TableConfigError::InvalidValue { .. }));
    }

    #[test]
    fn error_value_too_long() {
        let toml = r#"
[mappings]
kyou = "きょう"
"#;
        let err = parse_romaji_toml(toml).unwrap_err();
        assert!(matches!(err, TableConfigError::InvalidValue { .. }));
    }

    #[test]
    fn error_kana_value_not_ascii() {
        let toml = r#"
[mappings]
"か" = "か"
"#;
        let err = parse_kana_toml(toml).unwrap_err();
        assert!(matches!(err, TableConfigError::InvalidValue { .. }));
    }

    #[test]
    fn error_kana_key_too_long() {
        let toml = r#"
[mappings]
"きょう" = "kyou"
"#;
        let err = parse_kana_toml(toml).unwrap_err();
        assert!(matches!(err, TableConfigError::InvalidKey { .. }));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_romaji_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, TableConfigError::Parse(_)));
    }
}
