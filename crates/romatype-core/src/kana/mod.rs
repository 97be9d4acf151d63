//! Kana-to-romaji reverse transliteration.
//!
//! Turns authored kana (hiragana or katakana) into the single canonical
//! romaji spelling used as a judge target.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use tracing::{debug, debug_span};

use crate::romaji::{parse_kana_toml, TableConfigError, MAX_KANA_UNIT_CHARS};
use crate::unicode::{is_geminate_marker, katakana_to_hiragana};

pub const DEFAULT_KANA_TOML: &str = include_str!("default_kana.toml");

/// Spelling for っ when the next unit cannot be doubled.
const GEMINATE_PLACEHOLDER: &str = "xtu";

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Kana unit -> canonical romaji. Immutable once built.
pub struct KanaTable {
    map: HashMap<String, String>,
}

impl KanaTable {
    /// Set custom TOML before first `global()` call.
    pub fn init_custom(toml_content: String) -> Result<(), TableConfigError> {
        parse_kana_toml(&toml_content)?;
        CUSTOM_TOML
            .set(toml_content)
            .map_err(|_| TableConfigError::AlreadyInitialized)
    }

    /// Get or initialize the global singleton.
    pub fn global() -> &'static KanaTable {
        static INSTANCE: OnceLock<KanaTable> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let toml_str = CUSTOM_TOML
                .get()
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_KANA_TOML);
            let map = parse_kana_toml(toml_str).expect("kana TOML must be valid");
            KanaTable::from_mappings(map)
        })
    }

    pub fn from_mappings(map: BTreeMap<String, String>) -> Self {
        KanaTable {
            map: map.into_iter().collect(),
        }
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, TableConfigError> {
        Ok(Self::from_mappings(parse_kana_toml(toml_str)?))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Canonical spelling of one kana unit. Katakana is folded first.
    pub fn lookup(&self, unit: &str) -> Option<&str> {
        match self.map.get(unit) {
            Some(romaji) => Some(romaji.as_str()),
            None => self.map.get(&katakana_to_hiragana(unit)).map(|s| s.as_str()),
        }
    }

    /// Convert kana text to its canonical romaji.
    ///
    /// Two-codepoint units are tried before single codepoints. っ doubles the
    /// leading consonant of the next unit, or spells out as `xtu` when that
    /// unit is missing or starts with a vowel. Codepoints with no entry
    /// (kanji, most punctuation) are dropped.
    pub fn to_romaji(&self, text: &str) -> String {
        let _span = debug_span!("to_romaji", len = text.len()).entered();
        let chars: Vec<char> = katakana_to_hiragana(text).chars().collect();
        let mut out = String::with_capacity(chars.len() * 3);
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if is_geminate_marker(c) {
                out.push_str(&self.geminate_spelling(&chars[i + 1..]));
                i += 1;
                continue;
            }
            match self.longest_unit(&chars[i..]) {
                Some((len, romaji)) => {
                    out.push_str(romaji);
                    i += len;
                }
                None => {
                    debug!(ch = %c, "skipping character with no romaji");
                    i += 1;
                }
            }
        }

        out
    }

    /// Longest unit at the head of `chars`: `(codepoints consumed, romaji)`.
    fn longest_unit(&self, chars: &[char]) -> Option<(usize, &str)> {
        (1..=MAX_KANA_UNIT_CHARS.min(chars.len()))
            .rev()
            .find_map(|n| {
                let unit: String = chars[..n].iter().collect();
                self.map.get(&unit).map(|r| (n, r.as_str()))
            })
    }

    fn geminate_spelling(&self, rest: &[char]) -> String {
        if rest.first().is_some_and(|&c| is_geminate_marker(c)) {
            return GEMINATE_PLACEHOLDER.to_string();
        }
        let lead = self
            .longest_unit(rest)
            .and_then(|(_, romaji)| romaji.chars().next());
        match lead {
            Some(c) if c.is_ascii_lowercase() && !matches!(c, 'a' | 'i' | 'u' | 'e' | 'o') => {
                c.to_string()
            }
            _ => GEMINATE_PLACEHOLDER.to_string(),
        }
    }
}

/// [`KanaTable::to_romaji`] against the global table.
pub fn to_romaji(text: &str) -> String {
    KanaTable::global().to_romaji(text)
}
