use tracing::{debug, debug_span};

use super::trie::RomajiTrie;
use crate::settings::settings;

const SOKUON: &str = "っ";
const HATSUON: &str = "ん";

/// Classification of a romaji buffer against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertResult {
    /// A unit resolved. `consumed` is the romaji it took, `remaining` the rest.
    Matched {
        kana: String,
        consumed: String,
        remaining: String,
    },
    /// The buffer is a strict prefix of some key; wait for more input.
    Partial { remaining: String },
    NoMatch,
}

impl ConvertResult {
    fn matched(kana: &str, buffer: &str, len: usize) -> Self {
        ConvertResult::Matched {
            kana: kana.to_string(),
            consumed: buffer[..len].to_string(),
            remaining: buffer[len..].to_string(),
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, ConvertResult::Matched { .. })
    }
}

/// Output of [`RomajiTrie::convert_greedy`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GreedyConversion {
    pub kana: String,
    /// Romaji left over at the first `Partial` or `NoMatch`.
    pub remaining: String,
}

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'i' | b'u' | b'e' | b'o')
}

fn is_geminate_consonant(b: u8) -> bool {
    settings().romaji.geminate_consonants.as_bytes().contains(&b)
}

impl RomajiTrie {
    /// Classify `buffer` as one conversion step.
    ///
    /// Order of checks:
    /// 1. `n` + a letter that is not a vowel, `y` or `n` → ん (before any
    ///    table lookup, so "nk" never waits on a longer key).
    /// 2. Longest table key that prefixes the buffer.
    /// 3. `Partial` if a key strictly extends the buffer.
    /// 4. Doubled geminate consonant → っ, consuming one letter.
    pub fn convert(&self, buffer: &str) -> ConvertResult {
        let bytes = buffer.as_bytes();
        if bytes.is_empty() {
            return ConvertResult::NoMatch;
        }

        if bytes.len() >= 2
            && bytes[0] == b'n'
            && !is_vowel(bytes[1])
            && bytes[1] != b'y'
            && bytes[1] != b'n'
        {
            return ConvertResult::matched(HATSUON, buffer, 1);
        }

        let probe = self.probe(buffer);
        if let Some((len, kana)) = probe.longest {
            return ConvertResult::matched(kana, buffer, len);
        }

        if probe.extendable {
            return ConvertResult::Partial {
                remaining: buffer.to_string(),
            };
        }

        if bytes.len() >= 2 && bytes[0] == bytes[1] && is_geminate_consonant(bytes[0]) {
            return ConvertResult::matched(SOKUON, buffer, 1);
        }

        ConvertResult::NoMatch
    }

    /// Convert as much of `buffer` as possible, left to right.
    pub fn convert_greedy(&self, buffer: &str) -> GreedyConversion {
        let _span = debug_span!("convert_greedy", len = buffer.len()).entered();
        let mut out = GreedyConversion::default();
        let mut current = buffer.to_string();

        while !current.is_empty() {
            match self.convert(&current) {
                ConvertResult::Matched {
                    kana, remaining, ..
                } => {
                    out.kana.push_str(&kana);
                    current = remaining;
                }
                ConvertResult::Partial { .. } | ConvertResult::NoMatch => break,
            }
        }

        if !current.is_empty() {
            debug!(remaining = %current, "greedy conversion stopped early");
        }
        out.remaining = current;
        out
    }

    /// True if `romaji` is exactly a table key.
    pub fn can_convert(&self, romaji: &str) -> bool {
        self.contains(romaji)
    }
}

/// [`RomajiTrie::convert`] against the global table.
pub fn convert(buffer: &str) -> ConvertResult {
    RomajiTrie::global().convert(buffer)
}

/// [`RomajiTrie::convert_greedy`] against the global table.
pub fn convert_greedy(buffer: &str) -> GreedyConversion {
    RomajiTrie::global().convert_greedy(buffer)
}

pub fn can_convert(romaji: &str) -> bool {
    RomajiTrie::global().can_convert(romaji)
}

pub fn table_size() -> usize {
    RomajiTrie::global().len()
}
