//! Romaji-to-kana conversion engine.
//!
//! A prefix trie over the forward table classifies an accumulating ASCII
//! buffer as matched, partial or unmatched, with the ん and っ special cases
//! layered on top of longest-match lookup.

mod config;
mod convert;
pub(crate) mod table;
mod trie;

pub use config::{
    parse_kana_toml, parse_romaji_toml, TableConfigError, MAX_KANA_UNIT_CHARS,
    MAX_ROMAJI_KEY_LEN,
};
pub use convert::{
    can_convert, convert, convert_greedy, table_size, ConvertResult, GreedyConversion,
};
pub use trie::{Probe, RomajiTrie, TrieLookupResult};
