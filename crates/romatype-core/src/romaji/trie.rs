use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use super::config::{parse_romaji_toml, TableConfigError};
use super::table::DEFAULT_TOML;

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

#[derive(Debug, PartialEq)]
pub enum TrieLookupResult {
    None,
    Prefix,
    Exact(String),
    ExactAndPrefix(String),
}

/// Result of walking a buffer down the trie in one pass.
#[derive(Debug, PartialEq)]
pub struct Probe<'a> {
    /// Deepest key that is a prefix of the buffer: `(byte length, kana)`.
    pub longest: Option<(usize, &'a str)>,
    /// Some key strictly extends the whole buffer.
    pub extendable: bool,
}

struct Node {
    children: HashMap<u8, Node>,
    kana: Option<String>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            kana: None,
        }
    }
}

/// Prefix trie over the romaji -> kana table. Immutable once built.
pub struct RomajiTrie {
    root: Node,
    len: usize,
}

impl RomajiTrie {
    /// Set custom TOML before first `global()` call.
    pub fn init_custom(toml_content: String) -> Result<(), TableConfigError> {
        // Validate eagerly
        parse_romaji_toml(&toml_content)?;
        CUSTOM_TOML
            .set(toml_content)
            .map_err(|_| TableConfigError::AlreadyInitialized)
    }

    /// Get or initialize the global singleton.
    pub fn global() -> &'static RomajiTrie {
        static INSTANCE: OnceLock<RomajiTrie> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let toml_str = CUSTOM_TOML
                .get()
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_TOML);
            let map = parse_romaji_toml(toml_str).expect("romaji TOML must be valid");
            RomajiTrie::from_mappings(&map)
        })
    }

    /// Build a standalone trie, e.g. for a converter with its own table.
    pub fn from_mappings(map: &BTreeMap<String, String>) -> Self {
        let mut trie = RomajiTrie {
            root: Node::new(),
            len: 0,
        };
        for (romaji, kana) in map {
            trie.insert(romaji, kana);
        }
        trie
    }

    /// Build a standalone trie from forward-table TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self, TableConfigError> {
        let map = parse_romaji_toml(toml_str)?;
        Ok(Self::from_mappings(&map))
    }

    /// Number of keys in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn lookup(&self, romaji: &str) -> TrieLookupResult {
        let Some(node) = self.find(romaji) else {
            return TrieLookupResult::None;
        };
        let has_children = !node.children.is_empty();
        match &node.kana {
            Some(kana) => {
                if has_children {
                    TrieLookupResult::ExactAndPrefix(kana.clone())
                } else {
                    TrieLookupResult::Exact(kana.clone())
                }
            }
            None => {
                if has_children {
                    TrieLookupResult::Prefix
                } else {
                    TrieLookupResult::None
                }
            }
        }
    }

    /// Exact key membership.
    pub fn contains(&self, romaji: &str) -> bool {
        self.find(romaji).is_some_and(|n| n.kana.is_some())
    }

    /// Walk `buffer` once, remembering the deepest terminal passed and
    /// whether the walk consumed the whole buffer with children left over.
    pub fn probe(&self, buffer: &str) -> Probe<'_> {
        let mut node = &self.root;
        let mut longest = None;
        for (depth, b) in buffer.bytes().enumerate() {
            match node.children.get(&b) {
                Some(child) => node = child,
                None => {
                    return Probe {
                        longest,
                        extendable: false,
                    }
                }
            }
            if let Some(kana) = &node.kana {
                longest = Some((depth + 1, kana.as_str()));
            }
        }
        Probe {
            longest,
            extendable: !buffer.is_empty() && !node.children.is_empty(),
        }
    }

    fn find(&self, romaji: &str) -> Option<&Node> {
        let mut node = &self.root;
        for b in romaji.bytes() {
            node = node.children.get(&b)?;
        }
        Some(node)
    }

    fn insert(&mut self, romaji: &str, kana: &str) {
        let mut node = &mut self.root;
        for b in romaji.bytes() {
            node = node.children.entry(b).or_insert_with(Node::new);
        }
        if node.kana.replace(kana.to_string()).is_none() {
            self.len += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vowel_exact() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("a"), TrieLookupResult::Exact("あ".into()));
    }

    #[test]
    fn test_prefix_k() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("k"), TrieLookupResult::Prefix);
    }

    #[test]
    fn test_prefix_n() {
        // bare "n" is never a key, only a prefix
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("n"), TrieLookupResult::Prefix);
    }

    #[test]
    fn test_youon_sha() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("sha"), TrieLookupResult::Exact("しゃ".into()));
        assert_eq!(trie.lookup("sya"), TrieLookupResult::Exact("しゃ".into()));
    }

    #[test]
    fn test_sh_prefix() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("sh"), TrieLookupResult::Prefix);
    }

    #[test]
    fn test_nn_exact() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("nn"), TrieLookupResult::Exact("ん".into()));
    }

    #[test]
    fn test_none_for_unknown() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("xyz"), TrieLookupResult::None);
        assert_eq!(trie.lookup("q"), TrieLookupResult::None);
    }

    #[test]
    fn test_exact_and_prefix_custom_table() {
        let mut map = BTreeMap::new();
        map.insert("n".to_string(), "ん".to_string());
        map.insert("na".to_string(), "な".to_string());
        let trie = RomajiTrie::from_mappings(&map);
        assert_eq!(trie.lookup("n"), TrieLookupResult::ExactAndPrefix("ん".into()));
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn test_probe_longest() {
        let trie = RomajiTrie::global();
        let p = trie.probe("kak");
        assert_eq!(p.longest, Some((2, "か")));
        assert!(!p.extendable);

        let p = trie.probe("sh");
        assert_eq!(p.longest, None);
        assert!(p.extendable);

        let p = trie.probe("shi");
        assert_eq!(p.longest, Some((3, "し")));
    }

    #[test]
    fn test_probe_empty_buffer() {
        let trie = RomajiTrie::global();
        assert_eq!(
            trie.probe(""),
            Probe {
                longest: None,
                extendable: false
            }
        );
    }

    #[test]
    fn test_contains() {
        let trie = RomajiTrie::global();
        assert!(trie.contains("tsu"));
        assert!(!trie.contains("ts"));
        assert!(!trie.contains("n"));
    }

    #[test]
    fn test_all_mappings_roundtrip() {
        let trie = RomajiTrie::global();
        let map = parse_romaji_toml(DEFAULT_TOML).unwrap();
        assert_eq!(trie.len(), map.len());
        for (romaji, kana) in &map {
            match trie.lookup(romaji) {
                TrieLookupResult::Exact(ref k) | TrieLookupResult::ExactAndPrefix(ref k) => {
                    assert_eq!(k, kana, "mapping mismatch for romaji={romaji}");
                }
                other => panic!(
                    "expected Exact/ExactAndPrefix for {romaji}, got {:?}",
                    other
                ),
            }
        }
    }

    #[test]
    fn test_no_key_is_prefix_of_another() {
        let map = parse_romaji_toml(DEFAULT_TOML).unwrap();
        let trie = RomajiTrie::global();
        for romaji in map.keys() {
            assert!(
                matches!(trie.lookup(romaji), TrieLookupResult::Exact(_)),
                "{romaji} shadows a longer key"
            );
        }
    }

    #[test]
    fn test_from_toml_rejects_invalid() {
        assert!(RomajiTrie::from_toml("[mappings]\n").is_err());
    }
}
