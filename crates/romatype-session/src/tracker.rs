//! Follows accepted keystrokes through the forward converter to timestamp
//! each kana unit as it is completed.

use romatype_core::romaji::{convert, ConvertResult};
use romatype_core::stats::KanaInput;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct KanaTracker {
    buffer: String,
    /// Key-down timestamp for each char in `buffer`.
    stamps: Vec<u64>,
}

impl KanaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one accepted keystroke; returns every kana unit it completed.
    pub fn push(&mut self, ch: char, timestamp_us: u64) -> Vec<KanaInput> {
        self.buffer.push(ch.to_ascii_lowercase());
        self.stamps.push(timestamp_us);

        let mut completed = Vec::new();
        while !self.buffer.is_empty() {
            match convert(&self.buffer) {
                ConvertResult::Matched {
                    kana,
                    consumed,
                    remaining,
                } => {
                    let n = consumed.chars().count();
                    completed.push(KanaInput {
                        kana,
                        romaji: consumed,
                        start_us: self.stamps[0],
                        end_us: timestamp_us,
                    });
                    self.buffer = remaining;
                    self.stamps.drain(..n);
                }
                ConvertResult::Partial { .. } => break,
                ConvertResult::NoMatch => {
                    let dropped = self.buffer.remove(0);
                    self.stamps.remove(0);
                    debug!(ch = %dropped, "dropping unconvertible romaji");
                }
            }
        }
        completed
    }

    /// Romaji typed but not yet resolved to kana.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.stamps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(t: &mut KanaTracker, keys: &str) -> Vec<KanaInput> {
        keys.chars()
            .enumerate()
            .flat_map(|(i, c)| t.push(c, (i as u64 + 1) * 100))
            .collect()
    }

    fn kana(inputs: &[KanaInput]) -> Vec<&str> {
        inputs.iter().map(|k| k.kana.as_str()).collect()
    }

    #[test]
    fn single_unit_spans_its_keys() {
        let mut t = KanaTracker::new();
        assert!(t.push('s', 100).is_empty());
        assert!(t.push('h', 200).is_empty());
        let done = t.push('i', 300);
        assert_eq!(
            done,
            [KanaInput {
                kana: "し".into(),
                romaji: "shi".into(),
                start_us: 100,
                end_us: 300,
            }]
        );
        assert_eq!(t.pending(), "");
    }

    #[test]
    fn nasal_resolved_by_next_consonant() {
        let mut t = KanaTracker::new();
        let done = feed(&mut t, "sanpo");
        assert_eq!(kana(&done), ["さ", "ん", "ぽ"]);
        // ん ends when p arrives
        assert_eq!(done[1].start_us, 300);
        assert_eq!(done[1].end_us, 400);
    }

    #[test]
    fn geminate_leaves_consonant_pending() {
        let mut t = KanaTracker::new();
        let done = feed(&mut t, "gakk");
        assert_eq!(kana(&done), ["が", "っ"]);
        assert_eq!(t.pending(), "k");
        let done = t.push('o', 500);
        assert_eq!(kana(&done), ["こ"]);
        assert_eq!(done[0].start_us, 400);
    }

    #[test]
    fn unconvertible_prefix_dropped() {
        let mut t = KanaTracker::new();
        let done = feed(&mut t, "tcha");
        assert_eq!(kana(&done), ["ちゃ"]);
        assert_eq!(done[0].start_us, 200);
    }

    #[test]
    fn hyphen_is_dropped() {
        let mut t = KanaTracker::new();
        let done = feed(&mut t, "ra-");
        assert_eq!(kana(&done), ["ら"]);
        assert_eq!(t.pending(), "");
    }

    #[test]
    fn uppercase_folded() {
        let mut t = KanaTracker::new();
        let done = feed(&mut t, "KA");
        assert_eq!(kana(&done), ["か"]);
        assert_eq!(done[0].romaji, "ka");
    }

    #[test]
    fn reset_clears_pending() {
        let mut t = KanaTracker::new();
        feed(&mut t, "ky");
        assert_eq!(t.pending(), "ky");
        t.reset();
        assert_eq!(t.pending(), "");
    }
}
