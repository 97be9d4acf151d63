mod stats;

use super::{InputEvent, KeyResponse, Phrase, TypingSession};

pub(super) fn phrases(items: &[(&str, &str)]) -> Vec<Phrase> {
    items.iter().map(|(d, r)| Phrase::new(*d, *r)).collect()
}

/// Started session over `items`, clock at 0.
pub(super) fn started(items: &[(&str, &str)]) -> TypingSession {
    let mut s = TypingSession::new(phrases(items)).unwrap();
    s.start(0);
    s
}

pub(super) fn key_down(ch: char, timestamp_us: u64) -> InputEvent {
    InputEvent::KeyDown {
        ch,
        key_code: ch as u32,
        timestamp_us,
    }
}

pub(super) fn key_up(ch: char, timestamp_us: u64) -> InputEvent {
    InputEvent::KeyUp {
        key_code: ch as u32,
        timestamp_us,
    }
}

/// Type `keys` as down/up pairs, 100ms apart with 30ms holds, starting at `t0`.
/// Returns the key-down responses and the clock after the last key.
pub(super) fn type_keys(s: &mut TypingSession, keys: &str, t0: u64) -> (Vec<KeyResponse>, u64) {
    let mut t = t0;
    let mut out = Vec::new();
    for ch in keys.chars() {
        t += 100_000;
        out.push(s.handle_key(key_down(ch, t)));
        s.handle_key(key_up(ch, t + 30_000));
    }
    (out, t)
}
