use romatype_core::judge::JudgeResult;
use romatype_core::stats::KanaInput;
use serde::Serialize;

/// One practice item: what is shown and the kana it is read as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phrase {
    pub display: String,
    pub reading: String,
}

impl Phrase {
    pub fn new(display: impl Into<String>, reading: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            reading: reading.into(),
        }
    }
}

/// Raw input as delivered by the caller. Timestamps are microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown {
        ch: char,
        key_code: u32,
        timestamp_us: u64,
    },
    KeyUp {
        key_code: u32,
        timestamp_us: u64,
    },
    Backspace {
        timestamp_us: u64,
    },
}

impl InputEvent {
    pub fn timestamp_us(&self) -> u64 {
        match *self {
            InputEvent::KeyDown { timestamp_us, .. }
            | InputEvent::KeyUp { timestamp_us, .. }
            | InputEvent::Backspace { timestamp_us } => timestamp_us,
        }
    }
}

/// Result of a single `handle_key` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyResponse {
    /// Set for key-down events that reached the judge.
    pub judgement: Option<JudgeResult>,
    /// Kana units this keystroke finished.
    pub completed_kana: Vec<KanaInput>,
    pub phrase_completed: bool,
    pub session_completed: bool,
}

impl KeyResponse {
    pub(crate) fn ignored() -> Self {
        Self::default()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no phrase has a typeable reading")]
    NoPhrases,
}
