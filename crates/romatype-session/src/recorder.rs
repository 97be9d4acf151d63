//! Raw input event log with inter-key timing.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordedKind {
    KeyDown,
    KeyUp,
    Backspace,
    /// Emitted after a backspace that followed a rejected keystroke.
    Correction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedEvent {
    pub kind: RecordedKind,
    pub timestamp_us: u64,
    pub key_code: u32,
    pub ch: Option<char>,
    pub is_correct: bool,
    /// Key-down: time since the previous key-up. Correction: time spent correcting.
    pub inter_key_us: u64,
}

#[derive(Debug, Clone, Default)]
pub struct InputRecorder {
    events: Vec<RecordedEvent>,
    session_start_us: Option<u64>,
    last_key_up_us: Option<u64>,
    recording: bool,
}

impl InputRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear previous data and start recording.
    pub fn start_session(&mut self, timestamp_us: u64) {
        self.clear();
        self.session_start_us = Some(timestamp_us);
        self.last_key_up_us = Some(timestamp_us);
        self.recording = true;
    }

    pub fn end_session(&mut self) {
        self.recording = false;
    }

    pub fn record_key_down(&mut self, timestamp_us: u64, key_code: u32, ch: char) {
        if !self.recording {
            return;
        }
        let inter_key_us = self
            .last_key_up_us
            .map_or(0, |up| timestamp_us.saturating_sub(up));
        self.push(RecordedKind::KeyDown, timestamp_us, key_code, Some(ch), inter_key_us);
    }

    pub fn record_key_up(&mut self, timestamp_us: u64, key_code: u32) {
        if !self.recording {
            return;
        }
        self.push(RecordedKind::KeyUp, timestamp_us, key_code, None, 0);
        self.last_key_up_us = Some(timestamp_us);
    }

    pub fn record_backspace(&mut self, timestamp_us: u64) {
        if !self.recording {
            return;
        }
        self.push(
            RecordedKind::Backspace,
            timestamp_us,
            romatype_core::stats::BACKSPACE_KEY_CODE,
            None,
            0,
        );
    }

    pub fn record_correction(&mut self, timestamp_us: u64, correction_us: u64) {
        if !self.recording {
            return;
        }
        self.push(RecordedKind::Correction, timestamp_us, 0, None, correction_us);
    }

    /// Mark the most recent event as correct or not.
    pub fn set_last_correctness(&mut self, is_correct: bool) {
        if let Some(last) = self.events.last_mut() {
            last.is_correct = is_correct;
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Time from session start to `now_us`, or 0 if never started.
    pub fn session_duration_us(&self, now_us: u64) -> u64 {
        self.session_start_us
            .map_or(0, |start| now_us.saturating_sub(start))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn push(
        &mut self,
        kind: RecordedKind,
        timestamp_us: u64,
        key_code: u32,
        ch: Option<char>,
        inter_key_us: u64,
    ) {
        self.events.push(RecordedEvent {
            kind,
            timestamp_us,
            key_code,
            ch,
            is_correct: false,
            inter_key_us,
        });
    }
}
