//! Stateful typing practice session.
//!
//! `TypingSession` walks a list of phrases and feeds each keystroke to two
//! independent engines: the judge decides whether it was right, and the
//! forward converter (through [`KanaTracker`]) timestamps completed kana for
//! the statistics report.

pub(crate) mod types;

mod recorder;
mod tracker;

#[cfg(test)]
mod tests;

use romatype_core::judge::{JudgeResult, JudgeTarget, TypingJudge};
use romatype_core::stats::{StatisticsReport, StatsCalculator};
use tracing::{debug, debug_span};

pub use recorder::{InputRecorder, RecordedEvent, RecordedKind};
pub use tracker::KanaTracker;
pub use types::{InputEvent, KeyResponse, Phrase, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    NotStarted,
    Running,
    Finished,
}

/// Phrases in order with their judge targets precomputed.
#[derive(Debug)]
struct Entry {
    phrase: Phrase,
    target: JudgeTarget,
}

#[derive(Debug)]
pub struct TypingSession {
    entries: Vec<Entry>,
    index: usize,
    judge: TypingJudge,
    tracker: KanaTracker,
    recorder: InputRecorder,
    stats: StatsCalculator,
    state: SessionState,

    // Counts folded in from finished phrases
    correct: usize,
    incorrect: usize,

    /// Key-down time of the last rejected keystroke, until a backspace.
    last_incorrect_us: Option<u64>,
}

impl TypingSession {
    /// Build a session over `phrases`. Phrases whose reading has no romaji
    /// (e.g. only kanji or punctuation) are skipped.
    pub fn new(phrases: Vec<Phrase>) -> Result<Self, SessionError> {
        let entries: Vec<Entry> = phrases
            .into_iter()
            .filter_map(|phrase| {
                let target = JudgeTarget::from_kana(phrase.display.clone(), &phrase.reading);
                if target.is_empty() {
                    debug!(display = %phrase.display, "skipping phrase with empty romaji");
                    return None;
                }
                Some(Entry { phrase, target })
            })
            .collect();

        let first = entries.first().ok_or(SessionError::NoPhrases)?;
        let judge = TypingJudge::new(first.target.clone());

        Ok(Self {
            entries,
            index: 0,
            judge,
            tracker: KanaTracker::new(),
            recorder: InputRecorder::new(),
            stats: StatsCalculator::new(),
            state: SessionState::NotStarted,
            correct: 0,
            incorrect: 0,
            last_incorrect_us: None,
        })
    }

    /// Begin recording. Has no effect once started.
    pub fn start(&mut self, timestamp_us: u64) {
        if self.state != SessionState::NotStarted {
            return;
        }
        self.recorder.start_session(timestamp_us);
        self.stats.start_session(timestamp_us);
        self.state = SessionState::Running;
        debug!(phrases = self.entries.len(), "session started");
    }

    pub fn handle_key(&mut self, event: InputEvent) -> KeyResponse {
        let _span = debug_span!("handle_key", ts = event.timestamp_us()).entered();
        if self.state != SessionState::Running {
            return KeyResponse::ignored();
        }

        match event {
            InputEvent::KeyDown {
                ch,
                key_code,
                timestamp_us,
            } => self.handle_key_down(ch, key_code, timestamp_us),
            InputEvent::KeyUp {
                key_code,
                timestamp_us,
            } => {
                self.recorder.record_key_up(timestamp_us, key_code);
                self.stats.record_key_up(timestamp_us, key_code);
                KeyResponse::ignored()
            }
            InputEvent::Backspace { timestamp_us } => {
                self.recorder.record_backspace(timestamp_us);
                self.stats.record_backspace(timestamp_us);
                if let Some(since) = self.last_incorrect_us.take() {
                    self.recorder
                        .record_correction(timestamp_us, timestamp_us.saturating_sub(since));
                }
                KeyResponse::ignored()
            }
        }
    }

    fn handle_key_down(&mut self, ch: char, key_code: u32, timestamp_us: u64) -> KeyResponse {
        self.recorder.record_key_down(timestamp_us, key_code, ch);
        self.stats.record_key_down(timestamp_us, key_code, ch);

        let judgement = self.judge.judge_char(ch);
        self.recorder
            .set_last_correctness(judgement == JudgeResult::Correct);

        let mut resp = KeyResponse {
            judgement: Some(judgement),
            ..KeyResponse::ignored()
        };

        match judgement {
            JudgeResult::Correct => {
                self.last_incorrect_us = None;
                resp.completed_kana = self.tracker.push(ch, timestamp_us);
                for k in &resp.completed_kana {
                    self.stats
                        .record_kana_input(&k.kana, &k.romaji, k.start_us, k.end_us);
                }
            }
            JudgeResult::Incorrect => self.last_incorrect_us = Some(timestamp_us),
            JudgeResult::AlreadyDone => {}
        }

        if self.judge.is_completed() {
            resp.phrase_completed = true;
            resp.session_completed = self.next_phrase(timestamp_us);
        }
        resp
    }

    /// Fold the finished phrase into the totals and load the next one.
    /// Returns true when there is none left.
    fn next_phrase(&mut self, timestamp_us: u64) -> bool {
        self.fold_counts();
        self.tracker.reset();
        self.last_incorrect_us = None;
        self.index += 1;
        debug!(index = self.index, "phrase completed");

        match self.entries.get(self.index) {
            Some(entry) => {
                self.judge = TypingJudge::new(entry.target.clone());
                false
            }
            None => {
                self.end(timestamp_us);
                true
            }
        }
    }

    fn fold_counts(&mut self) {
        self.correct += self.judge.correct_count();
        self.incorrect += self.judge.incorrect_count();
    }

    fn end(&mut self, timestamp_us: u64) {
        self.recorder.end_session();
        self.stats.end_session(timestamp_us);
        self.state = SessionState::Finished;
        debug!(
            correct = self.correct,
            incorrect = self.incorrect,
            "session finished"
        );
    }

    /// Stop the session (if still running) and compute the report.
    pub fn finish(&mut self, timestamp_us: u64) -> StatisticsReport {
        match self.state {
            SessionState::Running => {
                self.fold_counts();
                self.end(timestamp_us);
            }
            SessionState::NotStarted => {
                self.state = SessionState::Finished;
            }
            SessionState::Finished => {}
        }
        self.stats.calculate(self.correct, self.incorrect)
    }

    /// Phrase being typed, or `None` once every phrase is done.
    pub fn current_phrase(&self) -> Option<&Phrase> {
        if self.state == SessionState::Finished {
            return None;
        }
        self.entries.get(self.index).map(|e| &e.phrase)
    }

    pub fn judge(&self) -> &TypingJudge {
        &self.judge
    }

    pub fn recorder(&self) -> &InputRecorder {
        &self.recorder
    }

    pub fn stats(&self) -> &StatsCalculator {
        &self.stats
    }

    /// Romaji typed toward the next kana unit.
    pub fn pending_romaji(&self) -> &str {
        self.tracker.pending()
    }

    pub fn phrase_count(&self) -> usize {
        self.entries.len()
    }

    /// Index of the current phrase; equals `phrase_count()` when all are done.
    pub fn phrase_index(&self) -> usize {
        self.index
    }

    /// Fraction of phrases completed, 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        if self.state == SessionState::Finished {
            return 1.0;
        }
        self.index as f64 / self.entries.len() as f64
    }

    pub fn is_started(&self) -> bool {
        self.state != SessionState::NotStarted
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }
}
