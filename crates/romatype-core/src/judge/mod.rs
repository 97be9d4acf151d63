//! Keystroke judgment against a fixed romaji target.
//!
//! A [`TypingJudge`] owns one phrase. The cursor only moves forward; once it
//! reaches the end of the target every further keystroke is `AlreadyDone`.

pub mod rules;


use serde::Serialize;
use tracing::debug;

use crate::kana::to_romaji;
use crate::settings::settings;
use rules::{find_rule, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JudgeResult {
    Correct,
    Incorrect,
    AlreadyDone,
}

/// Display text plus its lowercase canonical romaji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeTarget {
    display: String,
    romaji: String,
    chars: Vec<char>,
}

impl JudgeTarget {
    pub fn new(display: impl Into<String>, romaji: &str) -> Self {
        let romaji = romaji.to_ascii_lowercase();
        let chars = romaji.chars().collect();
        JudgeTarget {
            display: display.into(),
            romaji,
            chars,
        }
    }

    /// Target whose romaji is the canonical spelling of `kana`.
    pub fn from_kana(display: impl Into<String>, kana: &str) -> Self {
        Self::new(display, &to_romaji(kana))
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn romaji(&self) -> &str {
        &self.romaji
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JudgeState {
    pub cursor: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    /// Every keystroke seen, lowercased. Not used for judging.
    pub history: String,
}

#[derive(Debug, Clone)]
pub struct TypingJudge {
    target: JudgeTarget,
    state: JudgeState,
    flexible: bool,
}

impl TypingJudge {
    /// Judge with flexible input taken from `[judge] flexible_input`.
    pub fn new(target: JudgeTarget) -> Self {
        Self::with_flexible(target, settings().judge.flexible_input)
    }

    pub fn with_flexible(target: JudgeTarget, flexible: bool) -> Self {
        TypingJudge {
            target,
            state: JudgeState::default(),
            flexible,
        }
    }

    pub fn judge_char(&mut self, input: char) -> JudgeResult {
        let input = input.to_ascii_lowercase();
        self.state.history.push(input);

        let Some(ctx) = Context::new(&self.target.chars, self.state.cursor, input) else {
            return JudgeResult::AlreadyDone;
        };

        if input == ctx.expected {
            return self.accept(1);
        }

        if self.flexible {
            if let Some(rule) = find_rule(&ctx) {
                debug!(
                    rule = rule.name,
                    advance = rule.advance,
                    cursor = self.state.cursor,
                    "flexible rule accepted input"
                );
                return self.accept(rule.advance);
            }
        }

        self.state.incorrect_count += 1;
        JudgeResult::Incorrect
    }

    fn accept(&mut self, advance: usize) -> JudgeResult {
        self.state.correct_count += 1;
        self.state.cursor = (self.state.cursor + advance).min(self.target.len());
        JudgeResult::Correct
    }

    pub fn target(&self) -> &JudgeTarget {
        &self.target
    }

    pub fn target_text(&self) -> &str {
        self.target.display()
    }

    pub fn target_romaji(&self) -> &str {
        self.target.romaji()
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    pub fn state(&self) -> &JudgeState {
        &self.state
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn correct_count(&self) -> usize {
        self.state.correct_count
    }

    pub fn incorrect_count(&self) -> usize {
        self.state.incorrect_count
    }

    pub fn history(&self) -> &str {
        &self.state.history
    }

    pub fn is_completed(&self) -> bool {
        self.state.cursor >= self.target.len()
    }

    /// `correct / (correct + incorrect)`, or 0.0 before any input.
    pub fn accuracy(&self) -> f64 {
        let total = self.state.correct_count + self.state.incorrect_count;
        if total == 0 {
            0.0
        } else {
            self.state.correct_count as f64 / total as f64
        }
    }

    /// Target romaji from the cursor on. Empty once completed.
    pub fn remaining_target(&self) -> String {
        self.target.chars[self.state.cursor..].iter().collect()
    }

    /// Back to cursor 0 with cleared counters and history. The target is kept.
    pub fn reset(&mut self) {
        self.state = JudgeState::default();
    }
}
