//! Typing statistics over caller-timestamped key and kana events.
//!
//! All timestamps are microseconds on a caller-chosen clock; reported
//! intervals are milliseconds.


use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::settings::{settings, StatsSettings};

/// Key code recorded for backspace events.
pub const BACKSPACE_KEY_CODE: u32 = 0x08;

const MICROS_PER_MINUTE: f64 = 60_000_000.0;
const MICROS_PER_MILLI: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    Backspace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyEvent {
    pub kind: EventKind,
    pub timestamp_us: u64,
    pub key_code: u32,
    /// Only set on key-down.
    pub ch: Option<char>,
}

/// One completed kana unit and the time span it took to type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KanaInput {
    pub kana: String,
    pub romaji: String,
    pub start_us: u64,
    pub end_us: u64,
}

impl KanaInput {
    pub fn duration_us(&self) -> u64 {
        self.end_us.saturating_sub(self.start_us)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyData {
    pub item: String,
    pub count: usize,
    /// Share of all recorded kana, 0-100.
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub total_duration_us: u64,
    pub total_key_count: usize,
    pub correct_key_count: usize,
    pub incorrect_key_count: usize,
    pub backspace_count: usize,

    pub wpm_total: f64,
    pub wpm_correct: f64,
    pub cpm_total: f64,
    pub cpm_correct: f64,

    pub avg_inter_key_ms: f64,
    pub min_inter_key_ms: f64,
    pub max_inter_key_ms: f64,

    pub avg_key_press_ms: BTreeMap<char, f64>,
    pub kana_input_ms: BTreeMap<String, f64>,
    /// Every configured important kana; 0.0 when it was never typed.
    pub important_kana_ms: BTreeMap<String, f64>,
    pub category_frequency: Vec<FrequencyData>,
    pub important_kana_frequency: Vec<FrequencyData>,
}

#[derive(Debug, Clone)]
pub struct StatsCalculator {
    config: StatsSettings,
    start_us: u64,
    end_us: u64,
    events: Vec<KeyEvent>,
    kana_inputs: Vec<KanaInput>,
}

impl Default for StatsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsCalculator {
    /// Calculator configured from the global `[stats]` settings.
    pub fn new() -> Self {
        Self::with_settings(settings().stats.clone())
    }

    pub fn with_settings(config: StatsSettings) -> Self {
        StatsCalculator {
            config,
            start_us: 0,
            end_us: 0,
            events: Vec::new(),
            kana_inputs: Vec::new(),
        }
    }

    /// Mark the session start. Clears key events but keeps kana inputs.
    pub fn start_session(&mut self, timestamp_us: u64) {
        self.start_us = timestamp_us;
        self.events.clear();
    }

    pub fn end_session(&mut self, timestamp_us: u64) {
        self.end_us = timestamp_us;
    }

    pub fn record_key_down(&mut self, timestamp_us: u64, key_code: u32, ch: char) {
        self.events.push(KeyEvent {
            kind: EventKind::KeyDown,
            timestamp_us,
            key_code,
            ch: Some(ch),
        });
    }

    pub fn record_key_up(&mut self, timestamp_us: u64, key_code: u32) {
        self.events.push(KeyEvent {
            kind: EventKind::KeyUp,
            timestamp_us,
            key_code,
            ch: None,
        });
    }

    pub fn record_backspace(&mut self, timestamp_us: u64) {
        self.events.push(KeyEvent {
            kind: EventKind::Backspace,
            timestamp_us,
            key_code: BACKSPACE_KEY_CODE,
            ch: None,
        });
    }

    pub fn record_kana_input(&mut self, kana: &str, romaji: &str, start_us: u64, end_us: u64) {
        self.kana_inputs.push(KanaInput {
            kana: kana.to_string(),
            romaji: romaji.to_string(),
            start_us,
            end_us,
        });
    }

    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    pub fn kana_inputs(&self) -> &[KanaInput] {
        &self.kana_inputs
    }

    pub fn reset(&mut self) {
        self.events.clear();
        self.kana_inputs.clear();
        self.start_us = 0;
        self.end_us = 0;
    }

    pub fn calculate(&self, correct: usize, incorrect: usize) -> StatisticsReport {
        let duration = self.end_us.saturating_sub(self.start_us);
        let key_downs = self.count(EventKind::KeyDown);

        let mut report = StatisticsReport {
            total_duration_us: duration,
            total_key_count: key_downs,
            correct_key_count: correct,
            incorrect_key_count: incorrect,
            backspace_count: self.count(EventKind::Backspace),
            wpm_total: self.wpm(key_downs, duration),
            wpm_correct: self.wpm(correct, duration),
            cpm_total: cpm(key_downs, duration),
            cpm_correct: cpm(correct, duration),
            ..Default::default()
        };

        self.fill_inter_key(&mut report);
        report.avg_key_press_ms = self.key_press_durations();
        report.kana_input_ms = self.kana_input_times();
        report.important_kana_ms = self
            .config
            .important_kana
            .iter()
            .map(|k| (k.clone(), report.kana_input_ms.get(k).copied().unwrap_or(0.0)))
            .collect();

        let counts = self.kana_counts();
        let total = self.kana_inputs.len();
        report.category_frequency = self
            .config
            .categories
            .iter()
            .map(|cat| {
                let n = cat.kana.iter().filter_map(|k| counts.get(k.as_str())).sum();
                frequency(&cat.name, n, total)
            })
            .collect();
        report.important_kana_frequency = self
            .config
            .important_kana
            .iter()
            .map(|k| frequency(k, counts.get(k.as_str()).copied().unwrap_or(0), total))
            .collect();

        report
    }

    fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    fn wpm(&self, chars: usize, duration_us: u64) -> f64 {
        cpm(chars, duration_us) / self.config.chars_per_word as f64
    }

    fn fill_inter_key(&self, report: &mut StatisticsReport) {
        let downs: Vec<u64> = self
            .events
            .iter()
            .filter(|e| e.kind == EventKind::KeyDown)
            .map(|e| e.timestamp_us)
            .collect();
        if downs.len() < 2 {
            return;
        }

        let intervals: Vec<f64> = downs
            .windows(2)
            .map(|w| w[1].saturating_sub(w[0]) as f64 / MICROS_PER_MILLI)
            .collect();
        report.avg_inter_key_ms = intervals.iter().sum::<f64>() / intervals.len() as f64;
        report.min_inter_key_ms = intervals.iter().copied().fold(f64::INFINITY, f64::min);
        report.max_inter_key_ms = intervals.iter().copied().fold(0.0, f64::max);
    }

    /// Mean key-down to key-up time per character, pairing by key code.
    fn key_press_durations(&self) -> BTreeMap<char, f64> {
        let mut pending: HashMap<u32, (u64, Option<char>)> = HashMap::new();
        let mut durations: BTreeMap<char, Vec<f64>> = BTreeMap::new();

        for event in &self.events {
            match event.kind {
                EventKind::KeyDown => {
                    pending.insert(event.key_code, (event.timestamp_us, event.ch));
                }
                EventKind::KeyUp => {
                    if let Some((down, Some(ch))) = pending.remove(&event.key_code) {
                        let ms = event.timestamp_us.saturating_sub(down) as f64 / MICROS_PER_MILLI;
                        durations.entry(ch).or_default().push(ms);
                    }
                }
                EventKind::Backspace => {}
            }
        }

        durations
            .into_iter()
            .map(|(ch, d)| (ch, mean(&d)))
            .collect()
    }

    fn kana_input_times(&self) -> BTreeMap<String, f64> {
        let mut by_kana: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for input in &self.kana_inputs {
            by_kana
                .entry(input.kana.as_str())
                .or_default()
                .push(input.duration_us() as f64 / MICROS_PER_MILLI);
        }
        by_kana
            .into_iter()
            .map(|(kana, d)| (kana.to_string(), mean(&d)))
            .collect()
    }

    fn kana_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for input in &self.kana_inputs {
            *counts.entry(input.kana.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

fn cpm(chars: usize, duration_us: u64) -> f64 {
    if duration_us == 0 {
        return 0.0;
    }
    chars as f64 / (duration_us as f64 / MICROS_PER_MINUTE)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn frequency(item: &str, count: usize, total: usize) -> FrequencyData {
    let percentage = if total > 0 {
        count as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    FrequencyData {
        item: item.to_string(),
        count,
        percentage,
    }
}
