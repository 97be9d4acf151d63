use super::*;

#[test]
fn test_report_counts_across_phrases() {
    let mut s = started(&[("あ", "あ"), ("か", "か")]);
    let (_, t) = type_keys(&mut s, "axka", 0);
    assert!(s.is_finished());
    let r = s.finish(t + 1_000_000);
    assert_eq!(r.correct_key_count, 3);
    assert_eq!(r.incorrect_key_count, 1);
    assert_eq!(r.total_key_count, 4);
    // ended on the last key-down, not at the finish call
    assert_eq!(r.total_duration_us, t);
}

#[test]
fn test_finish_midway_includes_current_phrase() {
    let mut s = started(&[("かき", "かき")]);
    let (_, t) = type_keys(&mut s, "kaq", 0);
    let r = s.finish(t + 50_000);
    assert!(s.is_finished());
    assert_eq!(r.correct_key_count, 2);
    assert_eq!(r.incorrect_key_count, 1);
    assert_eq!(r.total_duration_us, t + 50_000);
    assert!(s.current_phrase().is_none());
}

#[test]
fn test_kana_timing_in_report() {
    let mut s = started(&[("しか", "しか")]);
    let (_, t) = type_keys(&mut s, "shika", 0);
    let r = s.finish(t);
    // し spans s (100ms) to i (300ms); か spans k (400ms) to a (500ms)
    assert!((r.kana_input_ms["し"] - 200.0).abs() < 1e-9);
    assert!((r.kana_input_ms["か"] - 100.0).abs() < 1e-9);
    assert!((r.important_kana_ms["し"] - 200.0).abs() < 1e-9);
    assert_eq!(r.important_kana_ms["ん"], 0.0);
}

#[test]
fn test_key_press_and_intervals() {
    let mut s = started(&[("あい", "あい")]);
    let (_, t) = type_keys(&mut s, "ai", 0);
    let r = s.finish(t);
    assert!((r.avg_key_press_ms[&'a'] - 30.0).abs() < 1e-9);
    // the final key-up arrives after the session ended and is not recorded
    assert!(!r.avg_key_press_ms.contains_key(&'i'));
    assert!((r.avg_inter_key_ms - 100.0).abs() < 1e-9);
}

#[test]
fn test_finish_before_start() {
    let mut s = TypingSession::new(phrases(&[("か", "か")])).unwrap();
    let r = s.finish(1_000);
    assert!(s.is_finished());
    assert_eq!(r.total_key_count, 0);
    assert_eq!(r.total_duration_us, 0);
}

#[test]
fn test_backspace_in_report() {
    let mut s = started(&[("か", "か")]);
    s.handle_key(key_down('x', 100));
    s.handle_key(InputEvent::Backspace { timestamp_us: 200 });
    let r = s.finish(300);
    assert_eq!(r.backspace_count, 1);
    assert_eq!(r.incorrect_key_count, 1);
}
