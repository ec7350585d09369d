use super::*;

#[test]
fn advance_estimates() {
    assert_eq!(text_width_in("あ", 72.0), 1.0);
    assert!((text_width_in("ab", 72.0) - 1.1).abs() < 1e-12);
    assert_eq!(char_advance_em('Ａ'), WIDE_ADVANCE_EM);
    assert_eq!(char_advance_em('•'), NARROW_ADVANCE_EM);
}

#[test]
fn latin_wraps_at_spaces() {
    let lines = wrap_lines("hello world", 3.0, 72.0);
    assert_eq!(lines, vec!["hello", "world"]);
}

#[test]
fn cjk_wraps_per_character() {
    let lines = wrap_lines("あいうえお", 0.35, 7.2);
    assert_eq!(lines, vec!["あいう", "えお"]);
}

#[test]
fn explicit_newlines_are_kept() {
    let lines = wrap_lines("• one\n• two", 10.0, 10.0);
    assert_eq!(lines, vec!["• one", "• two"]);
}

#[test]
fn overlong_word_is_split() {
    let lines = wrap_lines("abcdefghij", 0.3, 7.2);
    assert!(lines.len() > 1);
    assert_eq!(lines.concat(), "abcdefghij");
}

#[test]
fn shrinks_until_it_fits() {
    let bounds = Rect::new(0.0, 0.0, 1.0, 0.2);
    let fitted = fit_text("あいうえおかきくけこ", bounds, 14.0, 7.0, 1.0);
    assert!(!fitted.truncated);
    assert_eq!(fitted.font_pt, 7.0);
    assert_eq!(fitted.lines.len(), 1);
    assert!(fitted.height_in(1.0) <= 0.2);
}

#[test]
fn truncates_with_ellipsis_at_the_floor() {
    let bounds = Rect::new(0.0, 0.0, 1.0, 0.2);
    let fitted = fit_text("あいうえおかきくけこ", bounds, 14.0, 10.0, 1.0);
    assert!(fitted.truncated);
    assert_eq!(fitted.font_pt, 10.0);
    assert_eq!(fitted.lines, vec!["あいうえおか…"]);
}

#[test]
fn short_text_keeps_its_size() {
    let bounds = Rect::new(0.0, 0.0, 5.0, 1.0);
    let fitted = fit_text("Scenario A", bounds, 10.0, 6.0, 1.2);
    assert_eq!(fitted.font_pt, 10.0);
    assert_eq!(fitted.lines, vec!["Scenario A"]);
}
