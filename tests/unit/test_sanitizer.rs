//! Unit tests for ANSI escape sanitization

use shellpilot::ansi::{sanitize, EscapeSanitizer};

#[test]
fn test_clean_text_is_untouched() {
    let sanitizer = EscapeSanitizer::new();
    let inputs = [
        "plain output",
        "multi\nline\noutput\n",
        "tabs\tare\tfine",
        "unicode: héllo wörld",
    ];
    for input in inputs {
        assert_eq!(sanitizer.sanitize(input), input);
    }
}

#[test]
fn test_sgr_sequences_removed() {
    assert_eq!(sanitize("\x1b[31mred\x1b[0m plain"), "red plain");
    assert_eq!(sanitize("\x1b[1;32;40mbold green\x1b[m"), "bold green");
}

#[test]
fn test_cursor_and_erase_sequences_removed() {
    assert_eq!(sanitize("\x1b[2J\x1b[1;1Hcleared"), "cleared");
    assert_eq!(sanitize("progress\x1b[K done"), "progress done");
}

#[test]
fn test_private_mode_sequences_removed() {
    // Bracketed paste and cursor visibility toggles show up in real shells
    assert_eq!(sanitize("\x1b[?2004hprompt\x1b[?25l"), "prompt");
}

#[test]
fn test_osc_title_sequence_removed() {
    assert_eq!(sanitize("\x1b]0;user@host: ~\x07$ "), "$ ");
}

#[test]
fn test_carriage_returns_dropped() {
    assert_eq!(sanitize("progress 10%\rprogress 99%\r\n"), "progress 10%progress 99%\n");
}

#[test]
fn test_semantic_whitespace_preserved() {
    // No trimming beyond the sequence bytes themselves
    assert_eq!(sanitize("  indented\n"), "  indented\n");
    assert_eq!(sanitize("\x1b[32m  spaced  \x1b[0m"), "  spaced  ");
}

#[test]
fn test_idempotence_on_real_prompt() {
    let raw = "\x1b]0;alice@box\x07\x1b[1;32malice@box\x1b[0m:\x1b[34m~\x1b[0m$ ";
    let once = sanitize(raw);
    assert_eq!(sanitize(&once), once);
}

#[test]
fn test_prompt_keywords_survive_sanitization() {
    // Classification patterns must still match post-sanitization text
    assert_eq!(sanitize("\x1b[1mPassword:\x1b[0m"), "Password:");
    assert_eq!(
        sanitize("\x1b[33mDo you want to continue? [y/n]\x1b[0m"),
        "Do you want to continue? [y/n]"
    );
}
