//! Property-based tests for the escape sanitizer

use proptest::prelude::*;

use shellpilot::ansi::sanitize;

proptest! {
    #[test]
    fn prop_sanitize_is_idempotent(input in any::<String>()) {
        let once = sanitize(&input);
        let twice = sanitize(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_sanitized_output_has_no_escapes(input in any::<String>()) {
        let clean = sanitize(&input);
        prop_assert!(!clean.contains('\x1b'));
        prop_assert!(!clean.contains('\r'));
    }

    #[test]
    fn prop_plain_printable_text_is_untouched(input in "[a-zA-Z0-9 ./:_-]*") {
        prop_assert_eq!(sanitize(&input), input);
    }

    #[test]
    fn prop_sgr_wrapping_strips_to_payload(payload in "[a-zA-Z0-9 ]*", code in 0u8..=107) {
        let wrapped = format!("\x1b[{}m{}\x1b[0m", code, payload);
        prop_assert_eq!(sanitize(&wrapped), payload);
    }
}
