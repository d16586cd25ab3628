//! Property-based tests for the width and truncation invariants that must
//! hold across all inputs.

use display_width::{
    bytes_graphemes, bytes_width, str_graphemes, str_width, truncate_bytes, truncate_str, Options,
};
use proptest::prelude::*;

fn any_options() -> impl Strategy<Value = Options> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(eaw, cs, cs8)| Options {
        east_asian_width: eaw,
        control_sequences: cs,
        control_sequences_8bit: cs8,
    })
}

/// Arbitrary UTF-8 strings (proptest default character strategy).
fn utf8_string() -> impl Strategy<Value = String> {
    "\\PC{0,60}"
}

/// Strings biased towards the interesting terminal cases: CJK, ambiguous,
/// emoji sequences, combining marks, controls and escapes.
fn terminal_string() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "a",
            "Z",
            "~",
            " ",
            "\u{E9}",
            "世",
            "界",
            "한",
            "\u{3000}",
            "\u{2500}",
            "😀",
            "🇺🇸",
            "\u{1F1FA}",
            "👨\u{200D}👩\u{200D}👧",
            "1\u{FE0F}\u{20E3}",
            "\u{231A}\u{FE0E}",
            "\u{2721}\u{FE0F}",
            "a\u{300}",
            "\u{200B}",
            "\u{AD}",
            "\t",
            "\r\n",
            "\u{1B}[31m",
            "\u{1B}[0m",
            "\u{1B}]0;t\u{7}",
            "\u{1B}",
        ]),
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

fn tail() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", ".", "...", "\u{2026}", "->", "世"])
}

proptest! {
    /// Each byte contributes at most one column (wide scalars cost at
    /// least as many bytes as columns), for any input and options.
    #[test]
    fn width_is_bounded_by_byte_len(
        bytes in prop::collection::vec(any::<u8>(), 0..200),
        opts in any_options(),
    ) {
        prop_assert!(bytes_width(&bytes, opts) <= bytes.len());
    }

    /// The string and byte APIs agree on valid UTF-8.
    #[test]
    fn str_and_bytes_agree(s in utf8_string(), opts in any_options()) {
        prop_assert_eq!(str_width(&s, opts), bytes_width(s.as_bytes(), opts));
    }

    #[test]
    fn str_and_bytes_agree_on_terminal_text(s in terminal_string(), opts in any_options()) {
        prop_assert_eq!(str_width(&s, opts), bytes_width(s.as_bytes(), opts));
    }

    /// No cluster is wider than two columns.
    #[test]
    fn width_bounded_by_cluster_count(s in terminal_string(), opts in any_options()) {
        let width = str_width(&s, opts);
        prop_assert!(width <= s.len());
        prop_assert!(width <= 2 * s.chars().count());
        prop_assert!(width <= 2 * str_graphemes(&s, opts).count());
    }

    /// Per-cluster widths from the iterator sum to the aggregate width,
    /// SWAR fast path included.
    #[test]
    fn cluster_widths_sum_to_total(s in terminal_string(), opts in any_options()) {
        let sum: usize = str_graphemes(&s, opts).map(|g| g.width()).sum();
        prop_assert_eq!(sum, str_width(&s, opts));
    }

    #[test]
    fn ascii_cluster_widths_sum_to_total(s in "[\\x00-\\x7F]{0,120}", opts in any_options()) {
        let sum: usize = str_graphemes(&s, opts).map(|g| g.width()).sum();
        prop_assert_eq!(sum, str_width(&s, opts));
    }

    /// The clusters partition the input: non-empty, adjacent, exhaustive.
    /// This is the forward progress guarantee for malformed input.
    #[test]
    fn clusters_partition_input(
        bytes in prop::collection::vec(any::<u8>(), 0..200),
        opts in any_options(),
    ) {
        let mut pos = 0;
        for g in bytes_graphemes(&bytes, opts) {
            prop_assert!(!g.as_bytes().is_empty());
            prop_assert_eq!(pos, g.end() - g.as_bytes().len());
            pos = g.end();
        }
        prop_assert_eq!(pos, bytes.len());
    }

    /// The ambiguous class only ever grows a string.
    #[test]
    fn east_asian_option_only_grows(s in terminal_string()) {
        let narrow = str_width(&s, Options::default());
        let wide = str_width(&s, Options { east_asian_width: true, ..Options::default() });
        prop_assert!(narrow <= wide);
    }

    /// Recognizing escapes can only shrink a string.
    #[test]
    fn escape_recognition_only_shrinks(s in terminal_string()) {
        let plain = str_width(&s, Options::default());
        let ansi = str_width(&s, Options { control_sequences: true, ..Options::default() });
        prop_assert!(ansi <= plain);
    }

    #[test]
    fn c1_recognition_only_shrinks(bytes in prop::collection::vec(any::<u8>(), 0..200)) {
        let plain = bytes_width(&bytes, Options::default());
        let c1 = bytes_width(&bytes, Options {
            control_sequences_8bit: true,
            ..Options::default()
        });
        prop_assert!(c1 <= plain);
    }

    /// Truncated output never exceeds the larger of the budget and the
    /// tail's own width.
    #[test]
    fn truncation_respects_width_bound(
        s in terminal_string(),
        max_width in 0usize..24,
        tail in tail(),
        opts in any_options(),
    ) {
        let out = truncate_str(&s, max_width, tail, opts);
        let bound = max_width.max(str_width(tail, opts));
        prop_assert!(str_width(&out, opts) <= bound);
    }

    /// Output that fits is a fixed point.
    #[test]
    fn truncation_is_idempotent(
        s in terminal_string(),
        max_width in 0usize..24,
        tail in tail(),
        opts in any_options(),
    ) {
        let once = truncate_str(&s, max_width, tail, opts);
        if str_width(&once, opts) <= max_width {
            let twice = truncate_str(&once, max_width, tail, opts);
            prop_assert_eq!(once.as_ref(), twice.as_ref());
        }
    }

    #[test]
    fn truncate_str_and_bytes_agree(
        s in terminal_string(),
        max_width in 0usize..24,
        tail in tail(),
        opts in any_options(),
    ) {
        let from_str = truncate_str(&s, max_width, tail, opts);
        let from_bytes = truncate_bytes(s.as_bytes(), max_width, tail.as_bytes(), opts);
        prop_assert_eq!(from_str.as_bytes(), from_bytes.as_ref());
    }

    /// Variation selectors pick the presentation of any one-column base
    /// and narrow any emoji-default base.
    #[test]
    fn variation_selector_round_trip(
        emoji_base in prop::sample::select(vec!['\u{231A}', '\u{23F0}', '\u{2614}', '\u{26A1}']),
        text_base in prop::sample::select(vec!['\u{270C}', '\u{2708}', '\u{2602}', '\u{2721}']),
    ) {
        let opts = Options::default();
        prop_assert_eq!(str_width(&format!("{emoji_base}"), opts), 2);
        prop_assert_eq!(str_width(&format!("{emoji_base}\u{FE0E}"), opts), 1);
        prop_assert_eq!(str_width(&format!("{emoji_base}\u{FE0F}"), opts), 2);
        prop_assert_eq!(str_width(&format!("{text_base}"), opts), 1);
        prop_assert_eq!(str_width(&format!("{text_base}\u{FE0E}"), opts), 1);
        prop_assert_eq!(str_width(&format!("{text_base}\u{FE0F}"), opts), 2);
    }
}

#[test]
fn empty_input_is_zero() {
    assert_eq!(str_width("", Options::default()), 0);
    assert_eq!(bytes_width(b"", Options::default()), 0);
}
