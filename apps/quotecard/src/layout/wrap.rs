//! Greedy line wrapping by character count.
//!
//! A line longer than `max_chars` is split at the last space found by scanning
//! backward from index `max_chars - 1`. Continuation lines are prefixed with a
//! 3-space indent. When no space exists in the scan window the line is
//! hard-broken at exactly `max_chars` characters, which guarantees every pass
//! consumes at least one character.

use serde::Serialize;

use crate::layout::font_metrics::{CharCell, Typeface};
use crate::quotes::normalize;

/// Prefix added to every line after the first.
pub const CONTINUATION_INDENT: &str = "   ";

/// Wrapped quote text plus its pixel geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrappedLayout {
    /// Display text: lines joined by `\n`, continuation lines indented.
    pub text: String,
    /// Widest display line in pixels.
    pub width: u32,
    /// Line height × line count in pixels.
    pub height: u32,
}

impl WrappedLayout {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }
}

/// Splits `text` into content lines of at most `max_chars` characters.
/// The returned lines carry no indent.
pub fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    // A zero budget can never consume input.
    let max_chars = max_chars.max(1);

    let mut lines = Vec::new();
    let mut rest = text;
    while rest.chars().count() > max_chars {
        let (line, next) = split_line(rest, max_chars);
        lines.push(line.to_string());
        rest = next;
    }
    lines.push(rest.to_string());
    lines
}

/// Returns `(line, remainder)` for a `rest` known to exceed `max_chars`.
fn split_line(rest: &str, max_chars: usize) -> (&str, &str) {
    let window: Vec<(usize, char)> = rest.char_indices().take(max_chars + 1).collect();

    // Index 0 is never a break point: it would produce an empty line.
    for i in (1..max_chars).rev() {
        let (byte, c) = window[i];
        if c == ' ' {
            return (&rest[..byte], &rest[byte + 1..]);
        }
    }

    let (byte, c) = window[max_chars];
    if c == ' ' {
        (&rest[..byte], &rest[byte + 1..])
    } else {
        (&rest[..byte], &rest[byte..])
    }
}

/// Wraps a quote and measures the resulting block.
///
/// Width is the widest display line (indent included) as measured by
/// `typeface`; height is `cell.height` per line.
pub fn wrap(
    quote: &str,
    max_chars: usize,
    typeface: &dyn Typeface,
    cell: CharCell,
) -> WrappedLayout {
    let text = normalize(quote);

    let display: Vec<String> = wrap_lines(&text, max_chars)
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line
            } else {
                format!("{CONTINUATION_INDENT}{line}")
            }
        })
        .collect();

    let width = display
        .iter()
        .map(|line| typeface.measure(line).width)
        .max()
        .unwrap_or(0);
    let height = cell.height * display.len() as u32;

    WrappedLayout {
        text: display.join("\n"),
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::BlockFace;

    const FACE: BlockFace = BlockFace {
        cell_w: 10,
        cell_h: 20,
    };
    const CELL: CharCell = CharCell {
        width: 10,
        height: 20,
    };

    fn sentence(words: usize, seed: usize) -> String {
        (0..words)
            .map(|i| "x".repeat(1 + (i * 7 + seed) % 9))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_short_quote_is_unchanged() {
        let quote = "Simplicity is the soul of efficiency.";
        let layout = wrap(quote, 70, &FACE, CELL);
        assert_eq!(layout.text, quote);
        assert_eq!(layout.line_count(), 1);
        assert_eq!(layout.width, 10 * quote.chars().count() as u32);
        assert_eq!(layout.height, 20);
    }

    #[test]
    fn test_quote_of_exactly_max_chars_is_one_line() {
        let quote = "a".repeat(70);
        assert_eq!(wrap_lines(&quote, 70), vec![quote.clone()]);
    }

    #[test]
    fn test_140_chars_wraps_into_two_lines() {
        // Spaces every 5 chars; index 69 is a space.
        let first = "abcd ".repeat(14);
        let second = format!("{}efghi", "efgh ".repeat(13));
        let quote = format!("{first}{second}");
        assert_eq!(quote.chars().count(), 140);

        let layout = wrap(&quote, 70, &FACE, CELL);
        let lines: Vec<&str> = layout.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], first.trim_end());
        assert!(lines[0].chars().count() <= 70);
        assert!(lines[1].starts_with(CONTINUATION_INDENT));
        assert_eq!(&lines[1][CONTINUATION_INDENT.len()..], second);
        assert_eq!(layout.height, 40);
        assert_eq!(layout.width, 10 * (3 + 70));
    }

    #[test]
    fn test_unbroken_word_hard_breaks_and_terminates() {
        let quote = "a".repeat(80);
        let lines = wrap_lines(&quote, 70);
        assert_eq!(lines, vec!["a".repeat(70), "a".repeat(10)]);

        let layout = wrap(&quote, 70, &FACE, CELL);
        assert_eq!(layout.text, format!("{}\n   {}", "a".repeat(70), "a".repeat(10)));
    }

    #[test]
    fn test_hard_break_on_space_drops_the_space() {
        let quote = format!("{} tail", "a".repeat(70));
        assert_eq!(wrap_lines(&quote, 70), vec!["a".repeat(70), "tail".to_string()]);
    }

    #[test]
    fn test_long_word_after_short_word_breaks_at_space() {
        let quote = format!("hi {}", "b".repeat(100));
        let lines = wrap_lines(&quote, 10);
        assert_eq!(lines[0], "hi");
        assert!(lines[1..].iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines[1..].concat(), "b".repeat(100));
    }

    #[test]
    fn test_zero_max_chars_still_terminates() {
        let lines = wrap_lines("abc", 0);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_every_line_fits_and_no_text_is_lost() {
        // Words are at most 9 chars, so no budget here forces a hard break.
        for max in [9, 12, 20, 33, 70] {
            for seed in 0..9 {
                let quote = sentence(40, seed);
                let lines = wrap_lines(&quote, max);
                for line in &lines {
                    assert!(
                        line.chars().count() <= max,
                        "line {line:?} exceeds {max} chars"
                    );
                    assert!(!line.is_empty());
                }
                assert_eq!(lines.join(" "), quote, "max={max} seed={seed}");
            }
        }
    }

    #[test]
    fn test_hard_break_mid_sentence_keeps_every_char() {
        let quote = format!("short words then {} and more", "z".repeat(23));
        let lines = wrap_lines(&quote, 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10), "{lines:?}");
        assert!(lines.contains(&"z".repeat(10)));
        let squashed: String = quote.chars().filter(|c| *c != ' ').collect();
        assert_eq!(lines.concat().replace(' ', ""), squashed);
    }

    #[test]
    fn test_wrap_is_deterministic() {
        let quote = sentence(60, 4);
        let a = wrap(&quote, 33, &FACE, CELL);
        let b = wrap(&quote, 33, &FACE, CELL);
        assert_eq!(a, b);
    }

    #[test]
    fn test_input_whitespace_is_collapsed_first() {
        let layout = wrap("  many    spaces\n here  ", 70, &FACE, CELL);
        assert_eq!(layout.text, "many spaces here");
    }

    #[test]
    fn test_multibyte_chars_count_as_one() {
        let quote = "é".repeat(12);
        let lines = wrap_lines(&quote, 5);
        assert_eq!(lines, vec!["é".repeat(5), "é".repeat(5), "é".repeat(2)]);
    }
}
