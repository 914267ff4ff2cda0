//! Greedy word wrap

use super::metrics::TextMeasure;

/// Wrap `text` into lines no wider than `max_width`.
///
/// Words are accumulated while the line still fits; the word that would make
/// it overflow starts the next line. A single word wider than `max_width` is
/// broken between characters. Runs of whitespace collapse to one space, and
/// empty text yields a single empty line.
pub fn wrap_text<M>(text: &str, max_width: f32, font_size: f32, measure: &M) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = place_word(word, max_width, font_size, measure, &mut lines);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if measure.text_width(&candidate, font_size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = place_word(word, max_width, font_size, measure, &mut lines);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Start a line with `word`, splitting off full-width chunks if it is too wide.
/// Returns the trailing part that stays open on the current line.
fn place_word<M>(word: &str, max_width: f32, font_size: f32, measure: &M, lines: &mut Vec<String>) -> String
where
    M: TextMeasure + ?Sized,
{
    if measure.text_width(word, font_size) <= max_width {
        return word.to_string();
    }

    let mut chunk = String::new();
    for c in word.chars() {
        chunk.push(c);
        if chunk.chars().count() > 1 && measure.text_width(&chunk, font_size) > max_width {
            chunk.pop();
            lines.push(std::mem::take(&mut chunk));
            chunk.push(c);
        }
    }
    chunk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::metrics::FixedWidthMetrics;

    // One point per character at size 1.0
    const MONO: FixedWidthMetrics = FixedWidthMetrics { em_fraction: 1.0 };

    #[test]
    fn test_fits_on_one_line() {
        assert_eq!(wrap_text("steel pipe", 20.0, 1.0, &MONO), vec!["steel pipe"]);
    }

    #[test]
    fn test_greedy_breaks() {
        let lines = wrap_text("aaa bbb ccc ddd", 7.0, 1.0, &MONO);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);

        let lines = wrap_text("aaa bbb ccc ddd", 6.0, 1.0, &MONO);
        assert_eq!(lines, vec!["aaa", "bbb", "ccc", "ddd"]);
    }

    #[test]
    fn test_long_word_is_split() {
        let lines = wrap_text("abcdefghij xy", 4.0, 1.0, &MONO);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn test_long_word_remainder_takes_next_word() {
        let lines = wrap_text("abcdef g", 4.0, 1.0, &MONO);
        assert_eq!(lines, vec!["abcd", "ef g"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(wrap_text("", 10.0, 1.0, &MONO), vec![""]);
        assert_eq!(wrap_text("   ", 10.0, 1.0, &MONO), vec![""]);
        assert_eq!(wrap_text("a   b", 10.0, 1.0, &MONO), vec!["a b"]);
    }

    #[test]
    fn test_no_line_exceeds_width() {
        let text = "Galvanised iron pipe 25mm class B with couplers and sockets";
        for line in wrap_text(text, 12.0, 1.0, &MONO) {
            assert!(line.chars().count() <= 12, "line too wide: {line}");
        }
    }
}
