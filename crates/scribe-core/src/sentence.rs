//! Sentence boundary scanning.
//!
//! A sentence is any run of text delimited by `.`, `!`, or `?` (or the
//! document edges). Abbreviations and decimal numbers are not special-cased;
//! the engine downstream tolerates over-eager splits, so a linguistic parser
//! would buy nothing here.

/// Returns `true` for the characters that terminate a sentence.
#[inline]
pub fn is_sentence_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

#[inline]
fn is_terminator_byte(byte: u8) -> bool {
    matches!(byte, b'.' | b'!' | b'?')
}

/// A half-open byte range `[start, end)` covering one sentence.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SentenceSpan {
    pub start: usize,
    pub end: usize,
}

impl SentenceSpan {
    /// The sentence text within `text`.
    ///
    /// `text` must be the same string the span was computed from.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Clamp `offset` into `text`, snapping to the previous char boundary.
fn clamp_offset(text: &str, mut offset: usize) -> usize {
    offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Find the sentence containing `offset`.
///
/// Scans backward until a terminator sits immediately before the scan
/// position (the boundary is the character after the terminator) and forward
/// until a terminator is found, inclusive of it. The returned span always
/// satisfies `start <= offset <= end`, with both ends on char boundaries.
pub fn sentence_around(text: &str, offset: usize) -> SentenceSpan {
    let offset = clamp_offset(text, offset);
    let bytes = text.as_bytes();

    let mut start = offset;
    while start > 0 && !is_terminator_byte(bytes[start - 1]) {
        start -= 1;
    }

    let mut end = offset;
    while end < bytes.len() {
        let terminated = is_terminator_byte(bytes[end]);
        end += 1;
        if terminated {
            break;
        }
    }

    SentenceSpan { start, end }
}

/// The sentence immediately before the one starting at `sentence_start`,
/// trimmed, including its terminator. `None` when the current sentence is the
/// first in the document.
pub fn previous_sentence(text: &str, sentence_start: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut end = clamp_offset(text, sentence_start);

    // Walk back to the terminator that closed the previous sentence.
    loop {
        if end == 0 {
            return None;
        }
        end -= 1;
        if is_terminator_byte(bytes[end]) {
            break;
        }
    }
    if end == 0 {
        return None;
    }

    let mut start = end;
    while start > 0 {
        start -= 1;
        if is_terminator_byte(bytes[start]) {
            start += 1;
            break;
        }
    }

    Some(text[start..=end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn span_in_middle_sentence() {
        let text = "First. Second here. Third.";
        let span = sentence_around(text, 10);
        assert_eq!(span, SentenceSpan { start: 6, end: 19 });
        assert_eq!(span.slice(text).trim(), "Second here.");
    }

    #[test]
    fn no_terminators_covers_whole_text() {
        let text = "hello world";
        assert_eq!(
            sentence_around(text, 5),
            SentenceSpan {
                start: 0,
                end: text.len()
            }
        );
    }

    #[test]
    fn cursor_right_after_terminator_starts_new_sentence() {
        let text = "Done. Next";
        let span = sentence_around(text, 5);
        assert_eq!(span.start, 5);
        assert_eq!(span.slice(text), " Next");
    }

    #[test]
    fn all_terminators_end_sentences() {
        for text in ["Stop. go", "Stop! go", "Stop? go"] {
            let span = sentence_around(text, 1);
            assert_eq!(span.end, 5, "text: {text}");
        }
    }

    #[test]
    fn offset_past_end_is_clamped() {
        let text = "Short.";
        let span = sentence_around(text, 100);
        assert_eq!(span.start, text.len());
        assert_eq!(span.end, text.len());
    }

    #[test]
    fn offset_inside_multibyte_char_is_clamped() {
        let text = "héllo there.";
        // Offset 2 is inside the two-byte 'é'.
        let span = sentence_around(text, 2);
        assert!(text.is_char_boundary(span.start));
        assert!(text.is_char_boundary(span.end));
    }

    #[test]
    fn previous_sentence_found() {
        let text = "First. Second here. Third.";
        let span = sentence_around(text, 10);
        assert_eq!(previous_sentence(text, span.start), Some("First."));
    }

    #[test]
    fn previous_sentence_of_first_is_none() {
        assert_eq!(previous_sentence("Only one sentence", 0), None);
        assert_eq!(previous_sentence("Still the first. Next", 0), None);
    }

    #[test]
    fn previous_sentence_keeps_terminator() {
        let text = "Really? Yes. And";
        let span = sentence_around(text, 14);
        assert_eq!(previous_sentence(text, span.start), Some("Yes."));
    }

    proptest! {
        #[test]
        fn span_brackets_offset(text in "\\PC*", offset in 0usize..512) {
            let offset = offset.min(text.len());
            let span = sentence_around(&text, offset);
            let clamped = {
                let mut o = offset;
                while o > 0 && !text.is_char_boundary(o) {
                    o -= 1;
                }
                o
            };
            prop_assert!(span.start <= clamped);
            prop_assert!(clamped <= span.end);
            prop_assert!(span.end <= text.len());
            prop_assert!(text.is_char_boundary(span.start));
            prop_assert!(text.is_char_boundary(span.end));
            // Slicing must never panic.
            let _ = span.slice(&text);
        }

        #[test]
        fn previous_sentence_never_panics(text in "\\PC*", offset in 0usize..512) {
            let offset = offset.min(text.len());
            let span = sentence_around(&text, offset);
            let _ = previous_sentence(&text, span.start);
        }
    }
}
