//! Cursor-relative context windows for prompt building.
//!
//! The editing surface injects [`CURSOR_MARKER`] into a copy of the document
//! text; [`extract_context`] splits that text into the sentence being typed
//! and bounded windows of surrounding prose. Extraction is pure so prompt
//! construction can be tested without an editor attached.

use serde::{Deserialize, Serialize};

use crate::sentence::sentence_around;

/// Marker token injected at the caret before context extraction.
pub const CURSOR_MARKER: &str = "<CURSOR>";

/// Normalized text windows around the caret.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContextWindow {
    /// Text before the current sentence, capped to the trailing N words.
    pub previous_context: String,
    /// The sentence containing the caret, marker stripped.
    pub current_sentence: String,
    /// Text after the current sentence, capped to M chars.
    pub following_context: String,
}

/// Caps applied to the windows on either side of the current sentence.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ContextLimits {
    pub previous_words: usize,
    pub following_chars: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            previous_words: 500,
            following_chars: 500,
        }
    }
}

/// Collapse every whitespace run (newlines included) to a single space.
///
/// Leading and trailing runs collapse to one space rather than disappearing;
/// callers that want trimmed output trim afterwards.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

/// Extract the context windows around the cursor marker.
///
/// `text` must contain a single [`CURSOR_MARKER`] and `marker_offset` is the
/// byte offset where it begins. Identical inputs always produce identical
/// output.
pub fn extract_context(text: &str, marker_offset: usize) -> ContextWindow {
    extract_context_with_limits(text, marker_offset, &ContextLimits::default())
}

/// [`extract_context`] with explicit window caps.
pub fn extract_context_with_limits(
    text: &str,
    marker_offset: usize,
    limits: &ContextLimits,
) -> ContextWindow {
    let span = sentence_around(text, marker_offset);

    let current_sentence = collapse_whitespace(&span.slice(text).replace(CURSOR_MARKER, ""))
        .trim()
        .to_string();

    let before = text[..span.start].replace(CURSOR_MARKER, "");
    let words: Vec<&str> = before.split_whitespace().collect();
    let skip = words.len().saturating_sub(limits.previous_words);
    let previous_context = words[skip..].join(" ");

    let after = text[span.end..].replace(CURSOR_MARKER, "");
    let following_context: String = collapse_whitespace(&after)
        .trim()
        .chars()
        .take(limits.following_chars)
        .collect();

    ContextWindow {
        previous_context,
        current_sentence,
        following_context,
    }
}
