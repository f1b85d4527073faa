//! Overlap reconciliation between a raw model continuation and the sentence
//! as typed so far.
//!
//! Small local models frequently restate part of the sentence they were
//! asked to continue; splicing the response verbatim produces visible
//! duplication ("I went to the The store"). Reconciliation removes the
//! shared overlap in two tiers: an exact character suffix/prefix match
//! first (cheap, catches sub-word continuations), then a leading
//! word-run comparison for whole-word repeats. A full edit-distance
//! alignment is not needed for either.

use scribe_core::collapse_whitespace;

/// Punctuation ignored when comparing sentences for echoes.
const STRIPPED_PUNCTUATION: &[char] = &['\'', '"', ';', ':', ',', '.', '!', '?'];

/// Lowercase, strip punctuation, collapse whitespace, trim.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|ch| !STRIPPED_PUNCTUATION.contains(ch))
        .collect();
    collapse_whitespace(&stripped).trim().to_string()
}

/// Compute the safe-to-display remainder of `raw_prediction`.
///
/// Returns an empty string to suppress the prediction entirely: the model
/// echoed the active or previous sentence, or the prediction adds nothing
/// beyond what is already typed.
pub fn reconcile(active_sentence: &str, previous_sentence: &str, raw_prediction: &str) -> String {
    let raw = strip_wrapping_quotes(raw_prediction.trim());

    let normalized_raw = normalize(raw);
    if normalized_raw.is_empty() || normalized_raw == normalize(active_sentence) {
        return String::new();
    }
    let normalized_previous = normalize(previous_sentence);
    if !normalized_previous.is_empty() && normalized_raw == normalized_previous {
        return String::new();
    }

    if let Some(overlap) = char_overlap(active_sentence, raw) {
        return raw[overlap..].to_string();
    }

    let remainder = word_remainder(active_sentence, raw);
    if !remainder.is_empty() && !raw_prediction.contains(remainder.as_str()) {
        // Degenerate word split; the raw prediction beats an invalid fragment.
        return raw.to_string();
    }
    remainder
}

fn strip_wrapping_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

/// Longest case-insensitive suffix of `active` that is also a prefix of
/// `raw`, backed off to a word boundary in `raw`.
///
/// The back-off keeps a partially-typed word intact in the remainder: for
/// active "I am hap" and raw "happy days", stripping the matched "hap"
/// would display "py days", which the acceptance merger could no longer
/// recognize as completing "hap". Keeping the whole word defers the strip
/// to acceptance time, where the partial-word rule handles it.
fn char_overlap(active: &str, raw: &str) -> Option<usize> {
    let max = active.len().min(raw.len());
    let mut found = 0;
    for len in (1..=max).rev() {
        if !active.is_char_boundary(active.len() - len) || !raw.is_char_boundary(len) {
            continue;
        }
        if active[active.len() - len..].eq_ignore_ascii_case(&raw[..len]) {
            found = len;
            break;
        }
    }
    if found == 0 {
        return None;
    }

    let overlap = if splits_word(raw, found) {
        word_start_before(raw, found)
    } else {
        found
    };
    (overlap > 0).then_some(overlap)
}

/// Whether cutting `raw` at `boundary` would leave both halves of one word.
fn splits_word(raw: &str, boundary: usize) -> bool {
    let before = raw[..boundary].chars().next_back();
    let after = raw[boundary..].chars().next();
    matches!((before, after), (Some(b), Some(a)) if b.is_alphanumeric() && a.is_alphanumeric())
}

fn word_start_before(raw: &str, boundary: usize) -> usize {
    raw[..boundary]
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())
        .map(|(idx, ch)| idx + ch.len_utf8())
        .unwrap_or(0)
}

/// Drop the leading words of `raw` that repeat the leading words of
/// `active`; the rest, joined by single spaces, is the remainder.
fn word_remainder(active: &str, raw: &str) -> String {
    let active_words: Vec<&str> = active.split_whitespace().collect();
    let raw_words: Vec<&str> = raw.split_whitespace().collect();

    let mut shared = 0;
    while shared < active_words.len()
        && shared < raw_words.len()
        && active_words[shared] == raw_words[shared]
    {
        shared += 1;
    }
    raw_words[shared..].join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_of_active_sentence_is_suppressed() {
        assert_eq!(reconcile("The cat sat.", "", "the cat sat"), "");
        assert_eq!(reconcile("Hello,  world!", "", "\"hello world\""), "");
    }

    #[test]
    fn echo_of_previous_sentence_is_suppressed() {
        assert_eq!(reconcile("And", "It was raining.", "It was raining"), "");
    }

    #[test]
    fn empty_prediction_is_suppressed() {
        assert_eq!(reconcile("Something", "", "   "), "");
        assert_eq!(reconcile("Something", "", "\"\""), "");
    }

    #[test]
    fn char_suffix_prefix_overlap_is_stripped() {
        assert_eq!(
            reconcile("The cat sat on the", "", "the mat and looked around."),
            " mat and looked around."
        );
    }

    #[test]
    fn char_overlap_is_case_insensitive() {
        assert_eq!(reconcile("We saw THE", "", "the end."), " end.");
    }

    #[test]
    fn partial_word_overlap_keeps_the_whole_word() {
        // Stripping "hap" would display "py days"; acceptance needs the
        // full first word to recognize the continuation.
        assert_eq!(reconcile("I am hap", "", "happy days"), "happy days");
    }

    #[test]
    fn word_level_repeats_are_dropped() {
        assert_eq!(reconcile("The   cat", "", "The cat sat on"), "sat on");
    }

    #[test]
    fn whole_prediction_already_typed_yields_nothing() {
        // Word tier consumes every word of the prediction; nothing remains
        // to display. Not an echo: the active sentence goes on past it.
        assert_eq!(reconcile("The cat sat", "", "The cat"), "");
    }

    #[test]
    fn degenerate_word_split_falls_back_to_raw() {
        assert_eq!(
            reconcile("The   cat", "", "The cat sat\non"),
            "The cat sat\non"
        );
    }

    #[test]
    fn no_overlap_returns_full_prediction() {
        assert_eq!(reconcile("It started", "", "\"to rain\""), "to rain");
    }

    #[test]
    fn reconcile_reaches_a_fixed_point() {
        let active = "The cat sat on the";
        let first = reconcile(active, "", "the mat and looked around.");
        let second = reconcile(active, "", &first);
        let third = reconcile(active, "", &second);
        assert_eq!(second, third);
    }

    #[test]
    fn normalize_strips_case_punctuation_and_whitespace() {
        assert_eq!(normalize("  \"Hello,\n WORLD!\"  "), "hello world");
    }
}
