#![no_main]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use libfuzzer_sys::fuzz_target;
use scribe_core::{extract_context, previous_sentence, sentence_around, CURSOR_MARKER};

fuzz_target!(|input: &[u8]| {
    // Decode to UTF-8 lossily so the fuzz target is resilient to arbitrary bytes.
    let text = String::from_utf8_lossy(input).to_string();

    // Pick a cursor offset derived from the raw bytes, then clamp to the text length.
    let mut hasher = DefaultHasher::new();
    input.hash(&mut hasher);
    let hash = hasher.finish() as usize;
    let offset = if text.is_empty() {
        0
    } else {
        hash % (text.len() + 1)
    };

    let span = sentence_around(&text, offset);
    assert!(span.start <= span.end);
    assert!(span.end <= text.len());
    let _ = span.slice(&text);
    let _ = previous_sentence(&text, span.start);

    let mut boundary = offset.min(text.len());
    while boundary > 0 && !text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    let mut marked = String::with_capacity(text.len() + CURSOR_MARKER.len());
    marked.push_str(&text[..boundary]);
    marked.push_str(CURSOR_MARKER);
    marked.push_str(&text[boundary..]);
    let _ = extract_context(&marked, boundary);
});
