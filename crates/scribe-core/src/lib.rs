//! `scribe-core` provides the text primitives behind Scribe's inline
//! prediction engine: sentence boundaries, cursor-relative context windows,
//! and whitespace normalization.
//!
//! Everything in this crate is pure and deterministic. The async engine in
//! `scribe-ai` builds on these primitives; keeping them free of I/O lets the
//! merge and boundary logic be tested (and fuzzed) without a runtime.

mod context;
mod sentence;

pub use context::{
    collapse_whitespace, extract_context, extract_context_with_limits, ContextLimits,
    ContextWindow, CURSOR_MARKER,
};
pub use sentence::{is_sentence_terminator, previous_sentence, sentence_around, SentenceSpan};
