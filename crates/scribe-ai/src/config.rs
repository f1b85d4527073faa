use std::time::Duration;

use scribe_core::ContextLimits;

/// Sampling parameters sent with every completion request.
///
/// Defaults match the deployment this engine was tuned against: a small
/// local model kept on a short leash (low temperature, few tokens, stop at
/// the first newline) so continuations stay within the current sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f32,
    pub top_k: u32,
    pub max_tokens: u32,
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "mistral-nemo".to_string(),
            temperature: 0.3,
            top_k: 40,
            max_tokens: 50,
            stop_sequences: vec!["\n".to_string()],
        }
    }
}

/// Tunables for the request scheduler and context extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Quiet period after the last edit before a request is issued.
    pub debounce: Duration,
    /// Minimum characters before the cursor for an edit to be eligible.
    pub min_typed_chars: usize,
    /// Word cap on the context before the current sentence.
    pub previous_context_words: usize,
    /// Char cap on the context after the current sentence.
    pub following_context_chars: usize,
    pub generation: GenerationConfig,
}

impl EngineConfig {
    pub(crate) fn context_limits(&self) -> ContextLimits {
        ContextLimits {
            previous_words: self.previous_context_words,
            following_chars: self.following_context_chars,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_typed_chars: 5,
            previous_context_words: 500,
            following_context_chars: 500,
            generation: GenerationConfig::default(),
        }
    }
}
