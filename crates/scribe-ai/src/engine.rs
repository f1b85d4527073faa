//! The request scheduler: debounces edit events, issues at most one live
//! prediction request, and owns the active-prediction slot.
//!
//! Responses are tagged with a monotonically increasing generation counter;
//! only the response to the most recently issued request may touch state.
//! Cancellation is cooperative: superseded debounce timers and in-flight
//! requests get their token cancelled, and a response that arrives anyway is
//! discarded by the generation check.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use scribe_core::{
    extract_context_with_limits, previous_sentence, sentence_around, CURSOR_MARKER,
};

use crate::{
    accept::{plan_insertion, InsertionPlan},
    config::EngineConfig,
    error::PredictionError,
    prompt::PromptBuilder,
    provider::{CompletionProvider, CompletionRequest},
    reconcile::reconcile,
};

/// Scheduler states. Exposed for observability; consumers must not drive
/// transitions themselves.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EnginePhase {
    Idle,
    Debouncing,
    AwaitingResponse,
}

/// An immutable copy of the document at the moment of an edit event.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DocumentSnapshot {
    pub text: String,
    /// Caret byte offset into `text`.
    pub cursor: usize,
}

impl DocumentSnapshot {
    pub fn new(text: impl Into<String>, cursor: usize) -> Self {
        Self {
            text: text.into(),
            cursor,
        }
    }

    fn clamped_cursor(&self) -> usize {
        let mut cursor = self.cursor.min(self.text.len());
        while cursor > 0 && !self.text.is_char_boundary(cursor) {
            cursor -= 1;
        }
        cursor
    }
}

struct EngineState {
    phase: EnginePhase,
    active: Option<String>,
    last_error: Option<String>,
    /// Cancels the pending debounce timer or the in-flight request.
    debounce: Option<CancellationToken>,
}

struct EngineInner {
    config: EngineConfig,
    provider: Arc<dyn CompletionProvider>,
    prompt: PromptBuilder,
    generation: AtomicU64,
    state: Mutex<EngineState>,
}

/// The prediction engine. Cheap to clone; all clones share one state slot.
///
/// Must be used from within a tokio runtime: edit handling spawns the
/// debounce timer task.
#[derive(Clone)]
pub struct PredictionEngine {
    inner: Arc<EngineInner>,
}

impl PredictionEngine {
    pub fn new(config: EngineConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                config,
                provider,
                prompt: PromptBuilder::default(),
                generation: AtomicU64::new(0),
                state: Mutex::new(EngineState {
                    phase: EnginePhase::Idle,
                    active: None,
                    last_error: None,
                    debounce: None,
                }),
            }),
        }
    }

    pub fn with_prompt_builder(mut self, prompt: PromptBuilder) -> Self {
        Arc::get_mut(&mut self.inner)
            .expect("with_prompt_builder must be called before the engine is shared")
            .prompt = prompt;
        self
    }

    /// Handle an edit event: supersede any pending work and, if the edit is
    /// eligible for a prediction, restart the debounce timer.
    pub fn handle_edit(&self, snapshot: DocumentSnapshot) {
        let inner = &self.inner;
        let mut state = inner.state.lock();

        if let Some(token) = state.debounce.take() {
            token.cancel();
        }
        // Invalidate any in-flight response; the edit changed its context.
        inner.generation.fetch_add(1, Ordering::SeqCst);
        state.active = None;
        state.last_error = None;

        let cursor = snapshot.clamped_cursor();
        let typed = &snapshot.text[..cursor];
        if !edit_is_eligible(typed, inner.config.min_typed_chars) {
            tracing::debug!(cursor, "edit not eligible for prediction");
            state.phase = EnginePhase::Idle;
            return;
        }

        state.phase = EnginePhase::Debouncing;
        let token = CancellationToken::new();
        let task_token = token.clone();
        let task_inner = Arc::clone(inner);
        let delay = inner.config.debounce;
        tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    issue_request(task_inner, task_token.clone(), snapshot).await;
                }
            }
        });
        state.debounce = Some(token);
    }

    /// A document mutation invalidates the context the prediction was built
    /// from: drop everything and return to idle.
    pub fn handle_document_change(&self) {
        self.clear_pending();
    }

    /// A non-accept interaction (any other key, a pointer click) dismisses
    /// the suggestion.
    pub fn dismiss(&self) {
        self.clear_pending();
    }

    /// Consume the active prediction and plan its insertion after
    /// `typed_tail` (sentence start to caret). The prediction slot is
    /// cleared whether or not there was anything to insert.
    pub fn accept(&self, typed_tail: &str) -> Option<InsertionPlan> {
        let suggestion = {
            let mut state = self.inner.state.lock();
            if let Some(token) = state.debounce.take() {
                token.cancel();
            }
            self.inner.generation.fetch_add(1, Ordering::SeqCst);
            state.phase = EnginePhase::Idle;
            state.active.take()
        };
        suggestion.map(|text| plan_insertion(typed_tail, &text))
    }

    pub fn active_prediction(&self) -> Option<String> {
        self.inner.state.lock().active.clone()
    }

    /// The last surfaced request error, cleared by the next edit.
    pub fn last_error(&self) -> Option<String> {
        self.inner.state.lock().last_error.clone()
    }

    pub fn phase(&self) -> EnginePhase {
        self.inner.state.lock().phase
    }

    fn clear_pending(&self) {
        let mut state = self.inner.state.lock();
        if let Some(token) = state.debounce.take() {
            token.cancel();
        }
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        state.phase = EnginePhase::Idle;
        state.active = None;
    }
}

/// Whether the text before the cursor warrants asking for a continuation.
fn edit_is_eligible(typed: &str, min_typed_chars: usize) -> bool {
    let trimmed = typed.trim_end();
    if trimmed.is_empty() {
        return false;
    }
    if typed.chars().count() < min_typed_chars {
        return false;
    }
    // A freshly finished sentence is unlikely to need a continuation.
    !trimmed
        .chars()
        .next_back()
        .is_some_and(scribe_core::is_sentence_terminator)
}

async fn issue_request(
    inner: Arc<EngineInner>,
    token: CancellationToken,
    snapshot: DocumentSnapshot,
) {
    let cursor = snapshot.clamped_cursor();

    let mut marked = String::with_capacity(snapshot.text.len() + CURSOR_MARKER.len());
    marked.push_str(&snapshot.text[..cursor]);
    marked.push_str(CURSOR_MARKER);
    marked.push_str(&snapshot.text[cursor..]);
    let window = extract_context_with_limits(&marked, cursor, &inner.config.context_limits());

    let span = sentence_around(&snapshot.text, cursor);
    let active_sentence = window.current_sentence.clone();
    let prior_sentence = previous_sentence(&snapshot.text, span.start)
        .unwrap_or_default()
        .to_string();

    let request =
        CompletionRequest::from_config(&inner.config.generation, inner.prompt.build(&window));

    let generation = {
        let mut state = inner.state.lock();
        if token.is_cancelled() {
            return;
        }
        state.phase = EnginePhase::AwaitingResponse;
        inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    };

    tracing::debug!(generation, "issuing prediction request");
    let result = inner.provider.complete(request, token).await;

    let mut state = inner.state.lock();
    if inner.generation.load(Ordering::SeqCst) != generation {
        tracing::debug!(generation, "discarding stale prediction response");
        return;
    }

    state.phase = EnginePhase::Idle;
    state.debounce = None;
    match result {
        Ok(raw) => {
            let suggestion = reconcile(&active_sentence, &prior_sentence, &raw);
            let suggestion = suggestion.trim();
            if suggestion.is_empty() {
                tracing::debug!(generation, "prediction fully overlapped typed text");
                state.active = None;
            } else {
                state.active = Some(suggestion.to_string());
            }
            state.last_error = None;
        }
        Err(PredictionError::Cancelled) => {
            state.active = None;
        }
        Err(err) => {
            tracing::warn!(generation, error = %err, "prediction request failed");
            state.active = None;
            state.last_error = Some(err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligibility_rejects_empty_and_whitespace() {
        assert!(!edit_is_eligible("", 5));
        assert!(!edit_is_eligible("   \n ", 5));
    }

    #[test]
    fn eligibility_rejects_short_text() {
        assert!(!edit_is_eligible("Hi", 5));
        assert!(edit_is_eligible("Hello", 5));
    }

    #[test]
    fn eligibility_rejects_finished_sentences() {
        assert!(!edit_is_eligible("Done.", 5));
        assert!(!edit_is_eligible("Done!  ", 5));
        assert!(!edit_is_eligible("Really? ", 5));
        assert!(edit_is_eligible("Done. But", 5));
    }

    #[test]
    fn snapshot_cursor_is_clamped() {
        let snapshot = DocumentSnapshot::new("héllo", 2);
        assert_eq!(snapshot.clamped_cursor(), 1);
        let past_end = DocumentSnapshot::new("abc", 10);
        assert_eq!(past_end.clamped_cursor(), 3);
    }
}
