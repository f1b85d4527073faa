use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{config::GenerationConfig, error::PredictionError};

/// A single prompt plus the sampling parameters for one completion call.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub top_k: u32,
    pub max_tokens: u32,
    pub stop: Vec<String>,
}

impl CompletionRequest {
    pub fn from_config(config: &GenerationConfig, prompt: String) -> Self {
        Self {
            model: config.model.clone(),
            prompt,
            temperature: config.temperature,
            top_k: config.top_k,
            max_tokens: config.max_tokens,
            stop: config.stop_sequences.clone(),
        }
    }
}

/// The model client seam.
///
/// One request in, one raw completion string out. The engine treats the call
/// as fire-and-forget: providers may ignore `cancel` entirely (the
/// generation check discards late arrivals either way), but well-behaved
/// implementations return [`PredictionError::Cancelled`] promptly.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        request: CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<String, PredictionError>;
}
