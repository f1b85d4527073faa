use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    error::PredictionError,
    provider::{CompletionProvider, CompletionRequest},
};

/// Completion client for a local Ollama server (`/api/generate`).
#[derive(Clone)]
pub struct OllamaProvider {
    base_url: Url,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, PredictionError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url,
            timeout,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, PredictionError> {
        let base_str = self.base_url.as_str().trim_end_matches('/').to_string();
        let base = Url::parse(&format!("{base_str}/"))?;
        Ok(base.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<String, PredictionError> {
        let url = self.endpoint("/api/generate")?;
        let body = OllamaGenerateRequest {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                top_k: request.top_k,
                num_predict: request.max_tokens,
                stop: &request.stop,
            },
        };

        let fut = async {
            let response = self
                .client
                .post(url)
                .json(&body)
                .timeout(self.timeout)
                .send()
                .await?
                .error_for_status()?;

            let parsed: OllamaGenerateResponse = response.json().await?;
            Ok::<_, PredictionError>(parsed.response)
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(PredictionError::Cancelled),
            res = fut => res,
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions<'a>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions<'a> {
    temperature: f32,
    top_k: u32,
    num_predict: u32,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    stop: &'a [String],
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
}
