/// NER Client — the single point of entry for named-entity recognition.
///
/// ARCHITECTURAL RULE: No other module may call the inference API directly.
/// The extraction core consumes the capability through the `NerProvider`
/// trait so it can be exercised with a mock in tests.
///
/// Model: dslim/bert-base-NER via the hosted Hugging Face inference API,
/// with `aggregation_strategy: "simple"` so sub-word pieces arrive grouped.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const INFERENCE_API_URL: &str = "https://api-inference.huggingface.co/models/dslim/bert-base-NER";
const MAX_RETRIES: u32 = 3;

/// Entity group tag for person spans.
pub const PERSON_TAG: &str = "PER";

#[derive(Debug, Error)]
pub enum NerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model still loading after {retries} retries")]
    ModelLoading { retries: u32 },
}

/// One recognized entity span. Offsets are character positions into the
/// text that was submitted for inference.
#[derive(Debug, Clone, Deserialize)]
pub struct Entity {
    pub entity_group: String,
    pub word: String,
    pub start: usize,
    pub end: usize,
    pub score: f32,
}

/// The NER capability consumed by the extraction core.
///
/// Carried in `AppState` as `Arc<dyn NerProvider>`. Implementations are
/// expected to be cheap to call after a one-time initialization; the
/// production client holds a reused connection pool.
#[async_trait]
pub trait NerProvider: Send + Sync {
    async fn entities(&self, text: &str) -> Result<Vec<Entity>, NerError>;
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    aggregation_strategy: &'static str,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

/// Hosted inference client. Retries on 429/5xx and on the 503 the API
/// returns while the model container is cold.
pub struct HuggingFaceNer {
    client: Client,
    api_token: String,
}

impl HuggingFaceNer {
    pub fn new(api_token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
            api_token,
        }
    }
}

#[async_trait]
impl NerProvider for HuggingFaceNer {
    async fn entities(&self, text: &str) -> Result<Vec<Entity>, NerError> {
        let request_body = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                aggregation_strategy: "simple",
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut last_error: Option<NerError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "NER call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(INFERENCE_API_URL)
                .bearer_auth(&self.api_token)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(NerError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("NER API returned {}: {}", status, body);
                last_error = Some(NerError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(NerError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let entities: Vec<Entity> = response.json().await?;
            debug!("NER call succeeded: {} entities", entities.len());
            return Ok(entities);
        }

        Err(last_error.unwrap_or(NerError::ModelLoading {
            retries: MAX_RETRIES,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_deserializes_from_inference_payload() {
        let json = r#"[
            {"entity_group": "PER", "score": 0.998, "word": "Sujan", "start": 0, "end": 5},
            {"entity_group": "ORG", "score": 0.91, "word": "IIT Madras", "start": 20, "end": 30}
        ]"#;
        let entities: Vec<Entity> = serde_json::from_str(json).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].entity_group, PERSON_TAG);
        assert_eq!(entities[0].word, "Sujan");
        assert_eq!(entities[0].start, 0);
        assert_eq!(entities[1].entity_group, "ORG");
    }
}
