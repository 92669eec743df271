use std::sync::Arc;

use crate::config::Config;
use crate::ner::NerProvider;
use crate::storage::CsvStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CsvStore>,
    /// NER capability behind a trait so tests can swap in a mock.
    /// Initialized once at startup and reused across requests.
    pub ner: Arc<dyn NerProvider>,
    /// Shared HTTP client for Twilio media downloads.
    pub http: reqwest::Client,
    pub config: Config,
}
