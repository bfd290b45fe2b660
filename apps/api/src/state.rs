use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::summary::generator::SummaryGenerator;

/// Shared application state injected into all route handlers via Axum
/// extractors. Everything here is read-only after startup, so clones are
/// cheap and handlers need no coordination.
#[derive(Clone)]
pub struct AppState {
    /// Used directly by the chat assistant; the summary path goes through
    /// `generator`.
    pub llm: LlmClient,
    pub generator: Arc<SummaryGenerator>,
    pub config: Config,
}
