use std::sync::Arc;

use crate::config::Config;
use crate::gateway::ApiClient;
use crate::llm_client::Completion;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Anonymous gateway client; handlers derive a per-request client carrying the
    /// caller's bearer token.
    pub api: ApiClient,
    pub llm: Arc<dyn Completion>,
}

impl AppState {
    pub fn api_for(&self, token: Option<String>) -> ApiClient {
        self.api.with_token(token)
    }
}
