use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::generator::FeedbackGenerator;
use crate::analysis::parser::FeedbackParser;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable generation backend. Default: `LlmClient`.
    pub generator: Arc<dyn FeedbackGenerator>,
    /// Pluggable response parser. Default: `HeaderSectionParser`.
    pub parser: Arc<dyn FeedbackParser>,
}
