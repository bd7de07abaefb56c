//! Command handlers for the faqdesk CLI.

pub mod add;
pub mod delete;
pub mod refresh;
pub mod search;
pub mod stats;

// Re-export command types for convenience
pub use add::AddCommand;
pub use delete::DeleteCommand;
pub use refresh::RefreshCommand;
pub use search::SearchCommand;
pub use stats::StatsCommand;

use faqdesk_core::{config::AppConfig, AppResult};
use faqdesk_embed::{create_provider, EmbeddingConfig};
use faqdesk_knowledge::{JsonFileSource, KnowledgeService, SnapshotStore};
use std::sync::Arc;

/// Wire the knowledge service from the resolved configuration.
pub(crate) fn build_service(config: &AppConfig) -> AppResult<Arc<KnowledgeService>> {
    config.validate()?;

    let embedding = EmbeddingConfig {
        provider: config.provider.clone(),
        model: config.model.clone(),
        dimensions: config.dimensions,
        endpoint: config.endpoint.clone(),
        ..EmbeddingConfig::default()
    };
    let provider = create_provider(&embedding)?;

    let source = Arc::new(JsonFileSource::new(config.records_file()));
    let snapshots = SnapshotStore::new(config.cache_dir());

    Ok(Arc::new(KnowledgeService::new(
        source,
        provider,
        snapshots,
        config.search.clone(),
    )))
}
