//! Knowledge service: owned state, cache control, and refresh scheduling.
//!
//! The store+index pair is process-shared, read-mostly state. It is owned
//! here, behind a single `RwLock`: readers search under a read guard,
//! `append`/`delete`/`refresh` serialize their read-modify-write sequences
//! under the write guard, and `refresh` builds the replacement pair aside and
//! swaps it in whole so no reader ever observes a half-updated base.

use faqdesk_core::config::SearchConfig;
use faqdesk_core::AppResult;
use faqdesk_embed::EmbeddingProvider;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::ranker;
use crate::snapshot::SnapshotStore;
use crate::source::RecordSource;
use crate::store::KnowledgeStore;
use crate::types::{KnowledgeEntry, SearchOutcome};
use crate::vector_index::FlatIndex;

/// The paired store + index, plus whether a load ever succeeded.
///
/// `loaded` distinguishes "the base is genuinely empty" from "we could not
/// reach the source and degraded to empty": only the latter makes searches
/// report unavailability.
#[derive(Debug, Default)]
struct KbState {
    store: KnowledgeStore,
    index: FlatIndex,
    loaded: bool,
}

/// Service statistics for CLI and diagnostics output.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub entries: usize,
    pub vectors: usize,
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_tag: Option<String>,
}

/// The retrieval engine's public surface.
pub struct KnowledgeService {
    state: Arc<RwLock<KbState>>,
    source: Arc<dyn RecordSource>,
    provider: Arc<dyn EmbeddingProvider>,
    snapshots: SnapshotStore,
    search_config: SearchConfig,
}

impl KnowledgeService {
    pub fn new(
        source: Arc<dyn RecordSource>,
        provider: Arc<dyn EmbeddingProvider>,
        snapshots: SnapshotStore,
        search_config: SearchConfig,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(KbState::default())),
            source,
            provider,
            snapshots,
            search_config,
        }
    }

    /// Load the knowledge base: snapshot first, source rebuild as fallback.
    ///
    /// Any failure degrades to an empty, unavailable base rather than
    /// raising; availability wins over failing closed. Returns the number of
    /// entries now in memory.
    pub async fn load(&self) -> usize {
        if let Some(snapshot) = self.snapshots.read() {
            match snapshot.store.check_sync(&snapshot.index) {
                Ok(()) => {
                    let len = snapshot.store.len();
                    self.install(snapshot.store, snapshot.index, true).await;
                    tracing::info!("Knowledge base loaded from snapshot: {} entries", len);
                    return len;
                }
                Err(e) => {
                    tracing::warn!("Snapshot inconsistent ({}), rebuilding from source", e);
                }
            }
        }

        self.refresh().await
    }

    /// Re-fetch from the source of truth and rebuild the index from scratch.
    ///
    /// The replacement pair is built aside and swapped in atomically. On any
    /// source or embedding failure the base degrades to empty and searches
    /// report unavailability until a later attempt succeeds.
    pub async fn refresh(&self) -> usize {
        match self.rebuild().await {
            Ok((store, index, version_tag)) => {
                let len = store.len();

                if let Err(e) = self.snapshots.write(&store, &index, &version_tag) {
                    tracing::warn!("Failed to persist snapshot: {}", e);
                }

                self.install(store, index, true).await;
                tracing::info!("Knowledge base refreshed: {} entries", len);
                len
            }
            Err(e) => {
                tracing::error!("Refresh failed, degrading to empty base: {}", e);
                self.install(KnowledgeStore::new(), FlatIndex::new(), false)
                    .await;
                0
            }
        }
    }

    /// Refresh only if the source's version tag differs from the snapshot's.
    ///
    /// Returns whether a refresh ran. Intended for the background task.
    pub async fn refresh_if_stale(&self) -> bool {
        let source_tag = match self.source.version_tag().await {
            Ok(tag) => tag,
            Err(e) => {
                tracing::warn!("Staleness check skipped, source unreachable: {}", e);
                return false;
            }
        };

        let cached_tag = self.snapshots.version_tag();
        if cached_tag.as_deref() == Some(source_tag.as_str()) {
            tracing::debug!("Source unchanged (tag {:?})", source_tag);
            return false;
        }

        tracing::info!(
            "Source changed (cached {:?}, current {:?}), refreshing",
            cached_tag,
            source_tag
        );
        self.refresh().await;
        true
    }

    /// Spawn the periodic staleness check on a fixed wall-clock interval.
    pub fn spawn_refresh_task(self: &Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick fires immediately; skip it, load() already ran
            interval.tick().await;
            loop {
                interval.tick().await;
                service.refresh_if_stale().await;
            }
        })
    }

    /// Rank entries against a query.
    ///
    /// An empty or desynced in-memory state triggers a load/refresh before
    /// answering. Only an embedding-provider failure during the fallback
    /// phase surfaces as an error; callers retry or report unavailability.
    pub async fn search(&self, query: &str) -> AppResult<SearchOutcome> {
        let mut desynced = false;

        {
            let state = self.state.read().await;
            if state.loaded {
                match state.store.check_sync(&state.index) {
                    Ok(()) => {
                        return ranker::search(
                            query,
                            &state.store,
                            &state.index,
                            self.provider.as_ref(),
                            &self.search_config,
                        )
                        .await;
                    }
                    Err(e) => {
                        tracing::error!("{}; forcing refresh before serving", e);
                        desynced = true;
                    }
                }
            } else {
                tracing::warn!("Knowledge base not loaded, loading before search");
            }
        }

        if desynced {
            self.refresh().await;
        } else {
            self.load().await;
        }

        let state = self.state.read().await;
        if !state.loaded {
            return Ok(SearchOutcome::Unavailable);
        }

        ranker::search(
            query,
            &state.store,
            &state.index,
            self.provider.as_ref(),
            &self.search_config,
        )
        .await
    }

    /// Append an entry, writing through to the source of truth first.
    ///
    /// Only a confirmed source write mutates memory and the snapshot; a
    /// source failure changes nothing, so the cache can never claim an entry
    /// the source never received. Returns whether the entry is now part of
    /// the served base; failures are logged, not raised.
    pub async fn append(&self, question: &str, keywords: &str, answer: &str) -> bool {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            tracing::warn!("Rejecting append with empty question or answer");
            return false;
        }

        let entry = KnowledgeEntry::new(question, keywords, answer);

        // Positional correlation with the source requires a loaded base
        if !self.state.read().await.loaded {
            self.load().await;
        }

        // Hold the write guard across the whole read-modify-write sequence
        // so concurrent appends and refreshes cannot interleave
        let mut state = self.state.write().await;

        let source_position = match self.source.append(&entry).await {
            Ok(position) => position,
            Err(e) => {
                tracing::error!("Source append failed, state unchanged: {}", e);
                return false;
            }
        };

        let embedding = match self.provider.embed(&entry.question).await {
            Ok(embedding) => embedding,
            Err(e) => {
                // The source has the record but we cannot index it; the
                // snapshot tag is now stale, so the next staleness pass
                // reconciles memory with the source
                tracing::error!("Embedding failed after source write: {}", e);
                return false;
            }
        };

        if let Err(e) = state.index.add(&embedding) {
            tracing::error!("Index add failed after source write: {}", e);
            return false;
        }
        state.store.push(entry, source_position);

        self.persist(&state).await;
        tracing::info!(
            "Appended entry {:?}, base now {} entries",
            question,
            state.store.len()
        );
        true
    }

    /// Delete the entry at `position`, rebuilding the index from the
    /// filtered store.
    ///
    /// `position` addresses the served base, which skips records the source
    /// holds but validation rejected; the write-through targets the entry's
    /// remembered raw source position, not `position` itself. The index has
    /// no delete-by-position operation, so the replacement is a rebuilt copy
    /// with the vector removed; positional correlation with the store is
    /// preserved for every surviving entry.
    pub async fn delete(&self, position: usize) -> bool {
        if !self.state.read().await.loaded {
            self.load().await;
        }

        let mut state = self.state.write().await;

        let source_position = match state.store.source_position(position) {
            Some(source_position) => source_position,
            None => {
                tracing::warn!(
                    "Delete position {} out of range ({} entries)",
                    position,
                    state.store.len()
                );
                return false;
            }
        };

        if let Err(e) = self.source.delete(source_position).await {
            tracing::error!("Source delete failed, state unchanged: {}", e);
            return false;
        }

        let removed = state.store.remove(position);
        state.index = state.index.rebuilt_without(position);

        self.persist(&state).await;
        tracing::info!(
            "Deleted entry {:?} at position {}, base now {} entries",
            removed.map(|e| e.question),
            position,
            state.store.len()
        );
        true
    }

    /// Question texts in served order; an entry's position in this list is
    /// the position `delete` accepts.
    pub async fn questions(&self) -> Vec<String> {
        self.state.read().await.store.questions()
    }

    /// Current state statistics.
    pub async fn stats(&self) -> ServiceStats {
        let state = self.state.read().await;
        ServiceStats {
            entries: state.store.len(),
            vectors: state.index.len(),
            loaded: state.loaded,
            snapshot_tag: self.snapshots.version_tag(),
        }
    }

    /// Fetch records, validate, and embed every question in bulk.
    async fn rebuild(&self) -> AppResult<(KnowledgeStore, FlatIndex, String)> {
        let records = self.source.fetch_all().await?;
        let store = KnowledgeStore::from_records(&records);

        if store.len() < records.len() {
            tracing::warn!(
                "{} of {} source records rejected at validation",
                records.len() - store.len(),
                records.len()
            );
        }

        let mut index = FlatIndex::with_dimension(self.provider.dimensions());
        if !store.is_empty() {
            tracing::info!("Embedding {} questions for index rebuild", store.len());
            let embeddings = self.provider.embed_batch(&store.questions()).await?;
            index.add_batch(&embeddings)?;
        }

        store.check_sync(&index)?;

        let version_tag = match self.source.version_tag().await {
            Ok(tag) => tag,
            Err(e) => {
                tracing::warn!("Could not fetch source version tag: {}", e);
                String::new()
            }
        };

        Ok((store, index, version_tag))
    }

    /// Swap in a fully-built state.
    async fn install(&self, store: KnowledgeStore, index: FlatIndex, loaded: bool) {
        let mut state = self.state.write().await;
        *state = KbState {
            store,
            index,
            loaded,
        };
    }

    /// Persist the current state, refreshing the version tag from the source
    /// the write-through just modified. Snapshot failures are non-fatal.
    async fn persist(&self, state: &KbState) {
        let version_tag = match self.source.version_tag().await {
            Ok(tag) => tag,
            Err(e) => {
                tracing::warn!("Could not fetch source version tag: {}", e);
                String::new()
            }
        };

        if let Err(e) = self
            .snapshots
            .write(&state.store, &state.index, &version_tag)
        {
            tracing::warn!("Failed to persist snapshot: {}", e);
        }
    }
}
