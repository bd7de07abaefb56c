//! Knowledge base retrieval engine.
//!
//! Ranks question/keywords/answer entries against a free-text query with a
//! weighted lexical pass and a vector-distance fallback, keeps the entry list
//! and the flat vector index in positional lockstep, and caches both in a
//! durable snapshot with staleness-driven refresh.

pub mod normalize;
pub mod ranker;
pub mod service;
pub mod snapshot;
pub mod source;
pub mod store;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use service::KnowledgeService;
pub use snapshot::{Snapshot, SnapshotStore};
pub use source::{JsonFileSource, RecordSource};
pub use store::KnowledgeStore;
pub use types::{KnowledgeEntry, RawRecord, ScoredEntry, SearchOutcome};
pub use vector_index::FlatIndex;
