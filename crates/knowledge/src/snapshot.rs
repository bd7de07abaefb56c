//! Durable snapshot of the store + index + source version tag.
//!
//! The snapshot lets a process start serving without re-fetching and
//! re-embedding the whole knowledge base. The controller owns the on-disk
//! layout exclusively: a records file, a serialized index blob, and a version
//! tag, all in one cache directory.

use faqdesk_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

use crate::store::KnowledgeStore;
use crate::vector_index::FlatIndex;

const ENTRIES_FILE: &str = "entries.json";
const INDEX_FILE: &str = "index.bin";
const VERSION_FILE: &str = "version.txt";

/// A loaded snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub store: KnowledgeStore,
    pub index: FlatIndex,

    /// Opaque upstream modification marker; compared, never parsed.
    pub version_tag: String,
}

/// Reads and writes snapshots under a fixed cache directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entries_path(&self) -> PathBuf {
        self.dir.join(ENTRIES_FILE)
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    fn version_path(&self) -> PathBuf {
        self.dir.join(VERSION_FILE)
    }

    /// Persist a snapshot, replacing any previous one.
    pub fn write(
        &self,
        store: &KnowledgeStore,
        index: &FlatIndex,
        version_tag: &str,
    ) -> AppResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::Snapshot(format!("Failed to create cache directory: {}", e))
        })?;

        let entries_json = serde_json::to_string_pretty(store)
            .map_err(|e| AppError::Snapshot(format!("Failed to serialize entries: {}", e)))?;
        std::fs::write(self.entries_path(), entries_json)
            .map_err(|e| AppError::Snapshot(format!("Failed to write entries file: {}", e)))?;

        std::fs::write(self.index_path(), index.to_bytes())
            .map_err(|e| AppError::Snapshot(format!("Failed to write index blob: {}", e)))?;

        std::fs::write(self.version_path(), version_tag)
            .map_err(|e| AppError::Snapshot(format!("Failed to write version tag: {}", e)))?;

        tracing::info!(
            "Snapshot written: {} entries, {} vectors, tag {:?}",
            store.len(),
            index.len(),
            version_tag
        );
        Ok(())
    }

    /// Load the snapshot, if one is fully present and well-formed.
    ///
    /// Partial presence (only some of the three files) and corrupt content
    /// are both treated as "absent": the caller rebuilds from the source of
    /// truth instead of failing.
    pub fn read(&self) -> Option<Snapshot> {
        let paths = [self.entries_path(), self.index_path(), self.version_path()];
        if !paths.iter().all(|p| p.exists()) {
            tracing::info!("Snapshot absent or incomplete at {:?}", self.dir);
            return None;
        }

        match self.read_parts(&paths[0], &paths[1], &paths[2]) {
            Ok(snapshot) => {
                tracing::info!(
                    "Snapshot loaded: {} entries, {} vectors",
                    snapshot.store.len(),
                    snapshot.index.len()
                );
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!("Snapshot corrupt, treating as absent: {}", e);
                None
            }
        }
    }

    fn read_parts(&self, entries: &Path, index: &Path, version: &Path) -> AppResult<Snapshot> {
        let entries_json = std::fs::read_to_string(entries)
            .map_err(|e| AppError::Snapshot(format!("Failed to read entries file: {}", e)))?;
        let store: KnowledgeStore = serde_json::from_str(&entries_json)
            .map_err(|e| AppError::Snapshot(format!("Failed to parse entries file: {}", e)))?;

        let index_bytes = std::fs::read(index)
            .map_err(|e| AppError::Snapshot(format!("Failed to read index blob: {}", e)))?;
        let index = FlatIndex::from_bytes(&index_bytes)?;

        let version_tag = std::fs::read_to_string(version)
            .map_err(|e| AppError::Snapshot(format!("Failed to read version tag: {}", e)))?
            .trim()
            .to_string();

        Ok(Snapshot {
            store,
            index,
            version_tag,
        })
    }

    /// Read only the stored version tag, for cheap staleness comparison.
    pub fn version_tag(&self) -> Option<String> {
        std::fs::read_to_string(self.version_path())
            .ok()
            .map(|s| s.trim().to_string())
    }
}
