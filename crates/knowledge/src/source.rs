//! Record source abstraction: the external source of truth.
//!
//! The engine never talks to a concrete backend directly; it requires these
//! capabilities from an injected collaborator. `JsonFileSource` is the
//! bundled local-first implementation (a JSON array of records on disk).

use chrono::{DateTime, Utc};
use faqdesk_core::{AppError, AppResult};
use std::path::PathBuf;

use crate::types::{KnowledgeEntry, RawRecord};

/// Capabilities the engine requires from the source of truth.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every record, in source order.
    async fn fetch_all(&self) -> AppResult<Vec<RawRecord>>;

    /// Append one record, returning its position in the source. Must be
    /// durable before returning: the engine only mutates its in-memory state
    /// after a confirmed write.
    async fn append(&self, entry: &KnowledgeEntry) -> AppResult<usize>;

    /// Delete the record at `position`.
    async fn delete(&self, position: usize) -> AppResult<()>;

    /// Opaque upstream modification marker, used purely for staleness
    /// comparison, never parsed.
    async fn version_tag(&self) -> AppResult<String>;
}

/// File-backed record source: a JSON array of record objects.
///
/// The version tag is the file's modification time. A missing file reads as
/// an empty source (a new knowledge base), not an error.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_records(&self) -> AppResult<Vec<RawRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::Source(format!("Failed to read {:?}: {}", self.path, e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| AppError::Source(format!("Failed to parse {:?}: {}", self.path, e)))
    }

    async fn write_records(&self, records: &[RawRecord]) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Source(format!("Failed to create source directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| AppError::Source(format!("Failed to serialize records: {}", e)))?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| AppError::Source(format!("Failed to write {:?}: {}", self.path, e)))
    }
}

#[async_trait::async_trait]
impl RecordSource for JsonFileSource {
    async fn fetch_all(&self) -> AppResult<Vec<RawRecord>> {
        let records = self.read_records().await?;
        tracing::info!("Fetched {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    async fn append(&self, entry: &KnowledgeEntry) -> AppResult<usize> {
        let mut records = self.read_records().await?;
        let position = records.len();
        records.push(RawRecord::new(
            &entry.question,
            &entry.keywords.join(","),
            &entry.answer,
        ));
        self.write_records(&records).await?;

        tracing::info!(
            "Appended record to source at position {}: {:?}",
            position,
            entry.question
        );
        Ok(position)
    }

    async fn delete(&self, position: usize) -> AppResult<()> {
        let mut records = self.read_records().await?;
        if position >= records.len() {
            return Err(AppError::Source(format!(
                "Delete position {} out of range ({} records)",
                position,
                records.len()
            )));
        }

        records.remove(position);
        self.write_records(&records).await?;

        tracing::info!("Deleted record {} from source", position);
        Ok(())
    }

    async fn version_tag(&self) -> AppResult<String> {
        if !self.path.exists() {
            return Ok(String::new());
        }

        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| AppError::Source(format!("Failed to stat {:?}: {}", self.path, e)))?;

        let modified = metadata
            .modified()
            .map_err(|e| AppError::Source(format!("No modification time: {}", e)))?;

        Ok(DateTime::<Utc>::from(modified).to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(question: &str, keywords: &str, answer: &str) -> KnowledgeEntry {
        KnowledgeEntry::new(question, keywords, answer)
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let temp = TempDir::new().unwrap();
        let source = JsonFileSource::new(temp.path().join("records.json"));

        assert!(source.fetch_all().await.unwrap().is_empty());
        assert_eq!(source.version_tag().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_append_then_fetch() {
        let temp = TempDir::new().unwrap();
        let source = JsonFileSource::new(temp.path().join("records.json"));

        let first = source
            .append(&entry("Как настроить Wi-Fi?", "wifi,настройка", "Ответ."))
            .await
            .unwrap();
        let second = source
            .append(&entry("Как вернуть товар?", "возврат", "Ответ."))
            .await
            .unwrap();
        assert_eq!(first, 0);
        assert_eq!(second, 1);

        let records = source.fetch_all().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question.as_deref(), Some("Как настроить Wi-Fi?"));
    }

    #[tokio::test]
    async fn test_delete_out_of_range() {
        let temp = TempDir::new().unwrap();
        let source = JsonFileSource::new(temp.path().join("records.json"));

        let err = source.delete(0).await.unwrap_err();
        assert!(matches!(err, AppError::Source(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_positionally() {
        let temp = TempDir::new().unwrap();
        let source = JsonFileSource::new(temp.path().join("records.json"));

        source.append(&entry("a?", "", "1")).await.unwrap();
        source.append(&entry("b?", "", "2")).await.unwrap();
        source.delete(0).await.unwrap();

        let records = source.fetch_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question.as_deref(), Some("b?"));
    }

    #[tokio::test]
    async fn test_version_tag_present_after_write() {
        let temp = TempDir::new().unwrap();
        let source = JsonFileSource::new(temp.path().join("records.json"));

        source.append(&entry("q?", "", "a")).await.unwrap();
        let tag = source.version_tag().await.unwrap();
        assert!(!tag.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_source_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("records.json");
        std::fs::write(&path, "not json at all").unwrap();

        let source = JsonFileSource::new(path);
        assert!(matches!(
            source.fetch_all().await.unwrap_err(),
            AppError::Source(_)
        ));
    }
}
