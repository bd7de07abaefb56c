//! Ordered knowledge entry store.

use faqdesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::types::{KnowledgeEntry, RawRecord};
use crate::vector_index::FlatIndex;

/// The single source of in-memory truth for entries.
///
/// Insertion order is significant: the entry at position *i* corresponds to
/// vector *i* in the paired index. Because malformed source records are
/// dropped at validation, store positions do not line up with raw source
/// positions; each entry carries its raw position so write-through deletes
/// target the right source record. All mutations go through the service
/// layer, which keeps the pair in lockstep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeStore {
    entries: Vec<KnowledgeEntry>,

    /// Raw source position of each entry, parallel to `entries`.
    #[serde(default)]
    source_positions: Vec<usize>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate raw source records into a store.
    ///
    /// Malformed records (missing question or answer) are dropped at this
    /// boundary with a warning; surviving entries keep the source order and
    /// remember their raw source position.
    pub fn from_records(records: &[RawRecord]) -> Self {
        let mut entries = Vec::with_capacity(records.len());
        let mut source_positions = Vec::with_capacity(records.len());
        for (position, raw) in records.iter().enumerate() {
            match KnowledgeEntry::from_raw(raw) {
                Some(entry) => {
                    entries.push(entry);
                    source_positions.push(position);
                }
                None => {
                    tracing::warn!(
                        "Rejecting malformed record at position {}: missing question or answer",
                        position
                    );
                }
            }
        }
        Self {
            entries,
            source_positions,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&KnowledgeEntry> {
        self.entries.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.iter()
    }

    pub fn push(&mut self, entry: KnowledgeEntry, source_position: usize) {
        self.entries.push(entry);
        self.source_positions.push(source_position);
    }

    /// Raw source position of the entry at `position`.
    pub fn source_position(&self, position: usize) -> Option<usize> {
        self.source_positions.get(position).copied()
    }

    /// Remove the entry at `position`, shifting later entries down.
    ///
    /// The caller must rebuild the paired index afterwards; positional
    /// identity of every later entry changes. Source positions past the
    /// removed record shift down with it.
    pub fn remove(&mut self, position: usize) -> Option<KnowledgeEntry> {
        if position >= self.entries.len() {
            return None;
        }
        let removed_source = self.source_positions.remove(position);
        for source in self.source_positions.iter_mut() {
            if *source > removed_source {
                *source -= 1;
            }
        }
        Some(self.entries.remove(position))
    }

    /// Question texts in store order, for bulk embedding.
    pub fn questions(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.question.clone()).collect()
    }

    /// Verify the store/index pairing invariant.
    pub fn check_sync(&self, index: &FlatIndex) -> AppResult<()> {
        if self.entries.len() != index.len() {
            return Err(AppError::IndexDesync {
                entries: self.entries.len(),
                vectors: index.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(question: &str, keywords: &str, answer: &str) -> RawRecord {
        RawRecord::new(question, keywords, answer)
    }

    #[test]
    fn test_from_records_drops_malformed() {
        let records = vec![
            raw("Вопрос 1?", "кл1", "Ответ 1"),
            RawRecord {
                question: None,
                keywords: None,
                answer: Some("сирота".to_string()),
            },
            raw("Вопрос 2?", "", "Ответ 2"),
        ];

        let store = KnowledgeStore::from_records(&records);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().question, "Вопрос 1?");
        assert_eq!(store.get(1).unwrap().question, "Вопрос 2?");
        // Dropped record at raw position 1 leaves a gap in the mapping
        assert_eq!(store.source_position(0), Some(0));
        assert_eq!(store.source_position(1), Some(2));
        assert_eq!(store.source_position(2), None);
    }

    #[test]
    fn test_remove_shifts_positions() {
        let records = vec![
            raw("a?", "", "1"),
            raw("b?", "", "2"),
            raw("c?", "", "3"),
        ];
        let mut store = KnowledgeStore::from_records(&records);

        let removed = store.remove(1).unwrap();
        assert_eq!(removed.question, "b?");
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().question, "c?");
        assert!(store.remove(5).is_none());
        // Source positions past the removed record shift with the delete
        assert_eq!(store.source_position(0), Some(0));
        assert_eq!(store.source_position(1), Some(1));
    }

    #[test]
    fn test_push_records_source_position() {
        let mut store = KnowledgeStore::from_records(&[raw("a?", "", "1")]);
        store.push(KnowledgeEntry::new("b?", "", "2"), 3);
        assert_eq!(store.source_position(1), Some(3));
    }

    #[test]
    fn test_check_sync() {
        let store = KnowledgeStore::from_records(&[raw("q?", "", "a")]);

        let mut index = FlatIndex::new();
        assert!(store.check_sync(&index).is_err());

        index.add(&[1.0, 0.0]).unwrap();
        assert!(store.check_sync(&index).is_ok());

        index.add(&[0.0, 1.0]).unwrap();
        let err = store.check_sync(&index).unwrap_err();
        assert!(matches!(
            err,
            AppError::IndexDesync {
                entries: 1,
                vectors: 2
            }
        ));
    }

    #[test]
    fn test_questions_in_order() {
        let store = KnowledgeStore::from_records(&[raw("первый?", "", "1"), raw("второй?", "", "2")]);
        assert_eq!(store.questions(), vec!["первый?", "второй?"]);
    }
}
