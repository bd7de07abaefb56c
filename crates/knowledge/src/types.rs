//! Knowledge base data types.

use serde::{Deserialize, Serialize};

use crate::normalize;

/// A record as it arrives from the source of truth, before validation.
///
/// Upstream storage is loosely typed: fields may be missing and keywords may
/// come back as a string, a number, or a list. Everything is coerced or
/// rejected at the ingestion boundary, never downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, alias = "Question")]
    pub question: Option<String>,

    #[serde(default, alias = "Keywords")]
    pub keywords: Option<serde_json::Value>,

    #[serde(default, alias = "Answer")]
    pub answer: Option<String>,
}

impl RawRecord {
    /// Build a raw record from owned strings (used when writing through).
    pub fn new(question: &str, keywords: &str, answer: &str) -> Self {
        Self {
            question: Some(question.to_string()),
            keywords: Some(serde_json::Value::String(keywords.to_string())),
            answer: Some(answer.to_string()),
        }
    }
}

/// One validated question/keywords/answer entry.
///
/// Immutable once created; edits replace the entry wholesale. Identity is
/// positional within the store, so callers must not assume an entry keeps its
/// index across deletions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub question: String,

    /// Curator-supplied relevance signals; may be empty.
    #[serde(default)]
    pub keywords: Vec<String>,

    pub answer: String,
}

impl KnowledgeEntry {
    /// Create an entry from a raw comma-separated keyword string.
    pub fn new(question: impl Into<String>, keywords: &str, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            keywords: normalize::split_keywords(keywords),
            answer: answer.into(),
        }
    }

    /// Validate a raw record into an entry.
    ///
    /// Requires a non-empty question and answer; keywords are coerced from
    /// whatever shape the source produced. Returns `None` for records that
    /// cannot be repaired.
    pub fn from_raw(raw: &RawRecord) -> Option<Self> {
        let question = raw.question.as_deref().map(str::trim).unwrap_or("");
        let answer = raw.answer.as_deref().map(str::trim).unwrap_or("");

        if question.is_empty() || answer.is_empty() {
            return None;
        }

        let keywords = match &raw.keywords {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::String(s)) => normalize::split_keywords(s),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            // Numbers and anything else stringify, matching upstream cells
            // that hold a bare number
            Some(other) => normalize::split_keywords(&other.to_string()),
        };

        Some(Self {
            question: question.to_string(),
            keywords,
            answer: answer.to_string(),
        })
    }
}

/// One ranked search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredEntry {
    pub question: String,

    /// Answer text, truncated to the configured preview length with a
    /// trailing ellipsis when longer. Scoring always used the full text.
    pub answer: String,

    pub score: f32,

    /// Query words that hit the keyword list (empty for fallback results)
    #[serde(default)]
    pub matched_keywords: Vec<String>,

    /// Query words that hit the question text
    #[serde(default)]
    pub matched_question_words: Vec<String>,

    /// Query words that hit the answer text
    #[serde(default)]
    pub matched_answer_words: Vec<String>,
}

/// Outcome of a search.
///
/// An empty result is a valid, expected outcome, not a failure; callers must
/// branch on the variant instead of treating `NoMatch` as an error.
#[derive(Debug, Clone, Serialize)]
pub enum SearchOutcome {
    /// Ranked entries, best first, at most top-k.
    Found(Vec<ScoredEntry>),

    /// Both phases ran and nothing was relevant enough.
    NoMatch,

    /// The knowledge base could not be loaded; try again later.
    Unavailable,
}

impl SearchOutcome {
    /// Ranked entries, if any.
    pub fn entries(&self) -> &[ScoredEntry] {
        match self {
            SearchOutcome::Found(entries) => entries,
            _ => &[],
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw_valid() {
        let raw = RawRecord::new("Как настроить Wi-Fi?", "wifi,настройка", "Откройте настройки.");
        let entry = KnowledgeEntry::from_raw(&raw).unwrap();
        assert_eq!(entry.question, "Как настроить Wi-Fi?");
        assert_eq!(entry.keywords, vec!["wifi", "настройка"]);
    }

    #[test]
    fn test_from_raw_rejects_missing_question() {
        let raw = RawRecord {
            question: None,
            keywords: None,
            answer: Some("answer".to_string()),
        };
        assert!(KnowledgeEntry::from_raw(&raw).is_none());
    }

    #[test]
    fn test_from_raw_rejects_blank_answer() {
        let raw = RawRecord {
            question: Some("вопрос".to_string()),
            keywords: None,
            answer: Some("   ".to_string()),
        };
        assert!(KnowledgeEntry::from_raw(&raw).is_none());
    }

    #[test]
    fn test_from_raw_coerces_numeric_keywords() {
        let raw = RawRecord {
            question: Some("вопрос".to_string()),
            keywords: Some(json!(12345)),
            answer: Some("ответ".to_string()),
        };
        let entry = KnowledgeEntry::from_raw(&raw).unwrap();
        assert_eq!(entry.keywords, vec!["12345"]);
    }

    #[test]
    fn test_from_raw_accepts_keyword_array() {
        let raw = RawRecord {
            question: Some("вопрос".to_string()),
            keywords: Some(json!(["wifi", " роутер ", ""])),
            answer: Some("ответ".to_string()),
        };
        let entry = KnowledgeEntry::from_raw(&raw).unwrap();
        assert_eq!(entry.keywords, vec!["wifi", "роутер"]);
    }

    #[test]
    fn test_from_raw_empty_keywords_allowed() {
        let raw = RawRecord {
            question: Some("вопрос".to_string()),
            keywords: None,
            answer: Some("ответ".to_string()),
        };
        let entry = KnowledgeEntry::from_raw(&raw).unwrap();
        assert!(entry.keywords.is_empty());
    }

    #[test]
    fn test_raw_record_sheet_style_aliases() {
        let json = r#"{"Question": "В?", "Keywords": "а,б", "Answer": "О."}"#;
        let raw: RawRecord = serde_json::from_str(json).unwrap();
        let entry = KnowledgeEntry::from_raw(&raw).unwrap();
        assert_eq!(entry.question, "В?");
        assert_eq!(entry.answer, "О.");
    }

    #[test]
    fn test_outcome_entries_accessor() {
        assert!(SearchOutcome::NoMatch.entries().is_empty());
        assert!(!SearchOutcome::NoMatch.is_found());

        let found = SearchOutcome::Found(vec![ScoredEntry {
            question: "q".to_string(),
            answer: "a".to_string(),
            score: 1.0,
            matched_keywords: vec![],
            matched_question_words: vec![],
            matched_answer_words: vec![],
        }]);
        assert_eq!(found.entries().len(), 1);
    }
}
