//! Relevance ranking: weighted lexical scoring with a vector fallback.
//!
//! Phase 1 scores every entry by word overlap in three weighted categories;
//! phase 2 runs only when phase 1 finds nothing, falling back to
//! nearest-neighbor search over question embeddings.

use faqdesk_core::config::SearchConfig;
use faqdesk_core::AppResult;
use faqdesk_embed::EmbeddingProvider;
use std::collections::HashSet;

use crate::normalize;
use crate::store::KnowledgeStore;
use crate::types::{KnowledgeEntry, ScoredEntry, SearchOutcome};
use crate::vector_index::FlatIndex;

/// Weight of a keyword hit: curator-supplied relevance signals count full.
const KEYWORD_WEIGHT: f32 = 1.0;

/// Weight of a question-text hit.
const QUESTION_WEIGHT: f32 = 0.8;

/// Weight of an answer-text hit: incidental matches count least.
const ANSWER_WEIGHT: f32 = 0.6;

/// Ellipsis marker appended to truncated answers.
const TRUNCATION_MARKER: &str = "...";

/// Rank the store's entries against a free-text query.
///
/// Never fails on degenerate input; an embedding-provider failure during the
/// fallback phase is the only error path, and it aborts the whole call (no
/// partial results).
pub async fn search(
    query: &str,
    store: &KnowledgeStore,
    index: &FlatIndex,
    provider: &dyn EmbeddingProvider,
    config: &SearchConfig,
) -> AppResult<SearchOutcome> {
    let query_words = normalize::word_set(query);
    tracing::debug!("Normalized query words: {:?}", query_words);

    let mut results = lexical_phase(&query_words, store, config);

    if results.is_empty() {
        tracing::info!("No lexical matches, falling back to vector search");
        results = vector_phase(query, store, index, provider, config).await?;
    }

    if results.is_empty() {
        tracing::info!("No relevant entries for query");
        return Ok(SearchOutcome::NoMatch);
    }

    results.truncate(config.top_k);
    Ok(SearchOutcome::Found(results))
}

/// Phase 1: weighted word-overlap scoring across all entries.
fn lexical_phase(
    query_words: &HashSet<String>,
    store: &KnowledgeStore,
    config: &SearchConfig,
) -> Vec<ScoredEntry> {
    let mut scored: Vec<ScoredEntry> = Vec::new();

    for entry in store.iter() {
        let keyword_set = normalize::keyword_set(&entry.keywords);
        let question_words = normalize::word_set(&entry.question);
        let answer_words = normalize::word_set(&entry.answer);

        let matched_keywords = intersect_sorted(&keyword_set, query_words);
        let matched_question_words = intersect_sorted(&question_words, query_words);
        let matched_answer_words = intersect_sorted(&answer_words, query_words);

        // Division guarded so an empty category deterministically scores 0
        let keyword_score =
            matched_keywords.len() as f32 / keyword_set.len().max(1) as f32 * KEYWORD_WEIGHT;
        let question_score = matched_question_words.len() as f32 / question_words.len().max(1) as f32
            * QUESTION_WEIGHT;
        let answer_score =
            matched_answer_words.len() as f32 / answer_words.len().max(1) as f32 * ANSWER_WEIGHT;
        let total_score = keyword_score + question_score + answer_score;

        if total_score < config.relevance_threshold {
            continue;
        }

        if matched_keywords.is_empty()
            && matched_question_words.is_empty()
            && matched_answer_words.is_empty()
        {
            continue;
        }

        tracing::info!(
            "Lexical hit: question={:?}, keywords={:?}, question_words={:?}, answer_words={:?}, score={:.2}",
            entry.question,
            matched_keywords,
            matched_question_words,
            matched_answer_words,
            total_score
        );

        scored.push(ScoredEntry {
            question: entry.question.clone(),
            answer: truncate_answer(&entry.answer, config.answer_preview_chars),
            score: total_score,
            matched_keywords,
            matched_question_words,
            matched_answer_words,
        });
    }

    // Stable sort: equal scores keep their store order
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    scored
}

/// Phase 2: nearest-neighbor fallback over the raw (unnormalized) query.
async fn vector_phase(
    query: &str,
    store: &KnowledgeStore,
    index: &FlatIndex,
    provider: &dyn EmbeddingProvider,
    config: &SearchConfig,
) -> AppResult<Vec<ScoredEntry>> {
    if index.is_empty() {
        return Ok(Vec::new());
    }

    let query_embedding = provider.embed(query).await?;
    let neighbors = index.search(&query_embedding, config.top_k)?;

    let mut results = Vec::new();
    for (position, distance) in neighbors {
        // A stale index can be longer than the current store; skip rather
        // than crash
        let entry: &KnowledgeEntry = match store.get(position) {
            Some(entry) => entry,
            None => {
                tracing::warn!(
                    "Index position {} out of range for store of {} entries, skipping",
                    position,
                    store.len()
                );
                continue;
            }
        };

        if distance > config.vector_distance_threshold {
            tracing::info!(
                "Neighbor rejected: question={:?}, distance={:.4}",
                entry.question,
                distance
            );
            continue;
        }

        tracing::info!(
            "Vector hit: question={:?}, distance={:.4}",
            entry.question,
            distance
        );

        results.push(ScoredEntry {
            question: entry.question.clone(),
            answer: truncate_answer(&entry.answer, config.answer_preview_chars),
            score: 1.0 - distance,
            matched_keywords: Vec::new(),
            matched_question_words: Vec::new(),
            matched_answer_words: Vec::new(),
        });
    }

    Ok(results)
}

/// Intersection of two word sets, sorted for deterministic output.
fn intersect_sorted(words: &HashSet<String>, query_words: &HashSet<String>) -> Vec<String> {
    let mut matched: Vec<String> = words.intersection(query_words).cloned().collect();
    matched.sort();
    matched
}

/// Truncate an answer to a character limit, marking the cut.
///
/// Runs on results only; scoring always sees the full text. Character (not
/// byte) boundaries, since answers are largely Cyrillic.
fn truncate_answer(answer: &str, limit: usize) -> String {
    if answer.chars().count() > limit {
        let truncated: String = answer.chars().take(limit).collect();
        format!("{}{}", truncated, TRUNCATION_MARKER)
    } else {
        answer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_answer_untouched() {
        assert_eq!(truncate_answer("короткий ответ", 1000), "короткий ответ");
    }

    #[test]
    fn test_truncate_long_answer_marks_cut() {
        let long: String = "ж".repeat(1200);
        let truncated = truncate_answer(&long, 1000);
        assert_eq!(truncated.chars().count(), 1003);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_exact_limit_untouched() {
        let exact: String = "ю".repeat(1000);
        assert_eq!(truncate_answer(&exact, 1000), exact);
    }

    #[test]
    fn test_intersect_sorted_is_deterministic() {
        let a: HashSet<String> = ["б", "а", "в"].iter().map(|s| s.to_string()).collect();
        let b: HashSet<String> = ["в", "а", "г"].iter().map(|s| s.to_string()).collect();
        assert_eq!(intersect_sorted(&a, &b), vec!["а", "в"]);
    }
}
