//! Deterministic trigram-hash embedding provider.

use crate::provider::EmbeddingProvider;
use faqdesk_core::AppResult;
use std::collections::HashMap;

/// Local hashing provider for offline use and tests.
///
/// Generates deterministic embeddings from character trigrams and word
/// frequencies. Not semantically accurate like a real embedding model, but
/// content-dependent and stable: the same text always produces the same unit
/// vector, and texts sharing words land near each other. Works on `char`
/// boundaries, so Cyrillic input hashes per letter rather than per byte.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    /// Create a new trigram provider with the specified dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn hash_chars(chars: &[char], seed: u64) -> u64 {
        chars.iter().fold(0u64, |acc, c| {
            acc.wrapping_mul(seed).wrapping_add(*c as u64)
        })
    }

    /// Generate an embedding for one text.
    fn generate_embedding(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split_whitespace()
            .filter(|w| w.chars().count() > 1)
            .collect();

        let mut word_freq: HashMap<&str, u32> = HashMap::new();
        for word in &words {
            *word_freq.entry(*word).or_insert(0) += 1;
        }

        for (word, freq) in &word_freq {
            let chars: Vec<char> = word.chars().collect();

            // Spread each trigram over a dimension
            for window in chars.windows(3) {
                let idx = (Self::hash_chars(window, 37) as usize) % self.dimensions;
                embedding[idx] += (*freq as f32).sqrt();
            }

            // Also encode the whole word
            let idx = (Self::hash_chars(&chars, 31) as usize) % self.dimensions;
            embedding[idx] += *freq as f32;
        }

        // Normalize to a unit vector
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| self.generate_embedding(text))
            .collect())
    }
}
