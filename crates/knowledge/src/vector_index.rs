//! Flat vector index with k-nearest-neighbor search.
//!
//! Append-only: entry deletion is handled upstream by rebuilding the index
//! from a filtered store, never by mutating vectors in place.

use faqdesk_core::{AppError, AppResult};

/// A flat collection of dense f32 vectors of identical dimensionality.
///
/// The dimensionality is fixed by the first vector added (or by the loaded
/// snapshot); adding a vector of a different size fails with
/// `DimensionMismatch`. Distances are **squared** Euclidean (L2), matching
/// the flat-L2 index the acceptance threshold was calibrated against.
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    dimension: Option<usize>,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Create an empty index; dimensionality is set by the first insertion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with a fixed dimensionality.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: Some(dimension),
            vectors: Vec::new(),
        }
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Established dimensionality, if any vector has been added.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Append one vector.
    pub fn add(&mut self, vector: &[f32]) -> AppResult<()> {
        if vector.is_empty() {
            return Err(AppError::Embedding(
                "Refusing to index an empty vector".to_string(),
            ));
        }

        match self.dimension {
            None => self.dimension = Some(vector.len()),
            Some(expected) if expected != vector.len() => {
                return Err(AppError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
            Some(_) => {}
        }

        self.vectors.push(vector.to_vec());
        Ok(())
    }

    /// Append a batch of vectors, failing on the first mismatch.
    pub fn add_batch(&mut self, vectors: &[Vec<f32>]) -> AppResult<()> {
        for vector in vectors {
            self.add(vector)?;
        }
        Ok(())
    }

    /// Find the k nearest neighbors of `query`.
    ///
    /// Returns `(index, distance)` pairs ordered by ascending squared-L2
    /// distance. An empty index yields an empty result.
    pub fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<(usize, f32)>> {
        if self.vectors.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        if let Some(expected) = self.dimension {
            if query.len() != expected {
                return Err(AppError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(idx, vector)| (idx, squared_l2(query, vector)))
            .collect();

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }

    /// Build a new index from this one with the vector at `position` removed.
    ///
    /// This is the delete contract: the index never shrinks in place, callers
    /// swap in the rebuilt copy together with the filtered store so position
    /// *i* keeps matching entry *i*.
    pub fn rebuilt_without(&self, position: usize) -> Self {
        let vectors: Vec<Vec<f32>> = self
            .vectors
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != position)
            .map(|(_, v)| v.clone())
            .collect();

        Self {
            dimension: self.dimension,
            vectors,
        }
    }

    /// Serialize to bytes: u32 LE dimension, u32 LE count, f32 LE payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let dimension = self.dimension.unwrap_or(0) as u32;
        let count = self.vectors.len() as u32;

        let mut bytes = Vec::with_capacity(8 + (dimension as usize) * (count as usize) * 4);
        bytes.extend_from_slice(&dimension.to_le_bytes());
        bytes.extend_from_slice(&count.to_le_bytes());
        for vector in &self.vectors {
            for value in vector {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }
        bytes
    }

    /// Deserialize from the byte layout written by [`to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> AppResult<Self> {
        if bytes.len() < 8 {
            return Err(AppError::Snapshot(
                "Index blob too short for header".to_string(),
            ));
        }

        let dimension = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let count = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;

        let expected_len = 8 + dimension
            .checked_mul(count)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| AppError::Snapshot("Index blob header overflow".to_string()))?;
        if bytes.len() != expected_len {
            return Err(AppError::Snapshot(format!(
                "Index blob length {} does not match header ({} x {})",
                bytes.len(),
                count,
                dimension
            )));
        }

        let mut vectors = Vec::with_capacity(count);
        let mut offset = 8;
        for _ in 0..count {
            let mut vector = Vec::with_capacity(dimension);
            for _ in 0..dimension {
                let chunk = &bytes[offset..offset + 4];
                vector.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
                offset += 4;
            }
            vectors.push(vector);
        }

        Ok(Self {
            dimension: if count == 0 && dimension == 0 {
                None
            } else {
                Some(dimension)
            },
            vectors,
        })
    }
}

/// Squared Euclidean distance.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_fixed_by_first_add() {
        let mut index = FlatIndex::new();
        assert_eq!(index.dimension(), None);

        index.add(&[1.0, 0.0, 0.0]).unwrap();
        assert_eq!(index.dimension(), Some(3));

        let err = index.add(&[1.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            faqdesk_core::AppError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_search_orders_by_ascending_distance() {
        let mut index = FlatIndex::new();
        index.add(&[0.0, 0.0]).unwrap();
        index.add(&[1.0, 0.0]).unwrap();
        index.add(&[5.0, 0.0]).unwrap();

        let results = index.search(&[0.9, 0.0], 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, 1);
        assert_eq!(results[1].0, 0);
        assert_eq!(results[2].0, 2);
        assert!(results[0].1 <= results[1].1);
    }

    #[test]
    fn test_search_distance_is_squared_l2() {
        let mut index = FlatIndex::new();
        index.add(&[3.0, 4.0]).unwrap();

        let results = index.search(&[0.0, 0.0], 1).unwrap();
        // 3-4-5 triangle: squared distance is 25, not 5
        assert!((results[0].1 - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_search_empty_index() {
        let index = FlatIndex::new();
        assert!(index.search(&[1.0, 2.0], 3).unwrap().is_empty());
    }

    #[test]
    fn test_search_k_larger_than_len() {
        let mut index = FlatIndex::new();
        index.add(&[1.0]).unwrap();
        let results = index.search(&[1.0], 10).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_search_query_dimension_mismatch() {
        let mut index = FlatIndex::new();
        index.add(&[1.0, 2.0]).unwrap();
        assert!(index.search(&[1.0], 1).is_err());
    }

    #[test]
    fn test_rebuilt_without_keeps_order() {
        let mut index = FlatIndex::new();
        index.add(&[1.0]).unwrap();
        index.add(&[2.0]).unwrap();
        index.add(&[3.0]).unwrap();

        let rebuilt = index.rebuilt_without(1);
        assert_eq!(rebuilt.len(), 2);
        let nearest = rebuilt.search(&[3.0], 1).unwrap();
        assert_eq!(nearest[0].0, 1); // [3.0] moved from position 2 to 1
    }

    #[test]
    fn test_byte_round_trip() {
        let mut index = FlatIndex::new();
        index.add(&[0.5, -1.25, 3.0]).unwrap();
        index.add(&[1.0, 2.0, -0.125]).unwrap();

        let restored = FlatIndex::from_bytes(&index.to_bytes()).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.dimension(), Some(3));

        let original = index.search(&[0.5, -1.25, 3.0], 1).unwrap();
        let roundtrip = restored.search(&[0.5, -1.25, 3.0], 1).unwrap();
        assert_eq!(original[0].0, roundtrip[0].0);
    }

    #[test]
    fn test_empty_index_round_trip() {
        let index = FlatIndex::new();
        let restored = FlatIndex::from_bytes(&index.to_bytes()).unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored.dimension(), None);
    }

    #[test]
    fn test_from_bytes_rejects_truncated_blob() {
        let mut index = FlatIndex::new();
        index.add(&[1.0, 2.0]).unwrap();
        let mut bytes = index.to_bytes();
        bytes.pop();

        assert!(FlatIndex::from_bytes(&bytes).is_err());
        assert!(FlatIndex::from_bytes(&[1, 2, 3]).is_err());
    }
}
