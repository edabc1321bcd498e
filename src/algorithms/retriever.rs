use crate::models::SimilarItem;
use crate::utils::{normalize_or_zero, top_k_by_score};
use nalgebra::DVector;

/// Item-item cosine neighbors over learned item factors.
///
/// Every stored vector is unit length or all zeros, so a dot product between
/// two rows is their cosine similarity. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    vectors: Vec<DVector<f32>>,
}

impl SimilarityIndex {
    pub fn build(item_factors: &[DVector<f32>]) -> Self {
        Self {
            vectors: item_factors.iter().map(normalize_or_zero).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vector(&self, item: usize) -> Option<&DVector<f32>> {
        self.vectors.get(item)
    }

    pub fn similarity(&self, a: usize, b: usize) -> Option<f32> {
        Some(self.vectors.get(a)?.dot(self.vectors.get(b)?))
    }

    /// Up to `k` items most similar to `item`, best first, never `item` itself.
    ///
    /// Unknown items and `k == 0` give an empty result. Equal scores keep
    /// ascending index order.
    pub fn top_k_similar(&self, item: usize, k: usize) -> Vec<SimilarItem> {
        let Some(query) = self.vectors.get(item) else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        let scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .filter(|(candidate, _)| *candidate != item)
            .map(|(candidate, vector)| (candidate, query.dot(vector)))
            .collect();

        top_k_by_score(scored, k)
            .into_iter()
            .map(|(item, score)| SimilarItem { item, score })
            .collect()
    }
}
