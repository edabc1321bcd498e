use crate::models::RatingEvent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemPopularity {
    pub item_id: u32,
    pub rating_count: usize,
    pub mean_rating: f32,
}

/// Ranks items by how often they were rated.
///
/// Used in place of the factor model when training cannot run. Order is
/// rating count descending, then mean rating descending, then item id
/// ascending, so the ranking is total.
#[derive(Debug, Clone, Default)]
pub struct PopularityRanking {
    ranked: Vec<ItemPopularity>,
}

impl PopularityRanking {
    pub fn from_ratings(ratings: &[RatingEvent]) -> Self {
        let mut totals: HashMap<u32, (usize, f64)> = HashMap::new();
        for r in ratings {
            let entry = totals.entry(r.item_id).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += r.rating as f64;
        }

        let mut ranked: Vec<ItemPopularity> = totals
            .into_iter()
            .map(|(item_id, (count, sum))| ItemPopularity {
                item_id,
                rating_count: count,
                mean_rating: (sum / count as f64) as f32,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.rating_count
                .cmp(&a.rating_count)
                .then_with(|| b.mean_rating.total_cmp(&a.mean_rating))
                .then_with(|| a.item_id.cmp(&b.item_id))
        });

        Self { ranked }
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn get(&self, item_id: u32) -> Option<&ItemPopularity> {
        self.ranked.iter().find(|p| p.item_id == item_id)
    }

    /// The `k` most popular items other than `exclude`.
    pub fn top(&self, k: usize, exclude: Option<u32>) -> Vec<ItemPopularity> {
        self.ranked
            .iter()
            .filter(|p| Some(p.item_id) != exclude)
            .take(k)
            .copied()
            .collect()
    }
}
