//! Dense index assignment for user and item identifiers.
//!
//! Indices are handed out in two phases: the full rating stream is scanned
//! once to assign every id, then the frozen assignment translates ratings.
//! The trainer only ever sees the translated, dense indices.

use crate::error::TrainingError;
use crate::models::{IndexedRating, RatingEvent};
use std::collections::HashMap;

/// Bijection between external ids and `0..len()` in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdIndex {
    forward: HashMap<u32, usize>,
    reverse: Vec<u32>,
}

impl IdIndex {
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut index = IdIndex::default();
        for id in ids {
            if !index.forward.contains_key(&id) {
                index.forward.insert(id, index.reverse.len());
                index.reverse.push(id);
            }
        }
        index
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    pub fn index_of(&self, id: u32) -> Option<usize> {
        self.forward.get(&id).copied()
    }

    pub fn id_of(&self, index: usize) -> Option<u32> {
        self.reverse.get(index).copied()
    }

    pub fn ids(&self) -> &[u32] {
        &self.reverse
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexAssignment {
    pub users: IdIndex,
    pub items: IdIndex,
}

impl IndexAssignment {
    pub fn from_ratings(ratings: &[RatingEvent]) -> Self {
        Self {
            users: IdIndex::from_ids(ratings.iter().map(|r| r.user_id)),
            items: IdIndex::from_ids(ratings.iter().map(|r| r.item_id)),
        }
    }

    /// Translates `ratings` through the frozen assignment.
    ///
    /// An id with no entry means the assignment was built from a different
    /// stream; that is reported as `InvalidIndex` with the offending position.
    pub fn index_ratings(&self, ratings: &[RatingEvent]) -> Result<Vec<IndexedRating>, TrainingError> {
        ratings
            .iter()
            .enumerate()
            .map(|(position, r)| {
                match (self.users.index_of(r.user_id), self.items.index_of(r.item_id)) {
                    (Some(user), Some(item)) => Ok(IndexedRating::new(user, item, r.rating)),
                    (user, item) => Err(TrainingError::InvalidIndex {
                        position,
                        user: user.unwrap_or(self.users.len()),
                        item: item.unwrap_or(self.items.len()),
                        num_users: self.users.len(),
                        num_items: self.items.len(),
                    }),
                }
            })
            .collect()
    }
}
