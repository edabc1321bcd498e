use serde::{Deserialize, Serialize};

/// One observed rating, keyed by the dataset's own identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingEvent {
    pub user_id: u32,
    pub item_id: u32,
    pub rating: f32,
}

/// A rating translated to dense zero-based user/item indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexedRating {
    pub user: usize,
    pub item: usize,
    pub rating: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u32,
    pub title: String,
    pub genres: Vec<String>,
}

/// Neighbor returned by the similarity index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarItem {
    pub item: usize,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// Cosine similarity between learned item factors
    LatentSimilarity,
    /// Rating-count ranking used when no model is available
    Popularity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub movie_id: u32,
    pub title: String,
    pub score: f32,
    pub source: RecommendationSource,
}

/// Status events emitted while a model trains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrainingProgress {
    Started { total_epochs: usize, ratings: usize },
    /// `epoch` is 1-based
    Epoch { epoch: usize, total_epochs: usize, rmse: f32 },
    Finished { epochs: usize, final_rmse: f32 },
}

impl RatingEvent {
    pub fn new(user_id: u32, item_id: u32, rating: f32) -> Self {
        Self {
            user_id,
            item_id,
            rating,
        }
    }
}

impl IndexedRating {
    pub fn new(user: usize, item: usize, rating: f32) -> Self {
        Self { user, item, rating }
    }
}

impl Movie {
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            genres: Vec::new(),
        }
    }

    pub fn with_genres(mut self, genres: Vec<String>) -> Self {
        self.genres = genres;
        self
    }
}

impl std::fmt::Display for TrainingProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainingProgress::Started {
                total_epochs,
                ratings,
            } => write!(
                f,
                "Training on {} ratings for {} epochs...",
                ratings, total_epochs
            ),
            TrainingProgress::Epoch {
                epoch,
                total_epochs,
                rmse,
            } => write!(f, "Training epoch {}/{} (rmse {:.4})", epoch, total_epochs, rmse),
            TrainingProgress::Finished { .. } => write!(f, "Model ready."),
        }
    }
}
