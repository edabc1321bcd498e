//! Error types for training and data loading.

use thiserror::Error;

/// Reasons a training run cannot produce a model.
///
/// Any of these leaves the caller without a `TrainedModel`; the recommendation
/// service reacts by switching to the popularity ranking.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainingError {
    /// No ratings, no users or no items to train on
    #[error("cannot train on an empty dataset ({ratings} ratings, {num_users} users, {num_items} items)")]
    EmptyDataset {
        ratings: usize,
        num_users: usize,
        num_items: usize,
    },

    /// A rating references an index the index assignment never allocated
    #[error(
        "rating #{position} references user {user} / item {item} outside of {num_users} users / {num_items} items"
    )]
    InvalidIndex {
        position: usize,
        user: usize,
        item: usize,
        num_users: usize,
        num_items: usize,
    },

    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while reading the movie catalog or the rating events
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("data file not found: {path}")]
    MissingFile { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line could not be parsed; `line` is 1-based
    #[error("parse error at line {line} in {file}: {reason}")]
    Parse {
        file: String,
        line: usize,
        reason: String,
    },
}

pub type LoadResult<T> = std::result::Result<T, DataLoadError>;
