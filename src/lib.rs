pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use algorithms::{MatrixFactorization, TrainedModel};
pub use config::Config;
pub use error::{DataLoadError, TrainingError};
pub use models::*;

use anyhow::Result;
use services::loader::index::IndexAssignment;
use services::loader::{self, Catalog};
use services::recommendation::RecommendationService;
use services::training::TrainingService;
use std::sync::Arc;

/// Everything a front end needs after startup: the loaded data, the training
/// outcome, and the service answering recommendation queries.
pub struct AppState {
    pub config: Arc<Config>,
    pub ratings: Arc<Vec<RatingEvent>>,
    pub assignment: Arc<IndexAssignment>,
    pub model: Option<Arc<TrainedModel>>,
    pub recommendation_service: Arc<RecommendationService>,
}

impl AppState {
    /// Loads the catalog and ratings from `config.data`, trains, and builds
    /// the recommendation service.
    ///
    /// Data loading errors are returned; a failed training run is not an
    /// error and leaves the service on the popularity ranking.
    pub async fn new(config: Config) -> Result<Self> {
        let catalog = loader::load_catalog(&config.data.movies_path())?;
        let ratings = loader::load_ratings(&config.data.ratings_path(), config.data.max_ratings)?;
        Ok(Self::from_data(config, catalog, ratings).await)
    }

    pub async fn from_data(config: Config, catalog: Catalog, ratings: Vec<RatingEvent>) -> Self {
        let training_service = TrainingService::new(config.training.clone());
        let run = training_service.train(&ratings).await;

        let recommendation_service = RecommendationService::from_training_outcome(
            catalog,
            run.assignment.items.clone(),
            &run.outcome,
            &ratings,
        );

        Self {
            config: Arc::new(config),
            ratings: Arc::new(ratings),
            assignment: Arc::new(run.assignment),
            model: run.outcome.ok().map(Arc::new),
            recommendation_service: Arc::new(recommendation_service),
        }
    }

    /// How well the trained model reproduces the ratings it was fitted on.
    pub fn training_fit(&self) -> Option<utils::metrics::RatingMetrics> {
        let model = self.model.as_ref()?;
        let indexed = self.assignment.index_ratings(&self.ratings).ok()?;
        Some(utils::metrics::evaluate(model, &indexed))
    }
}

/// Installs the fmt subscriber; `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
