use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub training: TrainingConfig,
    pub similarity: SimilarityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub movies_file: String,
    pub ratings_file: String,
    /// Upper bound on rating events read from disk; bounds training cost
    pub max_ratings: usize,
}

/// Hyperparameters of the SGD matrix factorization run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    /// Latent dimensionality (K)
    pub factors: usize,
    pub epochs: usize,
    pub learning_rate: f32,
    pub regularization: f32,
    pub shuffle_each_epoch: bool,
    /// Per-sample updates between cooperative yields
    pub yield_every: usize,
    /// Factors start uniform in `[-init_scale, init_scale)`
    pub init_scale: f32,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub top_k: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            movies_file: "movies.csv".to_string(),
            ratings_file: "ratings.csv".to_string(),
            max_ratings: 100_000,
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            factors: 20,
            epochs: 12,
            learning_rate: 0.01,
            regularization: 0.05,
            shuffle_each_epoch: true,
            yield_every: 5000,
            init_scale: 0.05,
            seed: None,
        }
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

impl DataConfig {
    pub fn movies_path(&self) -> PathBuf {
        self.data_dir.join(&self.movies_file)
    }

    pub fn ratings_path(&self) -> PathBuf {
        self.data_dir.join(&self.ratings_file)
    }
}

impl TrainingConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix("MOVIEREC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
