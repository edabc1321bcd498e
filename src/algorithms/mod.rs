pub mod initializer;
pub mod optimizer;
pub mod popularity;
pub mod retriever;
pub mod scheduler;

use crate::config::TrainingConfig;
use crate::error::TrainingError;
use crate::models::{IndexedRating, TrainingProgress};
use crate::utils::{self, metrics::ErrorAccumulator, validation};
use chrono::{DateTime, Utc};
use initializer::FactorInitializer;
use nalgebra::DVector;
use optimizer::Sgd;
use rand::Rng;
use retriever::SimilarityIndex;
use scheduler::Yielder;
use tracing::{debug, info, warn};

/// Receives status events from a training run.
pub trait TrainingObserver {
    fn on_progress(&mut self, progress: &TrainingProgress);
}

impl<F> TrainingObserver for F
where
    F: FnMut(&TrainingProgress),
{
    fn on_progress(&mut self, progress: &TrainingProgress) {
        self(progress)
    }
}

/// Writes every progress event to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl TrainingObserver for LogObserver {
    fn on_progress(&mut self, progress: &TrainingProgress) {
        info!("{}", progress);
    }
}

/// Mutable parameter state of a model under training.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    pub global_mean: f32,
    pub user_bias: Vec<f32>,
    pub item_bias: Vec<f32>,
    pub user_factors: Vec<DVector<f32>>,
    pub item_factors: Vec<DVector<f32>>,
}

impl ModelParameters {
    pub fn predict(&self, user: usize, item: usize) -> f32 {
        self.global_mean
            + self.user_bias[user]
            + self.item_bias[item]
            + self.user_factors[user].dot(&self.item_factors[item])
    }

    /// Applies one SGD step for `rating` and returns the residual it was
    /// computed from.
    pub fn apply_update(&mut self, sgd: &Sgd, rating: &IndexedRating) -> f32 {
        let (u, i) = (rating.user, rating.item);
        let error = rating.rating - self.predict(u, i);

        sgd.update_bias(&mut self.user_bias[u], error);
        sgd.update_bias(&mut self.item_bias[i], error);
        sgd.update_factors(&mut self.user_factors[u], &mut self.item_factors[i], error);

        error
    }
}

/// Output of a finished training run. Read-only.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    params: ModelParameters,
    epoch_rmse: Vec<f32>,
    trained_at: DateTime<Utc>,
}

impl TrainedModel {
    pub fn global_mean(&self) -> f32 {
        self.params.global_mean
    }

    pub fn user_bias(&self) -> &[f32] {
        &self.params.user_bias
    }

    pub fn item_bias(&self) -> &[f32] {
        &self.params.item_bias
    }

    pub fn user_factors(&self) -> &[DVector<f32>] {
        &self.params.user_factors
    }

    pub fn item_factors(&self) -> &[DVector<f32>] {
        &self.params.item_factors
    }

    pub fn num_users(&self) -> usize {
        self.params.user_factors.len()
    }

    pub fn num_items(&self) -> usize {
        self.params.item_factors.len()
    }

    pub fn factors(&self) -> usize {
        self.params
            .item_factors
            .first()
            .map(|row| row.len())
            .unwrap_or_default()
    }

    /// RMSE of each epoch's in-pass residuals, in epoch order
    pub fn epoch_rmse(&self) -> &[f32] {
        &self.epoch_rmse
    }

    pub fn final_rmse(&self) -> Option<f32> {
        self.epoch_rmse.last().copied()
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn parameters(&self) -> &ModelParameters {
        &self.params
    }

    pub fn predict(&self, user: usize, item: usize) -> Option<f32> {
        (user < self.num_users() && item < self.num_items()).then(|| self.params.predict(user, item))
    }

    pub fn similarity_index(&self) -> SimilarityIndex {
        SimilarityIndex::build(&self.params.item_factors)
    }
}

/// Funk-SVD style factorization with user and item biases, fitted by SGD.
#[derive(Debug, Clone)]
pub struct MatrixFactorization {
    config: TrainingConfig,
}

impl MatrixFactorization {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Runs every configured epoch over `ratings`.
    ///
    /// Suspends through `yielder` after every `yield_every` updates and at the
    /// end of each epoch. The parameters stay local until the last epoch
    /// completes, so an error or a dropped future never leaks a partial model.
    pub async fn train<R, Y, O>(
        &self,
        ratings: &[IndexedRating],
        num_users: usize,
        num_items: usize,
        rng: &mut R,
        yielder: &mut Y,
        observer: &mut O,
    ) -> Result<TrainedModel, TrainingError>
    where
        R: Rng + ?Sized,
        Y: Yielder + ?Sized,
        O: TrainingObserver + ?Sized,
    {
        validation::validate_ratings(ratings, num_users, num_items)?;
        validation::validate_training_config(&self.config)?;

        let config = &self.config;
        let global_mean = utils::mean(ratings.iter().map(|r| r.rating)).unwrap_or_default() as f32;
        let init = FactorInitializer::new(config.factors, config.init_scale);
        let mut params = ModelParameters {
            global_mean,
            user_bias: initializer::zeros(num_users),
            item_bias: initializer::zeros(num_items),
            user_factors: init.matrix(rng, num_users),
            item_factors: init.matrix(rng, num_items),
        };

        info!(
            "Training {}x{} factorization with k={} on {} ratings (mean {:.3})",
            num_users,
            num_items,
            config.factors,
            ratings.len(),
            global_mean
        );
        observer.on_progress(&TrainingProgress::Started {
            total_epochs: config.epochs,
            ratings: ratings.len(),
        });

        let sgd = Sgd::new(config.learning_rate, config.regularization);
        let mut order: Vec<usize> = (0..ratings.len()).collect();
        let mut epoch_rmse = Vec::with_capacity(config.epochs);
        let mut since_yield = 0usize;

        for epoch in 1..=config.epochs {
            if config.shuffle_each_epoch {
                utils::shuffle_order(&mut order, rng);
            }

            let mut residuals = ErrorAccumulator::new();
            for &idx in &order {
                residuals.push(params.apply_update(&sgd, &ratings[idx]));

                since_yield += 1;
                if since_yield >= config.yield_every {
                    since_yield = 0;
                    yielder.yield_now().await;
                }
            }

            let rmse = residuals.rmse();
            if !rmse.is_finite() {
                warn!(
                    "Epoch {} produced a non-finite rmse (learning rate {})",
                    epoch, config.learning_rate
                );
            }
            debug!("Epoch {}/{} rmse {:.5}", epoch, config.epochs, rmse);
            epoch_rmse.push(rmse);

            observer.on_progress(&TrainingProgress::Epoch {
                epoch,
                total_epochs: config.epochs,
                rmse,
            });
            since_yield = 0;
            yielder.yield_now().await;
        }

        let final_rmse = epoch_rmse.last().copied().unwrap_or_default();
        observer.on_progress(&TrainingProgress::Finished {
            epochs: config.epochs,
            final_rmse,
        });
        info!("Training finished, final rmse {:.4}", final_rmse);

        Ok(TrainedModel {
            params,
            epoch_rmse,
            trained_at: Utc::now(),
        })
    }
}
