use crate::algorithms::scheduler::{TokioYielder, Yielder};
use crate::algorithms::{LogObserver, MatrixFactorization, TrainedModel, TrainingObserver};
use crate::config::TrainingConfig;
use crate::error::TrainingError;
use crate::models::{RatingEvent, TrainingProgress};
use crate::services::loader::index::IndexAssignment;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of a training run together with the index assignment it used.
#[derive(Debug)]
pub struct TrainingRun {
    pub assignment: IndexAssignment,
    pub outcome: Result<TrainedModel, TrainingError>,
}

pub struct TrainingService {
    config: TrainingConfig,
}

impl TrainingService {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Assigns indices, then trains on the tokio scheduler with progress
    /// going to the log.
    pub async fn train(&self, ratings: &[RatingEvent]) -> TrainingRun {
        self.train_with(ratings, &mut TokioYielder, &mut LogObserver).await
    }

    /// Like [`train`](Self::train) but with caller-supplied yielding and
    /// progress reporting.
    pub async fn train_with<Y, O>(&self, ratings: &[RatingEvent], yielder: &mut Y, observer: &mut O) -> TrainingRun
    where
        Y: Yielder + ?Sized,
        O: TrainingObserver + ?Sized,
    {
        let assignment = IndexAssignment::from_ratings(ratings);
        let outcome = match assignment.index_ratings(ratings) {
            Ok(indexed) => {
                let started = Instant::now();
                let mut rng = self.rng();
                let result = MatrixFactorization::new(self.config.clone())
                    .train(
                        &indexed,
                        assignment.users.len(),
                        assignment.items.len(),
                        &mut rng,
                        yielder,
                        observer,
                    )
                    .await;
                if let Ok(model) = &result {
                    info!(
                        "Model trained in {:?}, ready at {}",
                        started.elapsed(),
                        model.trained_at().to_rfc3339()
                    );
                }
                result
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            warn!("Training failed: {}", e);
        }

        TrainingRun { assignment, outcome }
    }
}

/// Collects every progress event; handy for status displays and tests.
#[derive(Debug, Default, Clone)]
pub struct ProgressLog {
    pub events: Vec<TrainingProgress>,
}

impl TrainingObserver for ProgressLog {
    fn on_progress(&mut self, progress: &TrainingProgress) {
        self.events.push(progress.clone());
    }
}

impl ProgressLog {
    /// Per-epoch rmse values in report order
    pub fn rmse_history(&self) -> Vec<f32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TrainingProgress::Epoch { rmse, .. } => Some(*rmse),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::scheduler::NoopYielder;
    use chrono::Utc;

    fn ratings() -> Vec<RatingEvent> {
        vec![
            RatingEvent::new(10, 1, 5.0),
            RatingEvent::new(10, 2, 4.0),
            RatingEvent::new(20, 1, 2.0),
            RatingEvent::new(20, 3, 5.0),
        ]
    }

    #[tokio::test]
    async fn test_trained_at_is_stamped_on_completion() {
        let service = TrainingService::new(TrainingConfig::default().with_seed(3));
        let before = Utc::now();
        let run = service.train_with(&ratings(), &mut NoopYielder, &mut ProgressLog::default()).await;
        let after = Utc::now();

        let trained_at = run.outcome.unwrap().trained_at();
        assert!(before <= trained_at && trained_at <= after);
    }

    #[tokio::test]
    async fn test_progress_sequence() {
        let service = TrainingService::new(TrainingConfig {
            epochs: 3,
            ..TrainingConfig::default().with_seed(11)
        });
        let mut log = ProgressLog::default();

        let run = service.train_with(&ratings(), &mut NoopYielder, &mut log).await;
        let model = run.outcome.unwrap();

        assert_eq!(run.assignment.users.ids(), &[10, 20]);
        assert_eq!(run.assignment.items.ids(), &[1, 2, 3]);
        assert_eq!(log.events.len(), 5);
        assert_eq!(
            log.events[0],
            TrainingProgress::Started {
                total_epochs: 3,
                ratings: 4
            }
        );
        assert!(matches!(
            log.events[1],
            TrainingProgress::Epoch {
                epoch: 1,
                total_epochs: 3,
                ..
            }
        ));
        assert!(matches!(log.events[4], TrainingProgress::Finished { epochs: 3, .. }));
        assert_eq!(log.rmse_history(), model.epoch_rmse());
    }

    #[tokio::test]
    async fn test_empty_ratings_fail() {
        let service = TrainingService::new(TrainingConfig::default());
        let run = service.train(&[]).await;
        assert!(matches!(run.outcome, Err(TrainingError::EmptyDataset { .. })));
        assert!(run.assignment.items.is_empty());
    }
}
