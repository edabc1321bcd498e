use crate::algorithms::TrainedModel;
use crate::models::IndexedRating;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingMetrics {
    pub rmse: f32,
    pub mae: f32,
    pub count: usize,
}

/// Running sums over prediction residuals.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorAccumulator {
    sum_squared: f64,
    sum_absolute: f64,
    count: usize,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, residual: f32) {
        let r = residual as f64;
        self.sum_squared += r * r;
        self.sum_absolute += r.abs();
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn rmse(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            (self.sum_squared / self.count as f64).sqrt() as f32
        }
    }

    pub fn mae(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            (self.sum_absolute / self.count as f64) as f32
        }
    }

    pub fn metrics(&self) -> RatingMetrics {
        RatingMetrics {
            rmse: self.rmse(),
            mae: self.mae(),
            count: self.count,
        }
    }
}

/// Scores a frozen model against `ratings` in a fresh pass.
///
/// Ratings whose indices fall outside the model are skipped.
pub fn evaluate(model: &TrainedModel, ratings: &[IndexedRating]) -> RatingMetrics {
    let mut acc = ErrorAccumulator::new();
    for r in ratings {
        if let Some(prediction) = model.predict(r.user, r.item) {
            acc.push(r.rating - prediction);
        }
    }
    acc.metrics()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator() {
        let mut acc = ErrorAccumulator::new();
        assert_eq!(acc.rmse(), 0.0);

        acc.push(3.0);
        acc.push(-4.0);
        assert_eq!(acc.count(), 2);
        assert!((acc.rmse() - 12.5f32.sqrt()).abs() < 1e-6);
        assert!((acc.mae() - 3.5).abs() < 1e-6);
    }
}
