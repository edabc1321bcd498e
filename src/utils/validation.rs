use crate::config::TrainingConfig;
use crate::error::TrainingError;
use crate::models::IndexedRating;

fn invalid(reason: impl Into<String>) -> TrainingError {
    TrainingError::InvalidConfig(reason.into())
}

pub fn validate_training_config(config: &TrainingConfig) -> Result<(), TrainingError> {
    if config.factors == 0 {
        return Err(invalid("factors must be greater than 0"));
    }

    if config.epochs == 0 {
        return Err(invalid("epochs must be greater than 0"));
    }

    if config.yield_every == 0 {
        return Err(invalid("yield_every must be greater than 0"));
    }

    if !config.learning_rate.is_finite() || config.learning_rate <= 0.0 {
        return Err(invalid(format!(
            "learning_rate must be a positive number, got {}",
            config.learning_rate
        )));
    }

    if !config.regularization.is_finite() || config.regularization < 0.0 {
        return Err(invalid(format!(
            "regularization must be a non-negative number, got {}",
            config.regularization
        )));
    }

    if !config.init_scale.is_finite() || config.init_scale < 0.0 {
        return Err(invalid(format!(
            "init_scale must be a non-negative number, got {}",
            config.init_scale
        )));
    }

    // the init range [-s, s] must have a finite width
    if !(2.0 * config.init_scale).is_finite() {
        return Err(invalid(format!("init_scale is too large, got {}", config.init_scale)));
    }

    Ok(())
}

/// Checks the trainer's preconditions on its input.
///
/// Emptiness is reported first so nothing gets allocated for a dataset that
/// cannot be trained on.
pub fn validate_ratings(
    ratings: &[IndexedRating],
    num_users: usize,
    num_items: usize,
) -> Result<(), TrainingError> {
    if ratings.is_empty() || num_users == 0 || num_items == 0 {
        return Err(TrainingError::EmptyDataset {
            ratings: ratings.len(),
            num_users,
            num_items,
        });
    }

    if let Some((position, r)) = ratings
        .iter()
        .enumerate()
        .find(|(_, r)| r.user >= num_users || r.item >= num_items)
    {
        return Err(TrainingError::InvalidIndex {
            position,
            user: r.user,
            item: r.item,
            num_users,
            num_items,
        });
    }

    Ok(())
}
