use nalgebra::DVector;
use rand::seq::SliceRandom;
use rand::Rng;

pub mod metrics;
pub mod validation;

/// Unit-length copy of `vector`; the zero vector stays zero.
pub fn normalize_or_zero(vector: &DVector<f32>) -> DVector<f32> {
    let norm = vector.norm();
    if norm > 0.0 && norm.is_finite() {
        vector.unscale(norm)
    } else {
        DVector::zeros(vector.len())
    }
}

/// Arithmetic mean accumulated in f64; `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f32>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0f64, 0usize), |(sum, count), x| (sum + x as f64, count + 1));
    (count > 0).then(|| sum / count as f64)
}

pub fn shuffle_order<R: Rng + ?Sized>(order: &mut [usize], rng: &mut R) {
    order.shuffle(rng);
}

/// Keeps the `k` best `(index, score)` pairs, highest score first.
///
/// The sort is stable, so equal scores keep their input order.
pub fn top_k_by_score(mut scored: Vec<(usize, f32)>, k: usize) -> Vec<(usize, f32)> {
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_normalize_unit_vector_is_idempotent() {
        let v = DVector::from_vec(vec![0.6, 0.8, 0.0]);
        let n = normalize_or_zero(&v);
        assert!((n - &v).norm() < 1e-6);

        let twice = normalize_or_zero(&normalize_or_zero(&DVector::from_vec(vec![3.0, 4.0])));
        assert!((twice.norm() - 1.0).abs() < 1e-6);
        assert!((twice[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let n = normalize_or_zero(&DVector::zeros(4));
        assert_eq!(n, DVector::zeros(4));
        assert!(n.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(vec![3.0, 4.0, 5.0]), Some(4.0));
        assert_eq!(mean(Vec::<f32>::new()), None);
    }

    #[test]
    fn test_shuffle_order_is_permutation() {
        let mut order: Vec<usize> = (0..50).collect();
        shuffle_order(&mut order, &mut StdRng::seed_from_u64(9));
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_top_k_by_score() {
        let scored = vec![(0, 0.1), (1, 0.5), (2, 0.3), (3, 0.9), (4, 0.5)];
        let top = top_k_by_score(scored.clone(), 3);
        assert_eq!(top, vec![(3, 0.9), (1, 0.5), (4, 0.5)]);
        assert_eq!(top_k_by_score(scored, 10).len(), 5);
    }

    #[test]
    fn test_top_k_by_score_with_nan_keeps_finite_order() {
        let scored = vec![(0, 0.2), (1, f32::NAN), (2, 0.7), (3, 0.4), (4, 0.7)];
        let top = top_k_by_score(scored, 5);

        assert_eq!(top.len(), 5);
        let finite: Vec<usize> = top.iter().filter(|(_, s)| s.is_finite()).map(|(i, _)| *i).collect();
        assert_eq!(finite, vec![2, 4, 3, 0]);
    }
}
