use nalgebra::DVector;
use rand::Rng;

pub fn uniform<R: Rng + ?Sized>(rng: &mut R, size: usize, low: f32, high: f32) -> Vec<f32> {
    (0..size).map(|_| rng.gen_range(low..high)).collect()
}

pub fn zeros(size: usize) -> Vec<f32> {
    vec![0.0; size]
}

/// Draws factor rows symmetric around zero.
///
/// Small magnitudes break the symmetry between rows without letting the
/// interaction term dominate the first epoch's predictions.
#[derive(Debug, Clone, Copy)]
pub struct FactorInitializer {
    dimension: usize,
    scale: f32,
}

impl FactorInitializer {
    pub fn new(dimension: usize, scale: f32) -> Self {
        Self { dimension, scale }
    }

    pub fn row<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<f32> {
        if self.scale == 0.0 {
            return DVector::from_vec(zeros(self.dimension));
        }
        DVector::from_vec(uniform(rng, self.dimension, -self.scale, self.scale))
    }

    pub fn matrix<R: Rng + ?Sized>(&self, rng: &mut R, rows: usize) -> Vec<DVector<f32>> {
        (0..rows).map(|_| self.row(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rows_within_scale() {
        let mut rng = StdRng::seed_from_u64(3);
        let init = FactorInitializer::new(16, 0.05);
        let rows = init.matrix(&mut rng, 10);

        assert_eq!(rows.len(), 10);
        for row in &rows {
            assert_eq!(row.len(), 16);
            assert!(row.iter().all(|x| (-0.05..0.05).contains(x)));
        }
    }

    #[test]
    fn test_seeded_rows_are_reproducible() {
        let init = FactorInitializer::new(8, 0.05);
        let a = init.matrix(&mut StdRng::seed_from_u64(42), 4);
        let b = init.matrix(&mut StdRng::seed_from_u64(42), 4);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_scale_gives_zero_rows() {
        let mut rng = StdRng::seed_from_u64(0);
        let row = FactorInitializer::new(5, 0.0).row(&mut rng);
        assert_eq!(row, DVector::zeros(5));
    }
}
