use nalgebra::DVector;

/// Plain per-sample SGD with L2 shrinkage on every touched parameter.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    learning_rate: f32,
    regularization: f32,
}

impl Sgd {
    pub fn new(learning_rate: f32, regularization: f32) -> Self {
        Self {
            learning_rate,
            regularization,
        }
    }

    pub fn update_bias(&self, bias: &mut f32, error: f32) {
        *bias += self.learning_rate * (error - self.regularization * *bias);
    }

    /// Moves both factor rows along their gradients.
    ///
    /// Each coordinate reads the pre-update pair `(p, q)` once and derives
    /// both new values from it, so neither row sees the other's new value.
    pub fn update_factors(&self, user: &mut DVector<f32>, item: &mut DVector<f32>, error: f32) {
        debug_assert_eq!(user.len(), item.len());
        let lr = self.learning_rate;
        let reg = self.regularization;
        for (p_k, q_k) in user.iter_mut().zip(item.iter_mut()) {
            let (p, q) = (*p_k, *q_k);
            *p_k = p + lr * (error * q - reg * p);
            *q_k = q + lr * (error * p - reg * q);
        }
    }
}
