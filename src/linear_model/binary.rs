use super::{Activation, random_parameters};
use crate::error::{Error, Result};
use crate::gradient_descent::Gradient;
use crate::history::History;
use crate::{Matrix, Vector, seeded_rng};
use ndarray::ArrayView1;

/// Weight vector, scalar bias and history shared by the binary classifiers.
///
/// Weights and bias are owned separately; `descend` is the only path that
/// mutates them and always moves both.
#[derive(Clone, Debug)]
pub(crate) struct BinaryParameters {
    weights: Vector,
    bias: f64,
    activation: Activation,
    history: History<Vector, f64>,
}

impl BinaryParameters {
    pub(crate) fn new(weights: Vector, bias: f64, activation: Activation) -> Self {
        let history = History::new(weights.clone(), bias);
        Self {
            weights,
            bias,
            activation,
            history,
        }
    }

    pub(crate) fn random(n_features: usize, random_state: Option<u64>, activation: Activation) -> Self {
        let mut rng = seeded_rng(random_state);
        let weights = random_parameters(n_features, &mut rng);
        let bias = random_parameters(1, &mut rng)[0];
        Self::new(weights, bias, activation)
    }

    pub(crate) fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    pub(crate) fn weights_ref(&self) -> &Vector {
        &self.weights
    }

    pub(crate) fn bias(&self) -> f64 {
        self.bias
    }

    pub(crate) fn history(&self) -> &History<Vector, f64> {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut History<Vector, f64> {
        &mut self.history
    }

    pub(crate) fn check_features(&self, x: &Matrix) -> Result<()> {
        if x.ncols() != self.weights.len() {
            return Err(Error::DimensionMismatch(format!(
                "Number of features in X ({}) doesn't match the weights ({})",
                x.ncols(),
                self.weights.len()
            )));
        }
        Ok(())
    }

    pub(crate) fn check_targets(&self, x: &Matrix, y: &Vector) -> Result<()> {
        self.check_features(x)?;
        if x.nrows() != y.len() {
            return Err(Error::DimensionMismatch(format!(
                "Number of samples in X ({}) and y ({}) must match",
                x.nrows(),
                y.len()
            )));
        }
        Ok(())
    }

    /// Linear score `x·w + b`.
    pub(crate) fn decision_function(&self, x: &Matrix) -> Vector {
        x.dot(&self.weights) + self.bias
    }

    pub(crate) fn activated(&self, x: &Matrix) -> Vector {
        let activation = self.activation;
        self.decision_function(x).mapv_into(|z| activation.apply(z))
    }

    /// Activated score minus target.
    pub(crate) fn residual(&self, x: &Matrix, y: &Vector) -> Vector {
        self.activated(x) - y
    }

    /// `(xᵗ·r / n, mean(r))`.
    pub(crate) fn residual_gradient(x: &Matrix, residual: &Vector) -> Gradient<Vector, f64> {
        let n_samples = x.nrows() as f64;
        Gradient {
            weights: x.t().dot(residual) / n_samples,
            bias: residual.sum() / n_samples,
        }
    }

    pub(crate) fn descend(&mut self, gradient: &Gradient<Vector, f64>, learning_rate: f64) {
        self.weights.scaled_add(-learning_rate, &gradient.weights);
        self.bias -= learning_rate * gradient.bias;
    }

    pub(crate) fn snapshot(&self) -> (Vector, f64) {
        (self.weights.clone(), self.bias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_decision_function() {
        let params = BinaryParameters::new(array![1.0, -1.0], 0.5, Activation::Identity);
        let x = array![[2.0, 1.0], [0.0, 3.0]];

        assert_eq!(params.decision_function(&x), array![1.5, -2.5]);
    }

    #[test]
    fn test_residual_gradient() {
        let x = array![[1.0, 0.0], [0.0, 2.0]];
        let residual = array![1.0, -1.0];

        let gradient = BinaryParameters::residual_gradient(&x, &residual);
        assert_eq!(gradient.weights, array![0.5, -1.0]);
        assert_abs_diff_eq!(gradient.bias, 0.0);
    }

    #[test]
    fn test_descend_moves_weights_and_bias() {
        let mut params = BinaryParameters::new(array![1.0, 1.0], 1.0, Activation::Identity);
        let gradient = Gradient {
            weights: array![1.0, -2.0],
            bias: 4.0,
        };

        params.descend(&gradient, 0.5);
        assert_eq!(params.weights(), array![0.5, 2.0]);
        assert_abs_diff_eq!(params.bias(), -1.0);
    }

    #[test]
    fn test_random_is_reproducible() {
        let a = BinaryParameters::random(4, Some(7), Activation::Identity);
        let b = BinaryParameters::random(4, Some(7), Activation::Identity);

        assert_eq!(a.weights(), b.weights());
        assert_eq!(a.bias(), b.bias());
        assert!(a.weights().iter().all(|w| w.abs() <= 0.01));
    }

    #[test]
    fn test_check_targets() {
        let params = BinaryParameters::new(array![1.0], 0.0, Activation::Identity);

        assert!(params.check_targets(&array![[1.0], [2.0]], &array![1.0, -1.0]).is_ok());
        assert!(params.check_targets(&array![[1.0], [2.0]], &array![1.0]).is_err());
        assert!(params.check_features(&array![[1.0, 2.0]]).is_err());
    }
}
