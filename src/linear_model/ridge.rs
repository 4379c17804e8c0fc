use super::binary::BinaryParameters;
use super::{Activation, Classifier};
use crate::error::Result;
use crate::gradient_descent::{self, Gradient, TrainConfig, Trainable};
use crate::history::History;
use crate::metrics::{match_fraction, squared_error_sum};
use crate::{Matrix, Vector};
use ndarray::ArrayView1;

/// Least-squares binary classifier with an L2 penalty `lambda·‖w‖²`.
///
/// The penalty applies to the weights only, never to the bias.
#[derive(Clone, Debug)]
pub struct RidgeClassifier {
    params: BinaryParameters,
    lambda: f64,
}

impl RidgeClassifier {
    pub fn new(weights: Vector, bias: f64, lambda: f64) -> Self {
        Self::check_lambda(lambda);
        Self {
            params: BinaryParameters::new(weights, bias, Activation::Identity),
            lambda,
        }
    }

    pub fn zeros(n_features: usize, lambda: f64) -> Self {
        Self::new(Vector::zeros(n_features), 0.0, lambda)
    }

    pub fn random(n_features: usize, lambda: f64, random_state: Option<u64>) -> Self {
        Self::check_lambda(lambda);
        Self {
            params: BinaryParameters::random(n_features, random_state, Activation::Identity),
            lambda,
        }
    }

    fn check_lambda(lambda: f64) {
        if !(lambda >= 0.0) {
            panic!("lambda must be non-negative, got {}", lambda);
        }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.params.weights()
    }

    pub fn bias(&self) -> f64 {
        self.params.bias()
    }

    pub fn decision_function(&self, x: &Matrix) -> Result<Vector> {
        self.params.check_features(x)?;
        Ok(self.params.decision_function(x))
    }

    /// Least-squares part of the loss, without the penalty.
    pub fn unregularized_loss(&self, x: &Matrix, y: &Vector) -> Result<f64> {
        self.params.check_targets(x, y)?;
        Ok(self.data_term(x, y))
    }

    pub fn train(
        &mut self,
        x: &Matrix,
        y: &Vector,
        config: &TrainConfig,
    ) -> Result<(ArrayView1<'_, f64>, f64)> {
        self.params.check_targets(x, y)?;
        gradient_descent::fit(self, x, y, config)?;
        Ok((self.params.weights(), self.params.bias()))
    }

    fn data_term(&self, x: &Matrix, y: &Vector) -> f64 {
        0.5 * squared_error_sum(y, &self.params.decision_function(x)) / x.nrows() as f64
    }

    fn classify(&self, x: &Matrix) -> Vector {
        self.params
            .decision_function(x)
            .mapv_into(|score| if score >= 0.0 { 1.0 } else { -1.0 })
    }
}

impl Classifier for RidgeClassifier {
    type Input = Matrix;
    type Labels = Vector;
    type Weights = Vector;
    type Bias = f64;

    fn predict(&self, x: &Matrix) -> Result<Vector> {
        self.params.check_features(x)?;
        Ok(self.classify(x))
    }

    fn loss(&self, x: &Matrix, y: &Vector) -> Result<f64> {
        self.params.check_targets(x, y)?;
        Ok(self.objective(x, y))
    }

    fn gradient(&self, x: &Matrix, y: &Vector) -> Result<Gradient<Vector, f64>> {
        self.params.check_targets(x, y)?;
        Ok(self.objective_gradient(x, y))
    }

    fn accuracy(&self, x: &Matrix, y: &Vector) -> Result<f64> {
        self.params.check_targets(x, y)?;
        Ok(self.score(x, y))
    }

    fn history(&self) -> &History<Vector, f64> {
        self.params.history()
    }
}

impl Trainable for RidgeClassifier {
    type Features = Matrix;
    type Targets = Vector;
    type Weights = Vector;
    type Bias = f64;

    fn objective(&self, x: &Matrix, y: &Vector) -> f64 {
        let weights = self.params.weights_ref();
        self.data_term(x, y) + self.lambda * weights.dot(weights)
    }

    fn score(&self, x: &Matrix, y: &Vector) -> f64 {
        match_fraction(y, &self.classify(x))
    }

    fn objective_gradient(&self, x: &Matrix, y: &Vector) -> Gradient<Vector, f64> {
        let mut gradient = BinaryParameters::residual_gradient(x, &self.params.residual(x, y));
        gradient
            .weights
            .scaled_add(2.0 * self.lambda, self.params.weights_ref());
        gradient
    }

    fn descend(&mut self, gradient: &Gradient<Vector, f64>, learning_rate: f64) {
        self.params.descend(gradient, learning_rate);
    }

    fn snapshot(&self) -> (Vector, f64) {
        self.params.snapshot()
    }

    fn history_mut(&mut self) -> &mut History<Vector, f64> {
        self.params.history_mut()
    }

    fn n_samples(x: &Matrix) -> usize {
        x.nrows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_model::LinearBinaryClassifier;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rstest::rstest;

    fn noisy() -> (Matrix, Vector) {
        let x = array![[1.0, 0.5], [2.0, -0.5], [0.5, 1.0], [-1.0, 0.2], [-2.0, 0.1], [-0.5, -1.0]];
        let y = array![1.0, 1.0, 1.0, -1.0, -1.0, -1.0];
        (x, y)
    }

    #[test]
    fn test_loss_adds_weight_penalty() {
        let model = RidgeClassifier::new(array![1.0, 1.0], 0.0, 0.1);
        let x = array![[1.0, 1.0]];
        let y = array![3.0];

        assert_abs_diff_eq!(model.unregularized_loss(&x, &y).unwrap(), 0.5);
        assert_abs_diff_eq!(model.loss(&x, &y).unwrap(), 0.5 + 0.1 * 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_penalty_ignores_bias() {
        let model = RidgeClassifier::new(array![0.0], 5.0, 10.0);
        let x = array![[1.0]];
        let y = array![5.0];

        assert_abs_diff_eq!(model.loss(&x, &y).unwrap(), 0.0);
        let gradient = model.gradient(&x, &y).unwrap();
        assert_abs_diff_eq!(gradient.bias, 0.0);
    }

    #[test]
    fn test_gradient_adds_shrinkage() {
        let (x, y) = noisy();
        let weights = array![0.3, -0.2];
        let ridge = RidgeClassifier::new(weights.clone(), 0.1, 0.5);
        let plain = LinearBinaryClassifier::new(weights.clone(), 0.1);

        let ridge_gradient = ridge.gradient(&x, &y).unwrap();
        let plain_gradient = plain.gradient(&x, &y).unwrap();

        let expected = &plain_gradient.weights + &(&weights * 1.0);
        for (actual, expected) in ridge_gradient.weights.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*actual, *expected, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(ridge_gradient.bias, plain_gradient.bias, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.01)]
    #[case(1.0)]
    fn test_loss_bounds_unregularized(#[case] lambda: f64) {
        let (x, y) = noisy();
        let model = RidgeClassifier::random(2, lambda, Some(3));

        let loss = model.loss(&x, &y).unwrap();
        let unregularized = model.unregularized_loss(&x, &y).unwrap();
        assert!(unregularized >= 0.0);
        assert!(loss >= unregularized);
    }

    #[test]
    fn test_stronger_penalty_shrinks_weights() {
        let (x, y) = noisy();
        let config = TrainConfig::new().learning_rate(0.05).n_iterations(500);

        let mut weak = RidgeClassifier::zeros(2, 0.0);
        weak.train(&x, &y, &config).unwrap();
        let mut strong = RidgeClassifier::zeros(2, 1.0);
        strong.train(&x, &y, &config).unwrap();

        let norm = |w: ArrayView1<f64>| w.dot(&w);
        assert!(norm(strong.weights()) < norm(weak.weights()));
        assert_eq!(strong.history().len(), 501);
    }

    #[rstest]
    #[case(1e-3)]
    #[case(1e-2)]
    #[case(1e-1)]
    fn test_step_does_not_increase_loss(#[case] learning_rate: f64) {
        let (x, y) = noisy();
        let mut model = RidgeClassifier::new(array![-1.0, 1.0], 0.5, 0.2);

        let config = TrainConfig::new().learning_rate(learning_rate).n_iterations(20);
        model.train(&x, &y, &config).unwrap();

        let losses: Vec<f64> = model.history().losses().into_iter().flatten().collect();
        for pair in losses.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12);
        }
    }

    #[test]
    fn test_negative_lambda() {
        std::panic::catch_unwind(|| {
            RidgeClassifier::zeros(2, -1.0);
        })
        .expect_err("Should panic on negative lambda");
    }
}
