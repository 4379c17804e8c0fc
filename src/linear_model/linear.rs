use super::binary::BinaryParameters;
use super::{Activation, Classifier};
use crate::error::Result;
use crate::gradient_descent::{self, Gradient, TrainConfig, Trainable};
use crate::history::History;
use crate::metrics::{match_fraction, squared_error_sum};
use crate::{Matrix, Vector};
use ndarray::ArrayView1;

/// Binary classifier fitted by least squares on `+1`/`-1` targets.
///
/// Predicts `+1` where the linear score is non-negative and `-1` elsewhere.
#[derive(Clone, Debug)]
pub struct LinearBinaryClassifier {
    params: BinaryParameters,
}

impl LinearBinaryClassifier {
    pub fn new(weights: Vector, bias: f64) -> Self {
        Self {
            params: BinaryParameters::new(weights, bias, Activation::Identity),
        }
    }

    pub fn zeros(n_features: usize) -> Self {
        Self::new(Vector::zeros(n_features), 0.0)
    }

    /// Small uniform weights and bias, reproducible when `random_state` is set.
    pub fn random(n_features: usize, random_state: Option<u64>) -> Self {
        Self {
            params: BinaryParameters::random(n_features, random_state, Activation::Identity),
        }
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

    /// Runs gradient descent on `(x, y)` and returns the updated parameters.
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

    fn classify(&self, x: &Matrix) -> Vector {
        self.params
            .decision_function(x)
            .mapv_into(|score| if score >= 0.0 { 1.0 } else { -1.0 })
    }
}

impl Classifier for LinearBinaryClassifier {
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

impl Trainable for LinearBinaryClassifier {
    type Features = Matrix;
    type Targets = Vector;
    type Weights = Vector;
    type Bias = f64;

    /// `0.5 / n · ‖x·w + b − y‖²`
    fn objective(&self, x: &Matrix, y: &Vector) -> f64 {
        0.5 * squared_error_sum(y, &self.params.decision_function(x)) / x.nrows() as f64
    }

    fn score(&self, x: &Matrix, y: &Vector) -> f64 {
        match_fraction(y, &self.classify(x))
    }

    fn objective_gradient(&self, x: &Matrix, y: &Vector) -> Gradient<Vector, f64> {
        BinaryParameters::residual_gradient(x, &self.params.residual(x, y))
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
