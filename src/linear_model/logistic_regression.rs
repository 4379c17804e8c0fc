use super::binary::BinaryParameters;
use super::{Activation, Classifier};
use crate::error::Result;
use crate::gradient_descent::{self, Gradient, TrainConfig, Trainable};
use crate::history::History;
use crate::metrics::{cross_entropy, match_fraction};
use crate::{Matrix, Vector};
use ndarray::ArrayView1;

/// Binary logistic regression on `0`/`1` targets.
#[derive(Clone, Debug)]
pub struct LogisticRegression {
    params: BinaryParameters,
}

impl LogisticRegression {
    pub fn new(weights: Vector, bias: f64) -> Self {
        Self {
            params: BinaryParameters::new(weights, bias, Activation::Sigmoid),
        }
    }

    pub fn zeros(n_features: usize) -> Self {
        Self::new(Vector::zeros(n_features), 0.0)
    }

    pub fn random(n_features: usize, random_state: Option<u64>) -> Self {
        Self {
            params: BinaryParameters::random(n_features, random_state, Activation::Sigmoid),
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

    /// Probability of the positive class for each row of `x`.
    pub fn predict_proba(&self, x: &Matrix) -> Result<Vector> {
        self.params.check_features(x)?;
        Ok(self.params.activated(x))
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

    fn classify(&self, x: &Matrix) -> Vector {
        self.params
            .activated(x)
            .mapv_into(|p| if p >= 0.5 { 1.0 } else { 0.0 })
    }
}

impl Classifier for LogisticRegression {
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

impl Trainable for LogisticRegression {
    type Features = Matrix;
    type Targets = Vector;
    type Weights = Vector;
    type Bias = f64;

    fn objective(&self, x: &Matrix, y: &Vector) -> f64 {
        cross_entropy(y, &self.params.activated(x))
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rstest::rstest;

    fn hours_studied() -> (Matrix, Vector) {
        let x = array![[-3.0], [-2.0], [-1.0], [-0.5], [0.5], [1.0], [2.0], [3.0]];
        let y = array![0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0];
        (x, y)
    }

    #[test]
    fn test_zero_weights_give_log_two_loss() {
        let (x, y) = hours_studied();
        let model = LogisticRegression::zeros(1);

        assert_abs_diff_eq!(model.loss(&x, &y).unwrap(), std::f64::consts::LN_2, epsilon = 1e-12);
        let probabilities = model.predict_proba(&x).unwrap();
        assert!(probabilities.iter().all(|&p| (p - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_predict_thresholds_probability() {
        let model = LogisticRegression::new(array![2.0], -1.0);
        let x = array![[0.0], [0.5], [1.0]];

        assert_eq!(model.predict(&x).unwrap(), array![0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_gradient_uses_probability_residual() {
        let model = LogisticRegression::zeros(1);
        let x = array![[2.0], [-2.0]];
        let y = array![1.0, 0.0];

        let gradient = model.gradient(&x, &y).unwrap();
        assert_abs_diff_eq!(gradient.weights[0], -1.0);
        assert_abs_diff_eq!(gradient.bias, 0.0);
    }

    #[test]
    fn test_train_improves_fit() {
        let (x, y) = hours_studied();
        let mut model = LogisticRegression::zeros(1);

        let config = TrainConfig::new().learning_rate(0.5).n_iterations(200);
        model.train(&x, &y, &config).unwrap();

        assert!(model.weights()[0] > 0.0);
        assert!(model.accuracy(&x, &y).unwrap() >= 0.75);

        let history = model.history();
        assert_eq!(history.len(), 201);
        let first = history.first().unwrap().loss.unwrap();
        let last = history.last().unwrap().loss.unwrap();
        assert!(last < first);
    }

    #[rstest]
    #[case(1e-3)]
    #[case(1e-2)]
    #[case(1e-1)]
    #[case(5e-1)]
    fn test_step_does_not_increase_loss(#[case] learning_rate: f64) {
        let (x, y) = hours_studied();
        let mut model = LogisticRegression::new(array![-1.0], 0.5);

        let config = TrainConfig::new().learning_rate(learning_rate).n_iterations(20);
        model.train(&x, &y, &config).unwrap();

        let losses: Vec<f64> = model.history().losses().into_iter().flatten().collect();
        assert!(losses.iter().all(|loss| *loss >= 0.0));
        for pair in losses.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12);
        }
    }

    #[test]
    fn test_one_class_accuracy() {
        let model = LogisticRegression::new(array![0.0], -3.0);
        let x = array![[1.0], [5.0], [-2.0]];
        let y = array![0.0, 0.0, 0.0];

        assert_eq!(model.accuracy(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_saturated_probability_gives_infinite_loss() {
        let model = LogisticRegression::new(array![1000.0], 0.0);
        let x = array![[1.0]];
        let y = array![0.0];

        assert!(model.loss(&x, &y).unwrap().is_infinite());
    }
}
