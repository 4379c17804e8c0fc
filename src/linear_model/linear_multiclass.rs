use super::multiclass::MulticlassParameters;
use super::{Activation, Classifier};
use crate::encoding::TargetScheme;
use crate::error::Result;
use crate::gradient_descent::{self, Gradient, TrainConfig, Trainable};
use crate::history::History;
use crate::metrics::{accuracy_score, squared_error_sum};
use crate::{Matrix, Vector};
use ndarray::{ArrayD, ArrayView1, ArrayView2};
use std::fmt::Debug;

/// Multiclass least-squares classifier on `+1`/`-1` one-hot targets.
///
/// Inputs may carry any number of leading batch dimensions; the last axis
/// holds the features. Labels can be any ordered type and are predicted back
/// in their original form.
#[derive(Clone, Debug)]
pub struct LinearMulticlassClassifier<L> {
    params: MulticlassParameters<L>,
}

impl<L> LinearMulticlassClassifier<L>
where
    L: Clone + PartialOrd + Debug,
{
    /// `weights` has shape `(n_features, n_classes)`, `bias` has `n_classes` entries.
    pub fn new(weights: Matrix, bias: Vector) -> Result<Self> {
        Ok(Self {
            params: MulticlassParameters::new(
                weights,
                bias,
                Activation::Identity,
                TargetScheme::PlusMinusOne,
            )?,
        })
    }

    pub fn zeros(n_features: usize, n_classes: usize) -> Self {
        Self {
            params: MulticlassParameters::zeros(
                n_features,
                n_classes,
                Activation::Identity,
                TargetScheme::PlusMinusOne,
            ),
        }
    }

    pub fn random(n_features: usize, n_classes: usize, random_state: Option<u64>) -> Self {
        Self {
            params: MulticlassParameters::random(
                n_features,
                n_classes,
                random_state,
                Activation::Identity,
                TargetScheme::PlusMinusOne,
            ),
        }
    }

    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.params.weights()
    }

    pub fn bias(&self) -> ArrayView1<'_, f64> {
        self.params.bias()
    }

    /// The stacked `(n_features + 1, n_classes)` parameter matrix.
    pub fn parameters(&self) -> ArrayView2<'_, f64> {
        self.params.parameters()
    }

    /// Sorted label set of the last `train` call.
    pub fn labels(&self) -> Option<&[L]> {
        self.params.labels()
    }

    pub fn decision_function(&self, x: &ArrayD<f64>) -> Result<ArrayD<f64>> {
        self.params.batch_linear_scores(x)
    }

    /// Refits the label set on `y`, then runs gradient descent.
    ///
    /// A second call with a different label set replaces the first one.
    pub fn train(
        &mut self,
        x: &ArrayD<f64>,
        y: &ArrayD<L>,
        config: &TrainConfig,
    ) -> Result<(ArrayView2<'_, f64>, ArrayView1<'_, f64>)> {
        config.validate()?;
        let (augmented, targets) = self.params.prepare_training(x, y)?;
        gradient_descent::fit(self, &augmented, &targets, config)?;
        Ok((self.params.weights(), self.params.bias()))
    }
}

impl<L> Classifier for LinearMulticlassClassifier<L>
where
    L: Clone + PartialOrd + Debug,
{
    type Input = ArrayD<f64>;
    type Labels = ArrayD<L>;
    type Weights = Matrix;
    type Bias = Vector;

    fn predict(&self, x: &ArrayD<f64>) -> Result<ArrayD<L>> {
        self.params.predict(x)
    }

    fn loss(&self, x: &ArrayD<f64>, y: &ArrayD<L>) -> Result<f64> {
        let targets = self.params.encode_targets(x, y)?;
        Ok(self.objective(&self.params.augment(x)?, &targets))
    }

    fn gradient(&self, x: &ArrayD<f64>, y: &ArrayD<L>) -> Result<Gradient<Matrix, Vector>> {
        let targets = self.params.encode_targets(x, y)?;
        Ok(self.objective_gradient(&self.params.augment(x)?, &targets))
    }

    fn accuracy(&self, x: &ArrayD<f64>, y: &ArrayD<L>) -> Result<f64> {
        let predictions = self.params.predict(x)?;
        accuracy_score(y, &predictions)
    }

    fn history(&self) -> &History<Matrix, Vector> {
        self.params.history()
    }
}

impl<L> Trainable for LinearMulticlassClassifier<L>
where
    L: Clone + PartialOrd + Debug,
{
    type Features = Matrix;
    type Targets = Matrix;
    type Weights = Matrix;
    type Bias = Vector;

    /// `0.5 / n · ‖x̃·P − Y‖²` over the flattened batch.
    fn objective(&self, augmented: &Matrix, targets: &Matrix) -> f64 {
        let scores = self.params.linear_scores(augmented);
        0.5 * squared_error_sum(targets, &scores) / augmented.nrows() as f64
    }

    fn score(&self, augmented: &Matrix, targets: &Matrix) -> f64 {
        self.params.encoded_accuracy(augmented, targets)
    }

    fn objective_gradient(&self, augmented: &Matrix, targets: &Matrix) -> Gradient<Matrix, Vector> {
        let residual = self.params.linear_scores(augmented) - targets;
        self.params.residual_gradient(augmented, &residual)
    }

    fn descend(&mut self, gradient: &Gradient<Matrix, Vector>, learning_rate: f64) {
        self.params.descend(gradient, learning_rate);
    }

    fn snapshot(&self) -> (Matrix, Vector) {
        self.params.snapshot()
    }

    fn history_mut(&mut self) -> &mut History<Matrix, Vector> {
        self.params.history_mut()
    }

    fn n_samples(augmented: &Matrix) -> usize {
        augmented.nrows()
    }
}
