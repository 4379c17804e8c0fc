use super::{Activation, random_parameters};
use crate::encoding::{LabelEncoder, TargetScheme};
use crate::error::{Error, Result};
use crate::gradient_descent::Gradient;
use crate::history::History;
use crate::{Matrix, Vector, seeded_rng};
use ndarray::{Array, ArrayD, ArrayView1, ArrayView2, Axis, IxDyn, s};
use std::fmt::Debug;

/// Stacked `[W; b]` parameters, label set and history of a multiclass model.
///
/// `params` has shape `(n_features + 1, n_classes)`: rows `..n_features` are
/// the weights, the last row is the bias. `weights()` and `bias()` are views
/// into that single buffer, so an update through one is always visible
/// through the other.
#[derive(Clone, Debug)]
pub(crate) struct MulticlassParameters<L> {
    params: Matrix,
    encoder: Option<LabelEncoder<L>>,
    activation: Activation,
    scheme: TargetScheme,
    history: History<Matrix, Vector>,
}

impl<L> MulticlassParameters<L>
where
    L: Clone + PartialOrd + Debug,
{
    pub(crate) fn new(
        weights: Matrix,
        bias: Vector,
        activation: Activation,
        scheme: TargetScheme,
    ) -> Result<Self> {
        if bias.len() != weights.ncols() {
            return Err(Error::DimensionMismatch(format!(
                "bias has {} entries but weights have {} classes",
                bias.len(),
                weights.ncols()
            )));
        }

        let n_features = weights.nrows();
        let mut params = Matrix::zeros((n_features + 1, weights.ncols()));
        params.slice_mut(s![..n_features, ..]).assign(&weights);
        params.row_mut(n_features).assign(&bias);

        let history = History::new(weights, bias);
        Ok(Self {
            params,
            encoder: None,
            activation,
            scheme,
            history,
        })
    }

    pub(crate) fn zeros(
        n_features: usize,
        n_classes: usize,
        activation: Activation,
        scheme: TargetScheme,
    ) -> Self {
        Self::from_stacked(Matrix::zeros((n_features + 1, n_classes)), activation, scheme)
    }

    pub(crate) fn random(
        n_features: usize,
        n_classes: usize,
        random_state: Option<u64>,
        activation: Activation,
        scheme: TargetScheme,
    ) -> Self {
        let mut rng = seeded_rng(random_state);
        let params = random_parameters((n_features + 1, n_classes), &mut rng);
        Self::from_stacked(params, activation, scheme)
    }

    fn from_stacked(params: Matrix, activation: Activation, scheme: TargetScheme) -> Self {
        let n_features = params.nrows() - 1;
        let history = History::new(
            params.slice(s![..n_features, ..]).to_owned(),
            params.row(n_features).to_owned(),
        );
        Self {
            params,
            encoder: None,
            activation,
            scheme,
            history,
        }
    }

    pub(crate) fn n_features(&self) -> usize {
        self.params.nrows() - 1
    }

    pub(crate) fn n_classes(&self) -> usize {
        self.params.ncols()
    }

    pub(crate) fn weights(&self) -> ArrayView2<'_, f64> {
        self.params.slice(s![..self.n_features(), ..])
    }

    pub(crate) fn bias(&self) -> ArrayView1<'_, f64> {
        self.params.row(self.n_features())
    }

    pub(crate) fn parameters(&self) -> ArrayView2<'_, f64> {
        self.params.view()
    }

    pub(crate) fn labels(&self) -> Option<&[L]> {
        self.encoder.as_ref().map(|encoder| encoder.classes())
    }

    pub(crate) fn history(&self) -> &History<Matrix, Vector> {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut History<Matrix, Vector> {
        &mut self.history
    }

    fn encoder(&self) -> Result<&LabelEncoder<L>> {
        self.encoder.as_ref().ok_or(Error::NotFitted)
    }

    /// Batch shape of `x`, i.e. every dimension but the trailing feature axis.
    fn batch_shape(&self, x: &ArrayD<f64>) -> Result<Vec<usize>> {
        match x.shape().split_last() {
            Some((&n_features, batch)) if n_features == self.n_features() => Ok(batch.to_vec()),
            Some((&n_features, _)) => Err(Error::DimensionMismatch(format!(
                "Number of features in X ({}) doesn't match the weights ({})",
                n_features,
                self.n_features()
            ))),
            None => Err(Error::DimensionMismatch(
                "X must have a trailing feature axis".to_string(),
            )),
        }
    }

    /// Flattens `x` to `(n_samples, n_features)` and appends a column of ones.
    pub(crate) fn augment(&self, x: &ArrayD<f64>) -> Result<Matrix> {
        let n_samples: usize = self.batch_shape(x)?.iter().product();
        let n_features = self.n_features();
        let flat = x.to_shape((n_samples, n_features))?;

        let mut augmented = Matrix::ones((n_samples, n_features + 1));
        augmented.slice_mut(s![.., ..n_features]).assign(&flat);
        Ok(augmented)
    }

    /// One-hot targets for `y` against the stored label set.
    pub(crate) fn encode_targets(&self, x: &ArrayD<f64>, y: &ArrayD<L>) -> Result<Matrix> {
        let batch = self.batch_shape(x)?;
        check_label_shape(&batch, y)?;
        self.encoder()?.one_hot(y, self.scheme)
    }

    /// Refits the label set on `y` and returns the training representation
    /// `(augmented x, one-hot y)`. The previous label set is discarded.
    pub(crate) fn prepare_training(
        &mut self,
        x: &ArrayD<f64>,
        y: &ArrayD<L>,
    ) -> Result<(Matrix, Matrix)> {
        let batch = self.batch_shape(x)?;
        check_label_shape(&batch, y)?;

        let encoder = LabelEncoder::fit(y);
        if encoder.n_classes() != self.n_classes() {
            return Err(Error::DimensionMismatch(format!(
                "y has {} distinct labels but the model has {} classes",
                encoder.n_classes(),
                self.n_classes()
            )));
        }

        let augmented = self.augment(x)?;
        let targets = encoder.one_hot(y, self.scheme)?;
        self.encoder = Some(encoder);
        Ok((augmented, targets))
    }

    pub(crate) fn linear_scores(&self, augmented: &Matrix) -> Matrix {
        augmented.dot(&self.params)
    }

    pub(crate) fn activated(&self, augmented: &Matrix) -> Matrix {
        let activation = self.activation;
        self.linear_scores(augmented)
            .mapv_into(|z| activation.apply(z))
    }

    /// Linear scores of `x` with shape `(batch..., n_classes)`.
    pub(crate) fn batch_linear_scores(&self, x: &ArrayD<f64>) -> Result<ArrayD<f64>> {
        let scores = self.linear_scores(&self.augment(x)?);
        self.with_batch_shape(x, scores)
    }

    /// Activated scores of `x` with shape `(batch..., n_classes)`.
    pub(crate) fn batch_activated(&self, x: &ArrayD<f64>) -> Result<ArrayD<f64>> {
        let scores = self.activated(&self.augment(x)?);
        self.with_batch_shape(x, scores)
    }

    fn with_batch_shape(&self, x: &ArrayD<f64>, scores: Matrix) -> Result<ArrayD<f64>> {
        let mut shape = self.batch_shape(x)?;
        shape.push(self.n_classes());
        Ok(scores.into_shape_with_order(IxDyn(&shape))?)
    }

    pub(crate) fn predict(&self, x: &ArrayD<f64>) -> Result<ArrayD<L>> {
        let encoder = self.encoder()?;
        let batch = self.batch_shape(x)?;
        let predictions = argmax_rows(&self.activated(&self.augment(x)?))
            .into_iter()
            .map(|index| encoder.decode(index).cloned().ok_or(Error::NotFitted))
            .collect::<Result<Vec<L>>>()?;
        Ok(Array::from_shape_vec(IxDyn(&batch), predictions)?)
    }

    /// Accuracy of the class argmax against one-hot targets.
    pub(crate) fn encoded_accuracy(&self, augmented: &Matrix, targets: &Matrix) -> f64 {
        let predicted = argmax_rows(&self.activated(augmented));
        let expected = argmax_rows(targets);
        let mismatches = predicted
            .iter()
            .zip(expected.iter())
            .filter(|(p, e)| p != e)
            .count();
        1.0 - mismatches as f64 / predicted.len() as f64
    }

    /// Splits `x̃ᵗ·r / n` into weight rows and the bias row.
    pub(crate) fn residual_gradient(&self, augmented: &Matrix, residual: &Matrix) -> Gradient<Matrix, Vector> {
        let n_features = self.n_features();
        let stacked = augmented.t().dot(residual) / augmented.nrows() as f64;
        Gradient {
            weights: stacked.slice(s![..n_features, ..]).to_owned(),
            bias: stacked.row(n_features).to_owned(),
        }
    }

    pub(crate) fn descend(&mut self, gradient: &Gradient<Matrix, Vector>, learning_rate: f64) {
        let n_features = self.n_features();
        self.params
            .slice_mut(s![..n_features, ..])
            .scaled_add(-learning_rate, &gradient.weights);
        self.params
            .row_mut(n_features)
            .scaled_add(-learning_rate, &gradient.bias);
    }

    pub(crate) fn snapshot(&self) -> (Matrix, Vector) {
        (self.weights().to_owned(), self.bias().to_owned())
    }
}

fn check_label_shape<L>(batch: &[usize], y: &ArrayD<L>) -> Result<()> {
    if y.shape() != batch {
        return Err(Error::DimensionMismatch(format!(
            "y has shape {:?} but X has batch shape {:?}",
            y.shape(),
            batch
        )));
    }
    Ok(())
}

/// Column index of the first maximum of every row.
pub(crate) fn argmax_rows(m: &Matrix) -> Vec<usize> {
    m.axis_iter(Axis(0))
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |(best, best_value), (index, &value)| {
                    if value > best_value {
                        (index, value)
                    } else {
                        (best, best_value)
                    }
                })
                .0
        })
        .collect()
}
