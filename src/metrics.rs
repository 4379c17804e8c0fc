use crate::error::{Error, Result};
use ndarray::{ArrayBase, Data, Dimension};

fn check_shapes(true_shape: &[usize], pred_shape: &[usize]) -> Result<()> {
    if true_shape != pred_shape {
        return Err(Error::DimensionMismatch(format!(
            "y_true has shape {:?} but y_pred has shape {:?}",
            true_shape, pred_shape
        )));
    }
    Ok(())
}

/// Fraction of positions where `y_pred` equals `y_true`.
pub fn accuracy_score<A, S1, S2, D>(
    y_true: &ArrayBase<S1, D>,
    y_pred: &ArrayBase<S2, D>,
) -> Result<f64>
where
    A: PartialEq,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    check_shapes(y_true.shape(), y_pred.shape())?;
    Ok(match_fraction(y_true, y_pred))
}

pub fn mean_squared_error<S1, S2, D>(
    y_true: &ArrayBase<S1, D>,
    y_pred: &ArrayBase<S2, D>,
) -> Result<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    check_shapes(y_true.shape(), y_pred.shape())?;
    Ok(squared_error_sum(y_true, y_pred) / y_true.len() as f64)
}

/// Mean cross-entropy between 0/1 targets and predicted probabilities.
///
/// Probabilities are not clipped: a confident wrong prediction of exactly
/// 0 or 1 gives an infinite loss.
pub fn binary_cross_entropy<S1, S2, D>(
    y_true: &ArrayBase<S1, D>,
    probabilities: &ArrayBase<S2, D>,
) -> Result<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    check_shapes(y_true.shape(), probabilities.shape())?;
    Ok(cross_entropy(y_true, probabilities))
}

pub(crate) fn match_fraction<A, S1, S2, D>(
    y_true: &ArrayBase<S1, D>,
    y_pred: &ArrayBase<S2, D>,
) -> f64
where
    A: PartialEq,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    let mismatches = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(actual, predicted)| actual != predicted)
        .count();
    1.0 - mismatches as f64 / y_true.len() as f64
}

pub(crate) fn squared_error_sum<S1, S2, D>(
    y_true: &ArrayBase<S1, D>,
    y_pred: &ArrayBase<S2, D>,
) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&actual, &predicted)| (predicted - actual) * (predicted - actual))
        .sum()
}

pub(crate) fn cross_entropy<S1, S2, D>(
    y_true: &ArrayBase<S1, D>,
    probabilities: &ArrayBase<S2, D>,
) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    let total: f64 = y_true
        .iter()
        .zip(probabilities.iter())
        .map(|(&y, &p)| -y * p.ln() - (1.0 - y) * (1.0 - p).ln())
        .sum();
    total / y_true.len() as f64
}
