//! One-hot encoding of arbitrary class labels.

use crate::Matrix;
use crate::error::{Error, Result};
use ndarray::{ArrayBase, Data, Dimension};
use std::cmp::Ordering;
use std::fmt::Debug;

/// Values written into a one-hot row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetScheme {
    /// `+1` for the matching class, `-1` elsewhere. Used by least-squares models.
    PlusMinusOne,
    /// `1` for the matching class, `0` elsewhere. Used by logistic models.
    ZeroOne,
}

impl TargetScheme {
    pub fn on(self) -> f64 {
        1.0
    }

    pub fn off(self) -> f64 {
        match self {
            TargetScheme::PlusMinusOne => -1.0,
            TargetScheme::ZeroOne => 0.0,
        }
    }
}

/// Maps class labels to column indices in sorted label order.
#[derive(Clone, Debug)]
pub struct LabelEncoder<L> {
    classes: Vec<L>,
}

impl<L> LabelEncoder<L>
where
    L: Clone + PartialOrd + Debug,
{
    /// Collects the distinct labels of `y`, sorted ascending.
    pub fn fit<S, D>(y: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = L>,
        D: Dimension,
    {
        let mut classes: Vec<L> = y.iter().cloned().collect();
        classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        classes.dedup();
        Self { classes }
    }

    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn encode(&self, label: &L) -> Result<usize> {
        self.classes
            .iter()
            .position(|class| class == label)
            .ok_or_else(|| Error::UnknownLabel(format!("{:?}", label)))
    }

    pub fn decode(&self, index: usize) -> Option<&L> {
        self.classes.get(index)
    }

    /// One row per label of `y`, in logical iteration order, one column per class.
    pub fn one_hot<S, D>(&self, y: &ArrayBase<S, D>, scheme: TargetScheme) -> Result<Matrix>
    where
        S: Data<Elem = L>,
        D: Dimension,
    {
        let mut encoded = Matrix::from_elem((y.len(), self.n_classes()), scheme.off());
        for (row, label) in y.iter().enumerate() {
            let column = self.encode(label)?;
            encoded[[row, column]] = scheme.on();
        }
        Ok(encoded)
    }
}
