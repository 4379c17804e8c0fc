//! Linear classifiers trained by full-batch gradient descent.
//!
//! This module provides:
//! - `LinearBinaryClassifier`: least-squares fit on ±1 targets
//! - `LogisticRegression`: cross-entropy fit on 0/1 targets
//! - `RidgeClassifier`: least-squares fit with an L2 penalty on the weights
//! - `LinearMulticlassClassifier`: least-squares fit on ±1 one-hot targets
//! - `MulticlassLogisticRegression`: per-class cross-entropy on 0/1 one-hot targets
//!
//! All of them implement [`Classifier`] and share the loop in
//! [`gradient_descent`](crate::gradient_descent).
//!
//! # Examples
//!
//! ## Binary classification
//! ```rust
//! use linclass::{Classifier, LogisticRegression, TrainConfig};
//! use ndarray::array;
//!
//! let x = array![[-2.0], [-1.0], [1.0], [2.0]];
//! let y = array![0.0, 0.0, 1.0, 1.0];
//!
//! let mut model = LogisticRegression::zeros(1);
//! model.train(&x, &y, &TrainConfig::new().learning_rate(0.5).n_iterations(50)).unwrap();
//! let predictions = model.predict(&x).unwrap();
//! assert_eq!(predictions, y);
//! ```
//!
//! ## Multiclass classification
//! ```rust
//! use linclass::{Classifier, LinearMulticlassClassifier, TrainConfig};
//! use ndarray::array;
//!
//! let x = array![[0.0, 0.0], [0.1, 0.0], [5.0, 0.0], [5.1, 0.0], [0.0, 5.0], [0.0, 5.1]].into_dyn();
//! let y = array!["a", "a", "b", "b", "c", "c"].into_dyn();
//!
//! let mut model = LinearMulticlassClassifier::zeros(2, 3);
//! model.train(&x, &y, &TrainConfig::new().learning_rate(0.05).n_iterations(2000)).unwrap();
//! assert_eq!(model.labels(), Some(&["a", "b", "c"][..]));
//! ```

mod binary;
mod linear;
mod linear_multiclass;
mod logistic_regression;
mod multiclass;
mod multiclass_logistic;
mod ridge;

pub use linear::LinearBinaryClassifier;
pub use linear_multiclass::LinearMulticlassClassifier;
pub use logistic_regression::LogisticRegression;
pub use multiclass_logistic::MulticlassLogisticRegression;
pub use ridge::RidgeClassifier;

use crate::error::Result;
use crate::gradient_descent::Gradient;
use crate::history::History;
use ndarray::{Array, Dimension, ShapeBuilder};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

/// Half-width of the uniform distribution used by the `random` constructors.
const INIT_SCALE: f64 = 0.01;

/// Maps a linear score to the model output compared against targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Identity,
    Sigmoid,
}

impl Activation {
    pub fn apply(self, z: f64) -> f64 {
        match self {
            Activation::Identity => z,
            Activation::Sigmoid => 1.0 / (1.0 + (-z).exp()),
        }
    }
}

/// Common contract of every classifier in this module.
///
/// `loss`, `gradient` and `accuracy` evaluate the model on raw inputs and
/// labels, in the same label space that `train` uses.
pub trait Classifier {
    type Input: ?Sized;
    type Labels;
    type Weights: Clone;
    type Bias: Clone;

    fn predict(&self, x: &Self::Input) -> Result<Self::Labels>;

    fn loss(&self, x: &Self::Input, y: &Self::Labels) -> Result<f64>;

    fn gradient(
        &self,
        x: &Self::Input,
        y: &Self::Labels,
    ) -> Result<Gradient<Self::Weights, Self::Bias>>;

    fn accuracy(&self, x: &Self::Input, y: &Self::Labels) -> Result<f64>;

    fn history(&self) -> &History<Self::Weights, Self::Bias>;
}

fn random_parameters<Sh, D, R>(shape: Sh, rng: &mut R) -> Array<f64, D>
where
    Sh: ShapeBuilder<Dim = D>,
    D: Dimension,
    R: Rng,
{
    Array::random_using(shape, Uniform::new(-INIT_SCALE, INIT_SCALE), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sigmoid_activation() {
        assert_abs_diff_eq!(Activation::Sigmoid.apply(0.0), 0.5);
        assert!(Activation::Sigmoid.apply(40.0) > 0.99);
        assert!(Activation::Sigmoid.apply(-40.0) < 0.01);
        assert_eq!(Activation::Sigmoid.apply(-1000.0), 0.0);
    }

    #[test]
    fn test_identity_activation() {
        assert_eq!(Activation::Identity.apply(-3.5), -3.5);
    }
}
