pub use ndarray::{Array1, Array2, ArrayD, ArrayView1, ArrayView2};

pub mod dataset;
pub mod encoding;
pub mod error;
pub mod gradient_descent;
pub mod history;
pub mod linear_model;
pub mod metrics;
pub mod preprocessing;

pub use dataset::{Dataset, k_fold_split, train_test_split};
pub use encoding::{LabelEncoder, TargetScheme};
pub use error::{Error, Result};
pub use gradient_descent::{Gradient, TrainConfig, Trainable};
pub use history::{History, HistoryEntry};
pub use linear_model::{
    Activation, Classifier, LinearBinaryClassifier, LinearMulticlassClassifier,
    LogisticRegression, MulticlassLogisticRegression, RidgeClassifier,
};
pub use preprocessing::{MinMaxScaler, NormalizationMethod, StandardScaler, normalize};

use rand::SeedableRng;
use rand::rngs::StdRng;

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

/// Deterministic generator when `random_state` is set, entropy-seeded otherwise.
pub(crate) fn seeded_rng(random_state: Option<u64>) -> StdRng {
    match random_state {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
