use crate::error::{Error, Result};
use crate::{Matrix, seeded_rng};
use ndarray::{Array, Array1, ArrayBase, Axis, Data, RemoveAxis, Slice};
use rand::seq::SliceRandom;

/// Row indices `0..n_samples`, shuffled unless `shuffle` is false.
fn row_order(n_samples: usize, shuffle: bool, random_state: Option<u64>) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n_samples).collect();
    if shuffle {
        indices.shuffle(&mut seeded_rng(random_state));
    }
    indices
}

fn n_training_rows(n_samples: usize, training_fraction: f64) -> Result<usize> {
    if !(0.0..=1.0).contains(&training_fraction) {
        return Err(Error::invalid_parameter(
            "training_fraction",
            training_fraction,
            "must be between 0 and 1",
        ));
    }
    Ok((training_fraction * n_samples as f64).round_ties_even() as usize)
}

/// Sizes of `k` folds over `n_samples` rows; the first `n_samples % k` folds get one extra row.
fn fold_sizes(n_samples: usize, k: usize) -> Vec<usize> {
    let base = n_samples / k;
    let remainder = n_samples % k;
    (0..k)
        .map(|fold| if fold < remainder { base + 1 } else { base })
        .collect()
}

fn split_at_row<A, D>(data: &Array<A, D>, row: usize) -> (Array<A, D>, Array<A, D>)
where
    A: Clone,
    D: RemoveAxis,
{
    (
        data.slice_axis(Axis(0), Slice::from(..row)).to_owned(),
        data.slice_axis(Axis(0), Slice::from(row..)).to_owned(),
    )
}

fn split_rows<A, D>(data: &Array<A, D>, sizes: &[usize]) -> Vec<Array<A, D>>
where
    A: Clone,
    D: RemoveAxis,
{
    let mut start = 0;
    sizes
        .iter()
        .map(|&size| {
            let fold = data
                .slice_axis(Axis(0), Slice::from(start..start + size))
                .to_owned();
            start += size;
            fold
        })
        .collect()
}

/// Splits the rows of `data` into a training part and a test part.
///
/// Returns `(reordered, train, test)` where `reordered` is the shuffled data
/// (or a copy of `data` when `shuffle` is false), `train` its first
/// `round(training_fraction * n)` rows and `test` the remaining ones.
/// Halves round to the nearest even row count.
pub fn train_test_split<A, S, D>(
    data: &ArrayBase<S, D>,
    training_fraction: f64,
    shuffle: bool,
    random_state: Option<u64>,
) -> Result<(Array<A, D>, Array<A, D>, Array<A, D>)>
where
    A: Clone,
    S: Data<Elem = A>,
    D: RemoveAxis,
{
    let n_samples = data.len_of(Axis(0));
    let n_train = n_training_rows(n_samples, training_fraction)?;

    let reordered = data.select(Axis(0), &row_order(n_samples, shuffle, random_state));
    let (train, test) = split_at_row(&reordered, n_train);
    Ok((reordered, train, test))
}

/// Shuffles the rows of `x` and `y` with one shared permutation and splits
/// both into `k` folds of nearly equal size.
pub fn k_fold_split<A, B, S1, S2, D1, D2>(
    x: &ArrayBase<S1, D1>,
    y: &ArrayBase<S2, D2>,
    k: usize,
    random_state: Option<u64>,
) -> Result<(Vec<Array<A, D1>>, Vec<Array<B, D2>>)>
where
    A: Clone,
    B: Clone,
    S1: Data<Elem = A>,
    S2: Data<Elem = B>,
    D1: RemoveAxis,
    D2: RemoveAxis,
{
    if k == 0 {
        return Err(Error::invalid_parameter("k", k, "must be at least 1"));
    }
    let n_samples = x.len_of(Axis(0));
    if y.len_of(Axis(0)) != n_samples {
        return Err(Error::DimensionMismatch(format!(
            "Number of samples in X ({}) and y ({}) must match",
            n_samples,
            y.len_of(Axis(0))
        )));
    }

    let permutation = row_order(n_samples, true, random_state);
    let sizes = fold_sizes(n_samples, k);
    let x_folds = split_rows(&x.select(Axis(0), &permutation), &sizes);
    let y_folds = split_rows(&y.select(Axis(0), &permutation), &sizes);
    Ok((x_folds, y_folds))
}

#[derive(Clone, Debug)]
pub struct Dataset<L = f64> {
    pub features: Matrix,
    pub labels: Array1<L>,
}

impl<L: Clone> Dataset<L> {
    pub fn new(features: Matrix, labels: Array1<L>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(Error::DimensionMismatch(format!(
                "Numbers of samples in features ({}) and labels ({}) must match",
                features.nrows(),
                labels.len()
            )));
        }

        Ok(Self { features, labels })
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Splits into `(train, test)`, keeping each row's features and label together.
    pub fn train_test_split(
        &self,
        training_fraction: f64,
        shuffle: bool,
        random_state: Option<u64>,
    ) -> Result<(Self, Self)> {
        let n_samples = self.n_samples();
        let n_train = n_training_rows(n_samples, training_fraction)?;
        let order = row_order(n_samples, shuffle, random_state);

        let (train_features, test_features) =
            split_at_row(&self.features.select(Axis(0), &order), n_train);
        let (train_labels, test_labels) =
            split_at_row(&self.labels.select(Axis(0), &order), n_train);

        Ok((
            Self::new(train_features, train_labels)?,
            Self::new(test_features, test_labels)?,
        ))
    }

    pub fn k_fold(&self, k: usize, random_state: Option<u64>) -> Result<Vec<Self>> {
        let (features, labels) = k_fold_split(&self.features, &self.labels, k, random_state)?;
        Ok(features
            .into_iter()
            .zip(labels)
            .map(|(features, labels)| Self { features, labels })
            .collect())
    }
}
