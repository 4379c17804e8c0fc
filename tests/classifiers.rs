use approx::assert_abs_diff_eq;
use linclass::{
    Classifier, Error, History, LinearBinaryClassifier, LinearMulticlassClassifier,
    LogisticRegression, Matrix, MulticlassLogisticRegression, RidgeClassifier, TrainConfig,
    Vector, k_fold_split, normalize,
};
use ndarray::{ArrayD, array};
use rstest::rstest;

fn binary_data(zero_one: bool) -> (Matrix, Vector) {
    let x = array![[1.0, 2.0], [2.0, 1.5], [1.5, 3.0], [-1.0, -2.0], [-2.0, -1.0], [-1.5, -2.5]];
    let negative = if zero_one { 0.0 } else { -1.0 };
    let y = array![1.0, 1.0, 1.0, negative, negative, negative];
    (x, y)
}

fn multiclass_data() -> (ArrayD<f64>, ArrayD<char>) {
    let x = array![[0.0, 0.0], [0.3, 0.1], [5.0, 0.0], [5.2, 0.3], [0.0, 5.0], [0.2, 5.1]];
    let y = array!['a', 'a', 'b', 'b', 'c', 'c'];
    (x.into_dyn(), y.into_dyn())
}

/// Checks the history invariants every classifier shares after `n_trains`
/// training calls of `n_iterations` each.
fn check_history<W, B>(history: &History<W, B>, n_trains: usize, n_iterations: usize) {
    assert_eq!(history.len(), 1 + n_trains * n_iterations);
    for entry in history.iter() {
        assert!(entry.loss.is_some());
        let accuracy = entry.accuracy.unwrap();
        assert!((0.0..=1.0).contains(&accuracy));
    }
}

fn run<C>(model: &mut C, x: &C::Input, y: &C::Labels, train: impl Fn(&mut C, &TrainConfig))
where
    C: Classifier,
{
    let config = TrainConfig::new().learning_rate(0.05).n_iterations(40);
    train(model, &config);
    let initial = model.history().first().unwrap().loss.unwrap();
    train(model, &config);

    check_history(model.history(), 2, 40);
    assert_eq!(model.history().first().unwrap().loss.unwrap(), initial);
    assert!(model.loss(x, y).unwrap() <= initial);
    assert!(model.accuracy(x, y).unwrap() > 0.5);
}

#[test]
fn binary_classifiers_share_training_contract() {
    let (x, y) = binary_data(false);
    let mut linear = LinearBinaryClassifier::random(2, Some(0));
    run(&mut linear, &x, &y, |model, config| {
        model.train(&x, &y, config).unwrap();
    });

    let mut ridge = RidgeClassifier::random(2, 0.05, Some(0));
    run(&mut ridge, &x, &y, |model, config| {
        model.train(&x, &y, config).unwrap();
    });

    let (x, y) = binary_data(true);
    let mut logistic = LogisticRegression::random(2, Some(0));
    run(&mut logistic, &x, &y, |model, config| {
        model.train(&x, &y, config).unwrap();
    });
}

#[test]
fn multiclass_classifiers_share_training_contract() {
    let (x, y) = multiclass_data();

    let mut linear = LinearMulticlassClassifier::random(2, 3, Some(0));
    run(&mut linear, &x, &y, |model, config| {
        model.train(&x, &y, config).unwrap();
    });

    let mut logistic = MulticlassLogisticRegression::random(2, 3, Some(0));
    run(&mut logistic, &x, &y, |model, config| {
        model.train(&x, &y, config).unwrap();
    });
}

#[test]
fn last_history_entry_matches_current_parameters() {
    let (x, y) = binary_data(false);
    let mut model = LinearBinaryClassifier::zeros(2);
    let config = TrainConfig::new().learning_rate(0.1).n_iterations(10);

    let (weights, bias) = model.train(&x, &y, &config).unwrap();
    let (weights, bias) = (weights.to_owned(), bias);

    let last = model.history().last().unwrap();
    assert_eq!(last.weights, weights);
    assert_eq!(last.bias, bias);
    assert_abs_diff_eq!(last.loss.unwrap(), model.loss(&x, &y).unwrap(), epsilon = 1e-12);
}

#[test]
fn zero_iterations_only_fill_initial_metrics() {
    let (x, y) = multiclass_data();
    let mut model = MulticlassLogisticRegression::zeros(2, 3);

    model
        .train(&x, &y, &TrainConfig::new().n_iterations(0))
        .unwrap();

    assert_eq!(model.history().len(), 1);
    assert_abs_diff_eq!(
        model.history().first().unwrap().loss.unwrap(),
        std::f64::consts::LN_2,
        epsilon = 1e-12
    );
}

#[rstest]
#[case(0.0)]
#[case(-0.1)]
#[case(f64::NAN)]
fn invalid_learning_rate_is_rejected(#[case] learning_rate: f64) {
    let (x, y) = binary_data(false);
    let mut model = LinearBinaryClassifier::zeros(2);

    let result = model.train(&x, &y, &TrainConfig::new().learning_rate(learning_rate));
    assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    assert_eq!(model.history().len(), 1);
}

#[test]
fn mismatched_shapes_are_errors() {
    let (x, y) = binary_data(false);
    let model = RidgeClassifier::zeros(3, 0.1);

    assert!(matches!(model.predict(&x), Err(Error::DimensionMismatch(_))));
    assert!(matches!(
        LinearBinaryClassifier::zeros(2).loss(&x, &y.slice(ndarray::s![..4]).to_owned()),
        Err(Error::DimensionMismatch(_))
    ));
}

#[test]
fn folds_feed_training() {
    let (x, y) = binary_data(true);
    let x = normalize(&x, "standardization").unwrap();

    let (x_folds, y_folds) = k_fold_split(&x, &y, 2, Some(4)).unwrap();
    assert!(x_folds.iter().all(|fold| fold.nrows() == 3));

    let mut model = LogisticRegression::zeros(2);
    let config = TrainConfig::new().learning_rate(0.5).n_iterations(50);
    for (x_fold, y_fold) in x_folds.iter().zip(y_folds.iter()) {
        model.train(x_fold, y_fold, &config).unwrap();
    }

    check_history(model.history(), 2, 50);
}

#[test]
fn unknown_normalization_leaves_input_untouched() {
    let (x, _) = binary_data(false);
    let before = x.clone();

    assert!(matches!(
        normalize(&x, "bogus-method"),
        Err(Error::UnknownNormalization(_))
    ));
    assert_eq!(x, before);
}
