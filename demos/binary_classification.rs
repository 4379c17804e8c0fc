use linclass::{
    Classifier, LinearBinaryClassifier, LogisticRegression, Matrix, RidgeClassifier,
    StandardScaler, TrainConfig, Vector, train_test_split,
};
use ndarray::{Axis, concatenate, s};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Normal;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

/// Two gaussian blobs, one per class, with the label in the last column.
fn blobs(n_per_class: usize, rng: &mut StdRng) -> Result<Matrix, Box<dyn std::error::Error>> {
    let noise = Normal::new(0.0, 1.0)?;
    let mut positive = Matrix::random_using((n_per_class, 3), noise, rng);
    let mut negative = Matrix::random_using((n_per_class, 3), noise, rng);

    positive.slice_mut(s![.., ..2]).mapv_inplace(|v| v + 2.0);
    negative.slice_mut(s![.., ..2]).mapv_inplace(|v| v - 2.0);
    positive.column_mut(2).fill(1.0);
    negative.column_mut(2).fill(-1.0);

    Ok(concatenate(Axis(0), &[positive.view(), negative.view()])?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "linclass=info".into()),
        )
        .init();

    let mut rng = StdRng::seed_from_u64(7);
    let data = blobs(100, &mut rng)?;
    let (_, train, test) = train_test_split(&data, 0.8, true, Some(7))?;

    let mut scaler = StandardScaler::new();
    let x_train = scaler.fit_transform(&train.slice(s![.., ..2]).to_owned())?;
    let x_test = scaler.transform(&test.slice(s![.., ..2]).to_owned())?;
    let y_train: Vector = train.column(2).to_owned();
    let y_test: Vector = test.column(2).to_owned();
    println!("Train: {} samples, test: {} samples", x_train.nrows(), x_test.nrows());

    let config = TrainConfig::new()
        .learning_rate(0.05)
        .n_iterations(500)
        .verbose(true);

    let mut least_squares = LinearBinaryClassifier::random(2, Some(1));
    least_squares.train(&x_train, &y_train, &config)?;
    println!(
        "Least squares: loss {:.4}, test accuracy {:.3}",
        least_squares.loss(&x_train, &y_train)?,
        least_squares.accuracy(&x_test, &y_test)?
    );

    let mut ridge = RidgeClassifier::random(2, 0.1, Some(1));
    ridge.train(&x_train, &y_train, &config)?;
    println!(
        "Ridge (lambda {}): weights {}, test accuracy {:.3}",
        ridge.lambda(),
        ridge.weights(),
        ridge.accuracy(&x_test, &y_test)?
    );

    // logistic regression wants 0/1 targets
    let to_zero_one = |y: &Vector| y.mapv(|label| if label > 0.0 { 1.0 } else { 0.0 });
    let (y_train, y_test) = (to_zero_one(&y_train), to_zero_one(&y_test));

    let mut logistic = LogisticRegression::zeros(2);
    logistic.train(&x_train, &y_train, &config.clone().learning_rate(0.5))?;
    println!(
        "Logistic: loss {:.4}, test accuracy {:.3}",
        logistic.loss(&x_train, &y_train)?,
        logistic.accuracy(&x_test, &y_test)?
    );

    let losses = logistic.history().losses();
    for (iteration, loss) in losses.iter().enumerate().step_by(100) {
        if let Some(loss) = loss {
            println!("  iteration {:>3}: loss {:.4}", iteration, loss);
        }
    }

    Ok(())
}
