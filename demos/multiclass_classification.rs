use linclass::{
    ArrayD, Classifier, LinearMulticlassClassifier, Matrix, MulticlassLogisticRegression,
    StandardScaler, TrainConfig,
};
use ndarray::{Array1, Axis, concatenate};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Normal;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

const CENTERS: [(&str, [f64; 2]); 3] = [
    ("setosa", [0.0, 3.0]),
    ("versicolor", [3.0, -2.0]),
    ("virginica", [-3.0, -2.0]),
];

fn flowers(
    n_per_class: usize,
    rng: &mut StdRng,
) -> Result<(Matrix, Array1<&'static str>), Box<dyn std::error::Error>> {
    let noise = Normal::new(0.0, 0.8)?;
    let mut blocks = Vec::new();
    let mut labels = Vec::new();

    for (label, center) in CENTERS {
        let mut block = Matrix::random_using((n_per_class, 2), noise, rng);
        for mut row in block.rows_mut() {
            row[0] += center[0];
            row[1] += center[1];
        }
        blocks.push(block);
        labels.extend(std::iter::repeat_n(label, n_per_class));
    }

    let views: Vec<_> = blocks.iter().map(|block| block.view()).collect();
    Ok((concatenate(Axis(0), &views)?, Array1::from(labels)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "linclass=info".into()),
        )
        .init();

    let mut rng = StdRng::seed_from_u64(3);
    let (features, labels) = flowers(50, &mut rng)?;
    let x: ArrayD<f64> = StandardScaler::new().fit_transform(&features)?.into_dyn();
    let y = labels.into_dyn();

    let config = TrainConfig::new()
        .learning_rate(0.1)
        .n_iterations(300)
        .verbose(true);

    let mut least_squares = LinearMulticlassClassifier::random(2, 3, Some(3));
    least_squares.train(&x, &y, &config)?;
    println!("Classes: {:?}", least_squares.labels().unwrap_or_default());
    println!(
        "Least squares: loss {:.4}, accuracy {:.3}",
        least_squares.loss(&x, &y)?,
        least_squares.accuracy(&x, &y)?
    );

    let mut logistic = MulticlassLogisticRegression::zeros(2, 3);
    logistic.train(&x, &y, &config.clone().learning_rate(1.0))?;
    println!(
        "Logistic: loss {:.4}, accuracy {:.3}",
        logistic.loss(&x, &y)?,
        logistic.accuracy(&x, &y)?
    );

    let probe = ndarray::array![[0.0, 2.0], [2.0, -1.5]].into_dyn();
    let probabilities = logistic.predict_proba(&probe)?;
    let predictions = logistic.predict(&probe)?;
    for (row, label) in probabilities.outer_iter().zip(predictions.iter()) {
        println!("  {:<10} {:.3}", label, row);
    }

    Ok(())
}
