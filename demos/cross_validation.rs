use linclass::{Classifier, Dataset, LogisticRegression, Matrix, TrainConfig, Vector, normalize};
use ndarray::Axis;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "linclass=info,cross_validation=info".into()),
        )
        .init();

    let mut rng = StdRng::seed_from_u64(11);
    let features = Matrix::random_using((120, 3), Uniform::new(-1.0, 1.0), &mut rng);
    let labels: Vector = features.map_axis(Axis(1), |row| {
        if row[0] - 0.5 * row[1] + 0.1 > 0.0 { 1.0 } else { 0.0 }
    });
    let dataset = Dataset::new(normalize(&features, "min-max")?, labels)?;

    let k = 5;
    let folds = dataset.k_fold(k, Some(11))?;
    let config = TrainConfig::new().learning_rate(1.0).n_iterations(400);

    let mut scores = Vec::with_capacity(k);
    for (held_out, test) in folds.iter().enumerate() {
        let train_folds: Vec<&Dataset> = folds
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != held_out)
            .map(|(_, fold)| fold)
            .collect();
        let x_views: Vec<_> = train_folds.iter().map(|fold| fold.features.view()).collect();
        let y_views: Vec<_> = train_folds.iter().map(|fold| fold.labels.view()).collect();
        let x_train = ndarray::concatenate(Axis(0), &x_views)?;
        let y_train = ndarray::concatenate(Axis(0), &y_views)?;

        let mut model = LogisticRegression::random(dataset.n_features(), Some(held_out as u64));
        model.train(&x_train, &y_train, &config)?;

        let accuracy = model.accuracy(&test.features, &test.labels)?;
        info!(fold = held_out, accuracy, "Evaluated fold");
        scores.push(accuracy);
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    println!("{}-fold accuracy: {:.3} ({:?})", k, mean, scores);

    let (train, test) = dataset.train_test_split(0.75, true, Some(11))?;
    let mut model = LogisticRegression::zeros(dataset.n_features());
    model.train(&train.features, &train.labels, &config.verbose(true))?;
    println!("Hold-out accuracy: {:.3}", model.accuracy(&test.features, &test.labels)?);

    Ok(())
}
