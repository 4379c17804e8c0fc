//! Full-batch gradient descent shared by every classifier.
//!
//! A model takes part in training by implementing [`Trainable`] on its
//! internal representation of the training data. [`fit`] then runs the same
//! loop for all of them: gradient, in-place update, re-evaluation, and a new
//! [`History`](crate::history::History) entry per iteration.

use crate::error::{Error, Result};
use crate::history::History;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Iterations between two progress events when `verbose` is set.
const PROGRESS_INTERVAL: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub n_iterations: usize,
    pub verbose: bool,
}

impl TrainConfig {
    pub fn new() -> Self {
        Self {
            learning_rate: 1e-3,
            n_iterations: 100,
            verbose: false,
        }
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn n_iterations(mut self, n_iterations: usize) -> Self {
        self.n_iterations = n_iterations;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::invalid_parameter(
                "learning_rate",
                self.learning_rate,
                "must be a positive finite number",
            ));
        }
        Ok(())
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Derivative of a loss with respect to the weights and the bias.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient<W, B> {
    pub weights: W,
    pub bias: B,
}

/// A model that [`fit`] can optimize.
///
/// `Features` and `Targets` are whatever the model trains on internally:
/// raw inputs for binary models, bias-augmented inputs and one-hot targets for
/// multiclass ones. No shape validation happens here; callers check shapes
/// once before entering the loop.
pub trait Trainable {
    type Features: ?Sized;
    type Targets: ?Sized;
    type Weights: Clone;
    type Bias: Clone;

    fn objective(&self, x: &Self::Features, y: &Self::Targets) -> f64;

    fn score(&self, x: &Self::Features, y: &Self::Targets) -> f64;

    fn objective_gradient(
        &self,
        x: &Self::Features,
        y: &Self::Targets,
    ) -> Gradient<Self::Weights, Self::Bias>;

    /// Moves the parameters by `-learning_rate * gradient`, in place.
    fn descend(&mut self, gradient: &Gradient<Self::Weights, Self::Bias>, learning_rate: f64);

    /// Owned copies of the current parameters.
    fn snapshot(&self) -> (Self::Weights, Self::Bias);

    fn history_mut(&mut self) -> &mut History<Self::Weights, Self::Bias>;

    fn n_samples(x: &Self::Features) -> usize;
}

/// Runs `config.n_iterations` steps of gradient descent on `model`.
///
/// Evaluates the construction entry of the history on the first call, then
/// appends exactly one entry per iteration. There is no convergence check and
/// non-finite losses are recorded as they are.
pub fn fit<M>(model: &mut M, x: &M::Features, y: &M::Targets, config: &TrainConfig) -> Result<()>
where
    M: Trainable,
{
    config.validate()?;

    debug!(
        n_samples = M::n_samples(x),
        n_iterations = config.n_iterations,
        learning_rate = config.learning_rate,
        "starting gradient descent"
    );

    if model.history_mut().needs_initial_metrics() {
        let loss = model.objective(x, y);
        let accuracy = model.score(x, y);
        model.history_mut().fill_initial_metrics(loss, accuracy);
    }

    for iteration in 0..config.n_iterations {
        let gradient = model.objective_gradient(x, y);
        model.descend(&gradient, config.learning_rate);

        let loss = model.objective(x, y);
        let accuracy = model.score(x, y);
        let (weights, bias) = model.snapshot();
        model.history_mut().record(weights, bias, loss, accuracy);

        if config.verbose && iteration % PROGRESS_INTERVAL == 0 {
            info!(
                iteration,
                n_iterations = config.n_iterations,
                loss,
                accuracy,
                "gradient descent progress"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Minimizes `0.5 * (w + b - target)^2` over a single scalar target.
    struct Quadratic {
        w: f64,
        b: f64,
        history: History<f64, f64>,
    }

    impl Quadratic {
        fn new() -> Self {
            Self {
                w: 0.0,
                b: 0.0,
                history: History::new(0.0, 0.0),
            }
        }
    }

    impl Trainable for Quadratic {
        type Features = f64;
        type Targets = f64;
        type Weights = f64;
        type Bias = f64;

        fn objective(&self, _x: &f64, target: &f64) -> f64 {
            0.5 * (self.w + self.b - target).powi(2)
        }

        fn score(&self, _x: &f64, target: &f64) -> f64 {
            if (self.w + self.b - target).abs() < 0.1 { 1.0 } else { 0.0 }
        }

        fn objective_gradient(&self, _x: &f64, target: &f64) -> Gradient<f64, f64> {
            let residual = self.w + self.b - target;
            Gradient {
                weights: residual,
                bias: residual,
            }
        }

        fn descend(&mut self, gradient: &Gradient<f64, f64>, learning_rate: f64) {
            self.w -= learning_rate * gradient.weights;
            self.b -= learning_rate * gradient.bias;
        }

        fn snapshot(&self) -> (f64, f64) {
            (self.w, self.b)
        }

        fn history_mut(&mut self) -> &mut History<f64, f64> {
            &mut self.history
        }

        fn n_samples(_x: &f64) -> usize {
            1
        }
    }

    #[test]
    fn test_fit_appends_one_entry_per_iteration() {
        let mut model = Quadratic::new();
        let config = TrainConfig::new().learning_rate(0.1).n_iterations(25);

        fit(&mut model, &0.0, &4.0, &config).unwrap();
        assert_eq!(model.history.len(), 26);

        fit(&mut model, &0.0, &4.0, &config).unwrap();
        assert_eq!(model.history.len(), 51);
    }

    #[test]
    fn test_fit_fills_initial_metrics_once() {
        let mut model = Quadratic::new();
        let config = TrainConfig::new().learning_rate(0.1).n_iterations(3);

        fit(&mut model, &0.0, &4.0, &config).unwrap();
        fit(&mut model, &0.0, &4.0, &config).unwrap();

        let initial = model.history.first().unwrap();
        assert_abs_diff_eq!(initial.loss.unwrap(), 8.0);
        assert_eq!(initial.accuracy, Some(0.0));
    }

    #[test]
    fn test_fit_converges() {
        let mut model = Quadratic::new();
        let config = TrainConfig::new().learning_rate(0.2).n_iterations(200);

        fit(&mut model, &0.0, &4.0, &config).unwrap();

        let last = model.history.last().unwrap();
        assert_abs_diff_eq!(last.weights + last.bias, 4.0, epsilon = 1e-6);
        assert_eq!(last.accuracy, Some(1.0));
        assert_eq!((last.weights, last.bias), (model.w, model.b));
    }

    #[test]
    fn test_fit_with_zero_iterations_only_evaluates() {
        let mut model = Quadratic::new();
        let config = TrainConfig::new().n_iterations(0);

        fit(&mut model, &0.0, &2.0, &config).unwrap();

        assert_eq!(model.history.len(), 1);
        assert_eq!(model.history.losses(), vec![Some(2.0)]);
    }

    #[test]
    fn test_invalid_learning_rate() {
        let mut model = Quadratic::new();

        for learning_rate in [0.0, -0.1, f64::NAN] {
            let config = TrainConfig::new().learning_rate(learning_rate);
            assert!(fit(&mut model, &0.0, &1.0, &config).is_err());
        }
        assert_eq!(model.history.len(), 1);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn progress_lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .filter(|line| line.contains("gradient descent progress"))
                .map(str::to_string)
                .collect()
        }
    }

    fn fit_with_logs(verbose: bool) -> Vec<String> {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();

        let mut model = Quadratic::new();
        let config = TrainConfig::new()
            .learning_rate(0.1)
            .n_iterations(250)
            .verbose(verbose);
        tracing::subscriber::with_default(subscriber, || {
            fit(&mut model, &0.0, &4.0, &config).unwrap();
        });

        logs.progress_lines()
    }

    #[test]
    fn test_verbose_logs_every_hundred_iterations() {
        let lines = fit_with_logs(true);

        assert_eq!(lines.len(), 3);
        for (line, iteration) in lines.iter().zip([0, 100, 200]) {
            assert!(line.contains(&format!(" iteration={}", iteration)), "{}", line);
        }
    }

    #[test]
    fn test_quiet_training_logs_no_progress() {
        assert!(fit_with_logs(false).is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = TrainConfig::default();
        assert_eq!(config.learning_rate, 1e-3);
        assert_eq!(config.n_iterations, 100);
        assert!(!config.verbose);
    }
}
