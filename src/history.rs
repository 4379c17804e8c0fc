//! Training trajectory recorded by the gradient-descent loop.

/// Parameters and metrics at one point of training.
///
/// `loss` and `accuracy` are `None` only for the entry recorded at
/// construction, until the first call to `train` evaluates it.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry<W, B> {
    pub weights: W,
    pub bias: B,
    pub loss: Option<f64>,
    pub accuracy: Option<f64>,
}

/// Append-only log of [`HistoryEntry`] values.
///
/// Entries own their parameter snapshots, so later updates to a model never
/// change what has already been recorded.
///
/// Entry 0 holds the parameters the model was built with. Its metrics are
/// evaluated once, by the first `train` call, and are not overwritten by
/// later calls: they always describe the initial parameters on the first
/// training set.
#[derive(Clone, Debug)]
pub struct History<W, B> {
    entries: Vec<HistoryEntry<W, B>>,
}

impl<W, B> History<W, B> {
    pub(crate) fn new(weights: W, bias: B) -> Self {
        Self {
            entries: vec![HistoryEntry {
                weights,
                bias,
                loss: None,
                accuracy: None,
            }],
        }
    }

    pub(crate) fn record(&mut self, weights: W, bias: B, loss: f64, accuracy: f64) {
        self.entries.push(HistoryEntry {
            weights,
            bias,
            loss: Some(loss),
            accuracy: Some(accuracy),
        });
    }

    /// Fills the metrics of the construction entry. Has no effect once they are set.
    pub(crate) fn fill_initial_metrics(&mut self, loss: f64, accuracy: f64) {
        if let Some(initial) = self.entries.first_mut() {
            if initial.loss.is_none() && initial.accuracy.is_none() {
                initial.loss = Some(loss);
                initial.accuracy = Some(accuracy);
            }
        }
    }

    pub(crate) fn needs_initial_metrics(&self) -> bool {
        self.entries
            .first()
            .is_some_and(|initial| initial.loss.is_none())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry<W, B>> {
        self.entries.get(index)
    }

    pub fn first(&self) -> Option<&HistoryEntry<W, B>> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&HistoryEntry<W, B>> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry<W, B>> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[HistoryEntry<W, B>] {
        &self.entries
    }

    /// Loss of every entry, `None` where it was never evaluated.
    pub fn losses(&self) -> Vec<Option<f64>> {
        self.entries.iter().map(|entry| entry.loss).collect()
    }

    pub fn accuracies(&self) -> Vec<Option<f64>> {
        self.entries.iter().map(|entry| entry.accuracy).collect()
    }
}

impl<'a, W, B> IntoIterator for &'a History<W, B> {
    type Item = &'a HistoryEntry<W, B>;
    type IntoIter = std::slice::Iter<'a, HistoryEntry<W, B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
