use crate::error::{Error, Result};
use crate::{Matrix, Vector};
use ndarray::Axis;
use std::fmt;
use std::str::FromStr;

fn check_columns(data: &Matrix, fitted: &Vector) -> Result<()> {
    if data.ncols() != fitted.len() {
        return Err(Error::DimensionMismatch(format!(
            "Scaler was fitted on {} features, got {}",
            fitted.len(),
            data.ncols()
        )));
    }
    Ok(())
}

/// Centers each column on its mean and divides by its population standard deviation.
///
/// Constant columns divide by zero and come out non-finite.
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    mean: Option<Vector>,
    std: Option<Vector>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mean(&self) -> Option<&Vector> {
        self.mean.as_ref()
    }

    pub fn std(&self) -> Option<&Vector> {
        self.std.as_ref()
    }

    pub fn fit(&mut self, data: &Matrix) -> &mut Self {
        let mean = data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Vector::from_elem(data.ncols(), f64::NAN));
        self.std = Some(data.std_axis(Axis(0), 0.0));
        self.mean = Some(mean);
        self
    }

    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        let (mean, std) = match (&self.mean, &self.std) {
            (Some(mean), Some(std)) => (mean, std),
            _ => return Err(Error::NotFitted),
        };
        check_columns(data, mean)?;

        Ok((data - mean) / std)
    }

    pub fn fit_transform(&mut self, data: &Matrix) -> Result<Matrix> {
        self.fit(data).transform(data)
    }
}

/// Rescales each column linearly so its minimum maps to 0 and its maximum to 1.
#[derive(Clone, Debug, Default)]
pub struct MinMaxScaler {
    min: Option<Vector>,
    max: Option<Vector>,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(&self) -> Option<&Vector> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&Vector> {
        self.max.as_ref()
    }

    pub fn fit(&mut self, data: &Matrix) -> &mut Self {
        self.min = Some(data.fold_axis(Axis(0), f64::INFINITY, |&acc, &v| acc.min(v)));
        self.max = Some(data.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &v| acc.max(v)));
        self
    }

    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        let (min, max) = match (&self.min, &self.max) {
            (Some(min), Some(max)) => (min, max),
            _ => return Err(Error::NotFitted),
        };
        check_columns(data, min)?;

        Ok((data - min) / &(max - min))
    }

    pub fn fit_transform(&mut self, data: &Matrix) -> Result<Matrix> {
        self.fit(data).transform(data)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalizationMethod {
    Standardization,
    MinMax,
}

impl FromStr for NormalizationMethod {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "standardization" => Ok(Self::Standardization),
            "min-max" => Ok(Self::MinMax),
            other => Err(Error::UnknownNormalization(other.to_string())),
        }
    }
}

impl fmt::Display for NormalizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standardization => write!(f, "standardization"),
            Self::MinMax => write!(f, "min-max"),
        }
    }
}

impl NormalizationMethod {
    /// Fits on `x` and returns the normalized copy.
    pub fn apply(self, x: &Matrix) -> Result<Matrix> {
        match self {
            Self::Standardization => StandardScaler::new().fit_transform(x),
            Self::MinMax => MinMaxScaler::new().fit_transform(x),
        }
    }
}

/// Normalizes every column of `x` with the method named `method`,
/// either `"standardization"` or `"min-max"`.
pub fn normalize(x: &Matrix, method: &str) -> Result<Matrix> {
    method.parse::<NormalizationMethod>()?.apply(x)
}
