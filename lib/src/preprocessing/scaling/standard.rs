//! Standard Scaler (Z-score normalization).
//!
//! Transforms features by removing the mean and scaling to unit variance:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the column mean of the training samples and `s` the
//! population standard deviation (`ddof = 0`).
//!
//! A column with zero variance keeps `s = 1.0`: it is centered but not
//! scaled, so a constant column transforms to zeros instead of `NaN`.
//!
//! # Example
//! ```
//! use bodyfat::dataset::Table;
//! use bodyfat::preprocessing::{FittedStandardScaler, FittedTransformer, StandardScaler, Transformer};
//!
//! let data = Table::from_rows(["Age", "Weight"], &[vec![20.0, 150.0], vec![40.0, 190.0]]).unwrap();
//! let fitted = StandardScaler::new().fit(&data).unwrap();
//! let scaled = fitted.transform(&data).unwrap();
//! assert_eq!(scaled.values()[[1, 1]], 1.0);
//! ```

use crate::dataset::Table;
use crate::error::{PipelineError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// If true, center the data before scaling.
    pub with_mean: bool,
    /// If true, scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    pub config: StandardScalerConfig,
    /// Column names, in the order the statistics are stored.
    pub feature_names: Vec<String>,
    /// Mean of each feature (zeros if `with_mean` is false).
    pub mean: Vec<f64>,
    /// Standard deviation of each feature, with zero replaced by one.
    pub std: Vec<f64>,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    config: StandardScalerConfig,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }
}

impl Transformer for StandardScaler {
    type Input = Table;
    type Output = Table;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Table) -> Result<FittedStandardScaler> {
        let (rows, cols) = data.shape();
        if rows == 0 {
            return Err(PipelineError::EmptyData(
                "cannot fit StandardScaler on empty data".to_string(),
            ));
        }

        let values = data.values();
        let mean = if self.config.with_mean {
            values
                .mean_axis(Axis(0))
                .ok_or_else(|| PipelineError::EmptyData("no rows to average".to_string()))?
        } else {
            Array1::zeros(cols)
        };

        let std = if self.config.with_std {
            let mut std = values.std_axis(Axis(0), 0.0);
            for (name, s) in data.columns().iter().zip(std.iter_mut()) {
                if *s == 0.0 {
                    warn!("Column {} has zero variance; it will be centered but not scaled", name);
                    *s = 1.0;
                }
            }
            std
        } else {
            Array1::ones(cols)
        };

        Ok(FittedStandardScaler {
            config: self.config.clone(),
            feature_names: data.columns().to_vec(),
            mean,
            std,
        })
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedStandardScaler {
    config: StandardScalerConfig,
    feature_names: Vec<String>,
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl FittedStandardScaler {
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn std(&self) -> &Array1<f64> {
        &self.std
    }

    /// Columns the scaler was fitted on, in order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn check_columns(&self, data: &Table) -> Result<()> {
        if data.columns() != self.feature_names.as_slice() {
            return Err(PipelineError::FeatureMismatch {
                expected: self.feature_names.clone(),
                got: data.columns().to_vec(),
            });
        }
        Ok(())
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Input = Table;
    type Output = Table;
    type Params = StandardScalerParams;

    fn transform(&self, data: &Table) -> Result<Table> {
        self.check_columns(data)?;
        let mut values = data.values().clone();
        if self.config.with_mean {
            values -= &self.mean;
        }
        if self.config.with_std {
            values /= &self.std;
        }
        Table::new(self.feature_names.clone(), values)
    }

    fn inverse_transform(&self, data: &Table) -> Result<Table> {
        self.check_columns(data)?;
        let mut values = data.values().clone();
        if self.config.with_std {
            values *= &self.std;
        }
        if self.config.with_mean {
            values += &self.mean;
        }
        Table::new(self.feature_names.clone(), values)
    }

    fn extract_params(&self) -> StandardScalerParams {
        StandardScalerParams {
            config: self.config.clone(),
            feature_names: self.feature_names.clone(),
            mean: self.mean.to_vec(),
            std: self.std.to_vec(),
        }
    }

    fn from_params(params: StandardScalerParams) -> Result<Self> {
        let n = params.feature_names.len();
        if params.mean.len() != n || params.std.len() != n {
            return Err(PipelineError::Serialization(format!(
                "scaler holds {} names, {} means and {} deviations",
                n,
                params.mean.len(),
                params.std.len()
            )));
        }
        if params.std.iter().any(|&s| s == 0.0 || !s.is_finite()) {
            return Err(PipelineError::Serialization(
                "scaler standard deviations must be finite and non-zero".to_string(),
            ));
        }
        Ok(Self {
            config: params.config,
            feature_names: params.feature_names,
            mean: Array1::from_vec(params.mean),
            std: Array1::from_vec(params.std),
        })
    }

    fn n_features_in(&self) -> usize {
        self.feature_names.len()
    }
}
