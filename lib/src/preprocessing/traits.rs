//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: the unfitted, configurable state; learns from data.
//! - [`FittedTransformer`]: holds learned parameters; transforms new data and
//!   persists itself.

use crate::error::Result;
use crate::serialization::{load_params, save_params, SerializableParams};
use std::path::Path;

/// Unfitted transformer with hyperparameters.
///
/// # Example
/// ```
/// use bodyfat::dataset::Table;
/// use bodyfat::preprocessing::{FittedTransformer, StandardScaler, Transformer};
///
/// let data = Table::from_rows(["Age"], &[vec![20.0], vec![40.0]]).unwrap();
/// let (scaled, fitted) = StandardScaler::new().fit_transform(&data).unwrap();
/// assert_eq!(scaled.values()[[0, 0]], -1.0);
/// assert_eq!(fitted.n_features_in(), 1);
/// ```
pub trait Transformer: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Input = Self::Input, Output = Self::Output>;

    /// Learn parameters from the training data.
    ///
    /// # Errors
    /// Fails on empty data or data the transformer cannot learn from.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted>;

    /// Fit on `data`, then transform it, returning both the output and the
    /// fitted transformer so it can be persisted.
    fn fit_transform(&self, data: &Self::Input) -> Result<(Self::Output, Self::Fitted)> {
        let fitted = self.fit(data)?;
        let output = fitted.transform(data)?;
        Ok((output, fitted))
    }
}

/// Fitted transformer ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `save_to_file` / `load_from_file` preserve the transform exactly.
pub trait FittedTransformer: Clone {
    type Input;
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Fails if the input layout differs from the one seen during fit.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output>;

    /// Reverse the transformation.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input>;

    fn extract_params(&self) -> Self::Params;

    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    /// Number of features seen during fit.
    fn n_features_in(&self) -> usize;

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_params(&self.extract_params(), path)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        Self::from_params(load_params(path)?)
    }
}
