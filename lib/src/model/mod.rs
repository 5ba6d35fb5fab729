//! Regression models with compile-time training state.

pub mod lasso;
pub mod state;

pub use lasso::{FittedLasso, Lasso, LassoConfig, LassoParams, LassoRegression, Selection};
pub use state::{Fitted, Unfitted};

use crate::dataset::Table;
use crate::error::Result;
use crate::serialization::{load_params, save_params, SerializableParams};
use ndarray::Array1;
use std::path::Path;

/// A trained model usable for prediction and persistence.
pub trait InferenceModel {
    /// Serializable representation of the learned parameters.
    type Params: SerializableParams;

    /// Predicts one value per row of `x`.
    ///
    /// `x` must contain every training feature; columns are matched by name,
    /// extra columns are ignored.
    fn predict(&self, x: &Table) -> Result<Array1<f64>>;

    /// Training feature names, in coefficient order.
    fn feature_names(&self) -> &[String];

    fn extract_params(&self) -> Self::Params;

    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

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
