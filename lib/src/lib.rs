//! # bodyfat
//!
//! Estimates body-fat percentage from thirteen body measurements with an
//! L1-regularized linear model, trained by a five-stage batch pipeline and
//! served one submission at a time.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: models and transformers carry their training
//!   state in the type system (`Lasso` vs `FittedLasso`,
//!   `StandardScaler` vs `FittedStandardScaler`), so an untrained model
//!   cannot predict.
//! - **Files Between Stages**: every stage reads and writes artifacts named
//!   in a [`config::PipelineConfig`]; nothing is shared in memory across
//!   stages.
//! - **Named Features**: fitted artifacts remember the ordered feature names
//!   they were built with and reject inputs that disagree.
//!
//! ## Quick Start
//!
//! ```rust
//! use bodyfat::dataset::{Series, Table};
//! use bodyfat::model::{InferenceModel, Lasso};
//!
//! // y = 2*x + 1
//! let x = Table::from_rows(["x"], &[vec![0.0], vec![1.0], vec![2.0], vec![3.0]]).unwrap();
//! let y = Series::from_vec("y", vec![1.0, 3.0, 5.0, 7.0]);
//!
//! let model = Lasso::new(0.0).fit(&x, &y).unwrap();
//! let pred = model.predict(&x).unwrap();
//! assert!((pred[3] - 7.0).abs() < 1e-9);
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: the numeric [`Table`]/[`Series`] types and CSV I/O
//! - `preprocessing`: outlier removal and the standard scaler
//! - `features`: feature/target extraction and scaling
//! - `model`: Lasso regression with compile-time state
//! - `model_selection`: seeded train/test split
//! - `trainer`: fitting on a configured feature subset
//! - `predict`: batch scoring and the predictions file
//! - `metrics`: MSE, RMSE, MAPE, R² and the text report
//! - `pipeline`: stage functions and the step dispatcher
//! - `serving`: form validation and single-submission scoring

pub mod config;

/// Numeric tables, series and CSV I/O.
pub mod dataset;

pub mod error;

/// Feature and target extraction.
pub mod features;

/// Regression metrics and the evaluation report.
pub mod metrics;

/// Regression models with compile-time state safety.
pub mod model;

/// Train/test partitioning.
pub mod model_selection;

/// Stage functions and orchestration.
pub mod pipeline;

/// Batch scoring and the predictions file.
pub mod predict;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Persistence of fitted artifacts.
pub mod serialization;

/// Scoring a single web form submission.
pub mod serving;

/// Fitting the model on a feature subset.
pub mod trainer;

#[cfg(test)]
pub(crate) mod test_data;

pub use dataset::{Series, Table};
pub use error::{PipelineError, Result};
