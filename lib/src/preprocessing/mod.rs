//! Data preprocessing for the training pipeline.
//!
//! Transformers follow a two-state design: an unfitted [`Transformer`]
//! carries hyperparameters and learns from data, producing a
//! [`FittedTransformer`] that holds the learned statistics, transforms new
//! data and persists itself.
//!
//! # Available steps
//!
//! - [`remove_outliers`]: drop rows whose value in one column falls outside
//!   an inclusive range.
//! - [`StandardScaler`]: Z-score normalization.
//!
//! # Example
//!
//! ```ignore
//! use bodyfat::preprocessing::{FittedStandardScaler, FittedTransformer, StandardScaler, Transformer};
//!
//! let fitted = StandardScaler::new().fit(&features)?;
//! let scaled = fitted.transform(&features)?;
//! fitted.save_to_file("models/scaler.bin")?;
//!
//! // Later, at inference time
//! let loaded = FittedStandardScaler::load_from_file("models/scaler.bin")?;
//! let scaled_input = loaded.transform(&measurements)?;
//! ```

pub mod outliers;
pub mod scaling;
pub mod traits;

pub use outliers::remove_outliers;
pub use scaling::{FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams};
pub use traits::{FittedTransformer, Transformer};
