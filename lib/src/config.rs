//! Pipeline configuration.
//!
//! One TOML document drives every stage, with one table per stage:
//!
//! ```toml
//! [preprocess]
//! load_path = "data/bodyfat.csv"
//! save_path = "data/cleaned.csv"
//! [preprocess.remove_outliers]
//! column = "Height"
//! minimum = 60.0
//! maximum = 90.0
//! ```
//!
//! See `config/pipeline.toml` for a complete document. The file is parsed
//! and validated once; stages receive typed sections.

use crate::error::{PipelineError, Result};
use crate::model::{LassoConfig, Selection};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub preprocess: PreprocessConfig,
    pub get_features: FeaturesConfig,
    pub train: TrainConfig,
    pub predict: PredictConfig,
    pub evaluate: EvaluateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Raw dataset.
    pub load_path: PathBuf,
    /// Cleaned dataset output.
    pub save_path: PathBuf,
    pub remove_outliers: OutlierConfig,
}

/// Inclusive range filter on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierConfig {
    pub column: String,
    pub minimum: f64,
    pub maximum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Cleaned dataset input.
    pub load_path: PathBuf,
    pub features_path: PathBuf,
    pub target_path: PathBuf,
    pub scaler_path: PathBuf,
    /// Ordered feature columns.
    pub features_column: Vec<String>,
    pub target_column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub feature_path: PathBuf,
    pub target_path: PathBuf,
    pub data_split: DataSplitConfig,
    pub model_train: ModelTrainConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSplitConfig {
    /// Fraction of rows held out, in (0, 1).
    pub test_size: f64,
    pub random_state: u64,
    /// Directory receiving `x_train.csv`, `x_test.csv`, `y_train.csv`, `y_test.csv`.
    pub save_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTrainConfig {
    pub initial_features: Vec<String>,
    pub alpha: f64,
    pub random_state: u64,
    pub save_path: PathBuf,
    #[serde(default)]
    pub selection: Selection,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_tol")]
    pub tol: f64,
}

fn default_max_iter() -> usize {
    LassoConfig::default().max_iter
}

fn default_tol() -> f64 {
    LassoConfig::default().tol
}

impl ModelTrainConfig {
    pub fn lasso_config(&self) -> LassoConfig {
        LassoConfig {
            alpha: self.alpha,
            max_iter: self.max_iter,
            tol: self.tol,
            fit_intercept: true,
            selection: self.selection,
            random_state: self.random_state,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictConfig {
    /// Held-out features (`x_test.csv`).
    pub load_path: PathBuf,
    pub model_path: PathBuf,
    pub model_test: ModelTestConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTestConfig {
    pub initial_features: Vec<String>,
    pub save_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateConfig {
    /// Held-out target (`y_test.csv`).
    pub test_path: PathBuf,
    pub prediction_path: PathBuf,
    /// Text report output.
    pub save_path: PathBuf,
}

impl PipelineConfig {
    /// Reads, parses and validates the document at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            error!("Error while loading configuration from {}", path.display());
            PipelineError::io(path, e)
        })?;
        let config = Self::parse(&text, path)?;
        info!("Configuration file loaded from {}", path.display());
        Ok(config)
    }

    /// Parses and validates `text`; `origin` names the document in errors.
    pub fn parse(text: &str, origin: impl AsRef<Path>) -> Result<Self> {
        let origin = origin.as_ref();
        let config: PipelineConfig = toml::from_str(text).map_err(|e| PipelineError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate().map_err(|message| PipelineError::Config {
            path: origin.to_path_buf(),
            message,
        })?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let outliers = &self.preprocess.remove_outliers;
        if outliers.column.is_empty() {
            return Err("preprocess.remove_outliers.column must not be empty".into());
        }
        if !(outliers.minimum <= outliers.maximum) {
            return Err(format!(
                "preprocess.remove_outliers: minimum {} exceeds maximum {}",
                outliers.minimum, outliers.maximum
            ));
        }

        if self.get_features.features_column.is_empty() {
            return Err("get_features.features_column must list at least one column".into());
        }
        if self.get_features.target_column.is_empty() {
            return Err("get_features.target_column must not be empty".into());
        }

        let split = &self.train.data_split;
        if !(split.test_size > 0.0 && split.test_size < 1.0) {
            return Err(format!(
                "train.data_split.test_size must lie in (0, 1), got {}",
                split.test_size
            ));
        }

        let model = &self.train.model_train;
        if model.initial_features.is_empty() {
            return Err("train.model_train.initial_features must not be empty".into());
        }
        model
            .lasso_config()
            .validate()
            .map_err(|e| format!("train.model_train: {}", e))?;

        if self.predict.model_test.initial_features.is_empty() {
            return Err("predict.model_test.initial_features must not be empty".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../../config/pipeline.toml");

    #[test]
    fn test_sample_config_parses() {
        let config = PipelineConfig::parse(SAMPLE, "config/pipeline.toml").unwrap();

        assert_eq!(config.preprocess.remove_outliers.column, "Height");
        assert_eq!(config.get_features.features_column.len(), 13);
        assert_eq!(config.get_features.target_column, "BodyFat");
        assert_eq!(config.train.model_train.selection, Selection::Cyclic);
        assert_eq!(
            config.train.model_train.initial_features,
            config.predict.model_test.initial_features
        );
    }

    #[test]
    fn test_solver_defaults() {
        let config = PipelineConfig::parse(SAMPLE, "config/pipeline.toml").unwrap();
        let lasso = config.train.model_train.lasso_config();
        assert_eq!(lasso.max_iter, 1000);
        assert_eq!(lasso.tol, 1e-4);
    }

    #[test]
    fn test_invalid_test_size() {
        let text = SAMPLE.replace("test_size = 0.2", "test_size = 1.5");
        let err = PipelineConfig::parse(&text, "bad.toml").unwrap_err();
        assert!(matches!(err, PipelineError::Config { ref message, .. } if message.contains("test_size")));
    }

    #[test]
    fn test_negative_alpha() {
        let text = SAMPLE.replace("alpha = 0.1", "alpha = -1.0");
        assert!(matches!(
            PipelineConfig::parse(&text, "bad.toml"),
            Err(PipelineError::Config { .. })
        ));
    }

    #[test]
    fn test_malformed_document_names_file() {
        let err = PipelineConfig::parse("[preprocess\nload_path = 1", "broken.toml").unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_missing_section() {
        let text = "[preprocess]\nload_path = \"a.csv\"\n";
        assert!(PipelineConfig::parse(text, "partial.toml").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            PipelineConfig::from_file("no/such/config.toml"),
            Err(PipelineError::MissingFile { .. })
        ));
    }
}
