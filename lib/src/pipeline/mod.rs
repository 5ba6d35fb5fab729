//! Stage orchestration.
//!
//! A [`Step`] names one stage; [`run_step`] dispatches it against the
//! matching section of a [`PipelineConfig`]. Stages talk to each other only
//! through files, so they run in separate invocations:
//!
//! ```text
//! preprocess -> get_features -> train -> predict -> evaluate
//! ```

pub mod stages;

pub use stages::{evaluate, get_features, predict, preprocess_data, train};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use std::fmt;
use std::str::FromStr;
use tracing::{error, info};

/// One pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Preprocess,
    GetFeatures,
    Train,
    Predict,
    Evaluate,
}

impl Step {
    /// Every stage, in execution order.
    pub const ALL: [Step; 5] = [
        Step::Preprocess,
        Step::GetFeatures,
        Step::Train,
        Step::Predict,
        Step::Evaluate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Preprocess => "preprocess",
            Step::GetFeatures => "get_features",
            Step::Train => "train",
            Step::Predict => "predict",
            Step::Evaluate => "evaluate",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        Step::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| {
                PipelineError::InvalidParameter(format!(
                    "unknown step `{}`; expected one of preprocess, get_features, train, predict, evaluate",
                    s
                ))
            })
    }
}

/// Runs `step` with its section of `config`. The first failure is logged
/// and returned unchanged.
pub fn run_step(step: Step, config: &PipelineConfig) -> Result<()> {
    info!("Running step {}", step);
    let outcome = match step {
        Step::Preprocess => preprocess_data(&config.preprocess).map(|_| ()),
        Step::GetFeatures => get_features(&config.get_features).map(|_| ()),
        Step::Train => train(&config.train).map(|_| ()),
        Step::Predict => predict(&config.predict).map(|_| ()),
        Step::Evaluate => evaluate(&config.evaluate).map(|_| ()),
    };
    match &outcome {
        Ok(()) => info!("Step {} finished", step),
        Err(e) => error!("Step {} failed: {}", step, e),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DataSplitConfig, EvaluateConfig, FeaturesConfig, ModelTestConfig, ModelTrainConfig,
        OutlierConfig, PredictConfig, PreprocessConfig, TrainConfig,
    };
    use crate::dataset::{read_csv, Table};
    use crate::model::{FittedLasso, InferenceModel, Selection};
    use crate::preprocessing::{FittedStandardScaler, FittedTransformer};
    use crate::test_data::COLUMNS;
    use std::path::Path;

    const FEATURES: [&str; 13] = [
        "Age", "Weight", "Height", "Neck", "Chest", "Abdomen", "Hip", "Thigh", "Knee", "Ankle",
        "Biceps", "Forearm", "Wrist",
    ];

    /// 80 deterministic rows; every tenth row has an implausible height.
    fn write_raw_dataset(path: &Path) {
        let rows: Vec<Vec<f64>> = (0..80)
            .map(|i| {
                let f = i as f64;
                let age = 22.0 + (i * 7 % 50) as f64;
                let weight = 140.0 + (i * 13 % 90) as f64;
                let height = if i % 10 == 9 { 30.0 } else { 64.0 + (i * 3 % 12) as f64 };
                let abdomen = 75.0 + (i * 11 % 40) as f64;
                let neck = 34.0 + (i % 7) as f64;
                let wrist = 16.5 + (i % 5) as f64 * 0.5;
                let body_fat =
                    0.6 * (abdomen - 75.0) + 0.05 * age - 0.02 * (weight - 140.0) + (f * 0.37).sin();
                vec![
                    1.1 - body_fat / 500.0,
                    body_fat,
                    age,
                    weight,
                    height,
                    neck,
                    95.0 + (i * 5 % 20) as f64,
                    abdomen,
                    95.0 + (i * 3 % 15) as f64,
                    55.0 + (i % 9) as f64,
                    37.0 + (i % 4) as f64,
                    22.0 + (i % 3) as f64,
                    30.0 + (i % 6) as f64,
                    27.0 + (i % 4) as f64,
                    wrist,
                ]
            })
            .collect();
        Table::from_rows(COLUMNS, &rows)
            .unwrap()
            .write_csv(path)
            .unwrap();
    }

    fn config_in(dir: &Path) -> PipelineConfig {
        let features: Vec<String> = FEATURES.iter().map(|s| s.to_string()).collect();
        PipelineConfig {
            preprocess: PreprocessConfig {
                load_path: dir.join("raw.csv"),
                save_path: dir.join("cleaned.csv"),
                remove_outliers: OutlierConfig {
                    column: "Height".into(),
                    minimum: 60.0,
                    maximum: 90.0,
                },
            },
            get_features: FeaturesConfig {
                load_path: dir.join("cleaned.csv"),
                features_path: dir.join("features.csv"),
                target_path: dir.join("target.csv"),
                scaler_path: dir.join("models/scaler.bin"),
                features_column: features.clone(),
                target_column: "BodyFat".into(),
            },
            train: TrainConfig {
                feature_path: dir.join("features.csv"),
                target_path: dir.join("target.csv"),
                data_split: DataSplitConfig {
                    test_size: 0.2,
                    random_state: 42,
                    save_dir: dir.join("split"),
                },
                model_train: ModelTrainConfig {
                    initial_features: features.clone(),
                    alpha: 0.01,
                    random_state: 42,
                    save_path: dir.join("models/lasso.bin"),
                    selection: Selection::Cyclic,
                    max_iter: 5000,
                    tol: 1e-6,
                },
            },
            predict: PredictConfig {
                load_path: dir.join("split/x_test.csv"),
                model_path: dir.join("models/lasso.bin"),
                model_test: ModelTestConfig {
                    initial_features: features,
                    save_path: dir.join("predictions.txt"),
                },
            },
            evaluate: EvaluateConfig {
                test_path: dir.join("split/y_test.csv"),
                prediction_path: dir.join("predictions.txt"),
                save_path: dir.join("reports/evaluation.txt"),
            },
        }
    }

    #[test]
    fn test_step_parsing() {
        for step in Step::ALL {
            assert_eq!(step.as_str().parse::<Step>().unwrap(), step);
        }
        assert!("score".parse::<Step>().is_err());
        assert_eq!(Step::GetFeatures.to_string(), "get_features");
    }

    #[test]
    fn test_full_pipeline() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let dir = tmp.path();
        write_raw_dataset(&dir.join("raw.csv"));
        let config = config_in(dir);

        for step in Step::ALL {
            run_step(step, &config)?;
        }

        let cleaned = read_csv(dir.join("cleaned.csv"))?;
        assert_eq!(cleaned.height(), 72);
        assert_eq!(cleaned.width(), 15);

        // ceil(0.2 * 72) = 15 held-out rows
        assert_eq!(read_csv(dir.join("split/x_test.csv"))?.height(), 15);
        assert_eq!(read_csv(dir.join("split/x_train.csv"))?.height(), 57);

        let scaler = FittedStandardScaler::load_from_file(dir.join("models/scaler.bin"))?;
        assert_eq!(scaler.feature_names(), &FEATURES);
        let model = FittedLasso::load_from_file(dir.join("models/lasso.bin"))?;
        assert_eq!(model.feature_names(), &FEATURES);

        let predictions = std::fs::read_to_string(dir.join("predictions.txt"))?;
        assert_eq!(predictions.lines().count(), 15);

        let report = std::fs::read_to_string(dir.join("reports/evaluation.txt"))?;
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("MSE on test: "));
        assert!(lines[3].starts_with("R-squared on test: "));
        Ok(())
    }

    #[test]
    fn test_missing_input_halts_stage() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());

        let err = run_step(Step::Preprocess, &config).unwrap_err();
        assert!(matches!(err, PipelineError::MissingFile { ref path } if path.ends_with("raw.csv")));
        assert!(!tmp.path().join("cleaned.csv").exists());
    }

    #[test]
    fn test_missing_outlier_column_halts_stage() {
        let tmp = tempfile::tempdir().unwrap();
        write_raw_dataset(&tmp.path().join("raw.csv"));
        let mut config = config_in(tmp.path());
        config.preprocess.remove_outliers.column = "BMI".into();

        assert!(matches!(
            run_step(Step::Preprocess, &config),
            Err(PipelineError::MissingColumn { .. })
        ));
    }
}
