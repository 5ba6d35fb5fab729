//! End-to-end run of the five pipeline stages on generated data, followed
//! by scoring one form submission with the persisted artifacts.
//!
//! Run with: cargo run -p bodyfat --example bodyfat_pipeline

use bodyfat::config::{
    DataSplitConfig, EvaluateConfig, FeaturesConfig, ModelTestConfig, ModelTrainConfig,
    OutlierConfig, PipelineConfig, PredictConfig, PreprocessConfig, TrainConfig,
};
use bodyfat::dataset::Table;
use bodyfat::model::Selection;
use bodyfat::pipeline::{run_step, Step};
use bodyfat::serving::{Measurements, ScoringContext, MEASUREMENT_FIELDS};
use std::error::Error;
use std::path::Path;

fn write_raw(path: &Path, rows: usize) -> Result<(), Box<dyn Error>> {
    let mut columns = vec!["Density".to_string(), "BodyFat".to_string()];
    columns.extend(MEASUREMENT_FIELDS.iter().map(|(_, c)| c.to_string()));

    let data: Vec<Vec<f64>> = (0..rows)
        .map(|i| {
            let t = i as f64;
            let abdomen = 75.0 + (i * 17 % 45) as f64;
            let weight = 135.0 + (i * 29 % 110) as f64;
            // A few implausible heights for the outlier filter to catch.
            let height = if i % 25 == 0 { 29.5 } else { 64.0 + (i * 7 % 13) as f64 };
            let wrist = 16.0 + (i % 9) as f64 * 0.5;
            let body_fat =
                (0.8 * (abdomen - 75.0) - 0.04 * (weight - 135.0) - 0.6 * (wrist - 16.0)
                    + 6.0
                    + (t * 0.7).sin())
                .max(2.0);
            vec![
                1.1 - body_fat / 500.0,
                body_fat,
                22.0 + (i * 11 % 55) as f64,
                weight,
                height,
                33.0 + (i % 8) as f64,
                90.0 + (i * 3 % 30) as f64,
                abdomen,
                92.0 + (i * 5 % 25) as f64,
                52.0 + (i % 15) as f64,
                36.0 + (i % 6) as f64,
                21.0 + (i % 5) as f64,
                29.0 + (i % 7) as f64,
                26.0 + (i % 5) as f64,
                wrist,
            ]
        })
        .collect();
    Table::from_rows(columns, &data)?.write_csv(path)?;
    Ok(())
}

fn config_in(dir: &Path) -> PipelineConfig {
    let features: Vec<String> = MEASUREMENT_FIELDS.iter().map(|(_, c)| c.to_string()).collect();
    PipelineConfig {
        preprocess: PreprocessConfig {
            load_path: dir.join("raw/bodyfat.csv"),
            save_path: dir.join("processed/cleaned.csv"),
            remove_outliers: OutlierConfig {
                column: "Height".into(),
                minimum: 60.0,
                maximum: 90.0,
            },
        },
        get_features: FeaturesConfig {
            load_path: dir.join("processed/cleaned.csv"),
            features_path: dir.join("processed/features.csv"),
            target_path: dir.join("processed/target.csv"),
            scaler_path: dir.join("models/scaler.bin"),
            features_column: features.clone(),
            target_column: "BodyFat".into(),
        },
        train: TrainConfig {
            feature_path: dir.join("processed/features.csv"),
            target_path: dir.join("processed/target.csv"),
            data_split: DataSplitConfig {
                test_size: 0.2,
                random_state: 42,
                save_dir: dir.join("split"),
            },
            model_train: ModelTrainConfig {
                initial_features: features.clone(),
                alpha: 0.1,
                random_state: 42,
                save_path: dir.join("models/lasso.bin"),
                selection: Selection::Cyclic,
                max_iter: 1000,
                tol: 1e-4,
            },
        },
        predict: PredictConfig {
            load_path: dir.join("split/x_test.csv"),
            model_path: dir.join("models/lasso.bin"),
            model_test: ModelTestConfig {
                initial_features: features,
                save_path: dir.join("reports/predictions.txt"),
            },
        },
        evaluate: EvaluateConfig {
            test_path: dir.join("split/y_test.csv"),
            prediction_path: dir.join("reports/predictions.txt"),
            save_path: dir.join("reports/evaluation.txt"),
        },
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("=== Body Fat Pipeline ===\n");
    let workdir = tempfile::tempdir()?;
    let dir = workdir.path();

    write_raw(&dir.join("raw/bodyfat.csv"), 250)?;
    let config = config_in(dir);

    for step in Step::ALL {
        run_step(step, &config)?;
    }

    println!("\n--- Evaluation report ---");
    print!("{}", std::fs::read_to_string(&config.evaluate.save_path)?);

    let context = ScoringContext::load(
        &config.get_features.scaler_path,
        &config.train.model_train.save_path,
    )?;
    println!(
        "\nSelected features: {:?}",
        context.model().selected_features()
    );

    let submission = Measurements::from_array([
        24.0, 210.25, 74.75, 39.0, 104.5, 94.4, 107.8, 66.0, 42.0, 25.6, 35.7, 30.6, 18.8,
    ]);
    let estimate = context.score(&submission)?;
    println!(
        "Estimated body fat: {}% ({})",
        estimate.prediction,
        estimate.bucket.label()
    );
    Ok(())
}
