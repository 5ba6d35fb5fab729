//! The five pipeline stages. Each reads its inputs from the paths in its
//! configuration section and persists its outputs for the next stage.

use crate::config::{EvaluateConfig, FeaturesConfig, PredictConfig, PreprocessConfig, TrainConfig};
use crate::dataset::{acquire_data, read_csv, read_series, Series, Table};
use crate::error::Result;
use crate::features::{extract_features, extract_target, scale_feature};
use crate::metrics::RegressionMetrics;
use crate::model::{FittedLasso, InferenceModel};
use crate::predict::{read_predictions, write_predictions};
use crate::preprocessing::{remove_outliers, FittedStandardScaler, FittedTransformer};
use crate::trainer::model_train_with;
use ndarray::Array1;
use tracing::{debug, info};

/// Loads the raw dataset, drops out-of-range rows and writes the cleaned CSV.
pub fn preprocess_data(config: &PreprocessConfig) -> Result<Table> {
    let raw = acquire_data(&config.load_path)?;
    let range = &config.remove_outliers;
    let cleaned = remove_outliers(&raw, &range.column, range.minimum, range.maximum)?;
    cleaned.write_csv(&config.save_path)?;
    info!(
        "Successfully save the cleaned data as {}",
        config.save_path.display()
    );
    debug!("The shape of the cleaned data is {:?}", cleaned.shape());
    Ok(cleaned)
}

/// Extracts and standardizes the features, extracts the target, and
/// persists features, target and the fitted scaler.
pub fn get_features(config: &FeaturesConfig) -> Result<(Table, Series, FittedStandardScaler)> {
    let data = read_csv(&config.load_path)?;
    info!(
        "Successfully load the cleaned data from {}",
        config.load_path.display()
    );

    let features = extract_features(&data, &config.features_column)?;
    let target = extract_target(&data, &config.target_column)?;
    let (scaled, scaler) = scale_feature(&features)?;

    scaled.write_csv(&config.features_path)?;
    info!(
        "Successfully save the features as {}",
        config.features_path.display()
    );
    target.write_csv(&config.target_path)?;
    info!(
        "Successfully save the target as {}",
        config.target_path.display()
    );
    scaler.save_to_file(&config.scaler_path)?;
    Ok((scaled, target, scaler))
}

/// Splits the features, persists the partitions, fits the model on the
/// training rows and persists it.
pub fn train(config: &TrainConfig) -> Result<FittedLasso> {
    let features = read_csv(&config.feature_path)?;
    info!(
        "Successfully load the features from path {}",
        config.feature_path.display()
    );
    let target = read_series(&config.target_path)?;
    info!(
        "Successfully load the target from path {}",
        config.target_path.display()
    );

    let split_config = &config.data_split;
    let split = crate::model_selection::data_split(
        &features,
        &target,
        split_config.test_size,
        split_config.random_state,
    )?;
    split.save(&split_config.save_dir)?;

    let model_config = &config.model_train;
    let model = model_train_with(
        &split.x_train,
        &split.y_train,
        &model_config.initial_features,
        model_config.lasso_config(),
    )?;
    model.save_to_file(&model_config.save_path)?;
    Ok(model)
}

/// Scores the held-out features with the persisted model and writes the
/// predictions file.
pub fn predict(config: &PredictConfig) -> Result<Array1<f64>> {
    let x_test = read_csv(&config.load_path)?;
    info!("Successfully load the x_test data");
    debug!("The shape of x_test is {:?}", x_test.shape());

    let model = FittedLasso::load_from_file(&config.model_path)?;
    let predictions =
        crate::predict::predict(&model, &x_test, &config.model_test.initial_features)?;
    write_predictions(&predictions, &config.model_test.save_path)?;
    Ok(predictions)
}

/// Compares predictions with the held-out target and writes the report.
pub fn evaluate(config: &EvaluateConfig) -> Result<RegressionMetrics> {
    let y_test = read_series(&config.test_path)?;
    let y_pred = read_predictions(&config.prediction_path)?;
    let metrics = crate::metrics::evaluate(&y_test.to_vec(), &y_pred.to_vec())?;
    metrics.write_report(&config.save_path)?;
    Ok(metrics)
}
