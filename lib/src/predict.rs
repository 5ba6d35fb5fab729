//! Batch scoring of held-out features and the predictions file format.
//!
//! Predictions are stored one value per line, without a header, in
//! scientific notation with eighteen fractional digits so that reading them
//! back yields the exact `f64` written.

use crate::dataset::csv_io::ensure_parent;
use crate::dataset::Table;
use crate::error::{PipelineError, Result};
use crate::model::InferenceModel;
use ndarray::Array1;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

/// Applies `model` to `x_test` restricted to `feature_subset`.
///
/// # Errors
/// - [`PipelineError::FeatureMismatch`] if `feature_subset` differs from
///   the model's training features.
/// - [`PipelineError::MissingColumn`] if `x_test` lacks one of them.
pub fn predict<M: InferenceModel, S: AsRef<str>>(
    model: &M,
    x_test: &Table,
    feature_subset: &[S],
) -> Result<Array1<f64>> {
    let subset: Vec<String> = feature_subset
        .iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    if subset.as_slice() != model.feature_names() {
        error!(
            "Requested features {:?} differ from the model's training features {:?}",
            subset,
            model.feature_names()
        );
        return Err(PipelineError::FeatureMismatch {
            expected: model.feature_names().to_vec(),
            got: subset,
        });
    }
    let x = x_test.select(&subset)?;
    let predictions = model.predict(&x)?;
    debug!("Generated {} predictions", predictions.len());
    Ok(predictions)
}

/// Writes one prediction per line, overwriting `path`.
pub fn write_predictions(predictions: &Array1<f64>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut out = String::with_capacity(predictions.len() * 26);
    for p in predictions {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{:.18e}", p);
    }
    ensure_parent(path)?;
    fs::write(path, out).map_err(|e| {
        error!("The specified path {} does not exist", path.display());
        PipelineError::io(path, e)
    })?;
    info!("Successfully save the prediction result as {}", path.display());
    Ok(())
}

/// Reads a file written by [`write_predictions`]. Blank lines are skipped.
pub fn read_predictions(path: impl AsRef<Path>) -> Result<Array1<f64>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    let values = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(row, line)| {
            line.trim().parse::<f64>().map_err(|_| PipelineError::Parse {
                column: "prediction".to_string(),
                row,
                value: line.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    info!("Successfully load the predictions from {}", path.display());
    Ok(Array1::from_vec(values))
}
