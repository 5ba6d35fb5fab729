//! Feature and target extraction from a cleaned table.

use crate::dataset::{Series, Table};
use crate::error::Result;
use crate::preprocessing::{FittedStandardScaler, StandardScaler, Transformer};
use tracing::{error, info};

/// Projects `table` onto `columns`, in the order given.
///
/// # Errors
/// [`crate::PipelineError::MissingColumn`] naming the first absent column.
pub fn extract_features<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<Table> {
    let features = table.select(columns).map_err(|e| {
        error!("Failed to extract features: {}", e);
        e
    })?;
    info!(
        "Successfully extract features {:?}",
        features.columns()
    );
    Ok(features)
}

/// Copies the `column` out of `table` as the target series.
pub fn extract_target(table: &Table, column: &str) -> Result<Series> {
    let target = table.series(column).map_err(|e| {
        error!("Failed to extract target: {}", e);
        e
    })?;
    info!("Successfully extract target {}", column);
    Ok(target)
}

/// Standardizes every column of `features` and returns the fitted scaler
/// alongside the scaled table.
pub fn scale_feature(features: &Table) -> Result<(Table, FittedStandardScaler)> {
    let (scaled, scaler) = StandardScaler::new().fit_transform(features)?;
    info!("Successfully scale features");
    Ok((scaled, scaler))
}
