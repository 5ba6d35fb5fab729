//! Scoring a single submission with the persisted scaler and model.

use super::form::{Measurements, MEASUREMENT_FIELDS};
use crate::dataset::Table;
use crate::error::{PipelineError, Result};
use crate::model::{FittedLasso, InferenceModel};
use crate::preprocessing::{FittedStandardScaler, FittedTransformer};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, info};

/// Multiplier turning a prediction into the gauge percentage shown next to it.
pub const PERCENTAGE_FACTOR: f64 = 7.0;

/// Display band for a body-fat prediction.
///
/// Boundaries: below 8, [8, 15), [15, 18], (18, 30) and 30 or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFatBucket {
    Essential,
    Athletic,
    Fitness,
    Average,
    Obese,
}

impl BodyFatBucket {
    pub fn from_prediction(prediction: f64) -> Self {
        if prediction < 8.0 {
            BodyFatBucket::Essential
        } else if prediction < 15.0 {
            BodyFatBucket::Athletic
        } else if prediction <= 18.0 {
            BodyFatBucket::Fitness
        } else if prediction < 30.0 {
            BodyFatBucket::Average
        } else {
            BodyFatBucket::Obese
        }
    }

    /// Horizontal marker offset used by the result gauge.
    pub fn offset(&self) -> u32 {
        match self {
            BodyFatBucket::Essential => 20,
            BodyFatBucket::Athletic => 82,
            BodyFatBucket::Fitness => 144,
            BodyFatBucket::Average => 206,
            BodyFatBucket::Obese => 268,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BodyFatBucket::Essential => "Essential",
            BodyFatBucket::Athletic => "Athletic",
            BodyFatBucket::Fitness => "Fitness",
            BodyFatBucket::Average => "Average",
            BodyFatBucket::Obese => "Obese",
        }
    }
}

/// What the result page shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyFatEstimate {
    /// Prediction rounded to one decimal place.
    pub prediction: f64,
    /// `prediction * 7`.
    pub percentage: f64,
    pub bucket: BodyFatBucket,
    /// [`BodyFatBucket::offset`] of `bucket`.
    pub body_percentage: u32,
}

impl BodyFatEstimate {
    /// Rounds `raw` and derives the presentation values from the rounded figure.
    pub fn from_raw(raw: f64) -> Self {
        let prediction = (raw * 10.0).round() / 10.0;
        let bucket = BodyFatBucket::from_prediction(prediction);
        Self {
            prediction,
            percentage: prediction * PERCENTAGE_FACTOR,
            bucket,
            body_percentage: bucket.offset(),
        }
    }
}

/// The persisted scaler and model, loaded once and shared read-only by
/// every request.
#[derive(Debug, Clone)]
pub struct ScoringContext {
    scaler: FittedStandardScaler,
    model: FittedLasso,
}

impl ScoringContext {
    /// Pairs a scaler with a model.
    ///
    /// # Errors
    /// [`PipelineError::FeatureMismatch`] if the scaler expects a column the
    /// form does not provide, or the model uses a feature the scaler does
    /// not produce.
    pub fn new(scaler: FittedStandardScaler, model: FittedLasso) -> Result<Self> {
        let form_columns: Vec<String> = MEASUREMENT_FIELDS
            .iter()
            .map(|(_, column)| column.to_string())
            .collect();
        if scaler
            .feature_names()
            .iter()
            .any(|name| !form_columns.contains(name))
        {
            return Err(PipelineError::FeatureMismatch {
                expected: form_columns,
                got: scaler.feature_names().to_vec(),
            });
        }
        if model
            .feature_names()
            .iter()
            .any(|name| !scaler.feature_names().contains(name))
        {
            return Err(PipelineError::FeatureMismatch {
                expected: scaler.feature_names().to_vec(),
                got: model.feature_names().to_vec(),
            });
        }
        Ok(Self { scaler, model })
    }

    /// Loads both artifacts and checks that they fit together.
    pub fn load(scaler_path: impl AsRef<Path>, model_path: impl AsRef<Path>) -> Result<Self> {
        let scaler_path = scaler_path.as_ref();
        let model_path = model_path.as_ref();
        let scaler = FittedStandardScaler::load_from_file(scaler_path).map_err(|e| {
            error!("The scaler file could not be loaded from {}", scaler_path.display());
            e
        })?;
        info!("Successfully load the scaler from {}", scaler_path.display());
        let model = FittedLasso::load_from_file(model_path).map_err(|e| {
            error!("The model file could not be loaded from {}", model_path.display());
            e
        })?;
        info!("Successfully load the model from {}", model_path.display());
        Self::new(scaler, model)
    }

    pub fn scaler(&self) -> &FittedStandardScaler {
        &self.scaler
    }

    pub fn model(&self) -> &FittedLasso {
        &self.model
    }

    /// Scales `measurements` with the persisted statistics and predicts.
    pub fn score(&self, measurements: &Measurements) -> Result<BodyFatEstimate> {
        let columns = MEASUREMENT_FIELDS.iter().map(|(_, column)| *column);
        let row = Table::from_rows(columns, &[measurements.to_array().to_vec()])?;
        let input = row.select(self.scaler.feature_names())?;
        let scaled = self.scaler.transform(&input)?;
        let raw = self.model.predict(&scaled)?[0];
        if !raw.is_finite() {
            return Err(PipelineError::InvalidParameter(format!(
                "model produced a non-finite prediction ({})",
                raw
            )));
        }
        let estimate = BodyFatEstimate::from_raw(raw);
        debug!("Raw prediction {} rounded to {}", raw, estimate.prediction);
        Ok(estimate)
    }
}
