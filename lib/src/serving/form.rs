//! Parsing and validation of the submitted measurement form.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Form keys paired with the dataset column each one feeds, in form order.
pub const MEASUREMENT_FIELDS: [(&str, &str); 13] = [
    ("age", "Age"),
    ("weight", "Weight"),
    ("height", "Height"),
    ("neck", "Neck"),
    ("chest", "Chest"),
    ("abdomen", "Abdomen"),
    ("hip", "Hip"),
    ("thigh", "Thigh"),
    ("knee", "Knee"),
    ("ankle", "Ankle"),
    ("biceps", "Biceps"),
    ("forearm", "Forearm"),
    ("wrist", "Wrist"),
];

/// Why a submission was rejected. Shown to the user, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Error! Please input a value for every input field (missing `{field}`).")]
    MissingField { field: String },

    #[error("Error! `{value}` is not a valid number for `{field}`.")]
    NotNumeric { field: String, value: String },
}

/// The thirteen body measurements: age in years, weight in pounds, height
/// in inches and circumferences in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurements {
    pub age: f64,
    pub weight: f64,
    pub height: f64,
    pub neck: f64,
    pub chest: f64,
    pub abdomen: f64,
    pub hip: f64,
    pub thigh: f64,
    pub knee: f64,
    pub ankle: f64,
    pub biceps: f64,
    pub forearm: f64,
    pub wrist: f64,
}

impl Measurements {
    pub fn from_array(v: [f64; 13]) -> Self {
        Self {
            age: v[0],
            weight: v[1],
            height: v[2],
            neck: v[3],
            chest: v[4],
            abdomen: v[5],
            hip: v[6],
            thigh: v[7],
            knee: v[8],
            ankle: v[9],
            biceps: v[10],
            forearm: v[11],
            wrist: v[12],
        }
    }

    /// Values in [`MEASUREMENT_FIELDS`] order.
    pub fn to_array(&self) -> [f64; 13] {
        [
            self.age,
            self.weight,
            self.height,
            self.neck,
            self.chest,
            self.abdomen,
            self.hip,
            self.thigh,
            self.knee,
            self.ankle,
            self.biceps,
            self.forearm,
            self.wrist,
        ]
    }
}

/// A validated form: the submitter's name and their measurements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub name: String,
    pub measurements: Measurements,
}

/// Parses the raw form into a [`Submission`].
///
/// Every measurement must be present, non-blank and a finite number.
/// Fields are checked in form order and the first problem is reported.
/// The name is optional and trimmed.
pub fn validate(form: &HashMap<String, String>) -> Result<Submission, ValidationError> {
    let mut values = [0.0; 13];
    for (slot, (field, _)) in values.iter_mut().zip(MEASUREMENT_FIELDS) {
        let raw = form.get(field).map(|s| s.trim()).unwrap_or("");
        if raw.is_empty() {
            return Err(ValidationError::MissingField {
                field: field.to_string(),
            });
        }
        *slot = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ValidationError::NotNumeric {
                field: field.to_string(),
                value: raw.to_string(),
            })?;
    }
    let name = form
        .get("name")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    Ok(Submission {
        name,
        measurements: Measurements::from_array(values),
    })
}

#[cfg(test)]
pub(crate) fn sample_form() -> HashMap<String, String> {
    let values = [
        "24", "210.25", "74.75", "39", "104.5", "94.4", "107.8", "66", "42", "25.6", "35.7", "30.6",
        "18.8",
    ];
    let mut form: HashMap<String, String> = MEASUREMENT_FIELDS
        .iter()
        .zip(values)
        .map(|((field, _), v)| (field.to_string(), v.to_string()))
        .collect();
    form.insert("name".into(), "Ada".into());
    form
}
