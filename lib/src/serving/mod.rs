//! Single-submission scoring for the web form.
//!
//! [`validate`] turns the raw form into a [`Submission`];
//! [`ScoringContext::score`] applies the persisted scaler and model and
//! returns the values the result page displays.

pub mod form;
pub mod scoring;

pub use form::{validate, Measurements, Submission, ValidationError, MEASUREMENT_FIELDS};
pub use scoring::{BodyFatBucket, BodyFatEstimate, ScoringContext, PERCENTAGE_FACTOR};
