//! Regression metrics and the evaluation report.

use crate::dataset::csv_io::ensure_parent;
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// Mean Squared Error: `mean((y_true - y_pred)^2)`.
///
/// Callers guarantee equal, non-zero lengths; see [`evaluate`].
pub fn mse(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let sum_sq: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    sum_sq / y_true.len() as f64
}

/// Root Mean Squared Error: `sqrt(MSE)`.
pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> f64 {
    mse(y_true, y_pred).sqrt()
}

/// Mean Absolute Percentage Error as a fraction (0.1 is 10 %).
///
/// The denominator is `max(|y_true|, f64::EPSILON)`, so a zero target yields
/// a very large but finite term.
pub fn mape(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let sum: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).abs() / t.abs().max(f64::EPSILON))
        .sum();
    sum / y_true.len() as f64
}

/// Coefficient of determination: `1 - SS_res / SS_tot`.
///
/// A constant `y_true` (SS_tot = 0) gives 1.0 for a perfect fit and 0.0
/// otherwise.
pub fn r2(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// The four held-out metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mape: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    /// Report body: four labeled lines, three decimals each.
    pub fn to_report(&self) -> String {
        format!(
            "MSE on test: {:.3} \nRMSE on test: {:.3} \nMAPE on test: {:.3} \nR-squared on test: {:.3} \n",
            self.mse, self.rmse, self.mape, self.r2
        )
    }

    /// Writes [`Self::to_report`] to `path`, overwriting it.
    pub fn write_report(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ensure_parent(path)?;
        fs::write(path, self.to_report()).map_err(|e| {
            error!("Failed to write the evaluation result to {}: {}", path.display(), e);
            PipelineError::io(path, e)
        })?;
        info!(
            "Successfully write and save the evaluation result as {}",
            path.display()
        );
        Ok(())
    }
}

/// Computes all metrics over row-aligned `y_true` / `y_pred`.
///
/// Non-finite results are logged and still returned.
///
/// # Errors
/// [`PipelineError::LengthMismatch`] for different lengths;
/// [`PipelineError::EmptyData`] when both are empty.
pub fn evaluate(y_true: &[f64], y_pred: &[f64]) -> Result<RegressionMetrics> {
    if y_true.len() != y_pred.len() {
        error!(
            "Cannot evaluate {} predictions against {} targets",
            y_pred.len(),
            y_true.len()
        );
        return Err(PipelineError::LengthMismatch {
            expected: y_true.len(),
            got: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(PipelineError::EmptyData(
            "no targets to evaluate".to_string(),
        ));
    }

    let metrics = RegressionMetrics {
        mse: mse(y_true, y_pred),
        rmse: rmse(y_true, y_pred),
        mape: mape(y_true, y_pred),
        r2: r2(y_true, y_pred),
    };

    info!("Successfully calculate the MSE. The MSE was {:.2}", metrics.mse);
    info!("Successfully calculate the RMSE. The RMSE was {:.2}", metrics.rmse);
    info!("Successfully calculate the MAPE. The MAPE was {:.2}", metrics.mape);
    info!("Successfully calculate the R squared. The R squared was {:.2}", metrics.r2);

    let named = [
        ("MSE", metrics.mse),
        ("RMSE", metrics.rmse),
        ("MAPE", metrics.mape),
        ("R-squared", metrics.r2),
    ];
    for (name, value) in named {
        if !value.is_finite() {
            warn!("{} is not finite ({})", name, value);
        }
    }
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_mse_and_rmse() {
        let y_true = [3.0, -0.5, 2.0, 7.0];
        let y_pred = [2.5, 0.0, 2.0, 8.0];
        assert!((mse(&y_true, &y_pred) - 0.375).abs() < EPS);
        assert!((rmse(&y_true, &y_pred) - 0.375_f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_mape() {
        let y_true = [10.0, 20.0];
        let y_pred = [11.0, 18.0];
        // (0.1 + 0.1) / 2
        assert!((mape(&y_true, &y_pred) - 0.1).abs() < EPS);
    }

    #[test]
    fn test_mape_zero_target_is_finite() {
        let value = mape(&[0.0], &[1.0]);
        assert!(value.is_finite());
        assert!(value > 1e10);
    }

    #[test]
    fn test_r2() {
        let y_true = [3.0, -0.5, 2.0, 7.0];
        let y_pred = [2.5, 0.0, 2.0, 8.0];
        assert!((r2(&y_true, &y_pred) - 0.948_608_137_044_967_9).abs() < 1e-9);
    }

    #[test]
    fn test_r2_perfect_and_constant() {
        assert_eq!(r2(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 1.0);
        assert_eq!(r2(&[5.0, 5.0], &[5.0, 5.0]), 1.0);
        assert_eq!(r2(&[5.0, 5.0], &[4.0, 6.0]), 0.0);
    }

    #[test]
    fn test_evaluate_length_mismatch() {
        assert!(matches!(
            evaluate(&[1.0, 2.0], &[1.0]),
            Err(PipelineError::LengthMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_evaluate_empty() {
        assert!(matches!(evaluate(&[], &[]), Err(PipelineError::EmptyData(_))));
    }

    #[test]
    fn test_evaluate_rmse_is_sqrt_mse() {
        let m = evaluate(&[20.9, 19.2, 12.4], &[18.0, 21.0, 12.0]).unwrap();
        assert!((m.rmse - m.mse.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_report_format() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let metrics = RegressionMetrics {
            mse: 19.5,
            rmse: 4.4159,
            mape: 0.2345,
            r2: 0.71,
        };
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("reports").join("evaluation.txt");

        metrics.write_report(&path)?;
        let text = std::fs::read_to_string(&path)?;

        assert_eq!(
            text,
            "MSE on test: 19.500 \nRMSE on test: 4.416 \nMAPE on test: 0.234 \nR-squared on test: 0.710 \n"
        );
        Ok(())
    }

    #[test]
    fn test_report_overwrites() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("evaluation.txt");
        std::fs::write(&path, "stale content that is longer than the report itself ...........................................................................")?;

        let metrics = RegressionMetrics {
            mse: 1.0,
            rmse: 1.0,
            mape: 0.0,
            r2: 1.0,
        };
        metrics.write_report(&path)?;
        assert_eq!(std::fs::read_to_string(&path)?, metrics.to_report());
        Ok(())
    }

    #[test]
    fn test_non_finite_metrics_are_still_written(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let metrics = evaluate(&[10.0, 20.0], &[f64::NAN, 20.0])?;
        assert!(metrics.mse.is_nan());
        assert!(metrics.r2.is_nan());

        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("reports").join("evaluation.txt");
        metrics.write_report(&path)?;

        let report = std::fs::read_to_string(&path)?;
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|line| line.contains("NaN")));
        assert!(lines[0].starts_with("MSE on test: NaN"));
        Ok(())
    }
}
