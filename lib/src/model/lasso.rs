//! L1-regularized linear regression (Lasso) fitted by coordinate descent.
//!
//! Minimizes
//! ```text
//! (1 / 2n) * ||y - Xw - b||^2 + alpha * ||w||_1
//! ```
//! - [`Lasso`] = `LassoRegression<Unfitted>`: hyperparameters only, call
//!   [`Lasso::fit`] to train.
//! - [`FittedLasso`] = `LassoRegression<Fitted>`: coefficients, intercept and
//!   training feature names; implements [`InferenceModel`].
//!
//! With `alpha = 0` the objective reduces to ordinary least squares.

use super::{Fitted, InferenceModel, Unfitted};
use crate::dataset::{Series, Table};
use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::{debug, info, warn};

/// Order in which coordinates are visited during each sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Features in column order.
    #[default]
    Cyclic,
    /// A fresh permutation per sweep, drawn from `random_state`.
    Random,
}

/// Hyperparameters for [`Lasso`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LassoConfig {
    /// Constant multiplying the L1 term.
    pub alpha: f64,
    /// Maximum number of full coordinate sweeps.
    pub max_iter: usize,
    /// Convergence tolerance. A sweep whose largest coefficient update is
    /// below `tol` times the largest coefficient triggers a duality-gap
    /// check; fitting stops once the gap is below `tol * ||y - mean(y)||^2`.
    /// With `alpha = 0` the update test alone decides.
    pub tol: f64,
    pub fit_intercept: bool,
    pub selection: Selection,
    /// Seed for the coordinate order under [`Selection::Random`].
    pub random_state: u64,
}

impl Default for LassoConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            max_iter: 1000,
            tol: 1e-4,
            fit_intercept: true,
            selection: Selection::Cyclic,
            random_state: 0,
        }
    }
}

impl LassoConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha >= 0.0) || !self.alpha.is_finite() {
            return Err(PipelineError::InvalidParameter(format!(
                "alpha must be a finite value >= 0, got {}",
                self.alpha
            )));
        }
        if self.max_iter == 0 {
            return Err(PipelineError::InvalidParameter(
                "max_iter must be at least 1".to_string(),
            ));
        }
        if !(self.tol > 0.0) {
            return Err(PipelineError::InvalidParameter(format!(
                "tol must be > 0, got {}",
                self.tol
            )));
        }
        Ok(())
    }
}

/// Serializable representation of a fitted Lasso model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LassoParams {
    pub config: LassoConfig,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub n_iter: usize,
}

/// A Lasso model with its training state encoded at the type level.
#[derive(Debug, Clone, PartialEq)]
pub struct LassoRegression<S> {
    config: LassoConfig,
    feature_names: Vec<String>,
    coefficients: Array1<f64>,
    intercept: f64,
    n_iter: usize,
    _state: PhantomData<S>,
}

/// Alias for an **unfitted** Lasso model.
pub type Lasso = LassoRegression<Unfitted>;

/// Alias for a trained Lasso model.
pub type FittedLasso = LassoRegression<Fitted>;

impl<S> LassoRegression<S> {
    pub fn config(&self) -> &LassoConfig {
        &self.config
    }
}

impl Default for Lasso {
    fn default() -> Self {
        Self::with_config(LassoConfig::default())
    }
}

impl Lasso {
    /// Creates a model with the given regularization strength and default
    /// solver settings.
    pub fn new(alpha: f64) -> Self {
        Self::with_config(LassoConfig {
            alpha,
            ..LassoConfig::default()
        })
    }

    pub fn with_config(config: LassoConfig) -> Self {
        Self {
            config,
            feature_names: Vec::new(),
            coefficients: Array1::zeros(0),
            intercept: 0.0,
            n_iter: 0,
            _state: PhantomData,
        }
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = max_iter;
        self
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.config.tol = tol;
        self
    }

    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.config.fit_intercept = fit_intercept;
        self
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.config.selection = selection;
        self
    }

    pub fn random_state(mut self, random_state: u64) -> Self {
        self.config.random_state = random_state;
        self
    }

    /// Fits the model on every column of `x` against `y`.
    ///
    /// # Errors
    /// - [`PipelineError::InvalidParameter`] for a negative alpha or
    ///   non-finite training values.
    /// - [`PipelineError::EmptyData`] for zero rows or zero columns.
    /// - [`PipelineError::LengthMismatch`] if `y` and `x` differ in rows.
    pub fn fit(&self, x: &Table, y: &Series) -> Result<FittedLasso> {
        self.config.validate()?;
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 || n_features == 0 {
            return Err(PipelineError::EmptyData(format!(
                "cannot fit Lasso on a {}x{} table",
                n_samples, n_features
            )));
        }
        if y.len() != n_samples {
            return Err(PipelineError::LengthMismatch {
                expected: n_samples,
                got: y.len(),
            });
        }
        if x.values().iter().chain(y.values().iter()).any(|v| !v.is_finite()) {
            return Err(PipelineError::InvalidParameter(
                "training data contains non-finite values".to_string(),
            ));
        }

        let xv = x.values();
        let yv = y.values();
        let (x_mean, y_mean) = if self.config.fit_intercept {
            let x_mean = xv
                .mean_axis(Axis(0))
                .ok_or_else(|| PipelineError::EmptyData("no rows to center".to_string()))?;
            let y_mean = yv
                .mean()
                .ok_or_else(|| PipelineError::EmptyData("no target values".to_string()))?;
            (x_mean, y_mean)
        } else {
            (Array1::zeros(n_features), 0.0)
        };

        let xc = xv - &x_mean;
        let yc = yv - y_mean;
        let mut residual = yc.clone();
        let gap_tol = self.config.tol * yc.dot(&yc);
        let norms = xc.map_axis(Axis(0), |col| col.dot(&col));
        let threshold = self.config.alpha * n_samples as f64;

        let mut coef = Array1::<f64>::zeros(n_features);
        let mut order: Vec<usize> = (0..n_features).collect();
        let mut rng = StdRng::seed_from_u64(self.config.random_state);
        let mut n_iter = 0;
        let mut converged = false;

        for iter in 0..self.config.max_iter {
            if self.config.selection == Selection::Random {
                order.shuffle(&mut rng);
            }

            let mut w_max = 0.0_f64;
            let mut d_w_max = 0.0_f64;
            for &j in &order {
                // A constant column carries no signal once centered.
                if norms[j] == 0.0 {
                    continue;
                }
                let col = xc.column(j);
                let w_old = coef[j];
                let rho = col.dot(&residual) + norms[j] * w_old;
                let w_new = soft_threshold(rho, threshold) / norms[j];
                if w_new != w_old {
                    residual.scaled_add(w_old - w_new, &col);
                    coef[j] = w_new;
                }
                d_w_max = d_w_max.max((w_new - w_old).abs());
                w_max = w_max.max(w_new.abs());
            }

            n_iter = iter + 1;
            let small_update = w_max == 0.0 || d_w_max <= self.config.tol * w_max;
            if threshold == 0.0 {
                // Without a penalty the gap is the residual sum of squares.
                if small_update {
                    converged = true;
                    break;
                }
            } else if small_update || n_iter == self.config.max_iter {
                let gap = duality_gap(&xc, &yc, &residual, &coef, threshold);
                if gap <= gap_tol {
                    converged = true;
                    break;
                }
                debug!("Duality gap {:.3e} above {:.3e} after {} sweeps", gap, gap_tol, n_iter);
            }
        }

        if !converged {
            warn!(
                "Lasso did not converge within {} iterations (alpha = {})",
                self.config.max_iter, self.config.alpha
            );
        }

        let intercept = if self.config.fit_intercept {
            y_mean - x_mean.dot(&coef)
        } else {
            0.0
        };

        info!(
            "Successfully train the Lasso model on {} rows and {} features",
            n_samples, n_features
        );
        debug!("Coordinate descent ran {} sweeps", n_iter);

        Ok(LassoRegression {
            config: self.config.clone(),
            feature_names: x.columns().to_vec(),
            coefficients: coef,
            intercept,
            n_iter,
            _state: PhantomData,
        })
    }
}

/// Duality gap of `0.5 * ||yc - xc w||^2 + lambda * ||w||_1` at `coef`,
/// where `residual = yc - xc w`.
fn duality_gap(
    xc: &Array2<f64>,
    yc: &Array1<f64>,
    residual: &Array1<f64>,
    coef: &Array1<f64>,
    lambda: f64,
) -> f64 {
    let dual_norm = xc
        .t()
        .dot(residual)
        .iter()
        .fold(0.0_f64, |m, v| m.max(v.abs()));
    let r_norm2 = residual.dot(residual);
    let (scale, gap) = if dual_norm > lambda {
        let scale = lambda / dual_norm;
        (scale, 0.5 * r_norm2 * (1.0 + scale * scale))
    } else {
        (1.0, r_norm2)
    };
    let l1: f64 = coef.iter().map(|w| w.abs()).sum();
    gap + lambda * l1 - scale * residual.dot(yc)
}

fn soft_threshold(x: f64, lambda: f64) -> f64 {
    if x > lambda {
        x - lambda
    } else if x < -lambda {
        x + lambda
    } else {
        0.0
    }
}

impl FittedLasso {
    /// One coefficient per training feature.
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of coordinate sweeps performed during fit.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Number of coefficients that are not exactly zero.
    pub fn n_nonzero(&self) -> usize {
        self.coefficients.iter().filter(|&&c| c != 0.0).count()
    }

    /// Names of the features with a non-zero coefficient, in training order.
    pub fn selected_features(&self) -> Vec<&str> {
        self.feature_names
            .iter()
            .zip(self.coefficients.iter())
            .filter(|(_, c)| **c != 0.0)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Predicts a single sample given in training feature order.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(PipelineError::LengthMismatch {
                expected: self.coefficients.len(),
                got: row.len(),
            });
        }
        let dot: f64 = row
            .iter()
            .zip(self.coefficients.iter())
            .map(|(x, w)| x * w)
            .sum();
        Ok(dot + self.intercept)
    }
}

impl InferenceModel for FittedLasso {
    type Params = LassoParams;

    fn predict(&self, x: &Table) -> Result<Array1<f64>> {
        let x = x.select(&self.feature_names)?;
        Ok(x.values().dot(&self.coefficients) + self.intercept)
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn extract_params(&self) -> LassoParams {
        LassoParams {
            config: self.config.clone(),
            feature_names: self.feature_names.clone(),
            coefficients: self.coefficients.to_vec(),
            intercept: self.intercept,
            n_iter: self.n_iter,
        }
    }

    fn from_params(params: LassoParams) -> Result<Self> {
        if params.coefficients.len() != params.feature_names.len() {
            return Err(PipelineError::Serialization(format!(
                "model holds {} coefficients for {} features",
                params.coefficients.len(),
                params.feature_names.len()
            )));
        }
        Ok(Self {
            config: params.config,
            feature_names: params.feature_names,
            coefficients: Array1::from_vec(params.coefficients),
            intercept: params.intercept,
            n_iter: params.n_iter,
            _state: PhantomData,
        })
    }
}
