//! Model fitting on a configured feature subset.

use crate::dataset::{Series, Table};
use crate::error::Result;
use crate::features::extract_features;
use crate::model::{FittedLasso, Lasso, LassoConfig};
use tracing::{debug, error, info};

/// Fits a Lasso model on `x_train` restricted to `feature_subset`.
///
/// The subset order becomes the model's coefficient order. `random_state`
/// seeds the coordinate order when random selection is configured.
///
/// # Errors
/// [`crate::PipelineError::MissingColumn`] if the subset names a column
/// absent from `x_train`; any error from [`Lasso::fit`].
pub fn model_train<S: AsRef<str>>(
    x_train: &Table,
    y_train: &Series,
    feature_subset: &[S],
    alpha: f64,
    random_state: u64,
) -> Result<FittedLasso> {
    let config = LassoConfig {
        alpha,
        random_state,
        ..LassoConfig::default()
    };
    model_train_with(x_train, y_train, feature_subset, config)
}

/// Like [`model_train`] with full control over the solver settings.
pub fn model_train_with<S: AsRef<str>>(
    x_train: &Table,
    y_train: &Series,
    feature_subset: &[S],
    config: LassoConfig,
) -> Result<FittedLasso> {
    let x = extract_features(x_train, feature_subset).map_err(|e| {
        error!("Failed to select training features from x_train: {}", e);
        e
    })?;
    info!("Successfully generate the Lasso model");
    debug!("Solver settings: {:?}", config);

    let model = Lasso::with_config(config).fit(&x, y_train)?;
    info!(
        "Lasso kept {} of {} features: {:?}",
        model.n_nonzero(),
        x.width(),
        model.selected_features()
    );
    Ok(model)
}
