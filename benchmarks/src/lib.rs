//! Shared fixtures for the body-fat benchmarks.
//!
//! The real dataset is small (252 rows), so the benches run on synthetic
//! body measurements of any size, drawn from plausible ranges with a
//! seeded generator.

use bodyfat::dataset::{Series, Table};
use bodyfat::features::scale_feature;
use bodyfat::model::{FittedLasso, Lasso};
use bodyfat::preprocessing::FittedStandardScaler;
use bodyfat::serving::MEASUREMENT_FIELDS;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Plausible (low, high) ranges per measurement column, in form order.
const RANGES: [(f64, f64); 13] = [
    (22.0, 81.0),
    (118.0, 363.0),
    (64.0, 78.0),
    (31.0, 51.0),
    (79.0, 136.0),
    (69.0, 148.0),
    (85.0, 148.0),
    (47.0, 87.0),
    (33.0, 49.0),
    (19.0, 34.0),
    (25.0, 45.0),
    (21.0, 35.0),
    (15.8, 21.4),
];

/// `n` synthetic rows: the thirteen measurement columns and a `BodyFat`
/// target driven mostly by abdomen and weight, plus noise.
pub fn synthetic_bodyfat(n: usize, seed: u64) -> (Table, Series) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values = Array2::<f64>::zeros((n, RANGES.len()));
    let mut target = Vec::with_capacity(n);

    for i in 0..n {
        for (j, (low, high)) in RANGES.iter().enumerate() {
            values[[i, j]] = rng.gen_range(*low..*high);
        }
        let abdomen = values[[i, 5]];
        let weight = values[[i, 1]];
        let wrist = values[[i, 12]];
        let noise: f64 = rng.gen_range(-2.0..2.0);
        target.push((0.9 * abdomen - 0.12 * weight - 1.5 * wrist - 20.0 + noise).max(0.0));
    }

    let columns = MEASUREMENT_FIELDS
        .iter()
        .map(|(_, column)| column.to_string())
        .collect();
    let table = Table::new(columns, values).expect("synthetic table has matching width");
    (table, Series::from_vec("BodyFat", target))
}

/// Scaled synthetic features, their scaler and the fitted target.
pub fn scaled_bodyfat(n: usize, seed: u64) -> (Table, Series, FittedStandardScaler) {
    let (features, target) = synthetic_bodyfat(n, seed);
    let (scaled, scaler) = scale_feature(&features).expect("synthetic features scale");
    (scaled, target, scaler)
}

/// A model trained on `n` synthetic rows.
pub fn trained_model(n: usize, alpha: f64) -> FittedLasso {
    let (scaled, target, _) = scaled_bodyfat(n, 42);
    Lasso::new(alpha)
        .fit(&scaled, &target)
        .expect("synthetic fit converges")
}
