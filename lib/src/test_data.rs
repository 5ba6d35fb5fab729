//! Shared fixtures for unit tests.

use crate::dataset::Table;

pub(crate) const COLUMNS: [&str; 15] = [
    "Density", "BodyFat", "Age", "Weight", "Height", "Neck", "Chest", "Abdomen", "Hip", "Thigh",
    "Knee", "Ankle", "Biceps", "Forearm", "Wrist",
];

/// Five raw measurement rows; rows 4 and 5 carry implausible heights (30 and 100).
pub(crate) fn bodyfat_table() -> Table {
    Table::from_rows(
        COLUMNS,
        &[
            vec![
                1.0502, 20.9, 24., 210.25, 74.75, 39., 104.5, 94.4, 107.8, 66., 42., 25.6, 35.7,
                30.6, 18.8,
            ],
            vec![
                1.0549, 19.2, 26., 181., 69.75, 36.4, 105.1, 90.7, 100.3, 58.4, 38.3, 22.9, 31.9,
                27.8, 17.7,
            ],
            vec![
                1.0704, 12.4, 25., 176., 72.5, 37.8, 99.6, 88.5, 97.1, 60., 39.4, 23.2, 30.5, 29.,
                18.8,
            ],
            vec![
                1.09, 4.1, 25., 191., 30., 38.1, 100.9, 82.5, 99.9, 62.9, 38.3, 23.8, 35.9, 31.1,
                18.2,
            ],
            vec![
                1.0722, 11.7, 23., 198.25, 100., 42.1, 99.6, 88.6, 104.1, 63.1, 41.7, 25., 35.6,
                30., 19.2,
            ],
        ],
    )
    .unwrap()
}

/// Noise-free linear data `y = 3*a - 2*b + 5` over a deterministic grid.
pub(crate) fn linear_table(n: usize) -> (Table, crate::dataset::Series) {
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let a = i as f64 * 0.5;
            let b = ((i * 7) % 11) as f64;
            vec![a, b]
        })
        .collect();
    let y: Vec<f64> = rows.iter().map(|r| 3.0 * r[0] - 2.0 * r[1] + 5.0).collect();
    (
        Table::from_rows(["a", "b"], &rows).unwrap(),
        crate::dataset::Series::from_vec("y", y),
    )
}
