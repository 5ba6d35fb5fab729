//! Range-based outlier removal.

use crate::dataset::Table;
use crate::error::{PipelineError, Result};
use tracing::{debug, error, info};

/// Drops rows whose `column` value lies outside `[minimum, maximum]`.
///
/// Only `column` is inspected. Surviving rows keep their relative order and
/// every column is retained. A `NaN` value is never inside the range, so
/// such rows are dropped too.
///
/// # Errors
/// [`PipelineError::MissingColumn`] if `column` is absent;
/// [`PipelineError::InvalidParameter`] if `minimum > maximum`.
pub fn remove_outliers(table: &Table, column: &str, minimum: f64, maximum: f64) -> Result<Table> {
    if minimum > maximum {
        return Err(PipelineError::InvalidParameter(format!(
            "outlier range for `{column}` is empty: minimum {minimum} > maximum {maximum}"
        )));
    }

    let values = table.column(column).map_err(|e| {
        error!("The key {} does not exist in the data", column);
        e
    })?;
    let keep: Vec<bool> = values
        .iter()
        .map(|&v| minimum <= v && v <= maximum)
        .collect();

    let cleaned = table.filter_rows(&keep)?;
    info!("Successfully removed the outliers from {} column", column);
    debug!(
        "Kept {} of {} rows within [{}, {}]",
        cleaned.height(),
        table.height(),
        minimum,
        maximum
    );
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data::{bodyfat_table, COLUMNS};

    #[test]
    fn test_remove_outliers() {
        let table = bodyfat_table();
        let output = remove_outliers(&table, "Height", 60.0, 90.0).unwrap();

        let expected = Table::from_rows(
            COLUMNS,
            &[
                vec![
                    1.0502, 20.9, 24., 210.25, 74.75, 39., 104.5, 94.4, 107.8, 66., 42., 25.6,
                    35.7, 30.6, 18.8,
                ],
                vec![
                    1.0549, 19.2, 26., 181., 69.75, 36.4, 105.1, 90.7, 100.3, 58.4, 38.3, 22.9,
                    31.9, 27.8, 17.7,
                ],
                vec![
                    1.0704, 12.4, 25., 176., 72.5, 37.8, 99.6, 88.5, 97.1, 60., 39.4, 23.2,
                    30.5, 29., 18.8,
                ],
            ],
        )
        .unwrap();

        assert_eq!(output, expected);
    }

    #[test]
    fn test_remove_outliers_not_existing() {
        let table = bodyfat_table();
        let result = remove_outliers(&table, "BMI", 30.0, 50.0);
        assert!(matches!(result, Err(PipelineError::MissingColumn { ref column }) if column == "BMI"));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let table = bodyfat_table();
        let output = remove_outliers(&table, "Height", 30.0, 100.0).unwrap();
        assert_eq!(output.height(), 5);
    }

    #[test]
    fn test_remove_outliers_idempotent() {
        let table = bodyfat_table();
        let once = remove_outliers(&table, "Height", 60.0, 90.0).unwrap();
        let twice = remove_outliers(&once, "Height", 60.0, 90.0).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_surviving_rows_in_range() {
        let table = bodyfat_table();
        let output = remove_outliers(&table, "Age", 24.0, 25.0).unwrap();
        let ages = output.column("Age").unwrap().to_vec();
        assert_eq!(ages, vec![24.0, 25.0, 25.0]);
        assert_eq!(output.columns(), table.columns());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let table = bodyfat_table();
        assert!(matches!(
            remove_outliers(&table, "Height", 90.0, 60.0),
            Err(PipelineError::InvalidParameter(_))
        ));
    }
}
