//! Seeded train/test partitioning.

use crate::dataset::{Series, Table};
use crate::error::{PipelineError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;
use tracing::{debug, info};

/// The four row-aligned partitions produced by [`data_split`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub x_train: Table,
    pub x_test: Table,
    pub y_train: Series,
    pub y_test: Series,
}

impl TrainTestSplit {
    /// Writes `x_train.csv`, `x_test.csv`, `y_train.csv` and `y_test.csv`
    /// into `dir`, creating it if needed.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        let tables = [("x_train.csv", &self.x_train), ("x_test.csv", &self.x_test)];
        for (file, table) in tables {
            let path = dir.join(file);
            table.write_csv(&path)?;
            info!("Successfully save the {} data as {}", file, path.display());
            debug!("The shape of {} is {:?}", file, table.shape());
        }
        let series = [("y_train.csv", &self.y_train), ("y_test.csv", &self.y_test)];
        for (file, s) in series {
            let path = dir.join(file);
            s.write_csv(&path)?;
            info!("Successfully save the {} data as {}", file, path.display());
            debug!("The length of {} is {}", file, s.len());
        }
        Ok(())
    }
}

/// Shuffles row indices with a generator seeded by `random_state` and
/// splits features and target with the same permutation.
///
/// The test partition receives `ceil(test_size * n)` rows, the train
/// partition the rest. Equal inputs and seed give identical partitions.
///
/// # Errors
/// - [`PipelineError::InvalidParameter`] unless `0 < test_size < 1`, or if
///   either partition would be empty.
/// - [`PipelineError::LengthMismatch`] if `features` and `target` differ
///   in length.
pub fn data_split(
    features: &Table,
    target: &Series,
    test_size: f64,
    random_state: u64,
) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PipelineError::InvalidParameter(format!(
            "test_size must lie in (0, 1), got {}",
            test_size
        )));
    }
    let n = features.height();
    if target.len() != n {
        return Err(PipelineError::LengthMismatch {
            expected: n,
            got: target.len(),
        });
    }

    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(PipelineError::InvalidParameter(format!(
            "test_size {} leaves an empty partition for {} rows",
            test_size, n
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(random_state);
    indices.shuffle(&mut rng);
    let (test_idx, train_idx) = indices.split_at(n_test);

    let split = TrainTestSplit {
        x_train: features.take_rows(train_idx),
        x_test: features.take_rows(test_idx),
        y_train: target.take(train_idx),
        y_test: target.take(test_idx),
    };
    info!("Successfully split the train and test set");
    debug!(
        "{} train rows, {} test rows",
        split.x_train.height(),
        split.x_test.height()
    );
    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{read_csv, read_series};

    fn indexed(n: usize) -> (Table, Series) {
        let rows: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64, (i * i) as f64]).collect();
        let y = (0..n).map(|i| i as f64 * 10.0).collect();
        (
            Table::from_rows(["id", "sq"], &rows).unwrap(),
            Series::from_vec("BodyFat", y),
        )
    }

    #[test]
    fn test_split_sizes() {
        let (x, y) = indexed(10);
        let split = data_split(&x, &y, 0.25, 42).unwrap();
        // ceil(2.5) = 3
        assert_eq!(split.x_test.height(), 3);
        assert_eq!(split.x_train.height(), 7);
        assert_eq!(split.y_test.len(), 3);
        assert_eq!(split.y_train.len(), 7);
    }

    #[test]
    fn test_split_is_partition() {
        let (x, y) = indexed(50);
        let split = data_split(&x, &y, 0.2, 7).unwrap();

        let mut ids: Vec<f64> = split
            .x_train
            .column("id")
            .unwrap()
            .iter()
            .chain(split.x_test.column("id").unwrap().iter())
            .copied()
            .collect();
        ids.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected: Vec<f64> = (0..50).map(|i| i as f64).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_split_keeps_rows_aligned() {
        let (x, y) = indexed(30);
        let split = data_split(&x, &y, 0.3, 3).unwrap();

        for (id, target) in split.x_train.column("id").unwrap().iter().zip(split.y_train.values()) {
            assert_eq!(id * 10.0, *target);
        }
        for (id, target) in split.x_test.column("id").unwrap().iter().zip(split.y_test.values()) {
            assert_eq!(id * 10.0, *target);
        }
    }

    #[test]
    fn test_split_reproducible() {
        let (x, y) = indexed(40);
        let a = data_split(&x, &y, 0.2, 123).unwrap();
        let b = data_split(&x, &y, 0.2, 123).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_rejects_bad_test_size() {
        let (x, y) = indexed(10);
        for size in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                data_split(&x, &y, size, 0),
                Err(PipelineError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_split_rejects_single_row() {
        let (x, y) = indexed(1);
        assert!(data_split(&x, &y, 0.5, 0).is_err());
    }

    #[test]
    fn test_split_length_mismatch() {
        let (x, _) = indexed(10);
        let y = Series::from_vec("BodyFat", vec![1.0; 9]);
        assert!(matches!(
            data_split(&x, &y, 0.2, 0),
            Err(PipelineError::LengthMismatch {
                expected: 10,
                got: 9
            })
        ));
    }

    #[test]
    fn test_save_writes_four_files() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let (x, y) = indexed(10);
        let split = data_split(&x, &y, 0.2, 42)?;
        let tmp = tempfile::tempdir()?;
        let dir = tmp.path().join("splits");

        split.save(&dir)?;

        assert_eq!(read_csv(dir.join("x_train.csv"))?, split.x_train);
        assert_eq!(read_csv(dir.join("x_test.csv"))?, split.x_test);
        assert_eq!(read_series(dir.join("y_train.csv"))?, split.y_train);
        assert_eq!(read_series(dir.join("y_test.csv"))?, split.y_test);
        Ok(())
    }
}
