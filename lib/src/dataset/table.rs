use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Rectangular numeric table with ordered, unique column names.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl Table {
    /// Builds a table from column names and a `(rows, columns)` value matrix.
    ///
    /// Fails if the number of names differs from the matrix width or if a
    /// name is repeated.
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if columns.len() != values.ncols() {
            return Err(PipelineError::InvalidParameter(format!(
                "{} column names for {} columns of data",
                columns.len(),
                values.ncols()
            )));
        }
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(PipelineError::InvalidParameter(format!(
                    "duplicate column `{name}`"
                )));
            }
        }
        Ok(Self { columns, values })
    }

    /// Builds a table from row vectors.
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: &[Vec<f64>],
    ) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let width = columns.len();
        let mut flat = Vec::with_capacity(rows.len() * width);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(PipelineError::InvalidParameter(format!(
                    "row {i} has {} values, expected {width}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }
        let values = Array2::from_shape_vec((rows.len(), width), flat)
            .map_err(|e| PipelineError::InvalidParameter(e.to_string()))?;
        Self::new(columns, values)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// Position of `name`, or [`PipelineError::MissingColumn`].
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PipelineError::missing_column(name))
    }

    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let idx = self.column_index(name)?;
        Ok(self.values.column(idx))
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    /// Projects onto `names`, in the order given.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let indices = names
            .iter()
            .map(|n| self.column_index(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let columns = names.iter().map(|n| n.as_ref().to_string()).collect();
        Table::new(columns, self.values.select(Axis(1), &indices))
    }

    /// Copies one column out as a [`Series`].
    pub fn series(&self, name: &str) -> Result<Series> {
        let column = self.column(name)?;
        Ok(Series::new(name, column.to_owned()))
    }

    /// Keeps the rows whose mask entry is `true`, in their original order.
    pub fn filter_rows(&self, keep: &[bool]) -> Result<Table> {
        if keep.len() != self.height() {
            return Err(PipelineError::LengthMismatch {
                expected: self.height(),
                got: keep.len(),
            });
        }
        let indices: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| k.then_some(i))
            .collect();
        Ok(self.take_rows(&indices))
    }

    /// Gathers rows by index. Panics if an index is out of bounds.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            values: self.values.select(Axis(0), indices),
        }
    }
}

/// A single named numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    values: Array1<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Array1<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn from_vec(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, Array1::from_vec(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }

    /// Gathers values by index. Panics if an index is out of bounds.
    pub fn take(&self, indices: &[usize]) -> Series {
        Series {
            name: self.name.clone(),
            values: self.values.select(Axis(0), indices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            ["Age", "Weight", "Height"],
            &[
                vec![24.0, 210.25, 74.75],
                vec![26.0, 181.0, 69.75],
                vec![25.0, 176.0, 72.5],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_rows_shape() {
        let table = sample();
        assert_eq!(table.shape(), (3, 3));
        assert_eq!(table.columns(), &["Age", "Weight", "Height"]);
    }

    #[test]
    fn test_from_rows_ragged() {
        let result = Table::from_rows(["a", "b"], &[vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(PipelineError::InvalidParameter(_))));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = Table::from_rows(["a", "a"], &[vec![1.0, 2.0]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_select_reorders() {
        let table = sample();
        let projected = table.select(&["Height", "Age"]).unwrap();
        assert_eq!(projected.columns(), &["Height", "Age"]);
        assert_eq!(projected.row(0).to_vec(), vec![74.75, 24.0]);
    }

    #[test]
    fn test_select_missing_column() {
        let table = sample();
        let err = table.select(&["Age", "BMI"]).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { ref column } if column == "BMI"));
    }

    #[test]
    fn test_filter_rows_keeps_order() {
        let table = sample();
        let filtered = table.filter_rows(&[true, false, true]).unwrap();
        assert_eq!(filtered.height(), 2);
        assert_eq!(filtered.column("Age").unwrap().to_vec(), vec![24.0, 25.0]);
    }

    #[test]
    fn test_filter_rows_mask_length() {
        let table = sample();
        assert!(matches!(
            table.filter_rows(&[true]),
            Err(PipelineError::LengthMismatch {
                expected: 3,
                got: 1
            })
        ));
    }

    #[test]
    fn test_series_take() {
        let series = Series::from_vec("BodyFat", vec![20.9, 19.2, 12.4]);
        let taken = series.take(&[2, 0]);
        assert_eq!(taken.name(), "BodyFat");
        assert_eq!(taken.to_vec(), vec![12.4, 20.9]);
    }
}
