use crate::dataset::{Series, Table};
use crate::error::{PipelineError, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use ndarray::Array2;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

/// Reads a headed, all-numeric CSV file into a [`Table`].
pub fn read_csv(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| PipelineError::csv(path, e))?;

    let columns: Vec<String> = rdr
        .headers()
        .map_err(|e| PipelineError::csv(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut flat = Vec::new();
    let mut n_rows = 0;
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| PipelineError::csv(path, e))?;
        for (col, field) in record.iter().enumerate() {
            let value = field.parse::<f64>().map_err(|_| PipelineError::Parse {
                column: columns[col].clone(),
                row,
                value: field.to_string(),
            })?;
            flat.push(value);
        }
        n_rows += 1;
    }

    let values = Array2::from_shape_vec((n_rows, columns.len()), flat)
        .map_err(|e| PipelineError::InvalidParameter(e.to_string()))?;
    Table::new(columns, values)
}

/// Reads a single-column CSV file into a [`Series`].
pub fn read_series(path: impl AsRef<Path>) -> Result<Series> {
    let path = path.as_ref();
    let table = read_csv(path)?;
    if table.width() != 1 {
        return Err(PipelineError::InvalidParameter(format!(
            "{} holds {} columns, expected a single column",
            path.display(),
            table.width()
        )));
    }
    let name = table.columns()[0].clone();
    table.series(&name)
}

/// Loads the raw dataset, logging the outcome with the path it came from.
pub fn acquire_data(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    match read_csv(path) {
        Ok(table) => {
            info!("Successfully acquired the data from path {}", path.display());
            debug!("The shape of the data is {:?}", table.shape());
            Ok(table)
        }
        Err(e) => {
            error!("Failed to acquire the data from {}: {}", path.display(), e);
            Err(e)
        }
    }
}

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))
        }
        _ => Ok(()),
    }
}

fn write_rows(
    path: &Path,
    header: &[String],
    rows: impl Iterator<Item = Vec<f64>>,
) -> Result<()> {
    ensure_parent(path)?;
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .map_err(|e| PipelineError::csv(path, e))?;
    wtr.write_record(header)
        .map_err(|e| PipelineError::csv(path, e))?;
    for row in rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| PipelineError::csv(path, e))?;
    }
    wtr.flush().map_err(|e| PipelineError::io(path, e))
}

impl Table {
    /// Writes the table as CSV with a header row, creating parent directories.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write_rows(
            path,
            self.columns(),
            self.values().rows().into_iter().map(|r| r.to_vec()),
        )
    }
}

impl Series {
    /// Writes the series as a one-column CSV with its name as header.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write_rows(
            path,
            &[self.name().to_string()],
            self.values().iter().map(|&v| vec![v]),
        )
    }
}
