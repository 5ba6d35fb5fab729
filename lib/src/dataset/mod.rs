//! Tabular data for the pipeline.
//!
//! Every stage exchanges data through two types:
//!
//! - [`Table`]: named numeric columns over a row-major `ndarray::Array2<f64>`.
//!   Column order is significant and preserved by every projection.
//! - [`Series`]: a single named column, row-aligned with the table it was
//!   taken from.
//!
//! Tables are read from and written to CSV with a header row via
//! [`read_csv`] / [`Table::write_csv`]; single-column files round-trip
//! through [`read_series`] / [`Series::write_csv`].
//!
//! # Example
//!
//! ```rust
//! use bodyfat::dataset::Table;
//!
//! let table = Table::from_rows(
//!     ["Age", "Weight"],
//!     &[vec![24.0, 210.25], vec![26.0, 181.0]],
//! ).unwrap();
//!
//! let ages = table.select(&["Age"]).unwrap();
//! assert_eq!(ages.shape(), (2, 1));
//! ```

pub mod csv_io;
pub mod table;

pub use self::csv_io::{acquire_data, read_csv, read_series};
pub use self::table::{Series, Table};
