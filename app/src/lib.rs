//! # bodyfat-app
//!
//! The outer surfaces of the body-fat estimator: the web form, submission
//! storage, object-storage transfer of the raw dataset and the shared
//! logging setup used by the `run`, `serve`, `rds` and `s3` binaries.

pub mod logging;
pub mod s3;
pub mod settings;
pub mod storage;
pub mod web;

pub use logging::setup_logging;
pub use settings::AppSettings;
pub use storage::{StorageError, UserStore};
