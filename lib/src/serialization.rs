//! Serialization of fitted artifacts.
//!
//! Fitted scalers and models are persisted through a plain-data parameter
//! struct (`Vec<f64>`, names, scalars) rather than the runtime type itself,
//! so the byte layout stays independent of `ndarray` internals. Values are
//! stored as `f64` and round-trip bit-for-bit.

use crate::error::{PipelineError, Result};
use std::path::Path;
use tracing::{error, info};

/// Parameter representations that can be serialized to and from bytes.
///
/// Implemented for every `serde` type via a blanket impl backed by `bincode`.
pub trait SerializableParams: Sized {
    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Writes `params` to `path`, creating parent directories.
pub fn save_params<P: SerializableParams>(params: &P, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = params.to_bytes()?;
    crate::dataset::csv_io::ensure_parent(path)?;
    std::fs::write(path, bytes).map_err(|e| {
        error!("Failed to write {}: {}", path.display(), e);
        PipelineError::io(path, e)
    })?;
    info!("Successfully saved {}", path.display());
    Ok(())
}

/// Reads parameters previously written by [`save_params`].
pub fn load_params<P: SerializableParams>(path: impl AsRef<Path>) -> Result<P> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        error!("Failed to read {}: {}", path.display(), e);
        PipelineError::io(path, e)
    })?;
    let params = P::from_bytes(&bytes).map_err(|e| {
        PipelineError::Serialization(format!("{}: {}", path.display(), e))
    })?;
    info!("Successfully loaded {}", path.display());
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Params {
        names: Vec<String>,
        values: Vec<f64>,
    }

    #[test]
    fn test_save_load_round_trip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("models").join("params.bin");
        let params = Params {
            names: vec!["Age".into(), "Weight".into()],
            values: vec![0.1 + 0.2, -1.0 / 3.0],
        };

        save_params(&params, &path)?;
        let loaded: Params = load_params(&path)?;

        assert_eq!(loaded, params);
        Ok(())
    }

    #[test]
    fn test_load_missing_artifact() {
        let result: Result<Params> = load_params("no/such/model.bin");
        assert!(matches!(result, Err(PipelineError::MissingFile { .. })));
    }

    #[test]
    fn test_load_corrupt_artifact() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("corrupt.bin");
        std::fs::write(&path, [0xff, 0xff, 0xff])?;

        let result: Result<Params> = load_params(&path);
        assert!(matches!(result, Err(PipelineError::Serialization(_))));
        Ok(())
    }
}
