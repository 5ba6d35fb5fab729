//! Raw dataset transfer between object storage and the local filesystem.

use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum S3Error {
    #[error("invalid S3 path `{0}`; expected s3://bucket/key")]
    InvalidPath(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] object_store::Error),
}

/// A parsed `s3://bucket/key` address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

/// Splits `s3://bucket/key`. The whole string must match.
pub fn parse_s3(path: &str) -> Result<S3Location, S3Error> {
    let re = Regex::new(r"^s3://([\w._-]+)/([\w./_-]+)$")
        .map_err(|_| S3Error::InvalidPath(path.to_string()))?;
    let caps = re.captures(path).ok_or_else(|| {
        error!("Invalid S3 path: {}", path);
        S3Error::InvalidPath(path.to_string())
    })?;
    Ok(S3Location {
        bucket: caps[1].to_string(),
        key: caps[2].to_string(),
    })
}

/// Builds a client for `bucket` from the `AWS_*` environment variables.
pub fn s3_store(bucket: &str) -> Result<impl ObjectStore, S3Error> {
    Ok(AmazonS3Builder::from_env()
        .with_bucket_name(bucket)
        .build()?)
}

/// Copies `local_path` to `s3_path`.
pub async fn upload_file(local_path: impl AsRef<Path>, s3_path: &str) -> Result<(), S3Error> {
    let local_path = local_path.as_ref();
    let location = parse_s3(s3_path)?;
    let store = s3_store(&location.bucket)?;
    upload_to(&store, local_path, &location.key).await?;
    info!("Uploaded {} to {}", local_path.display(), s3_path);
    Ok(())
}

/// Copies `s3_path` to `local_path`, creating parent directories.
pub async fn download_file(local_path: impl AsRef<Path>, s3_path: &str) -> Result<(), S3Error> {
    let location = parse_s3(s3_path)?;
    let store = s3_store(&location.bucket)?;
    download_from(&store, &location.key, local_path.as_ref()).await?;
    info!("Downloaded {} to {}", s3_path, local_path.as_ref().display());
    Ok(())
}

/// Writes the file at `local_path` to `key` in `store`.
pub async fn upload_to(
    store: &dyn ObjectStore,
    local_path: impl AsRef<Path>,
    key: &str,
) -> Result<(), S3Error> {
    let local_path = local_path.as_ref();
    let bytes = tokio::fs::read(local_path).await.map_err(|source| S3Error::Io {
        path: local_path.to_path_buf(),
        source,
    })?;
    store
        .put(&ObjectPath::from(key), PutPayload::from(bytes))
        .await?;
    Ok(())
}

/// Reads `key` from `store` into `local_path`.
pub async fn download_from(
    store: &dyn ObjectStore,
    key: &str,
    local_path: &Path,
) -> Result<(), S3Error> {
    let bytes = store.get(&ObjectPath::from(key)).await?.bytes().await?;
    if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| S3Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(local_path, &bytes)
        .await
        .map_err(|source| S3Error::Io {
            path: local_path.to_path_buf(),
            source,
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    #[test]
    fn test_parse_s3() {
        let location = parse_s3("s3://my-bucket/raw/bodyfat.csv").unwrap();
        assert_eq!(location.bucket, "my-bucket");
        assert_eq!(location.key, "raw/bodyfat.csv");
    }

    #[test]
    fn test_parse_s3_rejects_malformed() {
        for bad in [
            "bucket/key.csv",
            "s3://bucket",
            "s3://bucket/",
            "https://bucket/key.csv",
            "s3://bucket/key with space.csv",
        ] {
            assert!(matches!(parse_s3(bad), Err(S3Error::InvalidPath(_))), "{bad}");
        }
    }

    #[tokio::test]
    async fn test_upload_then_download() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("bodyfat.csv");
        std::fs::write(&source, "Density,BodyFat\n1.0708,12.3\n").unwrap();

        let store = InMemory::new();
        upload_to(&store, &source, "raw/bodyfat.csv").await.unwrap();

        let target = tmp.path().join("nested").join("copy.csv");
        download_from(&store, "raw/bodyfat.csv", &target).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "Density,BodyFat\n1.0708,12.3\n"
        );
    }

    #[tokio::test]
    async fn test_download_missing_key() {
        let tmp = tempfile::tempdir().unwrap();
        let store = InMemory::new();
        let result = download_from(&store, "missing.csv", &tmp.path().join("x.csv")).await;
        assert!(matches!(result, Err(S3Error::Store(_))));
    }

    #[tokio::test]
    async fn test_upload_missing_local_file() {
        let store = InMemory::new();
        let result = upload_to(&store, "no/such/file.csv", "k.csv").await;
        assert!(matches!(result, Err(S3Error::Io { .. })));
    }
}
