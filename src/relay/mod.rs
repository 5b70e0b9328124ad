//! Pushes the images referenced by an uploaded products database to the
//! external image host, decrypting them first when key material was sent.

pub mod decrypt;
pub mod github;
pub mod sniff;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags};
use tracing::{info, warn};

pub use decrypt::KeyMaterial;
pub use github::GithubHost;
pub use sniff::{ImageRef, ImageSource};

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid key material: {0}")]
    Key(String),

    #[error("decryption failed: {0}")]
    Decrypt(String),

    #[error("image host error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Destination for relayed images.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Creates or replaces `name` with `bytes`.
    async fn upsert(&self, name: &str, bytes: &[u8]) -> Result<(), RelayError>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelayReport {
    pub uploaded: Vec<String>,
    pub failed: Vec<String>,
}

pub struct ImageRelay {
    host: Arc<dyn ImageHost>,
    templates_dir: PathBuf,
}

impl ImageRelay {
    pub fn new(host: Arc<dyn ImageHost>, templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            host,
            templates_dir: templates_dir.into(),
        }
    }

    /// Relays every image found in the database at `db_path`. Failures of
    /// single images are logged and counted, never propagated.
    pub async fn run(
        &self,
        db_path: &Path,
        keys: Option<&KeyMaterial>,
    ) -> Result<RelayReport, RelayError> {
        let images = self.collect(db_path)?;
        Ok(self.upload(images, keys).await)
    }

    /// Reads the image references out of the database at `db_path`. Blob
    /// payloads are copied, so the file may be moved once this returns.
    pub fn collect(&self, db_path: &Path) -> Result<Vec<ImageRef>, RelayError> {
        let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let images = sniff::collect_images(&conn, &self.templates_dir)?;
        info!("[RELAY] {} images to relay from {}", images.len(), db_path.display());
        Ok(images)
    }

    pub async fn upload(&self, images: Vec<ImageRef>, keys: Option<&KeyMaterial>) -> RelayReport {
        let mut report = RelayReport::default();
        for image in images {
            let label = image.name.clone();
            match self.relay_one(image, keys).await {
                Ok(name) => {
                    info!("[RELAY] Uploaded {}", name);
                    report.uploaded.push(name);
                }
                Err(e) => {
                    warn!("[RELAY] Skipping {}: {}", label, e);
                    report.failed.push(label);
                }
            }
        }
        info!(
            "[RELAY] Finished: {} uploaded, {} failed",
            report.uploaded.len(),
            report.failed.len()
        );
        report
    }

    async fn relay_one(
        &self,
        image: ImageRef,
        keys: Option<&KeyMaterial>,
    ) -> Result<String, RelayError> {
        let bytes = match image.source {
            ImageSource::Blob(bytes) => bytes,
            ImageSource::File(path) => {
                fs::read(&path).map_err(|source| RelayError::Io { path, source })?
            }
        };
        let (name, bytes) = decrypt::prepare(&image.name, bytes, keys)?;
        self.host.upsert(&name, &bytes).await?;
        Ok(name)
    }
}
