//! Filesystem media store
//!
//! Development/test stand-in for the remote blob service: writes each image
//! under a local directory and returns a URL beneath the configured public
//! base.

use async_trait::async_trait;
use std::path::PathBuf;
use uuid::Uuid;

use super::{MediaError, MediaStore};

pub struct LocalMediaStore {
    dir: PathBuf,
    public_base: String,
}

impl LocalMediaStore {
    pub fn new(dir: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base: public_base.into(),
        }
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn upload_image(&self, bytes: &[u8]) -> Result<String, MediaError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        let name = format!("{}.img", Uuid::new_v4());
        let path = self.dir.join(&name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        Ok(format!("{}/{}", self.public_base.trim_end_matches('/'), name))
    }
}
