use std::env;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;
use uuid::Uuid;

use crate::error::ChatError;
use crate::storage::ObjectStorage;

const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_PUBLIC_BASE: &str = "/uploads";

/// Stores uploads as flat files under one directory and addresses them
/// below a public base URL, matching the bundled static file route. A
/// remote object store can replace it behind `ObjectStorage`.
pub struct DiskObjectStorage {
    root: PathBuf,
    public_base: String,
}

impl DiskObjectStorage {
    /// Creates the backing directory if it does not exist yet.
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Result<Self, ChatError> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| ChatError::Storage(format!("Failed to create upload dir: {}", e)))?;

        Ok(Self {
            root,
            public_base: public_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Reads `UPLOAD_DIR` and `PUBLIC_BASE_URL` from the environment,
    /// falling back to `uploads` served at `/uploads`.
    pub fn from_env() -> Result<Self, ChatError> {
        let dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string());
        let base = env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_BASE.to_string());
        Self::new(dir, base)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A unique object name keeping the original extension, so downloads
    /// open with a sensible handler. The client-supplied name itself never
    /// reaches the filesystem.
    fn object_name(original_name: &str) -> String {
        match Path::new(original_name).extension().and_then(|e| e.to_str()) {
            Some(ext) if !ext.is_empty() => format!("{}.{}", Uuid::new_v4(), ext),
            _ => Uuid::new_v4().to_string(),
        }
    }
}

impl ObjectStorage for DiskObjectStorage {
    async fn put(
        &self,
        bytes: &[u8],
        _mime_type: &str,
        original_name: &str,
    ) -> Result<String, ChatError> {
        let name = Self::object_name(original_name);
        let path = self.root.join(&name);

        fs::write(&path, bytes)
            .await
            .map_err(|e| ChatError::Upload(format!("Failed to write {}: {}", path.display(), e)))?;

        info!("stored attachment {} ({} bytes)", name, bytes.len());
        Ok(format!("{}/{}", self.public_base, name))
    }
}
