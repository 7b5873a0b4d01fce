use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

pub const PROOF_OF_OWNERSHIP_DIR: &str = "property_documents/proof_of_ownership";
pub const LEGAL_DOCUMENTS_DIR: &str = "legal_documents";
pub const SCANNED_ID_FRONT_DIR: &str = "user_ids/front";
pub const SCANNED_ID_BACK_DIR: &str = "user_ids/back";

/// Longest stored file name, after the UUID prefix is removed. The full
/// relative path must fit the 255-character upload columns.
const MAX_NAME_LEN: usize = 100;
const MAX_EXTENSION_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid stored path: {0}")]
    InvalidPath(String),
}

/// Uploaded files on local disk, addressed by paths relative to the media
/// root. Only the relative path is persisted on entities.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    media_root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Writes `content` under `dir` and returns the relative path. The stored
    /// name is prefixed with a fresh UUID so uploads never overwrite each other.
    pub async fn save(
        &self,
        dir: &str,
        original_name: &str,
        content: &[u8],
    ) -> Result<String, StorageError> {
        let relative = format!("{}/{}_{}", dir, Uuid::new_v4(), sanitize_file_name(original_name));
        let absolute = self.media_root.join(&relative);

        if let Some(parent) = absolute.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&absolute, content).await?;

        tracing::debug!(path = %relative, bytes = content.len(), "Stored upload");
        Ok(relative)
    }

    /// Resolves a stored relative path. Rejects anything that could escape the
    /// media root.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, StorageError> {
        let path = Path::new(relative);
        let escapes = path.is_absolute()
            || path
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir));
        if escapes {
            return Err(StorageError::InvalidPath(relative.to_string()));
        }
        Ok(self.media_root.join(path))
    }

    /// Removes a stored upload whose owning record was never written.
    /// Failures are only logged.
    pub async fn discard(&self, relative: &str) {
        let result = match self.resolve(relative) {
            Ok(path) => tokio::fs::remove_file(path).await.map_err(StorageError::from),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::warn!(path = %relative, error = %e, "Failed to discard orphaned upload");
        }
    }
}

fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        return "upload".to_string();
    }
    truncate_keeping_extension(cleaned)
}

// Input is ASCII by now, so byte offsets are char boundaries.
fn truncate_keeping_extension(name: String) -> String {
    if name.len() <= MAX_NAME_LEN {
        return name;
    }
    let ext = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= MAX_EXTENSION_LEN + 1 => &name[dot..],
        _ => "",
    };
    let stem = &name[..name.len() - ext.len()];
    format!("{}{}", &stem[..MAX_NAME_LEN - ext.len()], ext)
}
