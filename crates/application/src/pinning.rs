use std::future::Future;
use std::sync::Arc;

use infrastructure::ipfs::ContentPinner;
use infrastructure::repositories::RepoResult;
use infrastructure::storage::LocalFileStorage;
use tracing::{info, warn};

/// Best-effort post-save pinning. Failures are logged and swallowed so the
/// primary save is never affected.
#[derive(Clone, Default)]
pub struct PinStep {
    pinner: Option<Arc<dyn ContentPinner>>,
}

impl PinStep {
    pub fn new(pinner: Arc<dyn ContentPinner>) -> Self {
        Self {
            pinner: Some(pinner),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.pinner.is_some()
    }

    /// Pins a stored upload and returns its CID, or `None` on any failure.
    pub async fn pin_stored(&self, storage: &LocalFileStorage, relative: &str) -> Option<String> {
        let pinner = self.pinner.as_ref()?;

        let path = match storage.resolve(relative) {
            Ok(path) => path,
            Err(e) => {
                warn!(path = %relative, error = %e, "Skipping pin for unresolvable path");
                return None;
            }
        };

        match pinner.pin(&path).await {
            Ok(cid) => {
                info!(path = %relative, cid = %cid, "Pinned upload");
                Some(cid)
            }
            Err(e) => {
                warn!(path = %relative, error = %e, "Pinning failed, saved without content identifier");
                None
            }
        }
    }
}

/// Runs the narrow CID write for an already-saved record. A failed write is
/// logged and `saved` comes back unchanged.
pub async fn record_cid<M>(saved: M, write: impl Future<Output = RepoResult<M>>) -> M {
    match write.await {
        Ok(updated) => updated,
        Err(e) => {
            warn!(error = %e, "Could not store content identifier, keeping saved record");
            saved
        }
    }
}
