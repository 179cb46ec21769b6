//! Where a scan resumes from. The default keeps no state between runs.

use std::{
    future::Future,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanResult};

pub trait Checkpoint {
    /// Last ledger covered by a completed window, if any.
    fn load(&self) -> impl Future<Output = ScanResult<Option<u32>>> + Send;

    fn store(&self, last_scanned_ledger: u32) -> impl Future<Output = ScanResult<()>> + Send;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoCheckpoint;

impl Checkpoint for NoCheckpoint {
    async fn load(&self) -> ScanResult<Option<u32>> {
        Ok(None)
    }

    async fn store(&self, _last_scanned_ledger: u32) -> ScanResult<()> {
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointState {
    contract_id: String,
    last_scanned_ledger: u32,
}

/// JSON file holding the last scanned ledger of one contract's scan;
/// replaced atomically on store.
#[derive(Debug, Clone)]
pub struct FileCheckpoint {
    path: PathBuf,
    contract_id: String,
}

impl FileCheckpoint {
    pub fn new(path: impl AsRef<Path>, contract_id: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            contract_id: contract_id.into(),
        }
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

impl Checkpoint for FileCheckpoint {
    async fn load(&self) -> ScanResult<Option<u32>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let state: CheckpointState =
            serde_json::from_slice(&raw).map_err(|source| ScanError::Checkpoint {
                path: self.display_path(),
                source,
            })?;
        if state.contract_id != self.contract_id {
            return Err(ScanError::CheckpointMismatch {
                path: self.display_path(),
                stored: state.contract_id,
                expected: self.contract_id.clone(),
            });
        }
        Ok(Some(state.last_scanned_ledger))
    }

    async fn store(&self, last_scanned_ledger: u32) -> ScanResult<()> {
        let body = serde_json::to_vec_pretty(&CheckpointState {
            contract_id: self.contract_id.clone(),
            last_scanned_ledger,
        })
        .map_err(|source| ScanError::Checkpoint {
            path: self.display_path(),
            source,
        })?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, body).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}
