use std::path::{Path, PathBuf};

use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
};

use crate::{error::ScanResult, event::ClaimedEvent};

pub const DEFAULT_LEDGER_FILE: &str = "claimed_events.csv";

/// Append-only CSV output. Existing content is never truncated and no header
/// is written, so repeated runs keep adding rows.
pub struct LedgerFile {
    path: PathBuf,
    file: File,
}

impl LedgerFile {
    pub async fn open(path: impl AsRef<Path>) -> ScanResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one line per event, in the given order, and flushes.
    pub async fn append(&mut self, events: &[ClaimedEvent]) -> ScanResult<()> {
        if events.is_empty() {
            return Ok(());
        }
        let rows: String = events.iter().map(ClaimedEvent::to_csv_line).collect();
        self.file.write_all(rows.as_bytes()).await?;
        self.file.flush().await?;
        Ok(())
    }
}
