use crate::{
    checkpoint::Checkpoint,
    error::{ScanError, ScanResult},
    event::ClaimLogSource,
    ledger_file::LedgerFile,
};

pub const DEFAULT_WINDOW: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRange {
    pub min_ledger: u32,
    pub max_ledger: u32,
    /// Each query covers `window + 1` ledgers.
    pub window: u32,
}

impl ScanRange {
    pub fn new(min_ledger: u32, max_ledger: u32, window: u32) -> ScanResult<Self> {
        if min_ledger > max_ledger {
            return Err(ScanError::InvalidRange {
                min: min_ledger,
                max: max_ledger,
            });
        }
        Ok(Self {
            min_ledger,
            max_ledger,
            window,
        })
    }

    /// Inclusive `(from, to)` windows starting at `start`, the last one clamped to `max_ledger`.
    pub fn windows_from(&self, start: u32) -> impl Iterator<Item = (u32, u32)> {
        let Self {
            max_ledger, window, ..
        } = *self;
        let mut cursor = Some(start).filter(|start| *start <= max_ledger);
        std::iter::from_fn(move || {
            let from = cursor?;
            let to = from.saturating_add(window).min(max_ledger);
            cursor = to.checked_add(1).filter(|next| *next <= max_ledger);
            Some((from, to))
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub windows: u64,
    pub events: u64,
    pub last_scanned_ledger: Option<u32>,
}

pub struct ClaimScanner<S, C> {
    source: S,
    checkpoint: C,
    output: LedgerFile,
}

impl<S, C> ClaimScanner<S, C>
where
    S: ClaimLogSource,
    C: Checkpoint,
{
    pub fn new(source: S, checkpoint: C, output: LedgerFile) -> Self {
        Self {
            source,
            checkpoint,
            output,
        }
    }

    /// Scans `range` window by window, appending each window's events before
    /// querying the next. With `resume`, starts after the stored checkpoint.
    /// The first failing window aborts the run; rows already written stay.
    pub async fn run(&mut self, range: ScanRange, resume: bool) -> ScanResult<ScanSummary> {
        let start = if resume {
            match self.checkpoint.load().await? {
                Some(last) => range.min_ledger.max(last.saturating_add(1)),
                None => range.min_ledger,
            }
        } else {
            range.min_ledger
        };
        if start != range.min_ledger {
            tracing::info!(start, "resuming after checkpoint");
        }

        let mut summary = ScanSummary::default();
        for (from, to) in range.windows_from(start) {
            let events = self.source.claimed_events(from, to).await?;
            summary.windows += 1;
            summary.events += events.len() as u64;
            tracing::info!(
                "events from {from} to {to}: {}, total: {}",
                events.len(),
                summary.events
            );

            self.output.append(&events).await?;
            self.checkpoint.store(to).await?;
            summary.last_scanned_ledger = Some(to);
        }

        tracing::info!(
            windows = summary.windows,
            events = summary.events,
            output = %self.output.path().display(),
            "scan complete"
        );
        Ok(summary)
    }
}
