/// Scan progress reporting — lightweight messages sent from the scan
/// thread to the host via a crossbeam channel.
///
/// The finished tree itself is published in the handle's shared result
/// slot; these messages only carry counters and the terminal status.
use crate::error::ScanError;
use std::time::Duration;

#[derive(Debug)]
pub enum ScanProgress {
    /// Periodic running totals.
    Update {
        nodes_visited: usize,
        files_found: u64,
        bytes_found: u64,
        current_path: String,
    },
    /// The tree is in the result slot.
    Complete {
        duration: Duration,
        nodes_visited: usize,
        skipped_children: u64,
    },
    /// A fatal error ended the scan (`InvalidRoot`, `BudgetExceeded`).
    Failed(ScanError),
    /// The scan stopped because its handle was cancelled.
    Cancelled,
}

impl ScanProgress {
    /// `true` for the last message a scan sends.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Update { .. })
    }
}
