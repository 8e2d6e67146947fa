/// Per-scan mutable bookkeeping.
///
/// One `ScanContext` is built for each scan call and dropped when it
/// returns, so the node budget and the visited set never leak between
/// scans and no global state is needed.
use crate::error::ScanError;
use crate::scanner::progress::ScanProgress;
use crossbeam_channel::Sender;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Send an `Update` every this many visited nodes.
pub const PROGRESS_INTERVAL: usize = 1_000;

pub(crate) struct ScanContext {
    limit: usize,
    remaining: usize,
    /// Canonical paths of directories already entered.
    visited: HashSet<PathBuf>,
    pub(crate) skipped_children: u64,
    pub(crate) files_found: u64,
    pub(crate) bytes_found: u64,
    cancel_flag: Option<Arc<AtomicBool>>,
    progress_tx: Option<Sender<ScanProgress>>,
}

impl ScanContext {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            limit,
            remaining: limit,
            visited: HashSet::new(),
            skipped_children: 0,
            files_found: 0,
            bytes_found: 0,
            cancel_flag: None,
            progress_tx: None,
        }
    }

    pub(crate) fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    pub(crate) fn with_progress(mut self, tx: Sender<ScanProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Spend one unit of the node budget on `path`.
    ///
    /// Also the scan's only suspension-free cancellation point: every node
    /// passes through here before any I/O is done for it.
    pub(crate) fn charge(&mut self, path: &Path) -> Result<(), ScanError> {
        if self
            .cancel_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::Relaxed))
        {
            return Err(ScanError::Cancelled);
        }
        if self.remaining == 0 {
            return Err(ScanError::BudgetExceeded { limit: self.limit });
        }
        self.remaining -= 1;

        let visited = self.nodes_visited();
        if visited % PROGRESS_INTERVAL == 0 {
            if let Some(tx) = &self.progress_tx {
                let _ = tx.send(ScanProgress::Update {
                    nodes_visited: visited,
                    files_found: self.files_found,
                    bytes_found: self.bytes_found,
                    current_path: path.to_string_lossy().into_owned(),
                });
            }
        }
        Ok(())
    }

    /// Record a directory's canonical path. Returns `false` when it was
    /// already entered in this scan.
    pub(crate) fn mark_visited(&mut self, canonical: PathBuf) -> bool {
        self.visited.insert(canonical)
    }

    pub(crate) fn record_file(&mut self, size: u64) {
        self.files_found += 1;
        self.bytes_found += size;
    }

    pub(crate) fn nodes_visited(&self) -> usize {
        self.limit - self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_exhausted_after_limit_charges() {
        let mut ctx = ScanContext::new(2);
        let p = Path::new("/x");
        assert!(ctx.charge(p).is_ok());
        assert!(ctx.charge(p).is_ok());
        assert!(matches!(
            ctx.charge(p),
            Err(ScanError::BudgetExceeded { limit: 2 })
        ));
        assert_eq!(ctx.nodes_visited(), 2);
    }

    #[test]
    fn cancel_flag_stops_the_next_charge() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut ctx = ScanContext::new(10).with_cancel_flag(flag.clone());
        assert!(ctx.charge(Path::new("/a")).is_ok());
        flag.store(true, Ordering::Relaxed);
        assert!(matches!(ctx.charge(Path::new("/b")), Err(ScanError::Cancelled)));
    }

    #[test]
    fn visited_set_reports_repeats() {
        let mut ctx = ScanContext::new(10);
        assert!(ctx.mark_visited(PathBuf::from("/a")));
        assert!(!ctx.mark_visited(PathBuf::from("/a")));
    }
}
