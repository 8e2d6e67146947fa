/// Scanner module — builds the aggregated [`FileNode`] tree for a root path.
///
/// The walk is depth-first, sequential, and bounded:
/// - a **node budget** (`ScanOptions::node_count_limit`) fails pathological
///   scans with `BudgetExceeded` instead of letting them run unbounded;
/// - a **visited set** of canonical directory paths turns symlink and mount
///   loops into `CycleSkipped` placeholders;
/// - **`max_depth`** cuts the tree off with `Truncated` directories, which a
///   host expands later with [`Scanner::expand`].
///
/// Children are fully built before their parent, so every directory's size
/// is the sum of its finished children and no node is mutated after it is
/// constructed. A child that cannot be read is dropped from its parent; only
/// `InvalidRoot`, `BudgetExceeded` and `Cancelled` abort a scan.
///
/// Scanning blocks on I/O. [`start_scan`] runs it on a background thread and
/// reports through a channel, for hosts with an interactive thread to protect.
pub mod context;
pub mod progress;

use crate::config::ScanOptions;
use crate::error::ScanError;
use crate::model::{FileNode, NodeState};
use crate::platform::{FileMetadata, MetadataProvider, StdMetadataProvider};
use context::ScanContext;
use progress::ScanProgress;

use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// A finished scan plus the counters a host needs to spot partial results.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub root: FileNode,
    pub nodes_visited: usize,
    /// Children dropped because they could not be read.
    pub skipped_children: u64,
    pub duration: Duration,
}

/// Recursive filesystem scanner.
///
/// Construct once per set of options and reuse; every call to
/// [`Scanner::scan`] gets a fresh budget and visited set.
pub struct Scanner<P = StdMetadataProvider> {
    provider: P,
    options: ScanOptions,
}

impl Scanner<StdMetadataProvider> {
    /// Scanner over the real filesystem.
    pub fn new(options: ScanOptions) -> Self {
        Self::with_provider(StdMetadataProvider, options)
    }
}

impl<P: MetadataProvider> Scanner<P> {
    pub fn with_provider(provider: P, options: ScanOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Build the tree rooted at `root`.
    pub fn scan(&self, root: &Path) -> Result<FileNode, ScanError> {
        self.scan_with_report(root).map(|report| report.root)
    }

    /// Like [`Scanner::scan`], also returning visit and skip counts.
    pub fn scan_with_report(&self, root: &Path) -> Result<ScanReport, ScanError> {
        let mut ctx = ScanContext::new(self.options.node_count_limit);
        self.run(root, &mut ctx)
    }

    /// Rescan a `Truncated` (or any) directory as a new root, giving it a
    /// fresh depth and node budget. Splice the result back with
    /// [`FileNode::with_subtree`].
    pub fn expand(&self, node: &FileNode) -> Result<FileNode, ScanError> {
        debug!("Expanding {}", node.path.display());
        self.scan(&node.path)
    }

    pub(crate) fn run(&self, root: &Path, ctx: &mut ScanContext) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        info!("Starting scan of {}", root.display());

        self.provider
            .metadata(root, true)
            .map_err(|source| ScanError::InvalidRoot {
                path: root.to_path_buf(),
                source,
            })?;

        let tree = self.build(root, 0, ctx).map_err(|err| match err {
            // An unreadable root is an invalid root, not a skippable child.
            ScanError::ChildReadFailure { path, source } => ScanError::InvalidRoot { path, source },
            other => other,
        })?;

        let duration = start.elapsed();
        info!(
            "Scan of {} complete: {} nodes, {} bytes, {} skipped in {duration:?}",
            root.display(),
            ctx.nodes_visited(),
            tree.size_bytes,
            ctx.skipped_children,
        );

        Ok(ScanReport {
            root: tree,
            nodes_visited: ctx.nodes_visited(),
            skipped_children: ctx.skipped_children,
            duration,
        })
    }

    fn build(&self, path: &Path, depth: usize, ctx: &mut ScanContext) -> Result<FileNode, ScanError> {
        ctx.charge(path)?;

        // The root is always resolved, even when links are not followed below it.
        let follow = self.options.follow_symlinks || depth == 0;
        let meta = self
            .provider
            .metadata(path, follow)
            .map_err(|source| read_failure(path, source))?;

        if depth > 0 && meta.is_hidden && !self.options.include_hidden {
            return Ok(FileNode::placeholder(
                path.to_path_buf(),
                meta.is_dir,
                NodeState::HiddenPlaceholder,
            ));
        }

        let is_package = meta.is_dir
            && self.options.package_as_files
            && (meta.is_package || self.has_package_extension(path));

        if !meta.is_dir || is_package {
            let size = meta.size_for(self.options.size_metric);
            ctx.record_file(size);
            let node = if is_package {
                FileNode::package(path.to_path_buf(), size)
            } else {
                FileNode::leaf(path.to_path_buf(), size)
            };
            return Ok(decorate(node, &meta));
        }

        let canonical = self
            .provider
            .canonicalize(path)
            .map_err(|source| read_failure(path, source))?;
        if !ctx.mark_visited(canonical) {
            debug!("Cycle: {} already visited, skipping", path.display());
            return Ok(FileNode::placeholder(
                path.to_path_buf(),
                true,
                NodeState::CycleSkipped,
            ));
        }

        if depth >= self.options.max_depth {
            let node = FileNode::placeholder(path.to_path_buf(), true, NodeState::Truncated);
            return Ok(decorate(node, &meta));
        }

        let entries = self
            .provider
            .list_dir(path, self.options.include_hidden)
            .map_err(|source| read_failure(path, source))?;

        let mut children = Vec::with_capacity(entries.len());
        for child in entries {
            if self.is_skipped(&child) {
                continue;
            }
            match self.build(&child, depth + 1, ctx) {
                Ok(node) => children.push(node),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    debug!("Skipping unreadable entry: {err}");
                    ctx.skipped_children += 1;
                }
            }
        }

        Ok(decorate(FileNode::directory(path.to_path_buf(), children), &meta))
    }

    fn has_package_extension(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| {
            self.options
                .package_extensions
                .contains(&ext.to_string_lossy().to_lowercase())
        })
    }

    fn is_skipped(&self, path: &Path) -> bool {
        let skip = &self.options.skip_paths;
        if skip.is_empty() {
            return false;
        }
        skip.contains(path)
            || self
                .provider
                .canonicalize(path)
                .is_ok_and(|canonical| skip.contains(&canonical))
    }
}

fn read_failure(path: &Path, source: std::io::Error) -> ScanError {
    ScanError::ChildReadFailure {
        path: path.to_path_buf(),
        source,
    }
}

fn decorate(node: FileNode, meta: &FileMetadata) -> FileNode {
    node.with_type_identifier(meta.type_identifier.clone())
        .with_timestamps(meta.created, meta.modified, meta.accessed)
}

// ── Background scanning ──────────────────────────────────────────────────────

/// Slot the scan thread publishes its finished tree into.
pub type ScanResult = Arc<RwLock<Option<FileNode>>>;

/// Maximum number of progress messages that may queue up in the channel.
///
/// Updates go out every [`context::PROGRESS_INTERVAL`] nodes, so even the
/// default node budget fits without the scanner ever blocking on `send`.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a scan running on a background thread.
pub struct ScanHandle {
    /// Progress updates, then exactly one terminal message.
    pub progress_rx: Receiver<ScanProgress>,
    /// Holds the tree once `ScanProgress::Complete` has been sent.
    pub result: ScanResult,
    cancel_flag: Arc<AtomicBool>,
    _thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop at the next node it visits.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Block until the scan finishes and take its tree.
    pub fn wait(self) -> Result<FileNode, ScanError> {
        for message in self.progress_rx.iter() {
            match message {
                ScanProgress::Update { .. } => continue,
                ScanProgress::Complete { .. } => {
                    return self.result.write().take().ok_or(ScanError::Cancelled);
                }
                ScanProgress::Failed(err) => return Err(err),
                ScanProgress::Cancelled => return Err(ScanError::Cancelled),
            }
        }
        // The scan thread went away without a terminal message.
        Err(ScanError::Cancelled)
    }
}

/// Start a scan of `root` on a background thread.
///
/// A newer scan supersedes an older one simply by dropping (or cancelling)
/// the older handle; nothing is shared between scans.
pub fn start_scan(root: PathBuf, options: ScanOptions) -> std::io::Result<ScanHandle> {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let result: ScanResult = Arc::new(RwLock::new(None));

    let cancel_clone = cancel_flag.clone();
    let result_clone = result.clone();

    let thread = thread::Builder::new()
        .name("blockscape-scanner".into())
        .spawn(move || {
            let scanner = Scanner::new(options);
            let mut ctx = ScanContext::new(scanner.options().node_count_limit)
                .with_cancel_flag(cancel_clone)
                .with_progress(progress_tx.clone());

            let message = match scanner.run(&root, &mut ctx) {
                Ok(report) => {
                    *result_clone.write() = Some(report.root);
                    ScanProgress::Complete {
                        duration: report.duration,
                        nodes_visited: report.nodes_visited,
                        skipped_children: report.skipped_children,
                    }
                }
                Err(ScanError::Cancelled) => {
                    info!("Scan of {} cancelled", root.display());
                    ScanProgress::Cancelled
                }
                Err(err) => ScanProgress::Failed(err),
            };
            let _ = progress_tx.send(message);
        })?;

    Ok(ScanHandle {
        progress_rx,
        result,
        cancel_flag,
        _thread: Some(thread),
    })
}
