/// Configuration surface for scanning, classification, selection and layout.
///
/// Every tunable the algorithms consult lives here with its default; the
/// algorithm code keeps only numerical guards (epsilons) of its own. All
/// structs deserialize with `#[serde(default)]`, so a host can load a
/// partial JSON/TOML document and inherit the defaults for anything it
/// omits. Loading the document is the host's job; the core only validates.
use crate::classify::Family;
use crate::error::ConfigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;

/// Everything the core needs, bundled for hosts that load one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockscapeConfig {
    pub scan: ScanOptions,
    pub classifier: ClassifierConfig,
    pub selection: SelectionConfig,
    pub layout: LayoutConfig,
}

impl BlockscapeConfig {
    /// Check every section. Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scan.validate()?;
        self.classifier.validate()?;
        self.layout.validate()
    }
}

// ── Scanner ──────────────────────────────────────────────────────────────────

/// Which size a leaf reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMetric {
    /// Allocated size, falling back to logical size, falling back to 0.
    #[default]
    Allocated,
    /// Logical length only (what `ls -l` shows).
    Logical,
}

/// Options for one [`crate::scanner::Scanner`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Include dot-files and entries flagged hidden by the OS. When `false`,
    /// hidden entries below the root are not listed at all. The root itself is
    /// never filtered. Default `false`.
    pub include_hidden: bool,

    /// Descend into symlinked directories. When `false`, a symlink becomes a
    /// leaf sized by the link itself. Default `false`.
    pub follow_symlinks: bool,

    /// Directories at this depth (root = 0) are returned empty with
    /// `NodeState::Truncated`. Default `4`.
    pub max_depth: usize,

    /// Treat package directories (see `package_extensions`) as opaque files
    /// sized by their own metadata. Default `true`.
    pub package_as_files: bool,

    /// Paths never listed. Compared against both the raw and the canonical
    /// child path.
    pub skip_paths: HashSet<PathBuf>,

    /// Upper bound on visited nodes, root included. Exceeding it fails the
    /// scan with `ScanError::BudgetExceeded`. Default `200_000`.
    pub node_count_limit: usize,

    /// Directory extensions (lowercase, no dot) that mark a package.
    pub package_extensions: BTreeSet<String>,

    /// Size reported for files and packages. Default `Allocated`.
    pub size_metric: SizeMetric,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_hidden: false,
            follow_symlinks: false,
            max_depth: 4,
            package_as_files: true,
            skip_paths: HashSet::new(),
            node_count_limit: 200_000,
            package_extensions: [
                "app",
                "bundle",
                "framework",
                "plugin",
                "kext",
                "pkg",
                "xcodeproj",
                "photoslibrary",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            size_metric: SizeMetric::Allocated,
        }
    }
}

impl ScanOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_count_limit == 0 {
            return Err(ConfigError::invalid("scan.node_count_limit", "must be > 0"));
        }
        Ok(())
    }
}

// ── Classifier ───────────────────────────────────────────────────────────────

/// Order in which unknown files compete for the sniff budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SniffPolicy {
    /// Sniff in the order the caller classifies nodes.
    #[default]
    InOrder,
    /// Sniff the largest unknown files first.
    LargestFirst,
}

/// Options for the [`crate::classify::Classifier`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Content sniffs allowed per batch (one layout pass). Default `200`.
    pub sniff_budget: u32,

    /// Files larger than this are never read for magic numbers. Default 5 MiB.
    pub magic_max_bytes: u64,

    /// Files larger than this are never tested for text. Default 2 MiB.
    pub text_max_bytes: u64,

    /// Bytes read from the head of a file per sniff. Default `4096`.
    pub sample_bytes: usize,

    /// Printable-character fraction above which a sample counts as text.
    /// Default `0.95`.
    pub text_ratio: f32,

    /// Which files get the sniff budget first when a batch is classified
    /// together. Default [`SniffPolicy::InOrder`].
    pub sniff_policy: SniffPolicy,

    /// Extra `extension → family` entries, checked before the built-in table.
    pub extra_extensions: BTreeMap<String, Family>,

    /// Extra `type identifier → family` entries, checked before the built-in
    /// capability table.
    pub extra_type_ids: BTreeMap<String, Family>,

    /// Maximum hue shift (fraction of the colour wheel) applied per tag.
    /// Default `0.07`.
    pub hue_jitter: f32,

    /// Maximum saturation shift applied per tag. Default `0.05`.
    pub saturation_jitter: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sniff_budget: 200,
            magic_max_bytes: 5 * 1024 * 1024,
            text_max_bytes: 2 * 1024 * 1024,
            sample_bytes: 4096,
            text_ratio: 0.95,
            sniff_policy: SniffPolicy::InOrder,
            extra_extensions: BTreeMap::new(),
            extra_type_ids: BTreeMap::new(),
            hue_jitter: 0.07,
            saturation_jitter: 0.05,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.text_ratio) {
            return Err(ConfigError::invalid("classifier.text_ratio", "must be in [0, 1]"));
        }
        if self.sample_bytes == 0 {
            return Err(ConfigError::invalid("classifier.sample_bytes", "must be > 0"));
        }
        if !(0.0..=0.5).contains(&self.hue_jitter) {
            return Err(ConfigError::invalid("classifier.hue_jitter", "must be in [0, 0.5]"));
        }
        Ok(())
    }
}

// ── Aggregator ───────────────────────────────────────────────────────────────

/// Top-N selection of a node's children.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// How many real children stay visible; the rest fold into the Others
    /// node. Default `40`.
    pub limit: usize,

    /// Families shown. Files of other families are dropped before sorting;
    /// directories are always kept. Default: every family.
    pub enabled_families: BTreeSet<Family>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            limit: 40,
            enabled_families: Family::ALL.into_iter().collect(),
        }
    }
}

// ── Layout ───────────────────────────────────────────────────────────────────

/// Placement strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    /// One outward spiral per family around the largest item.
    #[default]
    FamilyArms,
    /// Row/column packing.
    Grid,
    /// Concentric rings, largest at the centre.
    Radial,
    /// Files in a central grid, folders on perimeter rings.
    Rooms,
}

/// Geometry and appearance tunables for the [`crate::layout::LayoutEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Placement strategy. Default [`LayoutStrategy::FamilyArms`].
    pub strategy: LayoutStrategy,

    /// Smallest footprint side. Default `0.4`.
    pub min_block: f32,

    /// Largest footprint side; also the unit for radii and elevation.
    /// Default `4.0`.
    pub max_block: f32,

    /// Clearance between cells in grid/radial/rooms, and the radial step
    /// base of the family-arms drift. Default `0.6`.
    pub spacing: f32,

    /// Height floor added to every size-based height. Default `0.3`.
    pub constant_height: f32,

    /// `k` in `constant_height + rel * max_block * k`. Default `0.5`.
    pub height_scale: f32,

    /// Height decays with age instead of growing with size. Default `false`.
    pub age_height: bool,

    /// Age at which the decayed height reaches its floor. Default `365`.
    pub max_age_days: f32,

    /// "Now" for age-based height. Layout never reads the clock; when this
    /// is `None`, age-based height falls back to size-based height.
    pub reference_time: Option<DateTime<Utc>>,

    /// Age-based height of a file modified at `reference_time`, in units of
    /// `max_block`. Default `0.8`.
    pub age_fresh_height: f32,

    /// Age-based height at `max_age_days` and beyond. Default `0.1`.
    pub age_min_height: f32,

    /// Roughness of the smallest item. Default `0.85`.
    pub min_roughness: f32,

    /// Roughness of the largest item. Default `0.35`.
    pub max_roughness: f32,

    /// Metalness of the smallest item. Default `0.05`.
    pub min_metalness: f32,

    /// Metalness of the largest item. Default `0.5`.
    pub max_metalness: f32,

    /// Gap added after every arm item. Default `0.3`.
    pub gap_base: f32,

    /// Extra gap for small items: `gap_base + (1 - rel) * gap_range`.
    /// Default `1.2`.
    pub gap_range: f32,

    /// Minimum angular step (radians) along an arm. Default `0.12`.
    pub arm_spread: f32,

    /// Elevation gained per full revolution, in units of `max_block`.
    /// Default `0.35`.
    pub arm_pitch: f32,

    /// Starting radius of every arm, in units of `max_block`. Default `1.5`.
    pub arm_base_radius: f32,

    /// Fraction of `side + spacing` an arm drifts outward per item.
    /// Default `0.25`.
    pub arm_drift: f32,

    /// Alpha of the smallest item. Default `0.35`.
    pub min_alpha: f32,

    /// Alpha of the largest item. Default `1.0`.
    pub max_alpha: f32,

    /// Emit hub-to-node connections (family-arms only). Default `true`.
    pub show_connections: bool,

    /// Cap on emitted connections. Default `64`.
    pub max_connections: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            strategy: LayoutStrategy::FamilyArms,
            min_block: 0.4,
            max_block: 4.0,
            spacing: 0.6,
            constant_height: 0.3,
            height_scale: 0.5,
            age_height: false,
            max_age_days: 365.0,
            reference_time: None,
            age_fresh_height: 0.8,
            age_min_height: 0.1,
            min_roughness: 0.85,
            max_roughness: 0.35,
            min_metalness: 0.05,
            max_metalness: 0.5,
            gap_base: 0.3,
            gap_range: 1.2,
            arm_spread: 0.12,
            arm_pitch: 0.35,
            arm_base_radius: 1.5,
            arm_drift: 0.25,
            min_alpha: 0.35,
            max_alpha: 1.0,
            show_connections: true,
            max_connections: 64,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_block > 0.0) {
            return Err(ConfigError::invalid("layout.max_block", "must be > 0"));
        }
        if !(self.min_block > 0.0 && self.min_block <= self.max_block) {
            return Err(ConfigError::invalid(
                "layout.min_block",
                "must be > 0 and <= max_block",
            ));
        }
        if self.spacing < 0.0 || self.gap_base < 0.0 || self.gap_range < 0.0 {
            return Err(ConfigError::invalid(
                "layout.spacing",
                "spacing and gaps must be non-negative",
            ));
        }
        if !(self.arm_spread > 0.0) {
            return Err(ConfigError::invalid("layout.arm_spread", "must be > 0"));
        }
        if !(self.arm_base_radius > 0.0) {
            return Err(ConfigError::invalid("layout.arm_base_radius", "must be > 0"));
        }
        if self.arm_drift < 0.0 {
            return Err(ConfigError::invalid("layout.arm_drift", "must be >= 0"));
        }
        if !(self.max_age_days > 0.0) {
            return Err(ConfigError::invalid("layout.max_age_days", "must be > 0"));
        }
        let alpha = 0.0..=1.0;
        if !alpha.contains(&self.min_alpha) || !alpha.contains(&self.max_alpha) {
            return Err(ConfigError::invalid("layout.min_alpha", "alphas must be in [0, 1]"));
        }
        if !(self.age_min_height > 0.0 && self.age_fresh_height >= 0.0) {
            return Err(ConfigError::invalid(
                "layout.age_min_height",
                "age heights must be positive",
            ));
        }
        let unit = 0.0..=1.0;
        if ![
            self.min_roughness,
            self.max_roughness,
            self.min_metalness,
            self.max_metalness,
        ]
        .iter()
        .all(|v| unit.contains(v))
        {
            return Err(ConfigError::invalid(
                "layout.min_roughness",
                "roughness and metalness must be in [0, 1]",
            ));
        }
        Ok(())
    }
}
