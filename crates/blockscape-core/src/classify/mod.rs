/// Classifier: assigns every node a `(tag, family, colour)` triple.
///
/// Stages run in order and the first hit wins: directory, package,
/// extension table, type-identifier table, content sniffing, fallback.
/// Content sniffing is the only stage that touches the disk and is capped
/// per [`ClassifyBatch`].
pub mod color;
pub mod family;
pub mod sniff;
pub mod tables;

pub use family::Family;

use crate::config::{ClassifierConfig, SniffPolicy};
use crate::error::ClassifyError;
use crate::model::{FileNode, Rgba};
use compact_str::CompactString;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, trace};

/// Result of classifying one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationTag {
    /// Fine-grained tag: a normalized extension, a signature name,
    /// `folder`, `text` or `other`.
    pub tag: CompactString,
    pub family: Family,
    pub color: Rgba,
}

/// Per-pass state: the remaining sniff budget and a memo of every path
/// already classified in this pass.
#[derive(Debug)]
pub struct ClassifyBatch {
    remaining: u32,
    sniffs: u32,
    memo: HashMap<PathBuf, ClassificationTag>,
}

impl ClassifyBatch {
    fn new(budget: u32) -> Self {
        Self {
            remaining: budget,
            sniffs: 0,
            memo: HashMap::new(),
        }
    }

    pub fn remaining_budget(&self) -> u32 {
        self.remaining
    }

    /// Number of files whose content was actually read.
    pub fn sniffs_performed(&self) -> u32 {
        self.sniffs
    }

    fn spend(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
        self.sniffs += 1;
    }
}

/// Classification service. Cheap to build; holds only its config.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Start a classification pass with a full sniff budget.
    pub fn begin_batch(&self) -> ClassifyBatch {
        ClassifyBatch::new(self.config.sniff_budget)
    }

    /// Classify a single node. Repeated calls for the same path within one
    /// batch return the memoized result without further I/O.
    pub fn classify(&self, node: &FileNode, batch: &mut ClassifyBatch) -> ClassificationTag {
        if let Some(hit) = batch.memo.get(&node.path) {
            return hit.clone();
        }
        let (tag, family) = self.resolve(node, batch);
        let color = color::tag_color(
            &tag,
            family,
            self.config.hue_jitter,
            self.config.saturation_jitter,
        );
        let result = ClassificationTag { tag, family, color };
        batch.memo.insert(node.path.clone(), result.clone());
        result
    }

    /// Classify a slice, returning tags in input order. The configured
    /// [`SniffPolicy`] decides which files get first call on the sniff budget.
    pub fn classify_all(
        &self,
        nodes: &[&FileNode],
        batch: &mut ClassifyBatch,
    ) -> Vec<ClassificationTag> {
        match self.config.sniff_policy {
            SniffPolicy::InOrder => nodes.iter().map(|n| self.classify(n, batch)).collect(),
            SniffPolicy::LargestFirst => {
                let mut order: Vec<usize> = (0..nodes.len()).collect();
                order.sort_by(|&a, &b| {
                    nodes[b]
                        .size_bytes
                        .cmp(&nodes[a].size_bytes)
                        .then_with(|| nodes[a].name.cmp(&nodes[b].name))
                });
                let mut tags: Vec<Option<ClassificationTag>> = vec![None; nodes.len()];
                for idx in order {
                    tags[idx] = Some(self.classify(nodes[idx], batch));
                }
                tags.into_iter().flatten().collect()
            }
        }
    }

    fn resolve(&self, node: &FileNode, batch: &mut ClassifyBatch) -> (CompactString, Family) {
        if node.is_others() {
            return (CompactString::const_new("others"), Family::Other);
        }
        if node.is_dir && !node.is_package {
            return (CompactString::const_new("folder"), Family::Folder);
        }
        if node.is_package {
            let tag = if node.extension.is_empty() {
                CompactString::const_new("app")
            } else {
                node.extension.clone()
            };
            return (tag, Family::App);
        }

        let ext = tables::normalize_extension(&node.extension);
        if !ext.is_empty() {
            if let Some(family) = self.extension_family(ext) {
                return (CompactString::new(ext), family);
            }
        }

        if let Some(type_id) = node.type_identifier.as_deref() {
            if let Some(family) = self.type_family(type_id) {
                return (CompactString::new(type_id.to_ascii_lowercase()), family);
            }
        }

        if let Some(hit) = self.sniff(node, batch) {
            return hit;
        }

        let tag = if ext.is_empty() { "other" } else { ext };
        (CompactString::new(tag), Family::Other)
    }

    fn extension_family(&self, ext: &str) -> Option<Family> {
        self.config
            .extra_extensions
            .get(ext)
            .copied()
            .or_else(|| tables::extension_family(ext))
    }

    /// Configured identifiers win over the built-in table; a configured key
    /// also matches as a prefix (`"image/"`, `"com.example."`).
    fn type_family(&self, type_id: &str) -> Option<Family> {
        let id = type_id.to_ascii_lowercase();
        let extra = &self.config.extra_type_ids;
        if let Some(family) = extra.get(id.as_str()) {
            return Some(*family);
        }
        extra
            .iter()
            .filter(|(key, _)| id.starts_with(key.as_str()))
            .max_by_key(|(key, _)| key.len())
            .map(|(_, family)| *family)
            .or_else(|| tables::type_family(&id))
    }

    /// Read the head of the file and match signatures or the text heuristic.
    /// Only a read that succeeds is charged against the batch budget.
    fn sniff(&self, node: &FileNode, batch: &mut ClassifyBatch) -> Option<(CompactString, Family)> {
        let size = node.size_bytes;
        let magic_ok = size <= self.config.magic_max_bytes;
        let text_ok = size <= self.config.text_max_bytes;
        if !magic_ok && !text_ok {
            return None;
        }
        if batch.remaining == 0 {
            trace!(path = %node.path.display(), "sniff budget exhausted");
            return None;
        }

        let sample = match sniff::read_head(&node.path, self.config.sample_bytes) {
            Ok(sample) => sample,
            Err(source) => {
                let err = ClassifyError::Unavailable {
                    path: node.path.clone(),
                    source,
                };
                debug!("{err}");
                return None;
            }
        };
        batch.spend();
        if batch.remaining == 0 {
            debug!(sniffs = batch.sniffs, "sniff budget used up for this batch");
        }

        if magic_ok {
            if let Some(sig) = sniff::match_signature(&sample) {
                trace!(path = %node.path.display(), tag = sig.tag, "signature match");
                return Some((CompactString::new(sig.tag), sig.family));
            }
        }
        if text_ok && sniff::looks_like_text(&sample, self.config.text_ratio) {
            trace!(path = %node.path.display(), "printable text");
            return Some((CompactString::const_new("text"), Family::Text));
        }
        None
    }
}
