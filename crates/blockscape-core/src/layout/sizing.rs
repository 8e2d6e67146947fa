/// Per-block sizing: how big, how tall, how opaque, how shiny.
///
/// Every quantity derives from `rel`, the log-scaled size relative to the
/// largest sibling, so one huge file does not flatten the rest to specks.
use super::LayoutItem;
use crate::classify::Family;
use crate::config::LayoutConfig;
use crate::model::size::format_size;
use crate::model::{FileNode, Material};

/// An item with its measurements, ready for a placement strategy.
#[derive(Debug, Clone)]
pub struct Block<'a> {
    /// Index into the caller's item slice.
    pub index: usize,
    pub node: &'a FileNode,
    pub family: Family,
    pub rel: f32,
    pub side: f32,
    pub height: f32,
}

impl Block<'_> {
    /// Non-package directories, the only blocks the rooms strategy puts on
    /// its perimeter.
    pub fn is_folder(&self) -> bool {
        self.node.is_dir && !self.node.is_package
    }
}

/// `ln(size + 1) / ln(max + 1)`, or 0 when `max` is 0.
pub fn rel(size: u64, max: u64) -> f32 {
    if max == 0 {
        return 0.0;
    }
    let value = (size as f64 + 1.0).ln() / (max as f64 + 1.0).ln();
    value.clamp(0.0, 1.0) as f32
}

pub fn side(rel: f32, config: &LayoutConfig) -> f32 {
    (rel * config.max_block).clamp(config.min_block, config.max_block)
}

/// Size-based height, or the age decay when `age_height` is on and both a
/// reference time and a modification time are known.
pub fn height(node: &FileNode, rel: f32, config: &LayoutConfig) -> f32 {
    let age = match (config.age_height, config.reference_time) {
        (true, Some(now)) => node.age_days(now),
        _ => None,
    };
    match age {
        Some(days) => {
            let t = (days as f32 / config.max_age_days).clamp(0.0, 1.0);
            let fresh = config.max_block * config.age_fresh_height;
            fresh + (config.age_min_height - fresh) * t
        }
        None => config.constant_height + rel * config.max_block * config.height_scale,
    }
}

pub fn alpha(rel: f32, config: &LayoutConfig) -> f32 {
    config.min_alpha + (config.max_alpha - config.min_alpha) * rel
}

pub fn material(rel: f32, config: &LayoutConfig) -> Material {
    Material {
        roughness: config.min_roughness + (config.max_roughness - config.min_roughness) * rel,
        metalness: config.min_metalness + (config.max_metalness - config.min_metalness) * rel,
    }
}

/// Name, newline, human-readable size.
pub fn label(node: &FileNode) -> String {
    format!("{}\n{}", node.name, format_size(node.size_bytes))
}

/// Measure every item and return blocks largest first, ties by name.
pub fn measure<'a>(items: &[LayoutItem<'a>], config: &LayoutConfig) -> Vec<Block<'a>> {
    let max = items.iter().map(|i| i.node.size_bytes).max().unwrap_or(0);
    let mut blocks: Vec<Block<'a>> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let rel = rel(item.node.size_bytes, max);
            Block {
                index,
                node: item.node,
                family: item.tag.family,
                rel,
                side: side(rel, config),
                height: height(item.node, rel, config),
            }
        })
        .collect();
    blocks.sort_by(|a, b| {
        b.node
            .size_bytes
            .cmp(&a.node.size_bytes)
            .then_with(|| a.node.name.cmp(&b.node.name))
    });
    blocks
}
