/// Layout output consumed by the rendering layer.
use super::file_node::NodeId;
use crate::classify::Family;
use serde::Serialize;
use std::path::PathBuf;

/// A point in layout space. `y` is up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance from the vertical axis through the origin.
    pub fn horizontal_radius(self) -> f32 {
        self.x.hypot(self.z)
    }
}

/// Base rectangle of a block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Footprint {
    pub width: f32,
    pub depth: f32,
}

/// Linear RGBA, each channel in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Surface hints: small blocks are rough and dull, large ones smooth and shiny.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Material {
    pub roughness: f32,
    pub metalness: f32,
}

/// One block to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementRecord {
    pub id: NodeId,
    pub path: PathBuf,
    pub family: Family,
    /// Centre of the block.
    pub position: Vec3,
    pub footprint: Footprint,
    pub height: f32,
    /// Logarithmic size relative to the largest sibling, in [0, 1].
    pub rel: f32,
    pub selected: bool,
    pub matched: bool,
    pub is_others: bool,
    pub label: String,
    pub color: Rgba,
    pub material: Material,
}

/// A hub-to-node edge drawn for context only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub from: Vec3,
    pub to: Vec3,
    pub path: PathBuf,
}

/// Result of one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub placements: Vec<PlacementRecord>,
    pub connections: Vec<Connection>,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }
}
