/// Data model: the scanned node tree and the placement records produced
/// from it.
pub mod file_node;
pub mod placement;
pub mod size;

pub use file_node::{FileNode, NodeId, NodeState, OTHERS_SEGMENT};
pub use placement::{Connection, Footprint, Layout, Material, PlacementRecord, Rgba, Vec3};
