/// Rooms: files in a central grid, folders as "doors" on rings around it.
///
/// The ring count is chosen up front so every folder fits. Placement starts
/// on the outermost ring and steps inward by one ring gap whenever the
/// current ring is full, never inside the grid's clearance.
use super::grid::{self, cell};
use super::sizing::Block;
use crate::config::LayoutConfig;
use crate::model::Vec3;
use std::f32::consts::TAU;

pub fn place(blocks: &[Block<'_>], config: &LayoutConfig) -> Vec<Vec3> {
    let (folders, files): (Vec<usize>, Vec<usize>) =
        (0..blocks.len()).partition(|&i| blocks[i].is_folder());

    let mut positions = vec![Vec3::ZERO; blocks.len()];

    let file_blocks: Vec<Block<'_>> = files.iter().map(|&i| blocks[i].clone()).collect();
    for (&i, pos) in files.iter().zip(grid::place(&file_blocks, config)) {
        positions[i] = pos;
    }

    if folders.is_empty() {
        return positions;
    }

    let gap = cell(config);
    let inner = grid::clearance(files.len(), config) + gap;
    let lengths: Vec<f32> = folders
        .iter()
        .map(|&i| blocks[i].side + config.spacing)
        .collect();
    let outer = outer_radius(&lengths, inner, gap);

    let mut radius = outer;
    let mut angle = 0.0f32;
    for (&i, &len) in folders.iter().zip(&lengths) {
        let mut step = len / radius;
        if angle + step > TAU && radius - gap > inner - gap / 2.0 {
            radius -= gap;
            angle = 0.0;
            step = len / radius;
        }
        let centre = angle + step / 2.0;
        positions[i] = Vec3::new(
            radius * centre.cos(),
            blocks[i].height / 2.0,
            radius * centre.sin(),
        );
        angle += step;
    }
    positions
}

/// Smallest outermost radius whose rings, stepping inward by `gap` down to
/// `inner`, can hold arc lengths `lengths` under greedy filling.
///
/// A greedy ring of circumference `c` always holds more than `c - longest`,
/// so that is the capacity counted per ring.
pub fn outer_radius(lengths: &[f32], inner: f32, gap: f32) -> f32 {
    let total: f32 = lengths.iter().sum();
    let longest = lengths.iter().copied().fold(0.0f32, f32::max);
    let mut rings = 1usize;
    loop {
        let capacity: f32 = (0..rings)
            .map(|k| (TAU * (inner + k as f32 * gap) - longest).max(0.0))
            .sum();
        if capacity >= total {
            return inner + (rings - 1) as f32 * gap;
        }
        rings += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_ring_when_it_fits() {
        assert_eq!(outer_radius(&[1.0, 1.0], 10.0, 5.0), 10.0);
    }

    #[test]
    fn grows_until_capacity_suffices() {
        let lengths = vec![4.6; 40];
        let outer = outer_radius(&lengths, 5.0, 4.6);
        assert!(outer > 5.0);
        let rings = ((outer - 5.0) / 4.6).round() as usize + 1;
        let capacity: f32 = (0..rings)
            .map(|k| (TAU * (5.0 + k as f32 * 4.6) - 4.6).max(0.0))
            .sum();
        assert!(capacity >= 4.6 * 40.0);
    }
}
