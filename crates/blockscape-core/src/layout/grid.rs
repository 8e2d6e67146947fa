/// Square grid, row-major, largest block first, centred on the origin.
use super::sizing::Block;
use crate::config::LayoutConfig;
use crate::model::Vec3;

/// Columns and rows for `n` blocks: `cols = ceil(sqrt(n))`.
pub fn dimensions(n: usize) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    (cols, rows)
}

/// Centre-to-centre distance between neighbouring cells.
pub fn cell(config: &LayoutConfig) -> f32 {
    config.max_block + config.spacing
}

/// Distance from the origin to the far corner of the grid's outermost
/// blocks. Zero for an empty grid.
pub fn clearance(n: usize, config: &LayoutConfig) -> f32 {
    let (cols, rows) = dimensions(n);
    if cols == 0 {
        return 0.0;
    }
    let cell = cell(config);
    let half_w = (cols - 1) as f32 * cell / 2.0 + config.max_block / 2.0;
    let half_d = (rows - 1) as f32 * cell / 2.0 + config.max_block / 2.0;
    half_w.hypot(half_d)
}

pub fn place(blocks: &[Block<'_>], config: &LayoutConfig) -> Vec<Vec3> {
    let (cols, rows) = dimensions(blocks.len());
    if cols == 0 {
        return Vec::new();
    }
    let cell = cell(config);
    let x0 = -((cols - 1) as f32) * cell / 2.0;
    let z0 = -((rows - 1) as f32) * cell / 2.0;

    blocks
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let col = i % cols;
            let row = i / cols;
            Vec3::new(
                x0 + col as f32 * cell,
                block.height / 2.0,
                z0 + row as f32 * cell,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_are_square_ish() {
        assert_eq!(dimensions(0), (0, 0));
        assert_eq!(dimensions(1), (1, 1));
        assert_eq!(dimensions(4), (2, 2));
        assert_eq!(dimensions(5), (3, 2));
        assert_eq!(dimensions(10), (4, 3));
    }

    #[test]
    fn clearance_covers_single_block() {
        let cfg = LayoutConfig::default();
        assert_eq!(clearance(0, &cfg), 0.0);
        let half = cfg.max_block / 2.0;
        assert!((clearance(1, &cfg) - half.hypot(half)).abs() < 1e-5);
    }
}
