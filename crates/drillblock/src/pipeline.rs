//! Geometry pipeline: layouts to finished solids.

use std::time::Instant;

use drillblock_csg::{centered_cube, centered_cylinder, Solid, TriangleMesh};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Configuration;
use crate::layout::{batch_offset, Axis, BlockLayout, Cutter};

/// One finished block.
#[derive(Debug, Clone)]
pub struct GeneratedBlock {
    /// Position in the batch.
    pub index: usize,
    /// X coordinate of the block center.
    pub offset_x: f64,
    /// Layout the solid was built from.
    pub layout: BlockLayout,
    /// Box minus every cutter, in world coordinates.
    pub solid: Solid,
    mesh: TriangleMesh,
}

impl GeneratedBlock {
    /// Wrap a finished solid, triangulating it once.
    pub fn new(index: usize, offset_x: f64, layout: BlockLayout, solid: Solid) -> Self {
        let mesh = solid.to_mesh();
        Self {
            index,
            offset_x,
            layout,
            solid,
            mesh,
        }
    }

    /// Triangulated solid.
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Summary numbers for reporting.
    pub fn stats(&self) -> BlockStats {
        let mesh = &self.mesh;
        BlockStats {
            index: self.index,
            offset_x: self.offset_x,
            hole_count: self.layout.hole_count,
            box_height: self.layout.box_height(),
            cutters: self.layout.cutter_count(),
            triangles: mesh.num_triangles(),
            volume: mesh.volume().abs(),
            bounding_box: mesh.bounding_box(),
        }
    }
}

/// Per-block mesh statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStats {
    /// Position in the batch.
    pub index: usize,
    /// X coordinate of the block center.
    pub offset_x: f64,
    /// Hole levels.
    pub hole_count: u32,
    /// Box height.
    pub box_height: f64,
    /// Cutters subtracted.
    pub cutters: usize,
    /// Triangles in the finished mesh.
    pub triangles: usize,
    /// Enclosed volume of the finished mesh.
    pub volume: f64,
    /// `(min, max)` of the finished mesh.
    pub bounding_box: Option<([f64; 3], [f64; 3])>,
}

/// Build every block of `config`, in placement order.
pub fn generate(config: &Configuration) -> Vec<GeneratedBlock> {
    let start = Instant::now();
    let blocks: Vec<GeneratedBlock> = config
        .layouts()
        .into_iter()
        .enumerate()
        .map(|(index, layout)| {
            let offset_x = batch_offset(index);
            let solid = build_block(&layout, offset_x, config.segments);
            GeneratedBlock::new(index, offset_x, layout, solid)
        })
        .collect();
    info!(
        blocks = blocks.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "generated drill blocks"
    );
    blocks
}

/// Box at `offset_x` with every cutter of `layout` subtracted.
///
/// All cutters go through one [`Solid::difference_all`] pass. The result
/// matches subtracting them one at a time in layout order.
pub fn build_block(layout: &BlockLayout, offset_x: f64, segments: u32) -> Solid {
    let size = layout.box_size;
    let stock = centered_cube(size.x, size.y, size.z).translate(offset_x, 0.0, 0.0);
    debug!(
        holes = layout.hole_count,
        cutters = layout.cutter_count(),
        offset_x,
        "building block"
    );
    let cutters: Vec<Solid> = layout
        .cutters
        .iter()
        .map(|cutter| cutter_solid(cutter, offset_x, segments))
        .collect();
    stock.difference_all(&cutters)
}

/// Cylinder solid for `cutter`, shifted by `offset_x`.
pub fn cutter_solid(cutter: &Cutter, offset_x: f64, segments: u32) -> Solid {
    let cylinder = centered_cylinder(cutter.radius, cutter.length, segments);
    let aligned = match cutter.axis {
        Axis::X => cylinder.rotate(0.0, 90.0, 0.0),
        Axis::Y => cylinder.rotate(-90.0, 0.0, 0.0),
        Axis::Z => cylinder,
    };
    let c = cutter.center;
    aligned.translate(c.x + offset_x, c.y, c.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, CutterKind, Vec3, BOX_DEPTH, BOX_WIDTH};
    use approx::assert_relative_eq;

    fn cutter(axis: Axis) -> Cutter {
        Cutter {
            kind: CutterKind::ThroughHole,
            axis,
            radius: 2.0,
            length: 30.0,
            center: Vec3::new(1.0, 2.0, 3.0),
        }
    }

    #[test]
    fn test_cutter_solid_axes() {
        for (axis, extent) in [
            (Axis::X, [30.0, 4.0, 4.0]),
            (Axis::Y, [4.0, 30.0, 4.0]),
            (Axis::Z, [4.0, 4.0, 30.0]),
        ] {
            let aabb = cutter_solid(&cutter(axis), 10.0, 16).aabb();
            let size = aabb.size();
            for i in 0..3 {
                assert_relative_eq!(size[i], extent[i], epsilon = 1e-9);
            }
            let center = (aabb.min.coords + aabb.max.coords) / 2.0;
            assert_relative_eq!(center.x, 11.0, epsilon = 1e-9);
            assert_relative_eq!(center.y, 2.0, epsilon = 1e-9);
            assert_relative_eq!(center.z, 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_plain_bore_volume() {
        // One level, no grooves: vertical bore plus two crossing holes.
        let layout = compute_layout(1, 2.0, 0.0);
        let solid = build_block(&layout, 0.0, 12);
        let stock = BOX_WIDTH * 20.0 * BOX_DEPTH;
        let volume = solid.volume();
        assert!(volume < stock);
        // Three bores of length 20 can remove at most 3 * pi r^2 * 20.
        assert!(volume > stock - 3.0 * std::f64::consts::PI * 4.0 * 20.0);
    }

    #[test]
    fn test_single_pass_matches_fold() {
        let layout = compute_layout(2, 3.0, 0.5);
        let stock = centered_cube(BOX_WIDTH, layout.box_height(), BOX_DEPTH);
        let folded = layout.cutters.iter().fold(stock, |solid, cutter| {
            solid.difference(&cutter_solid(cutter, 0.0, 8))
        });
        let built = build_block(&layout, 0.0, 8);
        assert_relative_eq!(built.volume(), folded.volume(), epsilon = 1e-6);
        assert!(built.to_mesh().num_triangles() < folded.to_mesh().num_triangles());
    }

    #[test]
    fn test_mesh_is_triangulated_once() {
        let layout = compute_layout(1, 2.0, 0.0);
        let block = GeneratedBlock::new(0, 0.0, layout.clone(), build_block(&layout, 0.0, 8));
        assert_eq!(block.mesh(), &block.solid.to_mesh());
        assert!(std::ptr::eq(block.mesh(), block.mesh()));
        assert_eq!(block.stats().triangles, block.mesh().num_triangles());
    }

    #[test]
    fn test_block_is_centered_on_offset() {
        let layout = compute_layout(2, 1.0, 0.5);
        let solid = build_block(&layout, 80.0, 8);
        let aabb = solid.aabb();
        assert_relative_eq!(aabb.min.x, 70.0, epsilon = 1e-9);
        assert_relative_eq!(aabb.max.x, 90.0, epsilon = 1e-9);
        assert_relative_eq!(aabb.min.y, -20.0, epsilon = 1e-9);
        assert_relative_eq!(aabb.max.y, 20.0, epsilon = 1e-9);
    }
}
