//! Block layout: box dimensions and cutter placements for one hole count.
//!
//! This is the single source of truth for the geometry. The mesh pipeline
//! folds subtraction over [`BlockLayout::cutters`] and the script emitters
//! embed the same constants, so preview and exported script cannot drift.
//!
//! Frame: Y is the block's long axis, X its width (and the batch layout
//! axis), Z its depth. Every position is relative to the block center.

use serde::{Deserialize, Serialize};

/// Box extent along X.
pub const BOX_WIDTH: f64 = 20.0;
/// Box extent along Z.
pub const BOX_DEPTH: f64 = 20.0;
/// Box height contributed by each hole level.
pub const HOLE_PITCH: f64 = 20.0;
/// Distance of the first hole level above the bottom face.
pub const FIRST_HOLE_OFFSET: f64 = 10.0;
/// Axial distance between consecutive hole levels.
pub const HOLE_STEP: f64 = 20.0;
/// X distance between consecutive blocks in batch mode.
pub const BATCH_SPACING: f64 = 40.0;
/// Over-length added to every cutter so cuts are open-ended.
pub const CUTTER_MARGIN: f64 = 10.0;
/// Radius substituted for a non-positive or non-finite drill radius.
pub const RADIUS_FLOOR: f64 = 0.1;

/// Length of every cross-section cutter (through-holes and grooves).
pub fn cross_cutter_length() -> f64 {
    BOX_WIDTH.max(BOX_DEPTH) + CUTTER_MARGIN
}

/// Box height for `hole_count` levels.
pub fn box_height(hole_count: u32) -> f64 {
    hole_count as f64 * HOLE_PITCH
}

/// Long-axis position of hole level `level` in a box of height `box_height`.
pub fn level_offset(box_height: f64, level: u32) -> f64 {
    -box_height / 2.0 + FIRST_HOLE_OFFSET + level as f64 * HOLE_STEP
}

/// Distance from block center to the axis of a side groove.
pub fn side_groove_offset(radius: f64, depth: f64) -> f64 {
    BOX_WIDTH / 2.0 - depth + radius
}

/// Distance from block center to the axis of a top/bottom groove.
pub fn cap_groove_offset(box_height: f64, radius: f64, depth: f64) -> f64 {
    box_height / 2.0 - depth + radius
}

/// Horizontal center of batch block `index`.
pub fn batch_offset(index: usize) -> f64 {
    index as f64 * BATCH_SPACING
}

/// 3D vector with f64 components (conventionally millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Cylinder axis direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Width axis.
    X,
    /// Long (vertical) axis.
    Y,
    /// Depth axis.
    Z,
}

impl Axis {
    /// Unit vector along the axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::new(1.0, 0.0, 0.0),
            Axis::Y => Vec3::new(0.0, 1.0, 0.0),
            Axis::Z => Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// Lowercase axis name.
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// What a cutter produces in the finished block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutterKind {
    /// Axial bore along the long axis.
    VerticalHole,
    /// Cross hole through the full section at a hole level.
    ThroughHole,
    /// Groove across one of the four side faces at a hole level.
    SideGroove,
    /// Groove across the top or bottom face.
    CapGroove,
}

/// A cylindrical cutter, positioned relative to the block center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cutter {
    /// Role of this cutter.
    pub kind: CutterKind,
    /// Cylinder axis.
    pub axis: Axis,
    /// Cylinder radius (the drill radius).
    pub radius: f64,
    /// Cylinder length along `axis`.
    pub length: f64,
    /// Cylinder center.
    pub center: Vec3,
}

impl Cutter {
    /// Center of the cylinder's start cap (center minus half the length along the axis).
    pub fn base(&self) -> Vec3 {
        let u = self.axis.unit();
        let h = self.length / 2.0;
        Vec3::new(
            self.center.x - u.x * h,
            self.center.y - u.y * h,
            self.center.z - u.z * h,
        )
    }
}

/// Box dimensions and ordered cutter list for one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockLayout {
    /// Number of hole levels.
    pub hole_count: u32,
    /// Drill radius shared by every cutter.
    pub drill_radius: f64,
    /// Groove depth (0 disables grooves).
    pub groove_depth: f64,
    /// Box extents `(width, height, depth)`.
    pub box_size: Vec3,
    /// Cutters in subtraction order.
    pub cutters: Vec<Cutter>,
}

/// Compute the layout for one block.
///
/// Total over `hole_count >= 1`, `radius > 0`, `depth >= 0`; callers sanitize
/// input first. Order: vertical hole; per level X through, Z through, then
/// (if grooved) +X, -X, +Z, -Z side grooves; then the top pair and the
/// bottom pair of cap grooves.
pub fn compute_layout(hole_count: u32, radius: f64, depth: f64) -> BlockLayout {
    let height = box_height(hole_count);
    let cross = cross_cutter_length();
    let grooved = depth > 0.0;

    let cutter = |kind, axis, length, center| Cutter {
        kind,
        axis,
        radius,
        length,
        center,
    };

    let mut cutters = Vec::with_capacity(expected_cutter_count(hole_count, depth));
    cutters.push(cutter(
        CutterKind::VerticalHole,
        Axis::Y,
        height + CUTTER_MARGIN,
        Vec3::new(0.0, 0.0, 0.0),
    ));

    let side = side_groove_offset(radius, depth);
    for level in 0..hole_count {
        let y = level_offset(height, level);
        cutters.push(cutter(CutterKind::ThroughHole, Axis::X, cross, Vec3::new(0.0, y, 0.0)));
        cutters.push(cutter(CutterKind::ThroughHole, Axis::Z, cross, Vec3::new(0.0, y, 0.0)));
        if grooved {
            // Grooves on the X faces run along Z and vice versa.
            cutters.push(cutter(CutterKind::SideGroove, Axis::Z, cross, Vec3::new(side, y, 0.0)));
            cutters.push(cutter(CutterKind::SideGroove, Axis::Z, cross, Vec3::new(-side, y, 0.0)));
            cutters.push(cutter(CutterKind::SideGroove, Axis::X, cross, Vec3::new(0.0, y, side)));
            cutters.push(cutter(CutterKind::SideGroove, Axis::X, cross, Vec3::new(0.0, y, -side)));
        }
    }

    if grooved {
        let cap = cap_groove_offset(height, radius, depth);
        for y in [cap, -cap] {
            cutters.push(cutter(CutterKind::CapGroove, Axis::X, cross, Vec3::new(0.0, y, 0.0)));
            cutters.push(cutter(CutterKind::CapGroove, Axis::Z, cross, Vec3::new(0.0, y, 0.0)));
        }
    }

    BlockLayout {
        hole_count,
        drill_radius: radius,
        groove_depth: depth,
        box_size: Vec3::new(BOX_WIDTH, height, BOX_DEPTH),
        cutters,
    }
}

/// Number of cutters [`compute_layout`] emits: `1 + 2n (+ 4n + 4 with grooves)`.
pub fn expected_cutter_count(hole_count: u32, depth: f64) -> usize {
    let n = hole_count as usize;
    let grooves = if depth > 0.0 { 4 * n + 4 } else { 0 };
    1 + 2 * n + grooves
}

impl BlockLayout {
    /// Box height along the long axis.
    pub fn box_height(&self) -> f64 {
        self.box_size.y
    }

    /// Whether groove cutters are present.
    pub fn has_grooves(&self) -> bool {
        self.groove_depth > 0.0
    }

    /// Long-axis position of every hole level, bottom to top.
    pub fn levels(&self) -> Vec<f64> {
        (0..self.hole_count)
            .map(|i| level_offset(self.box_height(), i))
            .collect()
    }

    /// Side groove axis offset from the block center.
    pub fn side_groove_offset(&self) -> f64 {
        side_groove_offset(self.drill_radius, self.groove_depth)
    }

    /// Top/bottom groove axis offset from the block center.
    pub fn cap_groove_offset(&self) -> f64 {
        cap_groove_offset(self.box_height(), self.drill_radius, self.groove_depth)
    }

    /// Total number of cutters.
    pub fn cutter_count(&self) -> usize {
        self.cutters.len()
    }

    /// Cutters of one kind, in subtraction order.
    pub fn cutters_of(&self, kind: CutterKind) -> impl Iterator<Item = &Cutter> + '_ {
        self.cutters.iter().filter(move |c| c.kind == kind)
    }
}
