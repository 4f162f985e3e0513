#![warn(missing_docs)]

//! Polygon-mesh CSG kernel for drillblock.
//!
//! Solids are closed sets of convex polygons. Boolean operations build BSP
//! trees of both operands and clip each against the other; an AABB test
//! short-circuits operands that cannot touch.
//!
//! # Example
//!
//! ```rust
//! use drillblock_csg::{centered_cube, centered_cylinder};
//!
//! let block = centered_cube(20.0, 20.0, 20.0);
//! let hole = centered_cylinder(3.0, 30.0, 16);
//! let drilled = block.difference(&hole);
//! assert!(drilled.volume() < block.volume());
//! ```

pub mod bbox;
pub mod bsp;
pub mod mesh;
pub mod polygon;

pub use bbox::Aabb3;
pub use mesh::TriangleMesh;
pub use polygon::{Plane, Polygon, Vertex};

use bsp::Node;
use nalgebra::{Point3, Rotation3, Vector3};
use std::f64::consts::PI;

/// Boolean operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// A ∪ B
    Union,
    /// A − B
    Difference,
    /// A ∩ B
    Intersection,
}

/// A closed solid represented as a polygon soup.
#[derive(Debug, Clone, Default)]
pub struct Solid {
    polygons: Vec<Polygon>,
}

impl Solid {
    /// Create an empty solid.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an existing polygon soup.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// The solid's polygons.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Check if geometry is empty.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Create a box with one corner at the origin, extending along +X, +Y, +Z.
    pub fn cube(x: f64, y: f64, z: f64) -> Self {
        // (corner indices, outward normal); bit 0 = x, bit 1 = y, bit 2 = z
        const FACES: [([usize; 4], [f64; 3]); 6] = [
            ([0, 4, 6, 2], [-1.0, 0.0, 0.0]),
            ([1, 3, 7, 5], [1.0, 0.0, 0.0]),
            ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
            ([2, 6, 7, 3], [0.0, 1.0, 0.0]),
            ([0, 2, 3, 1], [0.0, 0.0, -1.0]),
            ([4, 5, 7, 6], [0.0, 0.0, 1.0]),
        ];
        let corner = |i: usize| {
            Point3::new(
                if i & 1 != 0 { x } else { 0.0 },
                if i & 2 != 0 { y } else { 0.0 },
                if i & 4 != 0 { z } else { 0.0 },
            )
        };
        let polygons = FACES
            .iter()
            .filter_map(|(idx, n)| {
                let normal = Vector3::new(n[0], n[1], n[2]);
                Polygon::new(idx.iter().map(|&i| Vertex::new(corner(i), normal)).collect())
            })
            .collect();
        Self { polygons }
    }

    /// Create a cylinder along the Z axis from `z = 0` to `z = height`.
    ///
    /// `segments` is clamped to at least 3.
    pub fn cylinder(radius: f64, height: f64, segments: u32) -> Self {
        let segments = segments.max(3) as usize;
        let ring = |i: usize, z: f64| {
            let angle = 2.0 * PI * (i % segments) as f64 / segments as f64;
            let (s, c) = angle.sin_cos();
            Vertex::new(Point3::new(radius * c, radius * s, z), Vector3::new(c, s, 0.0))
        };

        let mut polygons = Vec::with_capacity(segments + 2);
        for i in 0..segments {
            let side = vec![ring(i, 0.0), ring(i + 1, 0.0), ring(i + 1, height), ring(i, height)];
            polygons.extend(Polygon::new(side));
        }

        let down = -Vector3::z();
        let bottom = (0..segments)
            .rev()
            .map(|i| Vertex::new(ring(i, 0.0).pos, down))
            .collect();
        polygons.extend(Polygon::new(bottom));

        let up = Vector3::z();
        let top = (0..segments)
            .map(|i| Vertex::new(ring(i, height).pos, up))
            .collect();
        polygons.extend(Polygon::new(top));

        Self { polygons }
    }

    /// Apply a rigid map to every vertex, carrying each polygon's plane along.
    fn map_rigid(
        &self,
        point: impl Fn(&Point3<f64>) -> Point3<f64>,
        vector: impl Fn(&Vector3<f64>) -> Vector3<f64>,
    ) -> Self {
        let polygons = self
            .polygons
            .iter()
            .map(|p| {
                let vertices: Vec<Vertex> = p
                    .vertices
                    .iter()
                    .map(|v| Vertex::new(point(&v.pos), vector(&v.normal)))
                    .collect();
                let normal = vector(&p.plane.normal);
                let w = normal.dot(&vertices[0].pos.coords);
                Polygon {
                    vertices,
                    plane: Plane { normal, w },
                }
            })
            .collect();
        Self { polygons }
    }

    /// Translate the solid.
    pub fn translate(&self, x: f64, y: f64, z: f64) -> Self {
        let offset = Vector3::new(x, y, z);
        self.map_rigid(|p| *p + offset, |n| *n)
    }

    /// Rotate the solid about the origin (angles in degrees, applied X, then Y, then Z).
    pub fn rotate(&self, x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        let rot = Rotation3::from_euler_angles(
            x_deg.to_radians(),
            y_deg.to_radians(),
            z_deg.to_radians(),
        );
        self.map_rigid(|p| rot * *p, |n| rot * *n)
    }

    /// Axis-aligned bounding box of all vertices.
    pub fn aabb(&self) -> Aabb3 {
        Aabb3::of_polygons(&self.polygons)
    }

    /// Boolean union (self + other).
    pub fn union(&self, other: &Solid) -> Self {
        boolean_op(self, other, BooleanOp::Union)
    }

    /// Boolean difference (self - other).
    pub fn difference(&self, other: &Solid) -> Self {
        boolean_op(self, other, BooleanOp::Difference)
    }

    /// Subtract every solid in `tools` from `self` in one pass.
    ///
    /// The result has the same volume as folding [`Solid::difference`] over
    /// `tools`, but every surface is clipped against the original operands
    /// rather than a growing intermediate. Polygons a tool does not cut are
    /// kept whole. Tools must be closed solids.
    pub fn difference_all(&self, tools: &[Solid]) -> Self {
        if self.is_empty() {
            return Solid::empty();
        }
        let bounds = self.aabb();
        let tools: Vec<Tool<'_>> = tools
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| Tool {
                aabb: t.aabb(),
                polygons: &t.polygons,
            })
            .filter(|t| t.aabb.overlaps(&bounds))
            .collect();
        if tools.is_empty() {
            return self.clone();
        }
        let trees: Vec<Node> = tools
            .iter()
            .map(|t| Node::from_polygons(t.polygons.to_vec()))
            .collect();

        // Surface of self that lies outside every tool.
        let mut polygons = clip_outside(self.polygons.clone(), &tools, &trees, None);

        // Surface of each tool inside self and outside the other tools,
        // turned inward.
        let mut inside = Node::from_polygons(self.polygons.clone());
        inside.invert();
        for (i, tool) in tools.iter().enumerate() {
            let within = clip_each(&inside, tool.polygons.to_vec());
            for mut p in clip_outside(within, &tools, &trees, Some(i)) {
                p.flip();
                polygons.push(p);
            }
        }
        Solid { polygons }
    }

    /// Boolean intersection.
    pub fn intersection(&self, other: &Solid) -> Self {
        boolean_op(self, other, BooleanOp::Intersection)
    }

    /// Triangulate for rendering and export.
    pub fn to_mesh(&self) -> TriangleMesh {
        TriangleMesh::from_polygons(&self.polygons)
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        self.to_mesh().volume().abs()
    }
}

/// Perform a CSG boolean operation on two solids.
///
/// Operands whose bounding boxes do not overlap skip the BSP pipeline:
/// union concatenates, difference returns `a`, intersection is empty.
pub fn boolean_op(a: &Solid, b: &Solid, op: BooleanOp) -> Solid {
    if a.is_empty() || b.is_empty() || !a.aabb().overlaps(&b.aabb()) {
        return match op {
            BooleanOp::Union => {
                let mut polygons = a.polygons.clone();
                polygons.extend(b.polygons.iter().cloned());
                Solid { polygons }
            }
            BooleanOp::Difference => a.clone(),
            BooleanOp::Intersection => Solid::empty(),
        };
    }

    let mut na = Node::from_polygons(a.polygons.clone());
    let mut nb = Node::from_polygons(b.polygons.clone());
    match op {
        BooleanOp::Union => {
            na.clip_to(&nb);
            nb.clip_to(&na);
            nb.invert();
            nb.clip_to(&na);
            nb.invert();
            na.build(nb.all_polygons());
        }
        BooleanOp::Difference => {
            na.invert();
            na.clip_to(&nb);
            nb.clip_to(&na);
            nb.invert();
            nb.clip_to(&na);
            nb.invert();
            na.build(nb.all_polygons());
            na.invert();
        }
        BooleanOp::Intersection => {
            na.invert();
            nb.clip_to(&na);
            nb.invert();
            na.clip_to(&nb);
            nb.clip_to(&na);
            na.build(nb.all_polygons());
            na.invert();
        }
    }
    Solid::from_polygons(na.all_polygons())
}

/// Tool operand of [`Solid::difference_all`].
struct Tool<'a> {
    aabb: Aabb3,
    polygons: &'a [Polygon],
}

/// Clip each polygon separately, keeping untouched ones whole.
fn clip_each(tree: &Node, polygons: Vec<Polygon>) -> Vec<Polygon> {
    let mut out = Vec::with_capacity(polygons.len());
    for p in polygons {
        match tree.clip_polygon(&p) {
            Some(pieces) => out.extend(pieces),
            None => out.push(p),
        }
    }
    out
}

/// Remove the parts of `polygons` inside any tool except `skip`.
fn clip_outside(
    mut polygons: Vec<Polygon>,
    tools: &[Tool<'_>],
    trees: &[Node],
    skip: Option<usize>,
) -> Vec<Polygon> {
    for (i, (tool, tree)) in tools.iter().zip(trees).enumerate() {
        if skip == Some(i) {
            continue;
        }
        let (near, mut far): (Vec<Polygon>, Vec<Polygon>) = polygons
            .into_iter()
            .partition(|p| tool.aabb.overlaps(&Aabb3::of_polygons(std::slice::from_ref(p))));
        far.extend(clip_each(tree, near));
        polygons = far;
    }
    polygons
}

/// Helper to create a box centered at the origin.
pub fn centered_cube(x: f64, y: f64, z: f64) -> Solid {
    Solid::cube(x, y, z).translate(-x / 2.0, -y / 2.0, -z / 2.0)
}

/// Helper to create a Z-axis cylinder centered at the origin.
pub fn centered_cylinder(radius: f64, height: f64, segments: u32) -> Solid {
    Solid::cylinder(radius, height, segments).translate(0.0, 0.0, -height / 2.0)
}
