//! Triangle mesh output for rendering and export.

use crate::polygon::Polygon;

/// Output triangle mesh for rendering and export.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals: `[nx0, ny0, nz0, ...]` (f32). Same length as vertices.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            normals: Vec::new(),
        }
    }

    /// Fan-triangulate convex polygons. Each polygon gets its own flat-shaded vertices.
    pub fn from_polygons(polygons: &[Polygon]) -> Self {
        let mut mesh = TriangleMesh::new();
        for poly in polygons {
            let base = mesh.num_vertices() as u32;
            let n = poly.plane.normal;
            for v in &poly.vertices {
                mesh.vertices
                    .extend_from_slice(&[v.pos.x as f32, v.pos.y as f32, v.pos.z as f32]);
                mesh.normals
                    .extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
            }
            for [a, b, c] in poly.triangles() {
                mesh.indices
                    .extend_from_slice(&[base + a as u32, base + b as u32, base + c as u32]);
            }
        }
        mesh
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Check if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Position of vertex `i` widened to f64.
    pub fn vertex(&self, i: u32) -> [f64; 3] {
        let i = i as usize * 3;
        [
            self.vertices[i] as f64,
            self.vertices[i + 1] as f64,
            self.vertices[i + 2] as f64,
        ]
    }

    /// Iterate triangles as vertex position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [[f64; 3]; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [self.vertex(t[0]), self.vertex(t[1]), self.vertex(t[2])])
    }

    /// Signed volume of the mesh (uses the divergence theorem).
    ///
    /// Returns a positive value for well-formed closed meshes.
    pub fn volume(&self) -> f64 {
        let mut vol = 0.0;
        for [v0, v1, v2] in self.triangles() {
            // Signed volume of tetrahedron formed with origin
            vol += v0[0] * (v1[1] * v2[2] - v2[1] * v1[2])
                - v1[0] * (v0[1] * v2[2] - v2[1] * v0[2])
                + v2[0] * (v0[1] * v1[2] - v1[1] * v0[2]);
        }
        vol / 6.0
    }

    /// Total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        let mut area = 0.0;
        for [v0, v1, v2] in self.triangles() {
            let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
            let cx = e1[1] * e2[2] - e1[2] * e2[1];
            let cy = e1[2] * e2[0] - e1[0] * e2[2];
            let cz = e1[0] * e2[1] - e1[1] * e2[0];
            area += (cx * cx + cy * cy + cz * cz).sqrt() / 2.0;
        }
        area
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<([f64; 3], [f64; 3])> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut min = [f64::MAX; 3];
        let mut max = [f64::MIN; 3];
        for chunk in self.vertices.chunks_exact(3) {
            for i in 0..3 {
                let v = chunk[i] as f64;
                min[i] = min[i].min(v);
                max[i] = max[i].max(v);
            }
        }
        Some((min, max))
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
