//! Vertices, planes and convex polygons: the leaf data of the BSP kernel.

use nalgebra::{Point3, Vector3};

/// Distance below which a point is considered to lie on a plane.
pub const PLANE_EPSILON: f64 = 1e-5;

/// A polygon vertex with position and shading normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space.
    pub pos: Point3<f64>,
    /// Unit shading normal.
    pub normal: Vector3<f64>,
}

impl Vertex {
    /// Create a new vertex.
    pub fn new(pos: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { pos, normal }
    }

    /// Reverse the normal (used when a polygon is flipped).
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Linear interpolation towards `other` by `t` in `[0, 1]`.
    pub fn interpolate(&self, other: &Vertex, t: f64) -> Vertex {
        Vertex {
            pos: self.pos + (other.pos - self.pos) * t,
            normal: self.normal + (other.normal - self.normal) * t,
        }
    }
}

/// An oriented plane `normal · p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vector3<f64>,
    /// Signed distance from the origin along `normal`.
    pub w: f64,
}

/// Where a point or polygon sits relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Coplanar = 0,
    Front = 1,
    Back = 2,
    Spanning = 3,
}

impl Side {
    fn from_bits(bits: u8) -> Side {
        match bits {
            0 => Side::Coplanar,
            1 => Side::Front,
            2 => Side::Back,
            _ => Side::Spanning,
        }
    }
}

impl Plane {
    /// Plane through three points, wound counter-clockwise when seen from the front.
    ///
    /// Returns `None` for collinear points.
    pub fn from_points(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Plane> {
        let n = (b - a).cross(&(c - a));
        let len = n.norm();
        if len < 1e-12 {
            return None;
        }
        let normal = n / len;
        Some(Plane {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    /// Reverse orientation.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance of `p` from the plane.
    pub fn distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) - self.w
    }

    fn classify(&self, p: &Point3<f64>) -> Side {
        let t = self.distance(p);
        if t < -PLANE_EPSILON {
            Side::Back
        } else if t > PLANE_EPSILON {
            Side::Front
        } else {
            Side::Coplanar
        }
    }

    /// Split `polygon` by this plane, pushing the pieces into the matching buckets.
    ///
    /// Coplanar polygons go to `coplanar_front` or `coplanar_back` depending on
    /// whether they face the same way as the plane.
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let sides: Vec<Side> = polygon
            .vertices
            .iter()
            .map(|v| self.classify(&v.pos))
            .collect();
        let kind = Side::from_bits(sides.iter().fold(0u8, |acc, s| acc | *s as u8));

        match kind {
            Side::Coplanar => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            }
            Side::Front => front.push(polygon.clone()),
            Side::Back => back.push(polygon.clone()),
            Side::Spanning => {
                let n = polygon.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (si, sj) = (sides[i], sides[j]);
                    let (vi, vj) = (&polygon.vertices[i], &polygon.vertices[j]);
                    if si != Side::Back {
                        f.push(*vi);
                    }
                    if si != Side::Front {
                        b.push(*vi);
                    }
                    if (si as u8 | sj as u8) == Side::Spanning as u8 {
                        let denom = self.normal.dot(&(vj.pos - vi.pos));
                        let t = (self.w - self.normal.dot(&vi.pos.coords)) / denom;
                        let v = vi.interpolate(vj, t);
                        f.push(v);
                        b.push(v);
                    }
                }
                if f.len() >= 3 {
                    front.push(Polygon::with_plane(f, polygon.plane));
                }
                if b.len() >= 3 {
                    back.push(Polygon::with_plane(b, polygon.plane));
                }
            }
        }
    }
}

/// A planar convex polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Vertices in counter-clockwise order seen from the front.
    pub vertices: Vec<Vertex>,
    /// Supporting plane.
    pub plane: Plane,
}

impl Polygon {
    /// Build a polygon from at least three vertices, deriving its plane.
    ///
    /// Returns `None` when the first three vertices are collinear.
    pub fn new(vertices: Vec<Vertex>) -> Option<Polygon> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(&vertices[0].pos, &vertices[1].pos, &vertices[2].pos)?;
        Some(Polygon { vertices, plane })
    }

    fn with_plane(vertices: Vec<Vertex>, plane: Plane) -> Polygon {
        Polygon { vertices, plane }
    }

    /// Reverse winding and orientation.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Fan-triangulate into index triples relative to this polygon's vertices.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (1..self.vertices.len().saturating_sub(1)).map(|i| [0, i, i + 1])
    }
}
