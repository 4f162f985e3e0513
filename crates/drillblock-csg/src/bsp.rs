//! Binary space partitioning tree over convex polygons.
//!
//! Every node stores the polygons coplanar with its splitting plane; the
//! front subtree holds what lies in front of the plane and the back subtree
//! what lies behind it. A missing back child means "solid".
//!
//! All traversals use an explicit work stack. Trees built from boolean
//! results are deep and recursion overflows the default thread stack.

use crate::polygon::{Plane, Polygon};

/// A BSP tree node.
#[derive(Debug, Clone, Default)]
pub struct Node {
    plane: Option<Plane>,
    front: Option<Box<Node>>,
    back: Option<Box<Node>>,
    polygons: Vec<Polygon>,
}

impl Node {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a polygon soup.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        let mut node = Node::new();
        node.build(polygons);
        node
    }

    /// Convert solid space to empty space and empty space to solid space.
    pub fn invert(&mut self) {
        let mut stack: Vec<&mut Node> = vec![self];
        while let Some(node) = stack.pop() {
            for p in &mut node.polygons {
                p.flip();
            }
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
            let Node { front, back, .. } = node;
            if let Some(f) = front {
                stack.push(&mut **f);
            }
            if let Some(b) = back {
                stack.push(&mut **b);
            }
        }
    }

    /// Remove every part of `polygons` that lies inside this tree's solid.
    pub fn clip_polygons(&self, polygons: &[Polygon]) -> Vec<Polygon> {
        self.clip_tracked(polygons.to_vec()).0
    }

    /// Clip a single polygon.
    ///
    /// Returns `None` when no part of `polygon` lies inside the solid, so the
    /// caller can keep it whole instead of the fragments splitting produced.
    pub fn clip_polygon(&self, polygon: &Polygon) -> Option<Vec<Polygon>> {
        let (kept, removed) = self.clip_tracked(vec![polygon.clone()]);
        removed.then_some(kept)
    }

    /// Clip `polygons` and report whether any piece was dropped.
    fn clip_tracked(&self, polygons: Vec<Polygon>) -> (Vec<Polygon>, bool) {
        let mut out = Vec::new();
        let mut removed = false;
        let mut stack: Vec<(&Node, Vec<Polygon>)> = vec![(self, polygons)];
        while let Some((node, polys)) = stack.pop() {
            let Some(plane) = node.plane else {
                out.extend(polys);
                continue;
            };
            let mut front = Vec::new();
            let mut back = Vec::new();
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            for p in &polys {
                plane.split_polygon(
                    p,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
            }
            front.append(&mut coplanar_front);
            back.append(&mut coplanar_back);

            match &node.front {
                Some(child) => stack.push((&**child, front)),
                None => out.extend(front),
            }
            // No back child: everything behind is solid and gets dropped.
            match &node.back {
                Some(child) => stack.push((&**child, back)),
                None => removed |= !back.is_empty(),
            }
        }
        (out, removed)
    }

    /// Remove every polygon in this tree that lies inside `other`.
    pub fn clip_to(&mut self, other: &Node) {
        let mut stack: Vec<&mut Node> = vec![self];
        while let Some(node) = stack.pop() {
            node.polygons = other.clip_polygons(&node.polygons);
            let Node { front, back, .. } = node;
            if let Some(f) = front {
                stack.push(&mut **f);
            }
            if let Some(b) = back {
                stack.push(&mut **b);
            }
        }
    }

    /// Collect every polygon in the tree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut out = Vec::new();
        let mut stack: Vec<&Node> = vec![self];
        while let Some(node) = stack.pop() {
            out.extend(node.polygons.iter().cloned());
            if let Some(b) = &node.back {
                stack.push(&**b);
            }
            if let Some(f) = &node.front {
                stack.push(&**f);
            }
        }
        out
    }

    /// Insert polygons into the tree, splitting them as needed.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        let mut stack: Vec<(&mut Node, Vec<Polygon>)> = vec![(self, polygons)];
        while let Some((node, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }
            let plane = *node.plane.get_or_insert(polys[0].plane);
            let mut front = Vec::new();
            let mut back = Vec::new();
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            for p in &polys {
                plane.split_polygon(
                    p,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
            }

            let Node {
                polygons,
                front: front_child,
                back: back_child,
                ..
            } = node;
            polygons.append(&mut coplanar_front);
            polygons.append(&mut coplanar_back);

            if !front.is_empty() {
                let child = front_child.get_or_insert_with(Box::default);
                stack.push((&mut **child, front));
            }
            if !back.is_empty() {
                let child = back_child.get_or_insert_with(Box::default);
                stack.push((&mut **child, back));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::Vertex;
    use nalgebra::{Point3, Vector3};

    fn square(x: f64) -> Polygon {
        let n = Vector3::x();
        Polygon::new(vec![
            Vertex::new(Point3::new(x, -1.0, -1.0), n),
            Vertex::new(Point3::new(x, 1.0, -1.0), n),
            Vertex::new(Point3::new(x, 1.0, 1.0), n),
            Vertex::new(Point3::new(x, -1.0, 1.0), n),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_keeps_all_polygons() {
        let tree = Node::from_polygons(vec![square(0.0), square(1.0), square(-1.0)]);
        assert_eq!(tree.all_polygons().len(), 3);
    }

    #[test]
    fn test_clip_behind_single_plane() {
        // Half space x <= 0 is solid
        let tree = Node::from_polygons(vec![square(0.0)]);
        let kept = tree.clip_polygons(&[square(0.5), square(-0.5)]);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].vertices[0].pos.x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_invert_swaps_solid_side() {
        let mut tree = Node::from_polygons(vec![square(0.0)]);
        tree.invert();
        let kept = tree.clip_polygons(&[square(0.5), square(-0.5)]);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].vertices[0].pos.x + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_clip_polygon_reports_untouched() {
        let tree = Node::from_polygons(vec![square(0.0)]);
        assert!(tree.clip_polygon(&square(2.0)).is_none());
        let kept = tree.clip_polygon(&square(-2.0)).unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn test_clip_polygon_straddling_plane() {
        // Half space y <= 0 is solid; the x = 3 square crosses it.
        let n = Vector3::y();
        let floor = Polygon::new(vec![
            Vertex::new(Point3::new(-5.0, 0.0, -5.0), n),
            Vertex::new(Point3::new(-5.0, 0.0, 5.0), n),
            Vertex::new(Point3::new(5.0, 0.0, 5.0), n),
            Vertex::new(Point3::new(5.0, 0.0, -5.0), n),
        ])
        .unwrap();
        let tree = Node::from_polygons(vec![floor]);
        let kept = tree.clip_polygon(&square(3.0)).unwrap();
        assert_eq!(kept.len(), 1);
        assert!(kept[0].vertices.iter().all(|v| v.pos.y >= -1e-9));
    }

    #[test]
    fn test_empty_tree_clips_nothing() {
        let tree = Node::new();
        assert_eq!(tree.clip_polygons(&[square(3.0)]).len(), 1);
    }
}
