//! Binary STL writer.

use drillblock_csg::TriangleMesh;

const HEADER: &[u8; 80] =
    b"drillblock STL export                                                           ";

/// Encode `mesh` as binary STL with per-facet normals from the winding.
pub fn to_stl_bytes(mesh: &TriangleMesh) -> Vec<u8> {
    let num_triangles = mesh.num_triangles();
    let mut data = Vec::with_capacity(84 + num_triangles * 50);
    data.extend_from_slice(HEADER);
    data.extend_from_slice(&(num_triangles as u32).to_le_bytes());

    for tri in mesh.indices.chunks_exact(3) {
        let [v0, v1, v2] = [tri[0], tri[1], tri[2]].map(|i| {
            let i = i as usize * 3;
            [mesh.vertices[i], mesh.vertices[i + 1], mesh.vertices[i + 2]]
        });

        let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
        let n = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        let n = if len > 1e-10 {
            n.map(|c| c / len)
        } else {
            [0.0, 0.0, 1.0]
        };

        for c in n.iter().chain(&v0).chain(&v1).chain(&v2) {
            data.extend_from_slice(&c.to_le_bytes());
        }
        // Attribute byte count
        data.extend_from_slice(&[0, 0]);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let mesh = TriangleMesh {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 2],
            normals: vec![0.0; 9],
        };
        let bytes = to_stl_bytes(&mesh);
        assert_eq!(bytes.len(), 84 + 50);
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 1);
        let nz = f32::from_le_bytes([bytes[92], bytes[93], bytes[94], bytes[95]]);
        assert_eq!(nz, 1.0);
    }
}
