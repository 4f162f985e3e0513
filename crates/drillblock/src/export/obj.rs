//! Wavefront OBJ writer.

use drillblock_csg::TriangleMesh;

/// Render `mesh` as OBJ text: one `o` line, `v` lines, then 1-based `f` lines.
pub fn to_obj_string(mesh: &TriangleMesh, name: &str) -> String {
    let mut out = String::with_capacity(mesh.num_vertices() * 32 + mesh.num_triangles() * 24);
    out.push_str("# drillblock OBJ export\n");
    out.push_str(&format!("o {name}\n"));
    for v in mesh.vertices.chunks_exact(3) {
        out.push_str(&format!("v {} {} {}\n", v[0], v[1], v[2]));
    }
    for tri in mesh.indices.chunks_exact(3) {
        out.push_str(&format!("f {} {} {}\n", tri[0] + 1, tri[1] + 1, tri[2] + 1));
    }
    out
}
