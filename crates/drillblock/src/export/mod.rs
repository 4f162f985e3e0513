//! Mesh export of the displayed scene.

pub mod obj;
pub mod stl;

use std::path::{Path, PathBuf};

use drillblock_csg::TriangleMesh;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ExportError, Result};
use crate::scene::Scene;

/// Fixed name of the OBJ export.
pub const OBJ_FILENAME: &str = "drill_block.obj";
/// Fixed name of the STL export.
pub const STL_FILENAME: &str = "drill_block.stl";

/// Mesh file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshFormat {
    /// Wavefront OBJ text.
    #[default]
    Obj,
    /// Binary STL.
    Stl,
}

impl MeshFormat {
    /// Output filename for this format.
    pub fn filename(self) -> &'static str {
        match self {
            MeshFormat::Obj => OBJ_FILENAME,
            MeshFormat::Stl => STL_FILENAME,
        }
    }

    /// Encode a mesh.
    pub fn encode(self, mesh: &TriangleMesh) -> Vec<u8> {
        match self {
            MeshFormat::Obj => obj::to_obj_string(mesh, "drill_block").into_bytes(),
            MeshFormat::Stl => stl::to_stl_bytes(mesh),
        }
    }
}

/// Write every block of `scene` as one merged mesh into `dir`.
///
/// Returns the path written.
pub fn export_scene(scene: &Scene, format: MeshFormat, dir: &Path) -> Result<PathBuf> {
    if scene.is_empty() {
        return Err(ExportError::EmptyScene);
    }
    export_mesh(&scene.merged_mesh(), format, dir)
}

/// Write `mesh` into `dir` under the format's fixed filename.
pub fn export_mesh(mesh: &TriangleMesh, format: MeshFormat, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format.filename());
    write_file(&path, &format.encode(mesh))?;
    info!(
        path = %path.display(),
        triangles = mesh.num_triangles(),
        "exported mesh"
    );
    Ok(path)
}

pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
