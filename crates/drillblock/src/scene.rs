//! Displayed blocks and the display resources backing them.

use std::collections::BTreeMap;

use drillblock_csg::TriangleMesh;
use tracing::debug;

use crate::pipeline::GeneratedBlock;

/// Opaque handle to a mesh uploaded to a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshHandle(pub u64);

/// Something that can show block meshes and must be told when to drop them.
pub trait DisplaySink {
    /// Upload a block and return its handle.
    fn attach(&mut self, block: &GeneratedBlock) -> MeshHandle;

    /// Free everything held for `handle`.
    fn release(&mut self, handle: MeshHandle);
}

/// The current generation of blocks and their display handles.
#[derive(Debug, Default)]
pub struct Scene {
    entries: Vec<(MeshHandle, GeneratedBlock)>,
}

impl Scene {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new generation.
    ///
    /// Every handle of the previous generation is released before any new
    /// block is attached.
    pub fn replace<D: DisplaySink>(&mut self, blocks: Vec<GeneratedBlock>, sink: &mut D) {
        self.clear(sink);
        for block in blocks {
            let handle = sink.attach(&block);
            self.entries.push((handle, block));
        }
        debug!(blocks = self.entries.len(), "scene replaced");
    }

    /// Release every displayed block.
    pub fn clear<D: DisplaySink>(&mut self, sink: &mut D) {
        for (handle, _) in self.entries.drain(..) {
            sink.release(handle);
        }
    }

    /// Displayed blocks in placement order.
    pub fn blocks(&self) -> impl Iterator<Item = &GeneratedBlock> + '_ {
        self.entries.iter().map(|(_, block)| block)
    }

    /// Handles currently owned by the scene.
    pub fn handles(&self) -> Vec<MeshHandle> {
        self.entries.iter().map(|(handle, _)| *handle).collect()
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is displayed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All block meshes merged, for export.
    pub fn merged_mesh(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        for block in self.blocks() {
            mesh.merge(block.mesh());
        }
        mesh
    }
}

/// Headless display that keeps uploaded meshes in memory.
#[derive(Debug, Default)]
pub struct MeshStore {
    next: u64,
    live: BTreeMap<MeshHandle, TriangleMesh>,
    released: u64,
}

impl MeshStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Meshes currently held.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Handles released so far.
    pub fn released_count(&self) -> u64 {
        self.released
    }

    /// Mesh held for `handle`.
    pub fn get(&self, handle: MeshHandle) -> Option<&TriangleMesh> {
        self.live.get(&handle)
    }

    /// Triangles across every held mesh.
    pub fn triangle_count(&self) -> usize {
        self.live.values().map(TriangleMesh::num_triangles).sum()
    }
}

impl DisplaySink for MeshStore {
    fn attach(&mut self, block: &GeneratedBlock) -> MeshHandle {
        let handle = MeshHandle(self.next);
        self.next += 1;
        self.live.insert(handle, block.mesh().clone());
        handle
    }

    fn release(&mut self, handle: MeshHandle) {
        if self.live.remove(&handle).is_some() {
            self.released += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::pipeline::generate;

    fn blocks(counts: &[u32]) -> Vec<GeneratedBlock> {
        generate(&Configuration::batch(counts, 1.0, 0.0).with_segments(6))
    }

    #[test]
    fn test_replace_releases_previous_generation() {
        let mut store = MeshStore::new();
        let mut scene = Scene::new();

        scene.replace(blocks(&[1, 2]), &mut store);
        let first = scene.handles();
        assert_eq!(store.live_count(), 2);

        scene.replace(blocks(&[1]), &mut store);
        assert_eq!(store.live_count(), 1);
        assert_eq!(store.released_count(), 2);
        for handle in first {
            assert!(store.get(handle).is_none());
        }
    }

    #[test]
    fn test_attach_uploads_cached_mesh() {
        let mut store = MeshStore::new();
        let mut scene = Scene::new();
        scene.replace(blocks(&[2]), &mut store);
        let handle = scene.handles()[0];
        let block = scene.blocks().next().unwrap();
        assert_eq!(store.get(handle), Some(block.mesh()));
        assert_eq!(scene.merged_mesh().num_triangles(), store.triangle_count());
    }

    #[test]
    fn test_repeated_regeneration_does_not_accumulate() {
        let mut store = MeshStore::new();
        let mut scene = Scene::new();
        for _ in 0..5 {
            scene.replace(blocks(&[1, 1, 1]), &mut store);
        }
        assert_eq!(store.live_count(), 3);
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut store = MeshStore::new();
        let mut scene = Scene::new();
        scene.replace(blocks(&[1]), &mut store);
        scene.clear(&mut store);
        assert!(scene.is_empty());
        assert_eq!(store.live_count(), 0);
    }
}
