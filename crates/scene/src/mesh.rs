//! Named-mesh lookup.
//!
//! The bowling scene consumes stage geometry, a pin template and pin
//! position markers from whatever loaded the model file; this core never
//! parses one itself. [`StaticMeshSource`] is the plain in-memory
//! implementation hosts and tests populate by hand.

use glam::Vec3;
use std::collections::HashMap;

/// Vertex buffer of a named mesh.
#[derive(Clone, Debug)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
}

/// Lookup contract supplied by the external scene loader.
pub trait MeshSource {
    fn mesh(&self, name: &str) -> Option<MeshData>;
    /// Positions of all empty markers whose names start with `prefix`.
    fn marker_positions(&self, prefix: &str) -> Vec<Vec3>;
}

/// In-memory mesh source.
#[derive(Default)]
pub struct StaticMeshSource {
    meshes: HashMap<String, MeshData>,
    markers: Vec<(String, Vec3)>,
}

impl StaticMeshSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_mesh(&mut self, name: impl Into<String>, vertices: Vec<Vec3>) {
        self.meshes.insert(name.into(), MeshData { vertices });
    }

    pub fn insert_marker(&mut self, name: impl Into<String>, position: Vec3) {
        self.markers.push((name.into(), position));
    }
}

impl MeshSource for StaticMeshSource {
    fn mesh(&self, name: &str) -> Option<MeshData> {
        self.meshes.get(name).cloned()
    }

    fn marker_positions(&self, prefix: &str) -> Vec<Vec3> {
        self.markers
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(_, pos)| *pos)
            .collect()
    }
}
