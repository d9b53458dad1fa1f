use id_arena::Id;

use crate::geometry::MeshData;
use crate::rendering::mesh::RenderMeshId;

pub type SceneMeshId = Id<SceneMesh>;

/// A mesh registered with the scene, with the GPU-side counterpart
/// filled in once the renderer has uploaded it.
pub struct SceneMesh {
    pub data: MeshData,
    pub render_mesh: Option<RenderMeshId>,
}

impl SceneMesh {
    pub fn new(data: MeshData) -> Self {
        Self {
            data,
            render_mesh: None,
        }
    }
}
