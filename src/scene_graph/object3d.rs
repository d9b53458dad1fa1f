use id_arena::Id;

use crate::color::Color;
use crate::scene_graph::scene_mesh::SceneMeshId;
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

/// A scene-graph node: a transform, an optional mesh, and a flat color.
pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub mesh_id: Option<SceneMeshId>,
    pub color: Color,
    pub cast_shadow: bool,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Transform::default(),
            mesh_id: None,
            color: Color::rgb(1.0, 1.0, 1.0),
            cast_shadow: false,
            parent_id: None,
            child_ids: Vec::new(),
        }
    }
}
