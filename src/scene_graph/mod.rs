pub mod object3d;
pub mod scene;
pub mod scene_mesh;
pub mod transform;
