use glam::Mat4;
use id_arena::Arena;

use crate::color::Color;
use crate::geometry::MeshData;
use crate::lighting::Lighting;
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::scene_mesh::{SceneMesh, SceneMeshId};

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub meshes: Arena<SceneMesh>,
    pub lighting: Lighting,
    pub background: Color,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            meshes: Arena::new(),
            lighting: Lighting::default(),
            background: Color::rgb8(0x16, 0x21, 0x3e),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    /// Adds an object and attaches it to a parent in one step.
    pub fn spawn(&mut self, object: Object3D, parent: Option<ObjectId>) -> ObjectId {
        let id = self.add_object(object);
        if parent.is_some() {
            self.set_object_parent(id, parent);
        }
        id
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.objects.get_mut(id)
    }

    pub fn add_mesh(&mut self, data: MeshData) -> SceneMeshId {
        self.meshes.alloc(SceneMesh::new(data))
    }

    pub fn get_mesh(&self, id: SceneMeshId) -> Option<&SceneMesh> {
        self.meshes.get(id)
    }

    /// Sets the parent of an object and updates child relationships.
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if let Some(child) = self.objects.get(child_id) {
            if let Some(old_parent_id) = child.parent_id {
                if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                    old_parent.child_ids.retain(|&id| id != child_id);
                }
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;
        }
        if let Some(new_parent_id) = new_parent_id {
            if let Some(new_parent) = self.objects.get_mut(new_parent_id) {
                new_parent.child_ids.push(child_id);
            }
        }

        self.invalidate_object_hierarchy(child_id);
    }

    /// Invalidates world transforms for an object and all descendants.
    pub fn invalidate_object_hierarchy(&self, object_id: ObjectId) {
        if let Some(object) = self.objects.get(object_id) {
            object.transform.invalidate_world();

            for &child_id in &object.child_ids {
                self.invalidate_object_hierarchy(child_id);
            }
        }
    }

    /// Recomputes world matrices for every object, parents before
    /// children. Called once per frame after all mutations.
    pub fn update_world_transforms(&self) {
        let roots = self.objects.iter().filter_map(|(id, object)| {
            if object.parent_id.is_none() {
                Some(id)
            } else {
                None
            }
        });

        for root_id in roots {
            self.update_transform_recursive(root_id, Mat4::IDENTITY);
        }
    }

    fn update_transform_recursive(&self, object_id: ObjectId, parent_world_matrix: Mat4) {
        if let Some(object) = self.objects.get(object_id) {
            if object.transform.is_world_dirty() {
                let local_matrix = *object.transform.get_local_matrix();
                object
                    .transform
                    .set_world_matrix(parent_world_matrix * local_matrix);
            }

            let world_matrix = *object.transform.get_world_matrix();
            for &child_id in &object.child_ids {
                self.update_transform_recursive(child_id, world_matrix);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use glam::{Quat, Vec3};

    use super::*;

    #[test]
    fn world_transforms_compose_parent_to_child() {
        let mut scene = Scene::new();

        let mut parent = Object3D::default();
        parent
            .transform
            .set_translation(Vec3::new(0.0, 2.0, 0.0));
        let parent_id = scene.add_object(parent);

        let mut child = Object3D::default();
        child.transform.set_translation(Vec3::new(1.0, 0.0, 0.0));
        let child_id = scene.spawn(child, Some(parent_id));

        scene.update_world_transforms();

        let world = *scene.get_object(child_id).unwrap().transform.get_world_matrix();
        let position = world.transform_point3(Vec3::ZERO);
        assert!((position - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn rotating_a_parent_moves_child_world_positions() {
        let mut scene = Scene::new();

        let parent_id = scene.add_object(Object3D::default());
        let mut child = Object3D::default();
        child.transform.set_translation(Vec3::new(1.0, 0.0, 0.0));
        let child_id = scene.spawn(child, Some(parent_id));

        scene.update_world_transforms();

        // Quarter turn about Y carries +X onto -Z.
        scene
            .get_object_mut(parent_id)
            .unwrap()
            .transform
            .set_rotation(Quat::from_rotation_y(FRAC_PI_2));
        scene.invalidate_object_hierarchy(parent_id);
        scene.update_world_transforms();

        let world = *scene.get_object(child_id).unwrap().transform.get_world_matrix();
        let position = world.transform_point3(Vec3::ZERO);
        assert!((position - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn reparenting_detaches_from_the_old_parent() {
        let mut scene = Scene::new();
        let a = scene.add_object(Object3D::default());
        let b = scene.add_object(Object3D::default());
        let child = scene.spawn(Object3D::default(), Some(a));

        scene.set_object_parent(child, Some(b));

        assert!(scene.get_object(a).unwrap().child_ids.is_empty());
        assert_eq!(scene.get_object(b).unwrap().child_ids, vec![child]);
        assert_eq!(scene.get_object(child).unwrap().parent_id, Some(b));
    }
}
