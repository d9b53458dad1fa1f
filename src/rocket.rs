use std::f32::consts::FRAC_PI_4;

use glam::{Quat, Vec3};

use crate::color::Color;
use crate::geometry;
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::scene::Scene;
use crate::scene_graph::scene_mesh::SceneMeshId;

/// A named nose-cone preset. The set is fixed; the UI only ever offers
/// these, so variant lookup cannot fail at runtime.
#[derive(Debug, Clone, Copy)]
pub struct NoseVariant {
    pub name: &'static str,
    pub height: f32,
    pub radius: f32,
    pub segments: u32,
}

pub const NOSE_VARIANTS: [NoseVariant; 3] = [
    NoseVariant {
        name: "cone1",
        height: 1.0,
        radius: 0.5,
        segments: 32,
    },
    NoseVariant {
        name: "cone2",
        height: 0.8,
        radius: 0.6,
        segments: 32,
    },
    NoseVariant {
        name: "cone3",
        height: 1.2,
        radius: 0.4,
        segments: 32,
    },
];

impl NoseVariant {
    #[allow(dead_code)]
    pub fn index_of(name: &str) -> Option<usize> {
        NOSE_VARIANTS.iter().position(|v| v.name == name)
    }

    /// Local height of the nose's center: the cone is centered, so its
    /// base meets the body top (y=3) when centered at 3 + height/2.
    pub fn nose_y(&self) -> f32 {
        BODY_HEIGHT + self.height / 2.0
    }
}

const BODY_RADIUS: f32 = 0.5;
const BODY_HEIGHT: f32 = 3.0;
const BODY_SEGMENTS: u32 = 32;
const BODY_COLOR: Color = Color::rgb8(0xaa, 0xaa, 0xaa);

const FIN_SIZE: Vec3 = Vec3::new(0.1, 0.5, 1.0);
const FIN_COLOR: Color = Color::rgb8(0x66, 0x66, 0x66);

const DEFAULT_NOSE_COLOR: Color = Color::rgb8(0xff, 0x00, 0x00);

/// The rocket: a group node owning a body cylinder, four fins, and a
/// swappable nose cone.
///
/// The nose is a single stable slot. All three variant meshes are baked
/// at startup and a variant change re-points the slot's mesh reference,
/// so the group holds exactly one nose at all times by construction.
pub struct Rocket {
    group: ObjectId,
    nose: ObjectId,
    nose_meshes: [SceneMeshId; NOSE_VARIANTS.len()],
    variant_index: usize,
    yaw: f32,
}

impl Rocket {
    pub fn build(scene: &mut Scene) -> Self {
        let group = scene.add_object(Object3D {
            name: "rocket".to_string(),
            ..Default::default()
        });

        let body_mesh = scene.add_mesh(geometry::cylinder(
            "body",
            BODY_RADIUS,
            BODY_HEIGHT,
            BODY_SEGMENTS,
        ));
        let mut body = Object3D {
            name: "body".to_string(),
            mesh_id: Some(body_mesh),
            color: BODY_COLOR,
            cast_shadow: true,
            ..Default::default()
        };
        // The cylinder is centered; lift it so its base sits at y=0.
        body.transform
            .set_translation(Vec3::new(0.0, BODY_HEIGHT / 2.0, 0.0));
        scene.spawn(body, Some(group));

        let fin_mesh = scene.add_mesh(geometry::cuboid("fin", FIN_SIZE.x, FIN_SIZE.y, FIN_SIZE.z));
        let fins = [
            (Vec3::new(0.5, 1.5, 0.0), Quat::from_rotation_z(FRAC_PI_4)),
            (Vec3::new(-0.5, 1.5, 0.0), Quat::from_rotation_z(-FRAC_PI_4)),
            (Vec3::new(0.0, 1.5, 0.5), Quat::from_rotation_x(FRAC_PI_4)),
            (Vec3::new(0.0, 1.5, -0.5), Quat::from_rotation_x(-FRAC_PI_4)),
        ];
        for (i, (position, rotation)) in fins.into_iter().enumerate() {
            let mut fin = Object3D {
                name: format!("fin{}", i + 1),
                mesh_id: Some(fin_mesh),
                color: FIN_COLOR,
                cast_shadow: true,
                ..Default::default()
            };
            fin.transform.set_translation(position);
            fin.transform.set_rotation(rotation);
            scene.spawn(fin, Some(group));
        }

        let nose_meshes = NOSE_VARIANTS.map(|variant| {
            scene.add_mesh(geometry::cone(
                variant.name,
                variant.radius,
                variant.height,
                variant.segments,
            ))
        });

        let variant_index = 0;
        let mut nose = Object3D {
            name: "nose".to_string(),
            mesh_id: Some(nose_meshes[variant_index]),
            color: DEFAULT_NOSE_COLOR,
            cast_shadow: true,
            ..Default::default()
        };
        nose.transform
            .set_translation(Vec3::new(0.0, NOSE_VARIANTS[variant_index].nose_y(), 0.0));
        let nose = scene.spawn(nose, Some(group));

        Self {
            group,
            nose,
            nose_meshes,
            variant_index,
            yaw: 0.0,
        }
    }

    #[allow(dead_code)]
    pub fn group(&self) -> ObjectId {
        self.group
    }

    #[allow(dead_code)]
    pub fn nose(&self) -> ObjectId {
        self.nose
    }

    pub fn variant_index(&self) -> usize {
        self.variant_index
    }

    /// Swaps the nose geometry; the color survives because it lives on
    /// the slot object, not on the mesh.
    pub fn set_nose_variant(&mut self, scene: &mut Scene, index: usize) {
        let variant = &NOSE_VARIANTS[index];
        self.variant_index = index;

        let nose = scene
            .get_object_mut(self.nose)
            .expect("rocket nose missing from scene");
        nose.mesh_id = Some(self.nose_meshes[index]);
        nose.transform
            .set_translation(Vec3::new(0.0, variant.nose_y(), 0.0));
        scene.invalidate_object_hierarchy(self.nose);
    }

    pub fn set_nose_color(&mut self, scene: &mut Scene, color: Color) {
        let nose = scene
            .get_object_mut(self.nose)
            .expect("rocket nose missing from scene");
        nose.color = color;
    }

    #[allow(dead_code)]
    pub fn nose_color(&self, scene: &Scene) -> Color {
        scene
            .get_object(self.nose)
            .expect("rocket nose missing from scene")
            .color
    }

    #[allow(dead_code)]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn add_yaw(&mut self, scene: &mut Scene, delta: f32) {
        self.yaw += delta;
        if let Some(group) = scene.get_object_mut(self.group) {
            group.transform.set_rotation(Quat::from_rotation_y(self.yaw));
        }
        scene.invalidate_object_hierarchy(self.group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rocket() -> (Scene, Rocket) {
        let mut scene = Scene::new();
        let rocket = Rocket::build(&mut scene);
        (scene, rocket)
    }

    fn nose_children(scene: &Scene, rocket: &Rocket) -> usize {
        scene
            .get_object(rocket.group())
            .unwrap()
            .child_ids
            .iter()
            .filter(|&&id| id == rocket.nose())
            .count()
    }

    #[test]
    fn group_owns_body_four_fins_and_one_nose() {
        let (scene, rocket) = rocket();
        let group = scene.get_object(rocket.group()).unwrap();
        assert_eq!(group.child_ids.len(), 6);
        assert_eq!(nose_children(&scene, &rocket), 1);
    }

    #[test]
    fn every_variant_places_the_nose_atop_the_body() {
        let (mut scene, mut rocket) = rocket();

        for (index, variant) in NOSE_VARIANTS.iter().enumerate() {
            rocket.set_nose_variant(&mut scene, index);

            assert_eq!(nose_children(&scene, &rocket), 1);
            let nose = scene.get_object(rocket.nose()).unwrap();
            let y = nose.transform.translation().y;
            assert!((y - (3.0 + variant.height / 2.0)).abs() < 1e-6);
        }
    }

    #[test]
    fn variant_change_preserves_nose_color() {
        let (mut scene, mut rocket) = rocket();

        let green = Color::from_hex("#00ff00").unwrap();
        rocket.set_nose_color(&mut scene, green);
        rocket.set_nose_variant(&mut scene, 2);

        assert_eq!(rocket.nose_color(&scene), green);
    }

    #[test]
    fn color_change_leaves_geometry_untouched() {
        let (mut scene, mut rocket) = rocket();
        rocket.set_nose_variant(&mut scene, 1);

        let mesh_before = scene.get_object(rocket.nose()).unwrap().mesh_id;
        let y_before = scene
            .get_object(rocket.nose())
            .unwrap()
            .transform
            .translation()
            .y;

        rocket.set_nose_color(&mut scene, Color::rgb8(0x00, 0x00, 0xff));

        let nose = scene.get_object(rocket.nose()).unwrap();
        assert_eq!(nose.mesh_id, mesh_before);
        assert_eq!(nose.transform.translation().y, y_before);
        assert_eq!(rocket.variant_index(), 1);
    }

    #[test]
    fn variant_meshes_have_the_preset_heights() {
        let (scene, rocket) = rocket();

        for (index, variant) in NOSE_VARIANTS.iter().enumerate() {
            let mesh = scene.get_mesh(rocket.nose_meshes[index]).unwrap();
            let (min, max) = mesh
                .data
                .vertices
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), v| {
                    (min.min(v.position.y), max.max(v.position.y))
                });
            assert!((max - min - variant.height).abs() < 1e-5, "{}", variant.name);
        }
    }

    #[test]
    fn variant_lookup_by_name() {
        assert_eq!(NoseVariant::index_of("cone1"), Some(0));
        assert_eq!(NoseVariant::index_of("cone3"), Some(2));
        assert_eq!(NoseVariant::index_of("cone9"), None);
    }

    #[test]
    fn yaw_accumulates_on_the_group() {
        let (mut scene, mut rocket) = rocket();
        rocket.add_yaw(&mut scene, 0.002);
        rocket.add_yaw(&mut scene, 0.002);
        assert!((rocket.yaw() - 0.004).abs() < 1e-9);

        let group = scene.get_object(rocket.group()).unwrap();
        let (axis, angle) = group.transform.rotation().to_axis_angle();
        assert!((axis.y - 1.0).abs() < 1e-5);
        assert!((angle - 0.004).abs() < 1e-6);
    }
}
