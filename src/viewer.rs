use glam::Vec3;

use crate::camera::Camera;
use crate::color::Color;
use crate::geometry;
use crate::orbit::OrbitControls;
use crate::rocket::Rocket;
use crate::scene_graph::object3d::Object3D;
use crate::scene_graph::scene::Scene;

/// Idle spin of the rocket, radians per second (0.002 rad per tick at a
/// nominal 60 Hz).
const AUTO_ROTATE_SPEED: f32 = 0.12;

pub const INITIAL_EYE: Vec3 = Vec3::new(0.0, 3.0, 8.0);

pub const COLOR_OPTIONS: [(&str, Color); 5] = [
    ("Red", Color::rgb8(0xff, 0x00, 0x00)),
    ("Green", Color::rgb8(0x00, 0xff, 0x00)),
    ("Blue", Color::rgb8(0x00, 0x00, 0xff)),
    ("Yellow", Color::rgb8(0xff, 0xff, 0x00)),
    ("White", Color::rgb8(0xff, 0xff, 0xff)),
];

/// All CPU-side state of the viewer: the scene graph, the camera and
/// its orbit controls, and the rocket. Deliberately GPU-free so it can
/// be constructed and exercised headless.
pub struct ViewerState {
    pub scene: Scene,
    pub camera: Camera,
    pub orbit: OrbitControls,
    pub rocket: Rocket,
    pub color_index: usize,
}

impl ViewerState {
    pub fn new() -> Self {
        let camera = Camera {
            eye: INITIAL_EYE,
            target: Vec3::ZERO,
            up: Vec3::Y,
        };
        let orbit = OrbitControls::new(camera.eye, camera.target);

        let mut scene = Scene::new();
        let rocket = Rocket::build(&mut scene);

        // Ground reference grid; part of the scene, not the rocket.
        let grid_mesh = scene.add_mesh(geometry::grid("grid", 10.0, 10));
        scene.add_object(Object3D {
            name: "grid".to_string(),
            mesh_id: Some(grid_mesh),
            color: Color::rgb8(0x88, 0x88, 0x88),
            ..Default::default()
        });

        scene.update_world_transforms();

        Self {
            scene,
            camera,
            orbit,
            rocket,
            color_index: 0,
        }
    }

    /// Advances one frame of simulation: idle auto-rotation, orbit
    /// damping, and the scene-graph world transform pass.
    pub fn tick(&mut self, dt: f32) {
        if !self.orbit.is_interacting() {
            self.rocket.add_yaw(&mut self.scene, AUTO_ROTATE_SPEED * dt);
        }

        self.orbit.update(dt);
        self.orbit.apply(&mut self.camera);

        self.scene.update_world_transforms();
    }

    pub fn set_nose_variant(&mut self, index: usize) {
        self.rocket.set_nose_variant(&mut self.scene, index);
    }

    pub fn set_nose_color(&mut self, index: usize) {
        self.color_index = index;
        let (_, color) = COLOR_OPTIONS[index];
        self.rocket.set_nose_color(&mut self.scene, color);
    }

    pub fn reset_view(&mut self) {
        self.orbit.reset();
        self.orbit.apply(&mut self.camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rocket::NOSE_VARIANTS;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn yaw_increases_strictly_while_idle() {
        let mut state = ViewerState::new();

        let mut last = state.rocket.yaw();
        for _ in 0..10 {
            state.tick(DT);
            let yaw = state.rocket.yaw();
            assert!(yaw > last);
            last = yaw;
        }
    }

    #[test]
    fn yaw_freezes_during_interaction() {
        let mut state = ViewerState::new();
        state.tick(DT);

        state.orbit.begin_interaction();
        let frozen = state.rocket.yaw();
        for _ in 0..10 {
            state.tick(DT);
            assert_eq!(state.rocket.yaw(), frozen);
        }

        state.orbit.end_interaction();
        state.tick(DT);
        assert!(state.rocket.yaw() > frozen);
    }

    #[test]
    fn control_scenario_from_default_to_reset() {
        let mut state = ViewerState::new();

        // Default variant is cone1 (height 1) so the nose sits at 3.5.
        let nose_y = |state: &ViewerState| {
            state
                .scene
                .get_object(state.rocket.nose())
                .unwrap()
                .transform
                .translation()
                .y
        };
        assert!((nose_y(&state) - 3.5).abs() < 1e-6);

        let prior_color = state.rocket.nose_color(&state.scene);

        // cone3 has height 1.2; color must survive the swap.
        let cone3 = crate::rocket::NoseVariant::index_of("cone3").unwrap();
        state.set_nose_variant(cone3);
        assert!((nose_y(&state) - 3.6).abs() < 1e-6);
        assert_eq!(state.rocket.nose_color(&state.scene), prior_color);

        // Green selection changes color but not geometry.
        state.set_nose_color(1);
        assert_eq!(
            state.rocket.nose_color(&state.scene),
            Color::from_hex("#00ff00").unwrap()
        );
        assert!((nose_y(&state) - 3.6).abs() < 1e-6);
        assert_eq!(state.rocket.variant_index(), cone3);

        // Drag the camera somewhere else, then reset.
        state.orbit.begin_interaction();
        state.orbit.rotate(300.0, -80.0);
        state.orbit.zoom(-4.0);
        state.orbit.end_interaction();
        for _ in 0..600 {
            state.tick(DT);
        }
        assert!((state.camera.eye - INITIAL_EYE).length() > 0.5);

        state.reset_view();
        assert!((state.camera.eye - INITIAL_EYE).length() < 1e-4);
    }

    #[test]
    fn color_options_cover_the_dropdown() {
        assert_eq!(COLOR_OPTIONS[1].1, Color::from_hex("#00ff00").unwrap());
        assert_eq!(NOSE_VARIANTS.len(), 3);
    }
}
