use std::f32::consts::PI;

use glam::Vec3;

use crate::camera::Camera;

const DAMPING_FACTOR: f32 = 0.05;
const MIN_DISTANCE: f32 = 5.0;
const MAX_DISTANCE: f32 = 15.0;
const MAX_POLAR_ANGLE: f32 = PI * 0.9;
const MIN_POLAR_ANGLE: f32 = 0.001;
const ROTATE_SPEED: f32 = 0.005;

/// Orbits the camera around a fixed target in spherical coordinates,
/// with inertial damping toward the most recent input.
///
/// Distance is clamped to keep the rocket in frame, and the polar angle
/// is capped below pi so the camera cannot flip under the ground plane.
pub struct OrbitControls {
    target: Vec3,

    azimuth: f32,
    polar: f32,
    distance: f32,

    azimuth_goal: f32,
    polar_goal: f32,
    distance_goal: f32,

    initial: (f32, f32, f32),
    interacting: bool,
}

impl OrbitControls {
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let polar = (offset.y / offset.length())
            .clamp(-1.0, 1.0)
            .acos()
            .clamp(MIN_POLAR_ANGLE, MAX_POLAR_ANGLE);
        let azimuth = offset.x.atan2(offset.z);

        Self {
            target,
            azimuth,
            polar,
            distance,
            azimuth_goal: azimuth,
            polar_goal: polar,
            distance_goal: distance,
            initial: (azimuth, polar, distance),
            interacting: false,
        }
    }

    /// Called on pointer press; suspends auto-rotation in the viewer.
    pub fn begin_interaction(&mut self) {
        self.interacting = true;
    }

    pub fn end_interaction(&mut self) {
        self.interacting = false;
    }

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    /// Applies a pointer drag, in surface pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.azimuth_goal -= dx * ROTATE_SPEED;
        self.polar_goal =
            (self.polar_goal - dy * ROTATE_SPEED).clamp(MIN_POLAR_ANGLE, MAX_POLAR_ANGLE);
    }

    /// Moves the camera toward (positive) or away from the target.
    pub fn zoom(&mut self, amount: f32) {
        self.distance_goal = (self.distance_goal - amount).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Advances the damped interpolation toward the input goals.
    pub fn update(&mut self, dt: f32) {
        // Damping factor is per tick at a nominal 60 Hz; rescale so the
        // feel does not depend on the display's refresh rate.
        let t = 1.0 - (1.0 - DAMPING_FACTOR).powf(dt * 60.0);
        self.azimuth += (self.azimuth_goal - self.azimuth) * t;
        self.polar += (self.polar_goal - self.polar) * t;
        self.distance += (self.distance_goal - self.distance) * t;
    }

    /// Snaps back to the startup pose, skipping the damped transition.
    pub fn reset(&mut self) {
        let (azimuth, polar, distance) = self.initial;
        self.azimuth = azimuth;
        self.polar = polar;
        self.distance = distance;
        self.azimuth_goal = azimuth;
        self.polar_goal = polar;
        self.distance_goal = distance;
    }

    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.polar.sin() * self.azimuth.sin(),
            self.polar.cos(),
            self.polar.sin() * self.azimuth.cos(),
        ) * self.distance;
        self.target + offset
    }

    pub fn apply(&self, camera: &mut Camera) {
        camera.eye = self.eye();
        camera.target = self.target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL_EYE: Vec3 = Vec3::new(0.0, 3.0, 8.0);

    fn controls() -> OrbitControls {
        OrbitControls::new(INITIAL_EYE, Vec3::ZERO)
    }

    fn settle(controls: &mut OrbitControls) {
        for _ in 0..2000 {
            controls.update(1.0 / 60.0);
        }
    }

    #[test]
    fn starts_at_the_given_eye() {
        let orbit = controls();
        assert!((orbit.eye() - INITIAL_EYE).length() < 1e-4);
    }

    #[test]
    fn reset_restores_the_initial_pose_after_dragging() {
        let mut orbit = controls();
        orbit.begin_interaction();
        orbit.rotate(250.0, -120.0);
        orbit.zoom(-3.0);
        orbit.end_interaction();
        settle(&mut orbit);
        assert!((orbit.eye() - INITIAL_EYE).length() > 0.5);

        orbit.reset();
        assert!((orbit.eye() - INITIAL_EYE).length() < 1e-4);

        // The pose must hold without further damped drift.
        settle(&mut orbit);
        assert!((orbit.eye() - INITIAL_EYE).length() < 1e-4);
    }

    #[test]
    fn distance_stays_clamped() {
        let mut orbit = controls();
        orbit.zoom(100.0);
        settle(&mut orbit);
        assert!((orbit.eye().length() - MIN_DISTANCE).abs() < 1e-3);

        orbit.zoom(-100.0);
        settle(&mut orbit);
        assert!((orbit.eye().length() - MAX_DISTANCE).abs() < 1e-3);
    }

    #[test]
    fn polar_angle_cannot_flip_under_the_ground() {
        let mut orbit = controls();
        // Drag far downward, which pushes the polar angle toward pi.
        orbit.rotate(0.0, -100_000.0);
        settle(&mut orbit);

        let eye = orbit.eye();
        let polar = (eye.y / eye.length()).acos();
        assert!(polar <= MAX_POLAR_ANGLE + 1e-3);
    }

    #[test]
    fn damping_approaches_the_goal_monotonically() {
        let mut orbit = controls();
        orbit.rotate(100.0, 0.0);

        let mut last_gap = f32::INFINITY;
        for _ in 0..300 {
            orbit.update(1.0 / 60.0);
            let gap = (orbit.azimuth_goal - orbit.azimuth).abs();
            assert!(gap <= last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1e-3);
    }

    #[test]
    fn interaction_flag_tracks_press_and_release() {
        let mut orbit = controls();
        assert!(!orbit.is_interacting());
        orbit.begin_interaction();
        assert!(orbit.is_interacting());
        orbit.end_interaction();
        assert!(!orbit.is_interacting());
    }
}
