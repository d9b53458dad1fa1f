use glam::Vec3;

use crate::color::Color;

#[derive(Debug, Clone)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub cast_shadow: bool,
}

impl DirectionalLight {
    /// Unit vector from the scene toward the light.
    pub fn direction(&self) -> Vec3 {
        self.position.normalize()
    }
}

#[derive(Debug, Clone)]
pub struct HemisphereLight {
    pub sky_color: Color,
    pub ground_color: Color,
    pub intensity: f32,
}

/// The viewer's fixed three-light rig: a low ambient fill, a
/// shadow-casting sun above and behind, and a sky/ground blend.
#[derive(Debug, Clone)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub hemisphere: HemisphereLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: Color::rgb8(0x40, 0x40, 0x40),
                intensity: 0.5,
            },
            directional: DirectionalLight {
                color: Color::rgb(1.0, 1.0, 1.0),
                intensity: 1.0,
                position: Vec3::new(5.0, 10.0, 7.0),
                cast_shadow: true,
            },
            hemisphere: HemisphereLight {
                sky_color: Color::rgb8(0xff, 0xff, 0xbb),
                ground_color: Color::rgb8(0x08, 0x08, 0x20),
                intensity: 0.5,
            },
        }
    }
}
