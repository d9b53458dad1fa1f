use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshTopology {
    TriangleList,
    LineList,
}

/// CPU-side mesh data for one primitive shape.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub name: String,
    pub topology: MeshTopology,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn new(name: impl Into<String>, topology: MeshTopology) -> Self {
        Self {
            name: name.into(),
            topology,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(Vertex { position, normal });
        index
    }

    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }
}

/// A cylinder centered on the origin with its axis along Y.
pub fn cylinder(name: &str, radius: f32, height: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::new(name, MeshTopology::TriangleList);
    let half = height / 2.0;

    // Side: two rings with outward normals.
    let base = mesh.vertices.len() as u32;
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let dir = Vec3::new(theta.cos(), 0.0, theta.sin());
        mesh.push_vertex(dir * radius + Vec3::Y * half, dir);
        mesh.push_vertex(dir * radius - Vec3::Y * half, dir);
    }
    for i in 0..segments {
        let a = base + i * 2;
        mesh.push_triangle(a, a + 2, a + 1);
        mesh.push_triangle(a + 1, a + 2, a + 3);
    }

    cap(&mut mesh, radius, half, segments, Vec3::Y);
    cap(&mut mesh, radius, -half, segments, Vec3::NEG_Y);

    mesh
}

fn cap(mesh: &mut MeshData, radius: f32, y: f32, segments: u32, normal: Vec3) {
    let center = mesh.push_vertex(Vec3::Y * y, normal);
    let base = mesh.vertices.len() as u32;
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let position = Vec3::new(theta.cos() * radius, y, theta.sin() * radius);
        mesh.push_vertex(position, normal);
    }
    for i in 0..segments {
        mesh.push_triangle(center, base + i, base + i + 1);
    }
}

/// An axis-aligned box centered on the origin.
pub fn cuboid(name: &str, width: f32, height: f32, depth: f32) -> MeshData {
    let mut mesh = MeshData::new(name, MeshTopology::TriangleList);
    let half = Vec3::new(width, height, depth) / 2.0;

    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::Z, Vec3::NEG_X),
        (Vec3::Z, Vec3::Y, Vec3::NEG_X),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    for (normal, up, right) in faces {
        let origin = normal * half;
        let u = right * half;
        let v = up * half;
        let base = mesh.vertices.len() as u32;
        mesh.push_vertex(origin - u - v, normal);
        mesh.push_vertex(origin + u - v, normal);
        mesh.push_vertex(origin + u + v, normal);
        mesh.push_vertex(origin - u + v, normal);
        mesh.push_triangle(base, base + 1, base + 2);
        mesh.push_triangle(base, base + 2, base + 3);
    }

    mesh
}

/// A cone centered on the origin: apex at +height/2, base at -height/2.
pub fn cone(name: &str, radius: f32, height: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::new(name, MeshTopology::TriangleList);
    let half = height / 2.0;

    // Side. The apex is duplicated per segment so each slanted quad
    // strip gets a smoothly varying normal.
    let base = mesh.vertices.len() as u32;
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let dir = Vec3::new(theta.cos(), 0.0, theta.sin());
        let normal = (dir * height + Vec3::Y * radius).normalize();
        mesh.push_vertex(dir * radius - Vec3::Y * half, normal);
    }
    for i in 0..=segments {
        let theta = (i as f32 + 0.5) / segments as f32 * TAU;
        let dir = Vec3::new(theta.cos(), 0.0, theta.sin());
        let normal = (dir * height + Vec3::Y * radius).normalize();
        mesh.push_vertex(Vec3::Y * half, normal);
    }
    let apex = base + segments + 1;
    for i in 0..segments {
        mesh.push_triangle(base + i, base + i + 1, apex + i);
    }

    cap(&mut mesh, radius, -half, segments, Vec3::NEG_Y);

    mesh
}

/// A square grid of lines in the XZ plane, like a ground reference.
pub fn grid(name: &str, size: f32, divisions: u32) -> MeshData {
    let mut mesh = MeshData::new(name, MeshTopology::LineList);
    let half = size / 2.0;
    let step = size / divisions as f32;

    for i in 0..=divisions {
        let t = -half + i as f32 * step;

        let a = mesh.push_vertex(Vec3::new(t, 0.0, -half), Vec3::Y);
        let b = mesh.push_vertex(Vec3::new(t, 0.0, half), Vec3::Y);
        mesh.indices.extend_from_slice(&[a, b]);

        let c = mesh.push_vertex(Vec3::new(-half, 0.0, t), Vec3::Y);
        let d = mesh.push_vertex(Vec3::new(half, 0.0, t), Vec3::Y);
        mesh.indices.extend_from_slice(&[c, d]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(mesh: &MeshData) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for v in &mesh.vertices {
            min = min.min(v.position);
            max = max.max(v.position);
        }
        (min, max)
    }

    #[test]
    fn cylinder_is_centered_with_requested_extent() {
        let mesh = cylinder("body", 0.5, 3.0, 32);
        let (min, max) = extent(&mesh);
        assert!((min.y - -1.5).abs() < 1e-6);
        assert!((max.y - 1.5).abs() < 1e-6);
        assert!((max.x - 0.5).abs() < 1e-6);
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn cone_apex_and_base_straddle_origin() {
        let mesh = cone("nose", 0.5, 1.0, 32);
        let (min, max) = extent(&mesh);
        assert!((max.y - 0.5).abs() < 1e-6);
        assert!((min.y - -0.5).abs() < 1e-6);
    }

    #[test]
    fn normals_are_unit_length() {
        for mesh in [
            cylinder("c", 0.5, 3.0, 16),
            cone("n", 0.4, 1.2, 16),
            cuboid("f", 0.1, 0.5, 1.0),
        ] {
            for v in &mesh.vertices {
                assert!((v.normal.length() - 1.0).abs() < 1e-4, "{}", mesh.name);
            }
        }
    }

    #[test]
    fn grid_has_a_line_per_division_in_each_axis() {
        let mesh = grid("grid", 10.0, 10);
        assert_eq!(mesh.topology, MeshTopology::LineList);
        // 11 lines along X and 11 along Z, two indices per line.
        assert_eq!(mesh.indices.len(), 2 * 2 * 11);
        assert!(mesh.vertices.iter().all(|v| v.position.y == 0.0));
    }
}
