use std::mem::offset_of;

use glam::{Mat4, Vec4};
use id_arena::Id;
use wgpu::util::DeviceExt;

use crate::geometry::{MeshData, MeshTopology, Vertex};

pub type RenderMeshId = Id<RenderMesh>;

pub const VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, position) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, normal) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ],
};

/// Per-draw data for one object referencing a mesh: its world matrix
/// and its linear-space color.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Instance {
    pub model: Mat4,
    pub color: Vec4,
}

impl Instance {
    pub fn descriptor() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// GPU-side mesh: vertex/index buffers plus the instances gathered from
/// the scene this frame.
///
/// The instance buffer holds all visible instances first, then the
/// shadow-casting subset again, so the lit pass and the shadow pass
/// draw disjoint instance ranges of a single buffer.
pub struct RenderMesh {
    pub name: String,
    pub topology: wgpu::PrimitiveTopology,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,

    pub instances: Vec<Instance>,
    pub shadow_instances: Vec<Instance>,
    instance_buffer: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl RenderMesh {
    pub fn from_data(device: &wgpu::Device, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Vertex buffer ({})", data.name)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Index buffer ({})", data.name)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let topology = match data.topology {
            MeshTopology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
            MeshTopology::LineList => wgpu::PrimitiveTopology::LineList,
        };

        Self {
            name: data.name.clone(),
            topology,
            vertex_buffer,
            index_buffer,
            num_indices: data.indices.len() as u32,
            instances: Vec::new(),
            shadow_instances: Vec::new(),
            instance_buffer: None,
            instance_capacity: 0,
        }
    }

    pub fn clear_instances(&mut self) {
        self.instances.clear();
        self.shadow_instances.clear();
    }

    pub fn should_render(&self) -> bool {
        !self.instances.is_empty()
    }

    pub fn upload_instances(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let total = self.instances.len() + self.shadow_instances.len();
        if total == 0 {
            return;
        }

        if self.instance_buffer.is_none() || self.instance_capacity < total {
            self.instance_buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("Instance buffer ({})", self.name)),
                size: (total * size_of::<Instance>()) as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.instance_capacity = total;
        }

        let buffer = self.instance_buffer.as_ref().unwrap();
        queue.write_buffer(buffer, 0, bytemuck::cast_slice(&self.instances));
        queue.write_buffer(
            buffer,
            (self.instances.len() * size_of::<Instance>()) as wgpu::BufferAddress,
            bytemuck::cast_slice(&self.shadow_instances),
        );
    }

    fn bind(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.as_ref().unwrap().slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        if self.instances.is_empty() {
            return;
        }
        self.bind(render_pass);
        render_pass.draw_indexed(0..self.num_indices, 0, 0..self.instances.len() as u32);
    }

    pub fn draw_shadow_casters(&self, render_pass: &mut wgpu::RenderPass) {
        if self.shadow_instances.is_empty() {
            return;
        }
        self.bind(render_pass);
        let start = self.instances.len() as u32;
        let end = start + self.shadow_instances.len() as u32;
        render_pass.draw_indexed(0..self.num_indices, 0, start..end);
    }
}
