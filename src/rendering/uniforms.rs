use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::camera::Camera;
use crate::lighting::Lighting;
use crate::rendering::shadow::ShadowMap;

/// Everything the shaders need per frame: camera and light matrices
/// plus the light rig with intensities premultiplied into the colors.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FrameUniformState {
    pub view_proj: Mat4,
    pub light_view_proj: Mat4,
    pub ambient_color: [f32; 4],
    pub sun_direction: [f32; 4],
    pub sun_color: [f32; 4],
    pub hemisphere_sky: [f32; 4],
    pub hemisphere_ground: [f32; 4],
}

impl FrameUniformState {
    pub fn new(camera: &Camera, lighting: &Lighting, resolution: PhysicalSize<u32>) -> Self {
        let resolution = Vec2::new(resolution.width as f32, resolution.height as f32);
        let sun = &lighting.directional;

        Self {
            view_proj: camera.get_vp_matrix(resolution),
            light_view_proj: ShadowMap::light_view_proj(sun),
            ambient_color: lighting.ambient.color.scaled(lighting.ambient.intensity),
            sun_direction: sun.direction().extend(0.0).to_array(),
            sun_color: sun.color.scaled(sun.intensity),
            hemisphere_sky: lighting
                .hemisphere
                .sky_color
                .scaled(lighting.hemisphere.intensity),
            hemisphere_ground: lighting
                .hemisphere
                .ground_color
                .scaled(lighting.hemisphere.intensity),
        }
    }
}

pub struct FrameUniform {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl FrameUniform {
    pub fn new(device: &wgpu::Device, initial_state: FrameUniformState) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame uniform buffer"),
            contents: bytemuck::cast_slice(&[initial_state]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame uniform bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame uniform bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, state: FrameUniformState) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[state]));
    }
}
