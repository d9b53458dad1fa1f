use std::sync::Arc;

use anyhow::Context;
use glam::Vec4;
use id_arena::Arena;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    rendering::{
        mesh::{Instance, RenderMesh, VERTEX_LAYOUT},
        shadow::ShadowMap,
        texture::DepthTexture,
        uniforms::{FrameUniform, FrameUniformState},
    },
    scene_graph::scene::Scene,
    viewer::ViewerState,
};

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,

    depth_texture: DepthTexture,
    shadow_map: ShadowMap,
    frame_uniform: FrameUniform,
    render_meshes: Arena<RenderMesh>,

    lit_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,

    imgui_renderer: imgui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        state: &ViewerState,
        imgui_context: &mut imgui::Context,
    ) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create render surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No compatible GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = DepthTexture::new(&device, size, "Depth Texture");
        let shadow_map = ShadowMap::new(&device);
        let frame_uniform = FrameUniform::new(
            &device,
            FrameUniformState::new(&state.camera, &state.scene.lighting, size),
        );

        let lit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lit pipeline layout"),
            bind_group_layouts: &[
                &frame_uniform.bind_group_layout,
                &shadow_map.bind_group_layout,
            ],
            push_constant_ranges: &[],
        });
        let frame_only_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Frame-only pipeline layout"),
            bind_group_layouts: &[&frame_uniform.bind_group_layout],
            push_constant_ranges: &[],
        });

        let scene_shader =
            device.create_shader_module(wgpu::include_wgsl!("shaders/scene.wgsl"));
        let line_shader = device.create_shader_module(wgpu::include_wgsl!("shaders/line.wgsl"));
        let shadow_shader =
            device.create_shader_module(wgpu::include_wgsl!("shaders/shadow.wgsl"));

        let lit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Lit pipeline"),
            layout: Some(&lit_layout),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_main"),
                buffers: &[VERTEX_LAYOUT, Instance::descriptor()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthTexture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line pipeline"),
            layout: Some(&frame_only_layout),
            vertex: wgpu::VertexState {
                module: &line_shader,
                entry_point: Some("vs_main"),
                buffers: &[VERTEX_LAYOUT, Instance::descriptor()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &line_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthTexture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let shadow_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shadow pipeline"),
            layout: Some(&frame_only_layout),
            vertex: wgpu::VertexState {
                module: &shadow_shader,
                entry_point: Some("vs_main"),
                buffers: &[VERTEX_LAYOUT, Instance::descriptor()],
                compilation_options: Default::default(),
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthTexture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let imgui_renderer = imgui_wgpu::Renderer::new(
            imgui_context,
            &device,
            &queue,
            imgui_wgpu::RendererConfig {
                texture_format: surface_format,
                ..Default::default()
            },
        );

        Ok(Self {
            window,
            size,
            surface,
            config,
            device,
            queue,
            depth_texture,
            shadow_map,
            frame_uniform,
            render_meshes: Arena::new(),
            lit_pipeline,
            line_pipeline,
            shadow_pipeline,
            imgui_renderer,
        })
    }

    /// Uploads every scene mesh to the GPU and links it back.
    pub fn load_meshes(&mut self, scene: &mut Scene) {
        for (_, scene_mesh) in &mut scene.meshes {
            let render_mesh = RenderMesh::from_data(&self.device, &scene_mesh.data);
            log::info!(
                "Uploaded mesh {} ({} indices)",
                scene_mesh.data.name,
                scene_mesh.data.indices.len()
            );
            scene_mesh.render_mesh = Some(self.render_meshes.alloc(render_mesh));
        }
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture.resize(&self.device, new_size);
        }
    }

    fn gather_instances(&mut self, scene: &Scene) {
        for (_, render_mesh) in self.render_meshes.iter_mut() {
            render_mesh.clear_instances();
        }

        for (_, object) in scene.objects.iter() {
            let Some(mesh_id) = object.mesh_id else {
                continue;
            };
            let Some(render_mesh_id) = scene.get_mesh(mesh_id).and_then(|m| m.render_mesh) else {
                continue;
            };
            let Some(render_mesh) = self.render_meshes.get_mut(render_mesh_id) else {
                continue;
            };

            let instance = Instance {
                model: *object.transform.get_world_matrix(),
                color: Vec4::from_array(object.color.to_linear()),
            };
            render_mesh.instances.push(instance);
            if object.cast_shadow {
                render_mesh.shadow_instances.push(instance);
            }
        }
    }

    pub fn render(
        &mut self,
        state: &mut ViewerState,
        imgui_context: &mut imgui::Context,
    ) -> Result<(), wgpu::SurfaceError> {
        self.frame_uniform.update(
            &self.queue,
            FrameUniformState::new(&state.camera, &state.scene.lighting, self.size),
        );

        self.gather_instances(&state.scene);
        for (_, render_mesh) in self.render_meshes.iter_mut() {
            render_mesh.upload_instances(&self.device, &self.queue);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if state.scene.lighting.directional.cast_shadow {
                shadow_pass.set_pipeline(&self.shadow_pipeline);
                shadow_pass.set_bind_group(0, &self.frame_uniform.bind_group, &[]);
                for (_, render_mesh) in self.render_meshes.iter() {
                    if render_mesh.topology == wgpu::PrimitiveTopology::TriangleList {
                        render_mesh.draw_shadow_casters(&mut shadow_pass);
                    }
                }
            }
        }

        {
            let [r, g, b, _] = state.scene.background.to_linear();
            let mut scene_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.depth_texture.view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            scene_pass.set_pipeline(&self.lit_pipeline);
            scene_pass.set_bind_group(0, &self.frame_uniform.bind_group, &[]);
            scene_pass.set_bind_group(1, &self.shadow_map.bind_group, &[]);
            for (_, render_mesh) in self.render_meshes.iter() {
                if render_mesh.should_render()
                    && render_mesh.topology == wgpu::PrimitiveTopology::TriangleList
                {
                    render_mesh.draw(&mut scene_pass);
                }
            }

            scene_pass.set_pipeline(&self.line_pipeline);
            scene_pass.set_bind_group(0, &self.frame_uniform.bind_group, &[]);
            for (_, render_mesh) in self.render_meshes.iter() {
                if render_mesh.should_render()
                    && render_mesh.topology == wgpu::PrimitiveTopology::LineList
                {
                    render_mesh.draw(&mut scene_pass);
                }
            }
        }

        {
            let draw_data = imgui_context.render();
            if draw_data.draw_lists_count() > 0 {
                let mut ui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Imgui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

                self.imgui_renderer
                    .render(draw_data, &self.queue, &self.device, &mut ui_pass)
                    .expect("Rendering Imgui failed");
            }
        }

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}
