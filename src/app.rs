use std::{sync::Arc, time::Instant};

use anyhow::Context;
use glam::Vec2;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::EventLoop,
    window::Window,
};

use crate::{engine, rendering::renderer::Renderer, viewer::ViewerState};

const LINE_ZOOM_STEP: f32 = 0.5;
const PIXEL_ZOOM_STEP: f32 = 0.01;

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

struct App {
    renderer: Option<Renderer>,
    viewer: ViewerState,
    imgui: Option<ImguiState>,
    mouse_pos: Vec2,
    dragging: bool,
    last_frame: Instant,
}

impl App {
    fn from_viewer(viewer: ViewerState) -> Self {
        Self {
            renderer: None,
            viewer,
            imgui: None,
            mouse_pos: Vec2::ZERO,
            dragging: false,
            last_frame: Instant::now(),
        }
    }

    fn setup_imgui(&mut self, window: &Window) {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Default,
        );

        let font_size = 14.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        // Disable INI support because it's broken in the published version of imgui
        context.set_ini_filename(None);

        self.imgui = Some(ImguiState { context, platform });
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let window_attributes = Window::default_attributes().with_title("Rocket Viewer");
        let window = event_loop.create_window(window_attributes).unwrap();
        self.setup_imgui(&window);
        let mut renderer = pollster::block_on(Renderer::new(
            Arc::new(window),
            &self.viewer,
            &mut self.imgui.as_mut().unwrap().context,
        ))
        .expect("Failed to create renderer");

        renderer.load_meshes(&mut self.viewer.scene);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let imgui = self.imgui.as_mut().unwrap();
        let ui_wants_mouse = imgui.context.io().want_capture_mouse;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.renderer.as_mut().unwrap().resize(new_size);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if !ui_wants_mouse {
                    self.viewer.orbit.begin_interaction();
                    self.dragging = true;
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => {
                // Always end, even if the release lands over the UI.
                self.viewer.orbit.end_interaction();
                self.dragging = false;
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                if self.dragging {
                    let delta = position - self.mouse_pos;
                    self.viewer.orbit.rotate(delta.x, delta.y);
                }
                self.mouse_pos = position;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if !ui_wants_mouse {
                    let amount = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y * LINE_ZOOM_STEP,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * PIXEL_ZOOM_STEP,
                    };
                    self.viewer.orbit.zoom(amount);
                }
            }
            WindowEvent::RedrawRequested => {
                let delta_time = self.last_frame.elapsed();
                imgui.context.io_mut().update_delta_time(delta_time);
                self.last_frame = Instant::now();

                let renderer = self.renderer.as_mut().unwrap();
                renderer.window.request_redraw();

                imgui
                    .platform
                    .prepare_frame(imgui.context.io_mut(), &renderer.window)
                    .expect("Failed to prepare Imgui frame");

                {
                    let ui = imgui.context.new_frame();
                    engine::update(&mut self.viewer, delta_time.as_secs_f32(), ui);
                }

                match renderer.render(&mut self.viewer, &mut imgui.context) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.resize(renderer.size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Timeout");
                    }
                    Err(other) => {
                        log::error!("Unexpected error: {:?}", other);
                    }
                }
            }
            _ => (),
        }

        {
            let window = self.renderer.as_ref().unwrap().window.as_ref();
            imgui.platform.handle_event::<()>(
                imgui.context.io_mut(),
                window,
                &Event::WindowEvent { window_id, event },
            );
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let viewer = ViewerState::new();
    let mut app = App::from_viewer(viewer);
    event_loop.run_app(&mut app)?;

    Ok(())
}
