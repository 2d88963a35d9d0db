//! Editor window: drives the track editor from winit events and paints it
//! with egui on top of a wgpu surface.

use crate::config::EditorConfig;
use crate::input::InputState;
use crate::overlay::EguiCanvas;
use crate::panels::track_panel::track_panel;
use crate::panels::TrackPanelAction;
use crate::track_editor::TrackEditor;
use anyhow::{Context, Result};
use bankline_core::Color;
use bankline_render::{RenderContext, Viewport};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

/// Seconds a status message stays on screen
const STATUS_SECONDS: f32 = 3.0;

/// Open the editor window on `track`, or on an empty unsaved track
pub fn run(config: EditorConfig, track: Option<PathBuf>) -> Result<()> {
    let editor = match track {
        Some(path) => {
            let display = path.display().to_string();
            TrackEditor::open(config, path)
                .with_context(|| format!("Failed to open track {}", display))?
        }
        None => TrackEditor::new(config),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = EditorApp::new(editor);
    event_loop.run_app(&mut app)?;

    Ok(())
}

/// The editor application
pub struct EditorApp {
    editor: TrackEditor,
    input: InputState,
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    modifiers: ModifiersState,
    cursor_grabbed: bool,

    // egui state
    egui_ctx: egui::Context,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,

    status_message: Option<(String, Instant)>,
}

impl EditorApp {
    fn new(editor: TrackEditor) -> Self {
        Self {
            editor,
            input: InputState::new(),
            window: None,
            render_context: None,
            modifiers: ModifiersState::empty(),
            cursor_grabbed: false,
            egui_ctx: egui::Context::default(),
            egui_winit: None,
            egui_renderer: None,
            status_message: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let display = &self.editor.config().display;
        let title = match self.editor.track_path().and_then(|p| p.file_name()) {
            Some(name) => format!("Bankline - {}", name.to_string_lossy()),
            None => "Bankline".to_string(),
        };

        let window_attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(display.window_width, display.window_height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create editor window")?,
        );
        self.window = Some(window.clone());

        let render_context = pollster::block_on(RenderContext::new(window.clone()))
            .context("Failed to initialize editor render context")?;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &render_context.device,
            render_context.config.format,
            None,
            1,
            false,
        );

        self.render_context = Some(render_context);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        log::info!("Editor window ready");
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        match &self.render_context {
            Some(context) => Viewport::new(context.size.width as f32, context.size.height as f32),
            None => Viewport::default(),
        }
    }

    /// Advance the editor one tick, then draw it
    fn frame(&mut self) {
        let viewport = self.viewport();
        self.editor.tick(&self.input, viewport);
        self.input.end_frame();
        self.sync_cursor_grab();
        self.render();
    }

    fn sync_cursor_grab(&mut self) {
        let wanted = self.editor.wants_cursor_grab();
        if wanted == self.cursor_grabbed {
            return;
        }
        let Some(window) = &self.window else {
            return;
        };

        if wanted {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                log::warn!("Cursor grab unavailable: {}", e);
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                log::warn!("Failed to release cursor: {}", e);
            }
            window.set_cursor_visible(true);
        }
        self.cursor_grabbed = wanted;
    }

    fn render(&mut self) {
        let Some(context) = &self.render_context else {
            return;
        };

        let output = match context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(context) = &mut self.render_context {
                    let size = context.size;
                    context.resize(size);
                }
                return;
            }
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        context.clear(&view, Color::BLACK);
        let actions = self.render_egui(&view);
        output.present();

        for action in actions {
            match action {
                TrackPanelAction::Save => self.save_track(),
            }
        }
    }

    fn render_egui(&mut self, target_view: &wgpu::TextureView) -> Vec<TrackPanelAction> {
        let mut actions = Vec::new();

        // Extract references to disjoint fields to satisfy the borrow checker
        let Some(window) = self.window.clone() else {
            return actions;
        };
        let Some(context) = &self.render_context else {
            return actions;
        };
        let Some(egui_winit) = &mut self.egui_winit else {
            return actions;
        };

        let raw_input = egui_winit.take_egui_input(&window);

        let editor = &self.editor;
        let status_message = &self.status_message;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::SidePanel::right("track_panel")
                .default_width(260.0)
                .resizable(true)
                .show(ctx, |ui| {
                    actions = track_panel(ui, editor);
                });

            egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(
                        egui::Color32::from_rgb(180, 180, 200),
                        editor.mode().label(),
                    );

                    if let Some((msg, time)) = status_message {
                        let elapsed = time.elapsed().as_secs_f32();
                        if elapsed < STATUS_SECONDS {
                            ui.separator();
                            let alpha = ((STATUS_SECONDS - elapsed) / 0.5).min(1.0);
                            ui.colored_label(
                                egui::Color32::from_rgba_unmultiplied(
                                    200,
                                    220,
                                    255,
                                    (alpha * 255.0) as u8,
                                ),
                                msg,
                            );
                        }
                    }
                });
            });

            // Track overlay in the area the panels leave free
            let painter = ctx
                .layer_painter(egui::LayerId::new(
                    egui::Order::Background,
                    egui::Id::new("track_overlay"),
                ))
                .with_clip_rect(ctx.available_rect());
            let mut canvas = EguiCanvas::new(&painter, ctx.pixels_per_point());
            editor.draw(&mut canvas);
        });

        egui_winit.handle_platform_output(&window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [context.config.width, context.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let Some(mut egui_renderer) = self.egui_renderer.take() else {
            return actions;
        };

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui Encoder"),
            });

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&context.device, &context.queue, *id, image_delta);
        }

        egui_renderer.update_buffers(
            &context.device,
            &context.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target_view,
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

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        context.queue.submit(std::iter::once(encoder.finish()));

        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        self.egui_renderer = Some(egui_renderer);

        actions
    }

    fn save_track(&mut self) {
        match self.editor.save() {
            Ok(path) => self.set_status(format!("Saved {}", path.display())),
            Err(e) => {
                log::error!("Save failed: {}", e);
                self.set_status(format!("Save failed: {}", e));
            }
        }
    }

    fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }
}

impl ApplicationHandler for EditorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                log::error!("Failed to initialize editor: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Track modifier keys
        if let WindowEvent::ModifiersChanged(mods) = &event {
            self.modifiers = mods.state();
        }

        // Ctrl+S = save
        if let WindowEvent::KeyboardInput { event: ref key_event, .. } = event {
            if key_event.state == ElementState::Pressed
                && !key_event.repeat
                && self.modifiers.control_key()
                && key_event.physical_key == PhysicalKey::Code(KeyCode::KeyS)
            {
                self.save_track();
                return;
            }
        }

        // Releases always reach the editor so nothing stays held behind a panel
        match &event {
            WindowEvent::KeyboardInput { event: key_event, .. }
                if key_event.state == ElementState::Released =>
            {
                if let PhysicalKey::Code(code) = key_event.physical_key {
                    self.input.process_key_up(code);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button,
                ..
            } => self.input.process_mouse_button_up(*button),
            _ => {}
        }

        // Let egui handle the event first
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                if self.editor.is_modified() {
                    log::warn!("Closing with unsaved changes");
                }
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(context) = &mut self.render_context {
                    context.resize(size);
                }
            }

            WindowEvent::Focused(false) => {
                self.input.release_all();
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if key_event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(code) = key_event.physical_key {
                        self.input.process_key_down(code);
                    }
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                self.input.process_mouse_button_down(button);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .process_mouse_move(position.x as f32, position.y as f32);
            }

            WindowEvent::RedrawRequested => {
                self.frame();
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        // Raw motion only steers the camera while the cursor is grabbed
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.cursor_grabbed {
                self.input
                    .process_mouse_raw_delta(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
