use crate::{
    camera::{CameraController, OrbitCamera},
    input::PointerInput,
    renderer::Renderer,
    scene::SceneContext,
    ui::{self, HudStats},
};
use anyhow::{Context, Result};
use glyphtrail::{GlyphAtlas, GlyphRasterizer, ModelMesh, MosaicParams, PointerSignal, SceneConfig, ATLAS_GRID};
use std::{sync::Arc, time::Instant};
use winit::{
    event::{ElementState, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

/// Glyphs are painted white; the mosaic pass tints them.
const GLYPH_FOREGROUND: [u8; 3] = [255, 255, 255];

pub struct App {
    pub renderer: Renderer,
    pub camera: OrbitCamera,
    pub camera_controller: CameraController,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub scene: SceneContext,
    input: PointerInput,
    dpr_override: Option<f32>,
    pub show_hud: bool,
    last_frame: Instant,
    fps: f32,
}

impl App {
    pub async fn new(
        window: Arc<Window>,
        config: SceneConfig,
        rasterizer: &dyn GlyphRasterizer,
        dpr_override: Option<f32>,
        show_hud: bool,
    ) -> Result<Self> {
        let atlas = GlyphAtlas::build(
            rasterizer,
            &config.glyphs(),
            config.font_px,
            config.atlas_size,
            ATLAS_GRID,
            GLYPH_FOREGROUND,
        )
        .context("building glyph atlas")?;
        log::info!(
            "Glyph atlas: {} glyphs at {}px in a {}x{} texture",
            atlas.glyph_count(),
            config.font_px,
            atlas.size(),
            atlas.size()
        );

        let params = MosaicParams::for_atlas(&atlas, config.cell, config.glyph_color);
        let mut renderer = Renderer::new(window.clone(), &atlas, params).await?;
        let size = renderer.gfx.size;

        let dpr = dpr_override.unwrap_or(window.scale_factor() as f32);
        let pointer = PointerSignal::new();
        let mut camera = OrbitCamera::new(&config.camera, 1.0);
        camera.set_aspect(size.width, size.height);

        let scene = SceneContext::new(config, pointer.clone(), renderer.gfx.resolution(), dpr);
        renderer.attach_trails(&scene);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        Ok(Self {
            renderer,
            camera,
            camera_controller: CameraController::new(),
            egui_ctx,
            egui_state,
            scene,
            input: PointerInput::new(pointer),
            dpr_override,
            show_hud,
            last_frame: Instant::now(),
            fps: 0.0,
        })
    }

    /// Second startup phase: the mesh is in, so the model and its rig join the scene.
    pub fn attach_model(&mut self, mesh: &ModelMesh) {
        self.renderer.attach_model(mesh);
        self.scene.attach_rig();
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            let dpr = self.scene.dpr;
            self.renderer.resize(new_size);
            let resolution = self.renderer.gfx.resolution();
            self.renderer.resize_ribbons(resolution, dpr);
            self.camera.set_aspect(new_size.width, new_size.height);
            self.scene.resize(resolution, dpr);
        }
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let size = self.renderer.gfx.size;
        self.input.handle_event(event, size.width, size.height);

        if self.show_hud {
            let response = self.egui_state.on_window_event(window, event);
            if response.consumed {
                return true;
            }
        }

        self.camera_controller.handle_event(event, &mut self.camera);

        match event {
            WindowEvent::Resized(physical_size) => self.resize(*physical_size),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } if self.dpr_override.is_none() => {
                self.scene.dpr = *scale_factor as f32;
                self.resize(self.renderer.gfx.size);
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::F1) =>
            {
                self.show_hud = !self.show_hud;
                return true;
            }
            _ => {}
        }

        false
    }

    fn update_fps(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        if dt > 0.0 {
            let instant = 1.0 / dt;
            self.fps = if self.fps == 0.0 { instant } else { self.fps * 0.9 + instant * 0.1 };
        }
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        self.update_fps();
        self.scene.tick();

        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(&swap_view, &self.scene, &self.camera);

        if self.show_hud {
            self.render_hud(window, &swap_view);
        }

        frame.present();
        Ok(())
    }

    fn render_hud(&mut self, window: &Window, swap_view: &wgpu::TextureView) {
        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        let rig = self.scene.config.rig.name();
        let stats = HudStats {
            fps: self.fps,
            glyph_count: self.renderer.ascii.params.glyph_count,
            trail_count: self.scene.trails.len(),
            rig,
            model_loaded: self.renderer.has_model(),
        };
        ui::draw_hud(&self.egui_ctx, &stats, &mut self.renderer.ascii.params.sizing);

        let egui_output = self.egui_ctx.end_frame();
        self.egui_state
            .handle_platform_output(window, egui_output.platform_output);
        let shapes = self
            .egui_ctx
            .tessellate(egui_output.shapes, self.egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .renderer
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.renderer.egui_renderer.update_texture(
                &self.renderer.gfx.device,
                &self.renderer.gfx.queue,
                *id,
                delta,
            );
        }

        self.renderer.egui_renderer.update_buffers(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("EGUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
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

            self.renderer
                .egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.renderer.egui_renderer.free_texture(id);
        }

        self.renderer
            .gfx
            .queue
            .submit(std::iter::once(encoder.finish()));
    }
}
