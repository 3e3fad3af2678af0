//! Rendering orchestrator. Owns the GPU context, the offscreen scene targets
//! and every pipeline: ribbons and model draw into the scene target, the
//! ASCII pass turns that into glyphs on the swap chain.

pub mod context;
pub mod pipelines;
pub mod targets;

use self::{
    context::GfxContext,
    pipelines::{
        ascii::AsciiPass,
        model::{ModelGpu, ModelPipeline, ModelUniform},
        ribbon::{RibbonGpu, RibbonPipeline},
    },
    targets::Targets,
};
use crate::{camera::OrbitCamera, scene::SceneContext};
use glam::Vec2;
use glyphtrail::{GlyphAtlas, ModelMesh, MosaicParams};
use std::sync::Arc;
use winit::window::Window;

pub struct Renderer {
    pub gfx: GfxContext,
    pub targets: Targets,
    pub ribbon_pipeline: RibbonPipeline,
    pub model_pipeline: ModelPipeline,
    pub ascii: AsciiPass,
    pub egui_renderer: egui_wgpu::Renderer,
    ribbons: Vec<RibbonGpu>,
    model: Option<ModelGpu>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, atlas: &GlyphAtlas, params: MosaicParams) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;
        let targets = Targets::new(&gfx.device, gfx.size);

        let ribbon_pipeline = RibbonPipeline::new(&gfx.device, targets.color_fmt, targets.depth_fmt);
        let model_pipeline = ModelPipeline::new(&gfx.device, targets.color_fmt, targets.depth_fmt);
        let ascii = AsciiPass::new(
            &gfx.device,
            &gfx.queue,
            gfx.config.format,
            atlas,
            params,
            gfx.resolution(),
        );

        let egui_renderer = egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Ok(Self {
            gfx,
            targets,
            ribbon_pipeline,
            model_pipeline,
            ascii,
            egui_renderer,
            ribbons: Vec::new(),
            model: None,
        })
    }

    /// Creates GPU buffers for every trail in `scene`, replacing any previous set.
    pub fn attach_trails(&mut self, scene: &SceneContext) {
        let tint = scene.config.trails.tint;
        self.ribbons = scene
            .trails
            .iter()
            .map(|t| {
                self.ribbon_pipeline.create_ribbon(
                    &self.gfx.device,
                    &t.mesh,
                    t.trail.thickness,
                    tint,
                    scene.resolution,
                    scene.dpr,
                )
            })
            .collect();
        log::debug!("Attached {} ribbons", self.ribbons.len());
    }

    pub fn attach_model(&mut self, mesh: &ModelMesh) {
        log::info!(
            "Uploading model: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.index_count()
        );
        self.model = Some(self.model_pipeline.upload(&self.gfx.device, mesh));
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Swap chain, scene targets and the mosaic pass. Ribbon uniforms are
    /// refreshed separately through [`Renderer::resize_ribbons`].
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            self.targets.resize(&self.gfx.device, new_size);
            self.ascii.resize(self.gfx.resolution());
        }
    }

    pub fn resize_ribbons(&mut self, resolution: Vec2, dpr: f32) {
        for ribbon in &mut self.ribbons {
            ribbon.resize(&self.gfx.queue, resolution, dpr);
        }
    }

    pub fn render(&mut self, swap_view: &wgpu::TextureView, scene: &SceneContext, camera: &OrbitCamera) {
        for (gpu, instance) in self.ribbons.iter().zip(&scene.trails) {
            gpu.upload(&self.gfx.queue, &instance.mesh);
        }

        if let (Some(model), Some(rig)) = (&self.model, &scene.rig) {
            let model_view = camera.view() * rig.model_matrix(scene.root);
            let uniform = ModelUniform::new(model_view, camera.proj(), scene.config.model_tint);
            model.write_uniform(&self.gfx.queue, &uniform);
        }

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // Pass 1: scene into the offscreen target
        {
            let [r, g, b, a] = scene.config.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for ribbon in &self.ribbons {
                self.ribbon_pipeline.draw(&mut pass, ribbon);
            }
            if let (Some(model), Some(_)) = (&self.model, &scene.rig) {
                self.model_pipeline.draw(&mut pass, model);
            }
        }

        // Pass 2: ASCII mosaic onto the swap chain
        self.ascii.draw(
            &self.gfx.device,
            &self.gfx.queue,
            &mut encoder,
            swap_view,
            &self.targets.color,
        );

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    /// The HUD renderer is built with (device, format, depth format, msaa samples).
    #[test]
    fn egui_renderer_constructor_signature() {
        let _new: fn(
            &wgpu::Device,
            wgpu::TextureFormat,
            Option<wgpu::TextureFormat>,
            u32,
        ) -> egui_wgpu::Renderer = egui_wgpu::Renderer::new;
    }
}
