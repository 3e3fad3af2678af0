//! Entry point for the ASCII trail viewer.

use anyhow::{Context, Result};
use ascii_viewer::{
    app::App,
    assets::{FontRasterizer, GltfLoader},
    cli::Args,
};
use clap::Parser;
use glyphtrail::AssetLoad;
use std::sync::Arc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

fn main() -> Result<()> {
    let args = Args::parse();

    // Default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = args.scene_config()?;
    log::info!("Scene preset '{}', rig '{}'", args.preset, config.rig.name());

    // The mesh loads in the background while the window and atlas come up.
    let load = AssetLoad::start(GltfLoader, args.model.clone());

    let rasterizer = FontRasterizer::open(args.font.as_deref()).context("opening glyph font")?;

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Glyphtrail")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .build(&event_loop)?,
    );

    let mut app = pollster::block_on(App::new(
        window.clone(),
        config,
        &rasterizer,
        args.dpr,
        !args.no_hud,
    ))?;

    // Nothing animates until the model is in.
    let mesh = load
        .wait()
        .with_context(|| format!("loading model {}", args.model.display()))?;
    app.attach_model(&mesh);

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                if !app.handle_event(&window, &event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::KeyboardInput { event, .. } => {
                            if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                                elwt.exit();
                            }
                        }
                        WindowEvent::RedrawRequested => match app.render(&window) {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => {
                                app.resize(app.renderer.gfx.size);
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("WGPU out of memory, exiting.");
                                elwt.exit();
                            }
                            Err(e) => log::error!("Render error: {:?}", e),
                        },
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
