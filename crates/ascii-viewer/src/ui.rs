use glyphtrail::CellSizing;

/// What the HUD reports each frame.
pub struct HudStats<'a> {
    pub fps: f32,
    pub glyph_count: u32,
    pub trail_count: usize,
    pub rig: &'a str,
    pub model_loaded: bool,
}

/// Overlay with frame stats and the live cell-size control.
pub fn draw_hud(ctx: &egui::Context, stats: &HudStats<'_>, sizing: &mut CellSizing) {
    egui::Window::new("Glyphtrail")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            ui.label(format!("FPS: {:.0}", stats.fps));
            ui.label(format!("Glyphs: {}", stats.glyph_count));
            ui.label(format!("Trails: {}", stats.trail_count));
            ui.label(format!(
                "Rig: {}",
                if stats.model_loaded { stats.rig } else { "none" }
            ));
            ui.separator();

            match sizing {
                CellSizing::Divisor(d) => {
                    ui.add(egui::Slider::new(d, 4.0..=120.0).text("Cell px"));
                }
                CellSizing::FixedPitch(p) => {
                    let mut cells = 1.0 / *p;
                    if ui
                        .add(egui::Slider::new(&mut cells, 20.0..=1000.0).text("Cells"))
                        .changed()
                    {
                        *p = 1.0 / cells;
                    }
                }
            }
            ui.small("F1 hides this panel");
        });
}
