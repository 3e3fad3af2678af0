//! ASCII mosaic: CPU reference of the `ascii.wgsl` post pass.
//!
//! Coordinates here use the shader's convention: `uv` has its origin at the
//! bottom-left of the frame with v pointing up. Textures are addressed
//! top-down, so every lookup goes through `(u, 1 - v)`.

use crate::atlas::{glyph_cell, GlyphAtlas};
use glam::{UVec2, Vec2, Vec3, Vec4};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Rec. 601 luma weights.
pub const LUMA: Vec3 = Vec3::new(0.299, 0.587, 0.114);

/// How large a mosaic cell is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellSizing {
    /// `resolution / D` cells across each axis, i.e. cells of D physical pixels.
    Divisor(f32),
    /// Fixed cell pitch in normalized screen units, independent of resolution.
    FixedPitch(f32),
}

impl CellSizing {
    /// Cells per unit of uv along each axis.
    pub fn cells(&self, resolution: Vec2) -> Vec2 {
        match *self {
            Self::Divisor(d) => resolution / d,
            Self::FixedPitch(p) => Vec2::splat(1.0 / p),
        }
    }
}

/// Colour a glyph is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rgb", rename_all = "snake_case")]
pub enum GlyphColor {
    /// The pixelized scene colour.
    Scene,
    Tint([f32; 3]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MosaicParams {
    pub sizing: CellSizing,
    pub glyph_count: u32,
    pub grid: u32,
    pub color: GlyphColor,
}

impl MosaicParams {
    pub fn for_atlas(atlas: &GlyphAtlas, sizing: CellSizing, color: GlyphColor) -> Self {
        Self {
            sizing,
            glyph_count: atlas.glyph_count(),
            grid: atlas.grid(),
            color,
        }
    }
}

/// Uniform block of the GPU pass, std140 compatible.
/// Must match `AsciiUniform` in `ascii.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MosaicUniform {
    pub resolution: [f32; 2],
    pub cells: [f32; 2],
    pub tint: [f32; 3],
    /// 1.0 to use `tint`, 0.0 for scene colour.
    pub use_tint: f32,
    pub glyph_count: f32,
    pub grid: f32,
    pub _pad: [f32; 2],
}

impl MosaicUniform {
    pub fn new(params: &MosaicParams, resolution: Vec2) -> Self {
        let (tint, use_tint) = match params.color {
            GlyphColor::Scene => ([1.0; 3], 0.0),
            GlyphColor::Tint(rgb) => (rgb, 1.0),
        };
        Self {
            resolution: resolution.to_array(),
            cells: params.sizing.cells(resolution).to_array(),
            tint,
            use_tint,
            glyph_count: params.glyph_count as f32,
            grid: params.grid as f32,
            _pad: [0.0; 2],
        }
    }
}

pub fn luminance(rgb: Vec3) -> f32 {
    rgb.dot(LUMA)
}

/// Glyph density: 1 for black, 0 for white.
pub fn greyscale(rgb: Vec3) -> f32 {
    1.0 - luminance(rgb)
}

/// Ramp index for a colour. HDR input can push luma past 1, so the result
/// is clamped into `[0, glyph_count - 1]`.
pub fn glyph_index(rgb: Vec3, glyph_count: u32) -> u32 {
    let last = glyph_count.max(1) - 1;
    let index = (last as f32 * greyscale(rgb)).floor();
    index.clamp(0.0, last as f32) as u32
}

/// Snaps `uv` to the sampling point at the centre of its cell.
pub fn pixelize(uv: Vec2, cells: Vec2) -> Vec2 {
    let pitch = cells.recip();
    pitch * (Vec2::splat(0.5) + (uv / pitch).floor())
}

/// Atlas coordinate (bottom-left origin) for the fragment at `uv` drawing
/// the glyph in `cell`.
pub fn glyph_uv(uv: Vec2, cells: Vec2, cell: UVec2, grid: u32) -> Vec2 {
    let size = grid as f32;
    let span = 1.0 / size;
    let offset = Vec2::new(cell.x as f32, -(cell.y as f32)) / size;
    let local = uv * (cells / size);
    let intra = Vec2::new(local.x.rem_euclid(span), local.y.rem_euclid(span));
    intra - Vec2::new(0.0, span) + offset
}

/// A linear RGBA float frame, rows stored top-down.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec4>,
}

impl Frame {
    pub fn filled(width: u32, height: u32, color: Vec4) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Nearest-pixel lookup, clamped to the edge. An empty frame reads as
    /// transparent black.
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        if self.is_empty() {
            return Vec4::ZERO;
        }
        let x = ((uv.x * self.width as f32).max(0.0) as u32).min(self.width - 1);
        let y = (((1.0 - uv.y) * self.height as f32).max(0.0) as u32).min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }

    /// Shader-convention uv of the centre of pixel `(x, y)`.
    pub fn pixel_uv(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / self.width as f32,
            1.0 - (y as f32 + 0.5) / self.height as f32,
        )
    }
}

/// Glyph index chosen for the fragment at `uv`.
pub fn index_at(scene: &Frame, params: &MosaicParams, uv: Vec2) -> u32 {
    let cells = params.sizing.cells(scene.resolution());
    let pixelized = scene.sample(pixelize(uv, cells));
    glyph_index(pixelized.truncate(), params.glyph_count)
}

/// Output colour for one fragment.
pub fn shade(scene: &Frame, atlas: &GlyphAtlas, params: &MosaicParams, uv: Vec2) -> Vec4 {
    let cells = params.sizing.cells(scene.resolution());
    let pixelized = scene.sample(pixelize(uv, cells));
    let index = glyph_index(pixelized.truncate(), params.glyph_count);
    let char_uv = glyph_uv(uv, cells, glyph_cell(index, params.grid), params.grid);
    let mask = atlas.sample(char_uv.x, 1.0 - char_uv.y)[0] as f32 / 255.0;

    let rgb = match params.color {
        GlyphColor::Scene => pixelized.truncate(),
        GlyphColor::Tint(rgb) => Vec3::from(rgb),
    };
    (rgb * mask).extend(pixelized.w)
}

/// Runs the mosaic over a whole frame.
pub fn apply(scene: &Frame, atlas: &GlyphAtlas, params: &MosaicParams) -> Frame {
    let mut out = Frame::filled(scene.width, scene.height, Vec4::ZERO);
    if scene.is_empty() {
        return out;
    }
    out.pixels
        .par_chunks_mut(scene.width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                *px = shade(scene, atlas, params, scene.pixel_uv(x as u32, y as u32));
            }
        });
    out
}
