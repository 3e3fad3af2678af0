//! Square glyph atlas: an `S x S` RGBA texture cut into a `M x M` grid.
//!
//! Glyph `i` sits centred in cell `(i % M, i / M)`, counting rows from the
//! top of the image. The mosaic pass relies on exactly this layout.

use glam::UVec2;
use thiserror::Error;

/// Cells per atlas row and column.
pub const ATLAS_GRID: u32 = 16;

/// Default atlas edge length in texels.
pub const ATLAS_SIZE: u32 = 1024;

/// Default glyph ramp, densest first.
pub const DEFAULT_PALETTE: &str =
    "@MBHENR#KWXDFPQASUZbdehx*8Gm&04LOVYkpq5Tagns69owz$CIu23Jcfry%1v7l+it[] {}?j|()=~!-/<>\"^_';,:`..";

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("glyph palette is empty")]
    EmptyPalette,
    #[error("{count} glyphs do not fit in an atlas of {capacity} cells")]
    TooManyGlyphs { count: usize, capacity: usize },
    #[error("atlas size {size} is not a positive multiple of grid {grid}")]
    InvalidGeometry { size: u32, grid: u32 },
    #[error("glyph rasterization context unavailable: {0}")]
    ContextUnavailable(String),
}

/// Coverage mask for a single glyph, row-major from the top.
#[derive(Debug, Clone, Default)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
}

/// Turns one glyph into a coverage bitmap at a pixel size.
pub trait GlyphRasterizer {
    fn rasterize(&self, glyph: char, px: f32) -> GlyphBitmap;
}

/// Built atlas, immutable after [`GlyphAtlas::build`].
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    size: u32,
    grid: u32,
    glyph_count: u32,
    /// RGBA8, premultiplied foreground over transparent black.
    texels: Vec<[u8; 4]>,
}

impl GlyphAtlas {
    /// Rasterizes `glyphs` in order into a `size x size` atlas of
    /// `grid x grid` cells, painting coverage with `foreground`.
    pub fn build<R: GlyphRasterizer + ?Sized>(
        rasterizer: &R,
        glyphs: &[char],
        font_px: f32,
        size: u32,
        grid: u32,
        foreground: [u8; 3],
    ) -> Result<Self, AtlasError> {
        if grid == 0 || size == 0 || size % grid != 0 {
            return Err(AtlasError::InvalidGeometry { size, grid });
        }
        if glyphs.is_empty() {
            return Err(AtlasError::EmptyPalette);
        }
        let capacity = (grid * grid) as usize;
        if glyphs.len() > capacity {
            return Err(AtlasError::TooManyGlyphs {
                count: glyphs.len(),
                capacity,
            });
        }

        let cell = size / grid;
        let mut texels = vec![[0u8; 4]; (size * size) as usize];

        for (i, &glyph) in glyphs.iter().enumerate() {
            let bitmap = rasterizer.rasterize(glyph, font_px);
            let pos = glyph_cell(i as u32, grid);
            let cell_x = (pos.x * cell) as i64;
            let cell_y = (pos.y * cell) as i64;
            // Centre the bitmap; anything spilling over the cell is clipped.
            let x0 = cell_x + (cell as i64 - bitmap.width as i64) / 2;
            let y0 = cell_y + (cell as i64 - bitmap.height as i64) / 2;

            for by in 0..bitmap.height as i64 {
                let ty = y0 + by;
                if ty < cell_y || ty >= cell_y + cell as i64 {
                    continue;
                }
                for bx in 0..bitmap.width as i64 {
                    let tx = x0 + bx;
                    if tx < cell_x || tx >= cell_x + cell as i64 {
                        continue;
                    }
                    let a = bitmap.coverage[(by * bitmap.width as i64 + bx) as usize];
                    let premul = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
                    texels[(ty * size as i64 + tx) as usize] =
                        [premul(foreground[0]), premul(foreground[1]), premul(foreground[2]), a];
                }
            }
        }

        log::debug!(
            "Built glyph atlas: {} glyphs, {}x{} texels, {}px cells",
            glyphs.len(),
            size,
            size,
            cell
        );

        Ok(Self {
            size,
            grid,
            glyph_count: glyphs.len() as u32,
            texels,
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn grid(&self) -> u32 {
        self.grid
    }

    pub fn glyph_count(&self) -> u32 {
        self.glyph_count
    }

    /// Size of one cell in normalized texture coordinates.
    pub fn cell_uv(&self) -> f32 {
        1.0 / self.grid as f32
    }

    pub fn texels(&self) -> &[[u8; 4]] {
        &self.texels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Nearest-texel lookup with repeat wrapping; `(u, v)` has its origin at
    /// the top-left of the image.
    pub fn sample(&self, u: f32, v: f32) -> [u8; 4] {
        let s = self.size as f32;
        let x = ((u.rem_euclid(1.0) * s) as u32).min(self.size - 1);
        let y = ((v.rem_euclid(1.0) * s) as u32).min(self.size - 1);
        self.texels[(y * self.size + x) as usize]
    }
}

/// Grid cell holding glyph `index`.
#[inline]
pub fn glyph_cell(index: u32, grid: u32) -> UVec2 {
    UVec2::new(index % grid, index / grid)
}

/// Inverse of [`glyph_cell`].
#[inline]
pub fn cell_index(cell: UVec2, grid: u32) -> u32 {
    cell.x + cell.y * grid
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Paints every glyph as a solid block whose coverage encodes its order
    /// in the palette (`index + 1`).
    pub(crate) struct BlockRasterizer {
        pub palette: Vec<char>,
        pub extent: u32,
    }

    impl GlyphRasterizer for BlockRasterizer {
        fn rasterize(&self, glyph: char, _px: f32) -> GlyphBitmap {
            let index = self.palette.iter().position(|&c| c == glyph).unwrap_or(0);
            GlyphBitmap {
                width: self.extent,
                height: self.extent,
                coverage: vec![(index + 1) as u8; (self.extent * self.extent) as usize],
            }
        }
    }

    fn distinct_palette(n: usize) -> Vec<char> {
        (0..n as u32).filter_map(|i| char::from_u32(0x4E00 + i)).collect()
    }

    #[test]
    fn cell_mapping_round_trips() {
        assert_eq!(glyph_cell(0, 16), UVec2::new(0, 0));
        assert_eq!(glyph_cell(17, 16), UVec2::new(1, 1));
        assert_eq!(glyph_cell(255, 16), UVec2::new(15, 15));
        for index in 0..256 {
            assert_eq!(cell_index(glyph_cell(index, 16), 16), index);
        }
    }

    #[test]
    fn glyphs_land_centred_in_their_cells() {
        let palette = distinct_palette(20);
        let raster = BlockRasterizer {
            palette: palette.clone(),
            extent: 4,
        };
        let atlas = GlyphAtlas::build(&raster, &palette, 8.0, 128, 16, [255, 255, 255]).unwrap();
        assert_eq!(atlas.glyph_count(), 20);

        // 8px cells, 4px glyph at offset 2..6 inside each cell.
        let texel = |x: u32, y: u32| atlas.texels()[(y * 128 + x) as usize];
        // Glyph 17 -> cell (1, 1).
        assert_eq!(texel(8 + 3, 8 + 3), [18, 18, 18, 18]);
        assert_eq!(texel(8 + 1, 8 + 3), [0, 0, 0, 0]);
        assert_eq!(texel(8 + 6, 8 + 3), [0, 0, 0, 0]);
        // Unused cell stays transparent.
        assert_eq!(texel(15 * 8 + 3, 15 * 8 + 3), [0, 0, 0, 0]);
    }

    #[test]
    fn oversized_glyphs_are_clipped_to_their_cell() {
        let palette = distinct_palette(2);
        let raster = BlockRasterizer {
            palette: palette.clone(),
            extent: 20,
        };
        let atlas = GlyphAtlas::build(&raster, &palette, 8.0, 128, 16, [255, 0, 0]).unwrap();
        let texel = |x: u32, y: u32| atlas.texels()[(y * 128 + x) as usize];
        assert_eq!(texel(0, 0)[3], 1);
        assert_eq!(texel(7, 7)[3], 1);
        assert_eq!(texel(8, 0)[3], 2);
        assert_eq!(texel(16, 0)[3], 0);
        assert_eq!(texel(0, 8)[3], 0);
    }

    #[test]
    fn rejects_bad_inputs() {
        let raster = BlockRasterizer {
            palette: vec![],
            extent: 1,
        };
        assert!(matches!(
            GlyphAtlas::build(&raster, &[], 8.0, 128, 16, [255; 3]),
            Err(AtlasError::EmptyPalette)
        ));
        let many = distinct_palette(257);
        assert!(matches!(
            GlyphAtlas::build(&raster, &many, 8.0, 128, 16, [255; 3]),
            Err(AtlasError::TooManyGlyphs { count: 257, capacity: 256 })
        ));
        assert!(matches!(
            GlyphAtlas::build(&raster, &['a'], 8.0, 100, 16, [255; 3]),
            Err(AtlasError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn default_palette_fits_the_grid() {
        let count = DEFAULT_PALETTE.chars().count();
        assert_eq!(count, 95);
        assert!(count <= (ATLAS_GRID * ATLAS_GRID) as usize);
    }
}
