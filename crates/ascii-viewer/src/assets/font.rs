use fontdue::{Font, FontSettings};
use glyphtrail::{AtlasError, GlyphBitmap, GlyphRasterizer};
use std::path::{Path, PathBuf};

/// Fonts tried, in order, when no font path is given.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Glyph rasterizer backed by a TrueType/OpenType font.
pub struct FontRasterizer {
    font: Font,
}

impl FontRasterizer {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, AtlasError> {
        Font::from_bytes(bytes, FontSettings::default())
            .map(|font| Self { font })
            .map_err(|e| AtlasError::ContextUnavailable(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self, AtlasError> {
        let bytes = std::fs::read(path)
            .map_err(|e| AtlasError::ContextUnavailable(format!("{}: {e}", path.display())))?;
        Self::from_bytes(bytes)
    }

    /// Opens `path`, or the first readable system font when `None`.
    pub fn open(path: Option<&Path>) -> Result<Self, AtlasError> {
        if let Some(path) = path {
            return Self::from_path(path);
        }
        SYSTEM_FONTS
            .iter()
            .map(PathBuf::from)
            .find_map(|p| match Self::from_path(&p) {
                Ok(r) => {
                    log::info!("Using font {}", p.display());
                    Some(r)
                }
                Err(_) => None,
            })
            .ok_or_else(|| {
                AtlasError::ContextUnavailable("no font given and no system font found (use --font)".into())
            })
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&self, glyph: char, px: f32) -> GlyphBitmap {
        let (metrics, coverage) = self.font.rasterize(glyph, px);
        GlyphBitmap {
            width: metrics.width as u32,
            height: metrics.height as u32,
            coverage,
        }
    }
}
