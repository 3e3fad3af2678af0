//! Scene configuration: one parameter record covering every demo variant.

use crate::{
    atlas::{ATLAS_GRID, ATLAS_SIZE, DEFAULT_PALETTE},
    mosaic::{CellSizing, GlyphColor},
    rig::RigPolicy,
    trail::Trail,
};
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Closed range a per-trail parameter is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }

    fn inside_unit_open(&self) -> bool {
        self.min > 0.0 && self.max < 1.0 && self.min <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailSettings {
    /// Number of trails in the scene.
    pub count: usize,
    /// Control points per trail.
    pub points: usize,
    pub spring: Span,
    pub friction: Span,
    /// Mouse offset is `(r, r, r)` with `r` drawn from `[-spread, spread]`.
    pub offset_spread: f32,
    /// Ribbon width in CSS pixels.
    pub thickness: Span,
    pub tint: [f32; 3],
    /// Fixed seed for reproducible trails; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            count: 5,
            points: 40,
            spring: Span::new(0.02, 0.8),
            friction: Span::new(0.7, 0.95),
            offset_spread: 0.05,
            thickness: Span::new(20.0, 100.0),
            tint: [0.0, 1.0, 1.0],
            seed: None,
        }
    }
}

impl TrailSettings {
    /// Draws `count` trails, all starting at the origin.
    pub fn spawn(&self) -> Vec<Trail> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        (0..self.count)
            .map(|i| {
                let spring = self.spring.sample(&mut rng);
                let friction = self.friction.sample(&mut rng);
                let r = Span::new(-self.offset_spread, self.offset_spread).sample(&mut rng);
                let thickness = self.thickness.sample(&mut rng);
                log::debug!(
                    "Trail {i}: spring={spring:.3} friction={friction:.3} offset={r:.3} thickness={thickness:.1}"
                );
                Trail::new(self.points, Vec3::ZERO, spring, friction, Vec3::splat(r))
                    .with_thickness(thickness)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Distance from the origin along -z.
    pub distance: f32,
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 10.0,
            fov_deg: 45.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

/// Everything that distinguishes one scene variant from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Glyph ramp, densest first.
    pub palette: String,
    pub font_px: f32,
    pub atlas_size: u32,
    pub cell: CellSizing,
    pub glyph_color: GlyphColor,
    pub trails: TrailSettings,
    pub rig: RigPolicy,
    /// Fixed model orientation (Euler XYZ, radians) under the rig rotation.
    pub model_base_euler: Vec3,
    pub model_tint: [f32; 3],
    pub camera: CameraSettings,
    pub clear_color: [f32; 4],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.to_owned(),
            font_px: 54.0,
            atlas_size: ATLAS_SIZE,
            cell: CellSizing::Divisor(30.0),
            glyph_color: GlyphColor::Scene,
            trails: TrailSettings::default(),
            rig: RigPolicy::spin(),
            model_base_euler: Vec3::new(-2.204_102, 0.0, 1.823_345),
            model_tint: [0.0, 1.0, 1.0],
            camera: CameraSettings::default(),
            clear_color: [0.0; 4],
        }
    }
}

impl SceneConfig {
    pub fn preset(preset: Preset) -> Self {
        let base = Self::default();
        match preset {
            Preset::Classic => base,
            Preset::Drift => Self {
                trails: TrailSettings {
                    count: 3,
                    points: 30,
                    ..TrailSettings::default()
                },
                rig: RigPolicy::spring(),
                model_base_euler: Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
                ..base
            },
            Preset::Tumble => Self {
                cell: CellSizing::Divisor(20.0),
                trails: TrailSettings {
                    count: 2,
                    points: 20,
                    ..TrailSettings::default()
                },
                rig: RigPolicy::incremental(),
                camera: CameraSettings {
                    distance: 8.0,
                    ..CameraSettings::default()
                },
                ..base
            },
            Preset::Fine => Self {
                cell: CellSizing::FixedPitch(1.0 / 500.0),
                glyph_color: GlyphColor::Tint([0.0, 1.0, 1.0]),
                font_px: 48.0,
                ..base
            },
        }
    }

    /// Reads a JSON config; omitted fields take the classic defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn glyphs(&self) -> Vec<char> {
        self.palette.chars().collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        let glyphs = self.palette.chars().count();
        let capacity = (ATLAS_GRID * ATLAS_GRID) as usize;

        if glyphs == 0 {
            return invalid("palette is empty".into());
        }
        if glyphs > capacity {
            return invalid(format!("palette has {glyphs} glyphs, atlas holds {capacity}"));
        }
        if self.atlas_size == 0 || self.atlas_size % ATLAS_GRID != 0 {
            return invalid(format!("atlas_size {} is not a multiple of {ATLAS_GRID}", self.atlas_size));
        }
        if !(self.font_px > 0.0) {
            return invalid(format!("font_px must be positive, got {}", self.font_px));
        }
        match self.cell {
            CellSizing::Divisor(d) if !(d > 0.0) => {
                return invalid(format!("cell divisor must be positive, got {d}"))
            }
            CellSizing::FixedPitch(p) if !(p > 0.0) => {
                return invalid(format!("cell pitch must be positive, got {p}"))
            }
            _ => {}
        }
        if self.trails.points == 0 {
            return invalid("trails need at least one point".into());
        }
        if !self.trails.spring.inside_unit_open() {
            return invalid(format!("spring range {:?} must lie inside (0, 1)", self.trails.spring));
        }
        if !self.trails.friction.inside_unit_open() {
            return invalid(format!("friction range {:?} must lie inside (0, 1)", self.trails.friction));
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return invalid("camera near/far planes are inverted or non-positive".into());
        }
        Ok(())
    }
}

/// Named scene variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Five cyan trails, 30px cells, constant spin.
    #[default]
    Classic,
    /// Spring-follow model rotation.
    Drift,
    /// Incremental, clamped model rotation.
    Tumble,
    /// Fixed fine cell pitch with tinted glyphs.
    Fine,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Classic, Preset::Drift, Preset::Tumble, Preset::Fine];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Drift => "drift",
            Preset::Tumble => "tumble",
            Preset::Fine => "fine",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::Invalid(format!("unknown preset '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_validates() {
        for preset in Preset::ALL {
            SceneConfig::preset(preset)
                .validate()
                .unwrap_or_else(|e| panic!("{preset}: {e}"));
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert!("nope".parse::<Preset>().is_err());
    }

    #[test]
    fn seeded_trails_are_reproducible_and_in_range() {
        let settings = TrailSettings {
            seed: Some(7),
            ..TrailSettings::default()
        };
        let a = settings.spawn();
        let b = settings.spawn();
        assert_eq!(a.len(), 5);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.spring, y.spring);
            assert_eq!(x.mouse_offset, y.mouse_offset);
            assert!((0.02..=0.8).contains(&x.spring));
            assert!((0.7..=0.95).contains(&x.friction));
            assert!((20.0..=100.0).contains(&x.thickness));
            assert!(x.mouse_offset.x.abs() <= 0.05);
            assert_eq!(x.mouse_offset.x, x.mouse_offset.z);
            assert_eq!(x.len(), 40);
        }
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{
            "cell": { "kind": "fixed_pitch", "value": 0.004 },
            "rig": { "kind": "incremental", "sensitivity": 0.02, "clamp_x": 10.0 },
            "trails": { "count": 2, "seed": 3 }
        }"#;
        let config: SceneConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
        assert_eq!(config.cell, CellSizing::FixedPitch(0.004));
        assert_eq!(config.trails.count, 2);
        assert_eq!(config.trails.points, 40);
        assert_eq!(config.rig.name(), "incremental");
        assert_eq!(config.palette, DEFAULT_PALETTE);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = SceneConfig::default();
        config.trails.spring = Span::new(0.0, 0.5);
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.palette.clear();
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.cell = CellSizing::Divisor(0.0);
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.trails.points = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        assert!(matches!(
            SceneConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Read { .. })
        ));
    }
}
