use anyhow::{Context, Result};
use clap::Parser;
use glyphtrail::{Preset, SceneConfig};
use std::path::PathBuf;

/// `ascii-viewer` - mouse-following ribbon trails and a spinning model,
/// redrawn as a grid of ASCII glyphs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// glTF/GLB model to place at the centre of the scene.
    #[arg(long, env = "GLYPHTRAIL_MODEL", default_value = "assets/model.glb")]
    pub model: PathBuf,

    /// TrueType/OpenType font used to build the glyph atlas.
    ///
    /// When omitted, a few common system fonts are tried.
    #[arg(long, env = "GLYPHTRAIL_FONT")]
    pub font: Option<PathBuf>,

    /// Scene variant: classic, drift, tumble or fine.
    #[arg(long, default_value_t = Preset::Classic)]
    pub preset: Preset,

    /// JSON scene config. Takes precedence over `--preset`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for the per-trail random parameters.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Device pixel ratio for ribbon thickness, instead of the window scale factor.
    #[arg(long)]
    pub dpr: Option<f32>,

    /// Start with the HUD hidden (F1 toggles it).
    #[arg(long)]
    pub no_hud: bool,
}

impl Args {
    /// Resolves the scene config from `--config` or `--preset`, then applies
    /// the remaining overrides.
    pub fn scene_config(&self) -> Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)
                .with_context(|| format!("loading scene config {}", path.display()))?,
            None => SceneConfig::preset(self.preset),
        };
        if self.seed.is_some() {
            config.trails.seed = self.seed;
        }
        config.validate().context("invalid scene config")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphtrail::RigPolicy;

    #[test]
    fn defaults_to_classic() {
        let args = Args::parse_from(["ascii-viewer"]);
        assert_eq!(args.preset, Preset::Classic);
        assert!(!args.no_hud);
        let config = args.scene_config().unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn preset_and_seed_flags_apply() {
        let args = Args::parse_from(["ascii-viewer", "--preset", "tumble", "--seed", "42", "--no-hud"]);
        let config = args.scene_config().unwrap();
        assert!(matches!(config.rig, RigPolicy::Incremental { .. }));
        assert_eq!(config.trails.seed, Some(42));
        assert!(args.no_hud);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!(Args::try_parse_from(["ascii-viewer", "--preset", "sparkle"]).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args::parse_from(["ascii-viewer", "--config", "/nonexistent/scene.json"]);
        assert!(args.scene_config().is_err());
    }
}
