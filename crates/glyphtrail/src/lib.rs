//! Glyphtrail: the renderer-independent core of the ASCII trail viewer.
//!
//! - `trail`: damped-spring head plus lerp follow-chain driven by the pointer.
//! - `ribbon`: fixed-topology strip vertices (position/prev/next/uv/side) and
//!   the CPU mirror of the ribbon vertex offset.
//! - `rig`: pointer-driven model orientation policies.
//! - `atlas`: 16x16 glyph grid layout and atlas building.
//! - `mosaic`: the per-pixel ASCII mosaic function (CPU reference of the GPU pass).
//! - `mesh`: loaded model geometry and the two-phase asset load.
//! - `config`: scene presets and JSON configuration.
//!
//! Nothing in here touches the GPU; the viewer crate uploads what these
//! types produce.

pub mod atlas;
pub mod config;
pub mod mesh;
pub mod mosaic;
pub mod pointer;
pub mod ribbon;
pub mod rig;
pub mod trail;

pub use atlas::{AtlasError, GlyphAtlas, GlyphBitmap, GlyphRasterizer, ATLAS_GRID};
pub use config::{ConfigError, Preset, SceneConfig};
pub use mesh::{AssetError, AssetLoad, LoadState, MeshLoader, ModelMesh};
pub use mosaic::{CellSizing, GlyphColor, MosaicParams};
pub use pointer::PointerSignal;
pub use ribbon::{RibbonMesh, RibbonVertex};
pub use rig::{ModelRig, RigPolicy};
pub use trail::Trail;
