//! ASCII trail viewer.
//!
//! Draws the glyphtrail scene (ribbon trails chasing the pointer and a loaded
//! model) into an offscreen target, then redraws that target as a mosaic of
//! font glyphs.

pub mod app;
pub mod assets;
pub mod camera;
pub mod cli;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod ui;
