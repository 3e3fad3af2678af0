//! File-backed collaborators for the core: glTF meshes and font glyphs.

pub mod font;
pub mod gltf;

pub use self::{font::FontRasterizer, gltf::GltfLoader};
