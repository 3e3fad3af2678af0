//! Model geometry and the two-phase asset load that gates scene setup.

use std::{
    path::{Path, PathBuf},
    thread::{self, JoinHandle},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load model {path}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("model {path} contains no mesh primitives")]
    NoPrimitives { path: PathBuf },
    #[error("model {path} has no vertex positions")]
    MissingPositions { path: PathBuf },
    #[error("model load was aborted before it finished")]
    Aborted,
}

/// Interleaved model vertex. Must match the vertex inputs in `model.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// The single primitive the viewer draws.
#[derive(Debug, Clone, Default)]
pub struct ModelMesh {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl ModelMesh {
    /// Interleaves separate attribute streams. Missing normals or uvs are
    /// zero-filled; a missing index buffer becomes `0..n`.
    pub fn from_streams(
        positions: Vec<[f32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
        uvs: Option<Vec<[f32; 2]>>,
        indices: Option<Vec<u32>>,
    ) -> Self {
        let n = positions.len();
        let normals = normals.filter(|v| v.len() == n);
        let uvs = uvs.filter(|v| v.len() == n);
        if n > 0 && (normals.is_none() || uvs.is_none()) {
            log::warn!("Model is missing normals or uvs; filling with zeros");
        }

        let vertices = positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| ModelVertex {
                position,
                normal: normals.as_ref().map_or([0.0; 3], |v| v[i]),
                uv: uvs.as_ref().map_or([0.0; 2], |v| v[i]),
            })
            .collect();

        let indices = indices
            .filter(|ix| ix.iter().all(|&i| (i as usize) < n))
            .unwrap_or_else(|| (0..n as u32).collect());

        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Produces the model mesh for a path. Implemented by the viewer's glTF loader.
pub trait MeshLoader {
    fn load(&self, path: &Path) -> Result<ModelMesh, AssetError>;
}

impl<F> MeshLoader for F
where
    F: Fn(&Path) -> Result<ModelMesh, AssetError>,
{
    fn load(&self, path: &Path) -> Result<ModelMesh, AssetError> {
        self(path)
    }
}

#[derive(Debug)]
pub enum LoadState {
    Loading,
    Ready(ModelMesh),
    Failed(AssetError),
}

/// Mesh load running on a worker thread.
///
/// `Loading -> Ready | Failed`; there is no retry and no cancellation.
pub struct AssetLoad {
    state: LoadState,
    handle: Option<JoinHandle<Result<ModelMesh, AssetError>>>,
}

impl AssetLoad {
    pub fn start<L>(loader: L, path: impl Into<PathBuf>) -> Self
    where
        L: MeshLoader + Send + 'static,
    {
        let path = path.into();
        let handle = thread::spawn(move || {
            log::info!("Loading model {}", path.display());
            loader.load(&path)
        });
        Self {
            state: LoadState::Loading,
            handle: Some(handle),
        }
    }

    /// Checks the worker without blocking.
    pub fn poll(&mut self) -> &LoadState {
        if self.handle.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(handle) = self.handle.take() {
                self.state = finish(handle);
            }
        }
        &self.state
    }

    /// Blocks until the load reaches a terminal state.
    pub fn wait(mut self) -> Result<ModelMesh, AssetError> {
        if let Some(handle) = self.handle.take() {
            self.state = finish(handle);
        }
        match self.state {
            LoadState::Ready(mesh) => Ok(mesh),
            LoadState::Failed(err) => Err(err),
            LoadState::Loading => Err(AssetError::Aborted),
        }
    }
}

fn finish(handle: JoinHandle<Result<ModelMesh, AssetError>>) -> LoadState {
    match handle.join() {
        Ok(Ok(mesh)) => LoadState::Ready(mesh),
        Ok(Err(err)) => LoadState::Failed(err),
        Err(_) => LoadState::Failed(AssetError::Aborted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn triangle() -> ModelMesh {
        ModelMesh::from_streams(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            None,
            Some(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
            None,
        )
    }

    #[test]
    fn streams_are_interleaved_with_defaults() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].uv, [1.0, 0.0]);
        assert_eq!(mesh.vertices[1].normal, [0.0; 3]);
    }

    #[test]
    fn out_of_range_indices_fall_back_to_sequential() {
        let mesh = ModelMesh::from_streams(vec![[0.0; 3]; 3], None, None, Some(vec![0, 1, 7]));
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn successful_load_reaches_ready() {
        let load = AssetLoad::start(
            |_: &Path| -> Result<ModelMesh, AssetError> { Ok(triangle()) },
            "model.glb",
        );
        let mesh = load.wait().unwrap();
        assert_eq!(mesh.index_count(), 3);
    }

    #[test]
    fn failed_load_propagates_the_error() {
        let mut load = AssetLoad::start(
            |p: &Path| -> Result<ModelMesh, AssetError> {
                Err(AssetError::NoPrimitives { path: p.to_path_buf() })
            },
            "empty.glb",
        );
        let mut polls = 0;
        while matches!(load.poll(), LoadState::Loading) {
            polls += 1;
            assert!(polls < 5000, "load never finished");
            thread::sleep(Duration::from_millis(1));
        }
        assert!(matches!(load.poll(), LoadState::Failed(AssetError::NoPrimitives { .. })));
        assert!(matches!(load.wait(), Err(AssetError::NoPrimitives { .. })));
    }

    #[test]
    fn panicking_loader_counts_as_aborted() {
        let load = AssetLoad::start(
            |_: &Path| -> Result<ModelMesh, AssetError> { panic!("loader exploded") },
            "x.glb",
        );
        assert!(matches!(load.wait(), Err(AssetError::Aborted)));
    }
}
