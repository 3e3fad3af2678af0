use glyphtrail::{AssetError, MeshLoader, ModelMesh};
use std::path::Path;

/// Loads the first primitive of the first mesh in a glTF/GLB file.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfLoader;

impl MeshLoader for GltfLoader {
    fn load(&self, path: &Path) -> Result<ModelMesh, AssetError> {
        let (document, buffers, _images) = ::gltf::import(path).map_err(|e| AssetError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let primitive = document
            .meshes()
            .next()
            .and_then(|mesh| mesh.primitives().next())
            .ok_or_else(|| AssetError::NoPrimitives {
                path: path.to_path_buf(),
            })?;

        if document.meshes().map(|m| m.primitives().len()).sum::<usize>() > 1 {
            log::warn!("{} has several primitives; drawing only the first", path.display());
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .ok_or_else(|| AssetError::MissingPositions {
                path: path.to_path_buf(),
            })?
            .collect();
        let normals = reader.read_normals().map(|it| it.collect());
        let uvs = reader.read_tex_coords(0).map(|tc| tc.into_f32().collect());
        let indices = reader.read_indices().map(|ix| ix.into_u32().collect());

        let mesh = ModelMesh::from_streams(positions, normals, uvs, indices);
        log::info!(
            "Loaded {}: {} vertices, {} indices",
            path.display(),
            mesh.vertex_count(),
            mesh.index_count()
        );
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One triangle, positions only, buffer embedded as a data URI.
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "buffers": [{
            "byteLength": 36,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"
        }],
        "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [1.0, 1.0, 0.0]
        }],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
        "nodes": [{ "mesh": 0 }],
        "scenes": [{ "nodes": [0] }],
        "scene": 0
    }"#;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("ascii-viewer-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_first_primitive_with_sequential_indices() {
        let path = write_temp("triangle.gltf", TRIANGLE_GLTF);
        let mesh = GltfLoader.load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].normal, [0.0; 3]);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = GltfLoader.load(Path::new("/nonexistent/model.glb")).unwrap_err();
        assert!(matches!(err, AssetError::Load { .. }));
    }

    #[test]
    fn document_without_meshes_has_no_primitives() {
        let path = write_temp("empty.gltf", r#"{ "asset": { "version": "2.0" } }"#);
        let err = GltfLoader.load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, AssetError::NoPrimitives { .. }));
    }
}
