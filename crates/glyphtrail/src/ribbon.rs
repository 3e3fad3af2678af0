//! Ribbon strip generation for trails.
//!
//! Each control point becomes two vertices (`side = -1` and `side = +1`). The
//! strip's width is applied per vertex in the ribbon shader from the `prev` /
//! `next` neighbours; [`screen_offset`] is the CPU mirror of that shader
//! stage and must stay in sync with `shaders/ribbon.wgsl`.

use glam::{Vec2, Vec3};

/// Per-vertex data uploaded to the GPU.
/// Must match the vertex inputs in `ribbon.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RibbonVertex {
    pub position: [f32; 3],
    pub prev: [f32; 3],
    pub next: [f32; 3],
    /// `u` is 0 for side -1 and 1 for side +1; `v` runs 0..1 along the trail.
    pub uv: [f32; 2],
    pub side: f32,
}

/// Per-ribbon uniform block, std140 compatible.
/// Must match `RibbonUniform` in `ribbon.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RibbonUniform {
    /// Surface size in physical pixels.
    pub resolution: [f32; 2],
    pub dpr: f32,
    pub thickness: f32,
    pub tint: [f32; 4],
}

/// Fixed-topology strip for a trail of `K` points: `2K` vertices and two
/// triangles per segment. Only positions and neighbours change after
/// construction.
#[derive(Debug, Clone)]
pub struct RibbonMesh {
    vertices: Vec<RibbonVertex>,
    indices: Vec<u32>,
}

impl RibbonMesh {
    pub fn new(point_count: usize) -> Self {
        let count = point_count.max(1);
        let mut vertices = Vec::with_capacity(count * 2);
        let mut indices = Vec::with_capacity(count.saturating_sub(1) * 6);

        for i in 0..count {
            let v = if count > 1 { i as f32 / (count - 1) as f32 } else { 0.0 };
            for (u, side) in [(0.0, -1.0), (1.0, 1.0)] {
                vertices.push(RibbonVertex {
                    uv: [u, v],
                    side,
                    ..Default::default()
                });
            }

            if i + 1 < count {
                let base = (i * 2) as u32;
                indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
            }
        }

        Self { vertices, indices }
    }

    /// Builds a strip and fills it from `points` in one go.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut mesh = Self::new(points.len());
        mesh.rebuild(points);
        mesh
    }

    pub fn point_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn vertices(&self) -> &[RibbonVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Rewrites position/prev/next from the trail's current points.
    ///
    /// The neighbours at either end are clamped to the endpoint itself.
    /// Extra points beyond the strip's length are ignored; with fewer points
    /// only the leading vertices are rewritten.
    pub fn rebuild(&mut self, points: &[Vec3]) {
        let n = points.len().min(self.point_count());
        if n == 0 {
            return;
        }

        for i in 0..n {
            let position = points[i].to_array();
            let prev = points[i.saturating_sub(1)].to_array();
            let next = points[(i + 1).min(n - 1)].to_array();
            for vertex in &mut self.vertices[i * 2..i * 2 + 2] {
                vertex.position = position;
                vertex.prev = prev;
                vertex.next = next;
            }
        }
    }
}

/// Taper applied along the strip so both ends narrow.
pub fn edge_taper(v: f32) -> f32 {
    1.0 - ((v - 0.5).abs() * 1.9).powi(2)
}

/// Hermite smoothstep, as in GLSL/WGSL.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Clip-space xy of `vertex` after the width offset is applied.
///
/// Neighbours are moved into aspect-corrected screen space, the tangent is
/// rotated 90 degrees, the aspect is undone, and the normal is tapered, scaled
/// to `thickness` CSS pixels and suppressed when `prev` and `next` coincide.
pub fn screen_offset(vertex: &RibbonVertex, resolution: Vec2, dpr: f32, thickness: f32) -> Vec2 {
    let aspect = Vec2::new(resolution.x / resolution.y, 1.0);
    let next_screen = Vec3::from(vertex.next).truncate() * aspect;
    let prev_screen = Vec3::from(vertex.prev).truncate() * aspect;

    let d = next_screen - prev_screen;
    let tangent = d.normalize_or_zero();
    let mut normal = Vec2::new(-tangent.y, tangent.x);
    normal /= aspect;
    normal *= edge_taper(vertex.uv[1]);

    let pixel_width = 1.0 / (resolution.y / dpr);
    normal *= pixel_width * thickness;
    normal *= smoothstep(0.0, 0.02, d.length());

    Vec3::from(vertex.position).truncate() - normal * vertex.side
}
