//! Offscreen scene targets the mosaic pass reads from.

/// Scene colour and depth, sized like the swap chain.
pub struct Targets {
    // Textures are kept alive for their views.
    _color_tex: wgpu::Texture,
    _depth_tex: wgpu::Texture,

    /// HDR scene colour; ribbons and the model render here, the ASCII pass samples it.
    pub color: wgpu::TextureView,
    /// Depth for the model pass. Ribbons ignore it.
    pub depth: wgpu::TextureView,

    pub color_fmt: wgpu::TextureFormat,
    pub depth_fmt: wgpu::TextureFormat,
}

impl Targets {
    pub const COLOR_FMT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
    pub const DEPTH_FMT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Allocates both targets; zero extents are bumped to 1.
    pub fn new(device: &wgpu::Device, size: winit::dpi::PhysicalSize<u32>) -> Self {
        let tex_size = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };

        let create_tex = |label: &str, format, usage| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: tex_size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage,
                view_formats: &[],
            })
        };

        let color_tex = create_tex(
            "Scene Color Target",
            Self::COLOR_FMT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let depth_tex = create_tex(
            "Scene Depth Target",
            Self::DEPTH_FMT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );

        Self {
            color: color_tex.create_view(&wgpu::TextureViewDescriptor::default()),
            depth: depth_tex.create_view(&wgpu::TextureViewDescriptor::default()),
            _color_tex: color_tex,
            _depth_tex: depth_tex,
            color_fmt: Self::COLOR_FMT,
            depth_fmt: Self::DEPTH_FMT,
        }
    }

    /// Reallocates both targets at the new size.
    pub fn resize(&mut self, device: &wgpu::Device, size: winit::dpi::PhysicalSize<u32>) {
        *self = Self::new(device, size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_targets_use_hdr_color_and_depth_formats() {
        assert_eq!(Targets::COLOR_FMT, wgpu::TextureFormat::Rgba16Float);
        assert!(Targets::COLOR_FMT.has_color_aspect());
        assert!(Targets::DEPTH_FMT.has_depth_aspect());
    }
}
