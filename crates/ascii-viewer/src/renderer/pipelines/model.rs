use glam::Mat4;
use glyphtrail::{mesh::ModelVertex, ModelMesh};
use wgpu::util::DeviceExt;

/// Per-model uniform block, std140 compatible.
/// Must match `ModelUniform` in `model.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model_view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

impl ModelUniform {
    pub fn new(model_view: Mat4, projection: Mat4, tint: [f32; 3]) -> Self {
        Self {
            model_view: model_view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            tint: [tint[0], tint[1], tint[2], 1.0],
        }
    }
}

/// Uploaded model primitive.
pub struct ModelGpu {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
    ubo: wgpu::Buffer,
    bind: wgpu::BindGroup,
}

impl ModelGpu {
    pub fn write_uniform(&self, queue: &wgpu::Queue, uniform: &ModelUniform) {
        queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(uniform));
    }
}

pub struct ModelPipeline {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
}

impl ModelPipeline {
    pub fn new(
        device: &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        depth_fmt: wgpu::TextureFormat,
    ) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model UBO Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ModelUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shaders/model.wgsl"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/model.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Model PipelineLayout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Model Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<ModelVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3, // position
                        1 => Float32x3, // normal
                        2 => Float32x2, // uv
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_fmt,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_fmt,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self { pipeline, layout }
    }

    pub fn upload(&self, device: &wgpu::Device, mesh: &ModelMesh) -> ModelGpu {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model VBO"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model IBO"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model UBO"),
            contents: bytemuck::bytes_of(&ModelUniform::new(Mat4::IDENTITY, Mat4::IDENTITY, [1.0; 3])),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model BindGroup"),
            layout: &self.layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        ModelGpu {
            vbo,
            ibo,
            index_count: mesh.indices.len() as u32,
            ubo,
            bind,
        }
    }

    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, model: &'a ModelGpu) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &model.bind, &[]);
        rpass.set_vertex_buffer(0, model.vbo.slice(..));
        rpass.set_index_buffer(model.ibo.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..model.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_matches_wgsl() {
        // mat4x4 + mat4x4 + vec4
        assert_eq!(std::mem::size_of::<ModelUniform>(), 64 + 64 + 16);
        assert_eq!(std::mem::size_of::<ModelVertex>(), 32);
    }
}
