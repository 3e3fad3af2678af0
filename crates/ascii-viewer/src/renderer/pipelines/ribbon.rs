use glam::Vec2;
use glyphtrail::{ribbon::RibbonUniform, RibbonMesh, RibbonVertex};
use wgpu::util::DeviceExt;

/// GPU side of one trail ribbon. Buffer sizes are fixed at creation; each
/// frame only rewrites the vertex data.
pub struct RibbonGpu {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
    ubo: wgpu::Buffer,
    bind: wgpu::BindGroup,
    uniform: RibbonUniform,
}

impl RibbonGpu {
    /// Pushes the current strip vertices. The strip must be the one this
    /// ribbon was created from.
    pub fn upload(&self, queue: &wgpu::Queue, mesh: &RibbonMesh) {
        queue.write_buffer(&self.vbo, 0, bytemuck::cast_slice(mesh.vertices()));
    }

    /// Refreshes the cached resolution used for the pixel thickness.
    pub fn resize(&mut self, queue: &wgpu::Queue, resolution: Vec2, dpr: f32) {
        self.uniform.resolution = resolution.to_array();
        self.uniform.dpr = dpr;
        queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(&self.uniform));
    }
}

pub struct RibbonPipeline {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
}

impl RibbonPipeline {
    pub fn new(
        device: &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        depth_fmt: wgpu::TextureFormat,
    ) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Ribbon UBO Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<RibbonUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shaders/ribbon.wgsl"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/ribbon.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Ribbon PipelineLayout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RibbonVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![
                0 => Float32x3, // position
                1 => Float32x3, // prev
                2 => Float32x3, // next
                3 => Float32x2, // uv
                4 => Float32,   // side
            ],
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Ribbon Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[vertex_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // Ribbons overlay the scene; they neither test nor write depth.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_fmt,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
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

    /// Allocates buffers for `mesh` with its fixed topology.
    pub fn create_ribbon(
        &self,
        device: &wgpu::Device,
        mesh: &RibbonMesh,
        thickness: f32,
        tint: [f32; 3],
        resolution: Vec2,
        dpr: f32,
    ) -> RibbonGpu {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ribbon VBO"),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        // A one-point trail has no triangles; keep a non-empty index buffer anyway.
        let indices: &[u32] = if mesh.indices().is_empty() { &[0, 0, 0] } else { mesh.indices() };
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ribbon IBO"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform = RibbonUniform {
            resolution: resolution.to_array(),
            dpr,
            thickness,
            tint: [tint[0], tint[1], tint[2], 1.0],
        };
        let ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ribbon UBO"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Ribbon BindGroup"),
            layout: &self.layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        RibbonGpu {
            vbo,
            ibo,
            index_count: mesh.indices().len() as u32,
            ubo,
            bind,
            uniform,
        }
    }

    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, ribbon: &'a RibbonGpu) {
        if ribbon.index_count == 0 {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &ribbon.bind, &[]);
        rpass.set_vertex_buffer(0, ribbon.vbo.slice(..));
        rpass.set_index_buffer(ribbon.ibo.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..ribbon.index_count, 0, 0..1);
    }
}
