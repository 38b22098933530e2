//! WebGPU render pipeline setup

use thiserror::Error;
use wgpu::util::DeviceExt;

use super::vertex::{Vertex, colors};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Per-axis scale that fits the field into a viewport without stretching
fn letterbox_scale(viewport: (u32, u32)) -> (f32, f32) {
    let (w, h) = viewport;
    let field_aspect = FIELD_WIDTH / FIELD_HEIGHT;
    let aspect = if h == 0 { field_aspect } else { w as f32 / h as f32 };

    if aspect > field_aspect {
        (field_aspect / aspect, 1.0)
    } else {
        (1.0, aspect / field_aspect)
    }
}

/// Map a field position (pixels, y down) to normalized device coordinates.
/// The field keeps its aspect ratio and is letterboxed inside the viewport.
pub fn field_to_ndc(x: f32, y: f32, viewport: (u32, u32)) -> (f32, f32) {
    let (sx, sy) = letterbox_scale(viewport);
    (
        (x / FIELD_WIDTH * 2.0 - 1.0) * sx,
        (1.0 - y / FIELD_HEIGHT * 2.0) * sy,
    )
}

/// Inverse of `field_to_ndc` for a point in viewport pixels (origin top-left).
/// Points in the letterbox bars map outside the field.
pub fn viewport_to_field(px: f32, py: f32, viewport: (u32, u32)) -> (f32, f32) {
    let (w, h) = viewport;
    if w == 0 || h == 0 {
        return (FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
    }
    let (sx, sy) = letterbox_scale(viewport);
    let ndc_x = px / w as f32 * 2.0 - 1.0;
    let ndc_y = 1.0 - py / h as f32 * 2.0;
    (
        (ndc_x / sx + 1.0) / 2.0 * FIELD_WIDTH,
        (1.0 - ndc_y / sy) / 2.0 * FIELD_HEIGHT,
    )
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("dodge-blast-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [1.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        log::info!("Render pipeline ready ({}x{}, {:?})", width, height, surface_format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload field-space vertices and draw them
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        let ndc_vertices: Vec<Vertex> = vertices
            .iter()
            .map(|v| {
                let (x, y) = field_to_ndc(v.position[0], v.position[1], self.size);
                Vertex::new(x, y, v.color)
            })
            .collect();

        // Grow the buffer only when the frame outgrows it
        let bytes: &[u8] = bytemuck::cast_slice(&ndc_vertices);
        if bytes.len() as wgpu::BufferAddress > self.vertex_buffer.size() {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytes,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
        } else if !bytes.is_empty() {
            self.queue.write_buffer(&self.vertex_buffer, 0, bytes);
        }
        self.vertex_count = ndc_vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..self.vertex_count, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_map_to_clip_edges() {
        let viewport = (800, 600);
        assert_eq!(field_to_ndc(0.0, 0.0, viewport), (-1.0, 1.0));
        assert_eq!(field_to_ndc(FIELD_WIDTH, FIELD_HEIGHT, viewport), (1.0, -1.0));
        assert_eq!(
            field_to_ndc(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0, viewport),
            (0.0, 0.0)
        );
    }

    #[test]
    fn test_wide_viewport_letterboxes_horizontally() {
        let (x, y) = field_to_ndc(FIELD_WIDTH, 0.0, (1600, 600));
        assert!(x < 1.0);
        assert_eq!(y, 1.0);
    }

    #[test]
    fn test_tall_viewport_letterboxes_vertically() {
        let (x, y) = field_to_ndc(0.0, 0.0, (800, 1200));
        assert_eq!(x, -1.0);
        assert!(y < 1.0);
    }

    #[test]
    fn test_letterboxed_edge_maps_back_to_field_edge() {
        // On a 1600x600 canvas the field spans canvas x 400..1200
        let viewport = (1600, 600);
        let (x, _) = viewport_to_field(1200.0, 300.0, viewport);
        assert!((x - FIELD_WIDTH).abs() < 1e-3);
        let (x, _) = viewport_to_field(400.0, 300.0, viewport);
        assert!(x.abs() < 1e-3);
        let (x, y) = viewport_to_field(800.0, 300.0, viewport);
        assert!((x - FIELD_WIDTH / 2.0).abs() < 1e-3);
        assert!((y - FIELD_HEIGHT / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_field_to_viewport_round_trip() {
        for viewport in [(800, 600), (1600, 600), (800, 1200), (1024, 700)] {
            let (w, h) = (viewport.0 as f32, viewport.1 as f32);
            for (x, y) in [(0.0, 0.0), (123.0, 456.0), (FIELD_WIDTH, FIELD_HEIGHT)] {
                let (nx, ny) = field_to_ndc(x, y, viewport);
                let px = (nx + 1.0) / 2.0 * w;
                let py = (1.0 - ny) / 2.0 * h;
                let (fx, fy) = viewport_to_field(px, py, viewport);
                assert!((fx - x).abs() < 1e-2, "{viewport:?} x {x} -> {fx}");
                assert!((fy - y).abs() < 1e-2, "{viewport:?} y {y} -> {fy}");
            }
        }
    }

    #[test]
    fn test_zero_height_viewport_is_finite() {
        let (x, y) = field_to_ndc(100.0, 100.0, (800, 0));
        assert!(x.is_finite() && y.is_finite());
    }
}
