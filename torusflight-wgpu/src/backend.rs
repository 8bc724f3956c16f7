use glam::Mat4;
use thiserror::Error;
use wgpu::util::DeviceExt;

use torusflight_shared::frame::{DrawTarget, FrameView};
use torusflight_shared::geometry::{LineMesh, LineVertex, Mesh, Vertex};
use torusflight_shared::math::{frustum_planes, sphere_in_frustum};
use torusflight_shared::scene::SceneDescription;
use torusflight_shared::shaders::{LINES_WGSL, SCENE_WGSL};
use torusflight_shared::uniforms::{FrameUniforms, InstanceRaw};

use crate::handle::{Handle, HandleStore};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const VERTEX_ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3, // normal
];

const INSTANCE_ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    2 => Float32x4, // model column 0
    3 => Float32x4, // model column 1
    4 => Float32x4, // model column 2
    5 => Float32x4, // model column 3
    6 => Float32x4, // color
];

const LINE_ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3, // color
];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    SurfaceCreation(String),
    #[error("Failed to find a suitable GPU adapter")]
    AdapterNotFound,
    #[error("Failed to create device: {0}")]
    DeviceCreation(String),
    #[error("Out of GPU memory while acquiring the surface texture")]
    OutOfMemory,
}

/// GPU mesh. Line meshes have no index buffer and draw `count` vertices.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    pub count: u32,
}

/// Meshes and buffers belonging to the uploaded scene.
struct SceneResources {
    torus: Handle<GpuMesh>,
    star: Handle<GpuMesh>,
    grid: Handle<GpuMesh>,
    light_marker: Handle<GpuMesh>,
    star_instances: wgpu::Buffer,
    star_capacity: u32,
    star_radius: f32,
}

/// Forward renderer for the torus scene: one lit instanced pipeline for the
/// torus and stars, one line pipeline for the grid and the light marker.
pub struct Renderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub width: u32,
    pub height: u32,
    /// Format the frame is rendered in; the sRGB view of the surface format
    /// when one exists.
    pub view_format: wgpu::TextureFormat,

    depth_view: wgpu::TextureView,

    lit_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    torus_instance: wgpu::Buffer,

    meshes: HandleStore<GpuMesh>,
    scene: Option<SceneResources>,
}

impl Renderer {
    /// Create a renderer drawing into `target` at `width` x `height` physical
    /// pixels.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let width = width.max(1);
        let height = height.max(1);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(target)
            .map_err(|e| RenderError::SurfaceCreation(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::AdapterNotFound)?;

        // WebGL2 cannot meet the default limits.
        let base_limits = if cfg!(target_arch = "wasm32") {
            wgpu::Limits::downlevel_webgl2_defaults()
        } else {
            wgpu::Limits::default()
        };
        let required_limits = base_limits.using_resolution(adapter.limits());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("torusflight Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits,
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::DeviceCreation(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let formats = choose_formats(&surface_caps.formats).ok_or_else(|| {
            RenderError::SurfaceCreation("surface reports no texture formats".to_string())
        })?;
        if !formats.view.is_srgb() {
            log::warn!(
                "No sRGB view of {:?} available; colours will render dark",
                formats.surface
            );
        }
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: formats.surface,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: formats.extra_view_formats(),
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(&device, width, height);

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Frame Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&frame_bind_group_layout],
            push_constant_ranges: &[],
        });

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let lines_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Lines Shader"),
            source: wgpu::ShaderSource::Wgsl(LINES_WGSL.into()),
        });

        let lit_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &scene_shader,
            "Lit Pipeline",
            &[vertex_layout(), instance_layout()],
            wgpu::PrimitiveTopology::TriangleList,
            formats.view,
        );
        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &lines_shader,
            "Line Pipeline",
            &[line_layout()],
            wgpu::PrimitiveTopology::LineList,
            formats.view,
        );

        let torus_instance = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Torus Instance"),
            size: std::mem::size_of::<InstanceRaw>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::info!(
            "wgpu renderer initialized: {} ({}), {}x{} {:?}",
            adapter.get_info().name,
            adapter.get_info().backend.to_str(),
            width,
            height,
            formats.view,
        );

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            width,
            height,
            view_format: formats.view,
            depth_view,
            lit_pipeline,
            line_pipeline,
            frame_buffer,
            frame_bind_group,
            torus_instance,
            meshes: HandleStore::new(),
            scene: None,
        })
    }

    /// Resize the surface and the depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
            self.surface_config.width = width;
            self.surface_config.height = height;
            self.surface.configure(&self.device, &self.surface_config);

            self.depth_view = create_depth_view(&self.device, width, height);
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Upload the static scene meshes, replacing any previous upload.
    pub fn upload_scene(&mut self, scene: &SceneDescription) {
        if let Some(old) = self.scene.take() {
            for handle in [old.torus, old.star, old.grid, old.light_marker] {
                self.meshes.remove(handle);
            }
        }

        let torus = self.upload_mesh("Torus", &scene.torus);
        let star = self.upload_mesh("Star", &scene.star_mesh);
        let grid = self.upload_lines("Grid", &scene.grid);
        let light_marker = self.upload_lines("Light Marker", &scene.light_marker);

        let star_capacity = scene.stars.len().max(1) as u32;
        let star_instances = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Star Instances"),
            size: star_capacity as u64 * std::mem::size_of::<InstanceRaw>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.scene = Some(SceneResources {
            torus,
            star,
            grid,
            light_marker,
            star_instances,
            star_capacity,
            star_radius: scene.star_mesh.bounding_radius(),
        });

        log::info!(
            "Uploaded scene: {} meshes, {} stars",
            self.meshes.len(),
            scene.stars.len(),
        );
    }

    fn upload_mesh(&mut self, label: &str, mesh: &Mesh) -> Handle<GpuMesh> {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertices")),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Indices")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        self.meshes.insert(GpuMesh {
            vertex_buffer,
            index_buffer: Some(index_buffer),
            count: mesh.indices.len() as u32,
        })
    }

    fn upload_lines(&mut self, label: &str, lines: &LineMesh) -> Handle<GpuMesh> {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertices")),
                contents: bytemuck::cast_slice(&lines.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        self.meshes.insert(GpuMesh {
            vertex_buffer,
            index_buffer: None,
            count: lines.vertices.len() as u32,
        })
    }

    /// Draw one frame. Uploads the scene on first use.
    pub fn render(&mut self, frame: &FrameView<'_>) -> Result<(), RenderError> {
        if self.scene.is_none() {
            self.upload_scene(frame.scene);
        }

        let view_proj = frame.view_proj(self.aspect_ratio());
        let uniforms = FrameUniforms::new(
            view_proj,
            &frame.scene.point_light,
            &frame.scene.ambient_light,
        );
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&uniforms));

        let torus = InstanceRaw::new(frame.torus_model(), frame.scene.torus_color);
        self.queue
            .write_buffer(&self.torus_instance, 0, bytemuck::bytes_of(&torus));

        let Some(resources) = self.scene.as_ref() else {
            return Ok(());
        };

        let planes = frustum_planes(&view_proj);
        let stars: Vec<InstanceRaw> = frame
            .scene
            .stars
            .iter()
            .filter(|&&p| sphere_in_frustum(&planes, p, resources.star_radius))
            .take(resources.star_capacity as usize)
            .map(|&p| InstanceRaw::new(Mat4::from_translation(p), frame.scene.star_color))
            .collect();
        if !stars.is_empty() {
            self.queue
                .write_buffer(&resources.star_instances, 0, bytemuck::cast_slice(&stars));
        }
        let visible_stars = stars.len() as u32;

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => {
                log::warn!("Skipping frame {}: {e}", frame.frame_index);
                return Ok(());
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.view_format),
            ..Default::default()
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            pass.set_pipeline(&self.lit_pipeline);
            if let Some(mesh) = self.meshes.get(resources.torus) {
                draw_mesh(&mut pass, mesh, Some((&self.torus_instance, 1)));
            }
            if visible_stars > 0 {
                if let Some(mesh) = self.meshes.get(resources.star) {
                    draw_mesh(&mut pass, mesh, Some((&resources.star_instances, visible_stars)));
                }
            }

            pass.set_pipeline(&self.line_pipeline);
            for handle in [resources.grid, resources.light_marker] {
                if let Some(mesh) = self.meshes.get(handle) {
                    draw_mesh(&mut pass, mesh, None);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl DrawTarget for Renderer {
    type Error = RenderError;

    fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), RenderError> {
        self.render(frame)
    }
}

/// Surface format plus the format the frame is rendered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SurfaceFormats {
    surface: wgpu::TextureFormat,
    view: wgpu::TextureFormat,
}

impl SurfaceFormats {
    fn extra_view_formats(&self) -> Vec<wgpu::TextureFormat> {
        if self.view == self.surface {
            vec![]
        } else {
            vec![self.view]
        }
    }
}

/// Shaders write linear colour, so the frame needs an sRGB view. Prefer a
/// native sRGB format, then one with an sRGB view (WebGPU canvases only
/// offer `*Unorm`), then whatever comes first.
fn choose_formats(available: &[wgpu::TextureFormat]) -> Option<SurfaceFormats> {
    if let Some(&format) = available.iter().find(|f| f.is_srgb()) {
        return Some(SurfaceFormats {
            surface: format,
            view: format,
        });
    }
    if let Some(&format) = available.iter().find(|f| f.add_srgb_suffix().is_srgb()) {
        return Some(SurfaceFormats {
            surface: format,
            view: format.add_srgb_suffix(),
        });
    }
    available.first().map(|&format| SurfaceFormats {
        surface: format,
        view: format,
    })
}

fn draw_mesh(
    pass: &mut wgpu::RenderPass<'_>,
    mesh: &GpuMesh,
    instances: Option<(&wgpu::Buffer, u32)>,
) {
    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
    let instance_count = match instances {
        Some((buffer, count)) => {
            pass.set_vertex_buffer(1, buffer.slice(..));
            count
        }
        None => 1,
    };

    match &mesh.index_buffer {
        Some(index_buffer) => {
            pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.count, 0, 0..instance_count);
        }
        None => pass.draw(0..mesh.count, 0..instance_count),
    }
}

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBS,
    }
}

fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRIBS,
    }
}

fn line_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &LINE_ATTRIBS,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    topology: wgpu::PrimitiveTopology,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let cull_mode = match topology {
        wgpu::PrimitiveTopology::TriangleList => Some(wgpu::Face::Back),
        _ => None,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layouts_match_shared_types() {
        assert_eq!(vertex_layout().array_stride, 24);
        assert_eq!(instance_layout().array_stride, 80);
        assert_eq!(line_layout().array_stride, 24);
        assert_eq!(instance_layout().step_mode, wgpu::VertexStepMode::Instance);
    }

    #[test]
    fn test_instance_attributes_follow_vertex_attributes() {
        let locations: Vec<u32> = VERTEX_ATTRIBS
            .iter()
            .chain(INSTANCE_ATTRIBS.iter())
            .map(|a| a.shader_location)
            .collect();
        assert_eq!(locations, [0, 1, 2, 3, 4, 5, 6]);
        // Instance offsets walk the 80-byte InstanceRaw in 16-byte steps.
        let offsets: Vec<u64> = INSTANCE_ATTRIBS.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, [0, 16, 32, 48, 64]);
    }

    #[test]
    fn test_native_srgb_format_is_used_directly() {
        use wgpu::TextureFormat::*;
        let formats = choose_formats(&[Bgra8Unorm, Bgra8UnormSrgb]).unwrap();
        assert_eq!(formats.surface, Bgra8UnormSrgb);
        assert_eq!(formats.view, Bgra8UnormSrgb);
        assert!(formats.extra_view_formats().is_empty());
    }

    #[test]
    fn test_canvas_formats_render_through_srgb_view() {
        use wgpu::TextureFormat::*;
        let formats = choose_formats(&[Rgba16Float, Bgra8Unorm, Rgba8Unorm]).unwrap();
        assert_eq!(formats.surface, Bgra8Unorm);
        assert_eq!(formats.view, Bgra8UnormSrgb);
        assert_eq!(formats.extra_view_formats(), [Bgra8UnormSrgb]);
    }

    #[test]
    fn test_format_without_srgb_variant_falls_back() {
        use wgpu::TextureFormat::*;
        let formats = choose_formats(&[Rgba16Float]).unwrap();
        assert_eq!(formats.view, Rgba16Float);
        assert!(choose_formats(&[]).is_none());
    }
}
