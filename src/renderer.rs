// Renderer module for BoxPick-3D

use std::sync::{mpsc, Arc};

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use wgpu::{Buffer, RenderPipeline};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowBuilder},
};

use crate::app::{FrameTarget, Response, Viewport, WindowCallbacks};
use crate::config::WindowConfig;
use crate::error::{RenderError, RenderResult};
use crate::scene::{Canvas, IdColor, Paint, RenderMode};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;
/// Linear 8-bit target so a read texel equals the id color that was drawn.
const PICK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    window: Arc<Window>,
    display_pipeline: RenderPipeline,
    line_pipeline: RenderPipeline,
    pick_pipeline: RenderPipeline,
    uniform_buffer: Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    pick: PickTarget,
    light_position: Vec3,
    frame: FrameBatch,
}

/// Offscreen id-color buffer plus a one-texel staging buffer.
struct PickTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    staging: Buffer,
    size: (u32, u32),
}

/// Geometry and state collected between `begin_frame` and the end of a frame.
struct FrameBatch {
    mode: RenderMode,
    viewport: Viewport,
    clear: IdColor,
    lighting: bool,
    view_proj: Mat4,
    triangles: Vec<Vertex>,
    lines: Vec<Vertex>,
}

impl FrameBatch {
    fn new() -> Self {
        Self {
            mode: RenderMode::Display,
            viewport: Viewport { width: 1, height: 1 },
            clear: IdColor::WHITE,
            lighting: true,
            view_proj: Mat4::IDENTITY,
            triangles: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Lighting is sampled at record time; later `set_lighting` calls do not
    /// affect cubes already in the batch.
    fn push_cube(&mut self, model: Mat4, paint: Paint) {
        let (color, lit) = match paint {
            Paint::Shaded(emission) if self.lighting => (emission, 1.0),
            Paint::Shaded(emission) => (emission, 0.0),
            Paint::Id(id) => (id.to_rgb(), 0.0),
        };
        cube_vertices(model, color, lit, &mut self.triangles);
    }
}

// Define Vertex struct for vertex data
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    color: [f32; 3],
    lit: f32,
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3, 3 => Float32];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

// Uniform buffer structure for the camera and the light
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    light_position: [f32; 4],
}

impl Uniforms {
    fn new(view_proj: Mat4, light_position: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_position: light_position.extend(1.0).to_array(),
        }
    }
}

/// Unit cube faces as (normal, u, v) with `u x v == normal`, so the corners
/// below wind counter-clockwise seen from outside.
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

fn cube_vertices(model: Mat4, color: [f32; 3], lit: f32, out: &mut Vec<Vertex>) {
    let normal_matrix = model.inverse().transpose();
    for (normal, u, v) in CUBE_FACES {
        let center = normal * 0.5;
        let corners = [
            center - u * 0.5 - v * 0.5,
            center + u * 0.5 - v * 0.5,
            center + u * 0.5 + v * 0.5,
            center - u * 0.5 + v * 0.5,
        ];
        let normal = normal_matrix.transform_vector3(normal).normalize_or_zero().to_array();
        for index in [0, 1, 2, 0, 2, 3] {
            out.push(Vertex {
                position: model.transform_point3(corners[index]).to_array(),
                normal,
                color,
                lit,
            });
        }
    }
}

/// Only the left button drives drags; other buttons leave `held` alone.
fn left_button_held(held: bool, button: MouseButton, state: ElementState) -> bool {
    match button {
        MouseButton::Left => state == ElementState::Pressed,
        _ => held,
    }
}

fn to_wgpu_color(color: IdColor) -> wgpu::Color {
    let [r, g, b] = color.to_rgb();
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: 1.0,
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32, label: &str) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
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

impl PickTarget {
    fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Pick Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: PICK_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = create_depth_view(device, width, height, "Pick Depth Texture");

        // One texel, padded to the row alignment copies require
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pick Staging Buffer"),
            size: u64::from(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Self {
            texture,
            view,
            depth_view,
            staging,
            size: (width, height),
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    fragment_entry: &str,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
) -> RenderPipeline {
    let cull_mode = match topology {
        wgpu::PrimitiveTopology::TriangleList => Some(wgpu::Face::Back),
        _ => None,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[Vertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: fragment_entry,
            targets: &[Some(wgpu::ColorTargetState {
                format,
                // Blending would corrupt id colors
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

impl Renderer {
    pub async fn new(
        event_loop: &EventLoop<()>,
        config: &WindowConfig,
        light_position: Vec3,
    ) -> RenderResult<Self> {
        // Create window with Arc for shared ownership
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(config.title.as_str())
                .with_inner_size(PhysicalSize::new(config.width, config.height))
                .with_position(PhysicalPosition::new(config.x, config.y))
                .build(event_loop)?,
        );

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::AdapterCreationFailed)?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Renderer Device"),
                    required_features: wgpu::Features::default(),
                    required_limits: wgpu::Limits::default(),
                },
                None, // Trace path
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(RenderError::SurfaceConfigurationFailed)?;
        let present_mode = surface_caps
            .present_modes
            .first()
            .copied()
            .unwrap_or(wgpu::PresentMode::Fifo);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        log::info!("surface {width}x{height} {surface_format:?}");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let display_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            "Display Pipeline",
            "fs_main",
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
        );
        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            "Line Pipeline",
            "fs_main",
            surface_format,
            wgpu::PrimitiveTopology::LineList,
        );
        let pick_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            "Pick Pipeline",
            "fs_pick",
            PICK_FORMAT,
            wgpu::PrimitiveTopology::TriangleList,
        );

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[Uniforms::new(Mat4::IDENTITY, light_position)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let depth_view = create_depth_view(&device, width, height, "Depth Texture");
        let pick = PickTarget::new(&device, width, height);

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            window,
            display_pipeline,
            line_pipeline,
            pick_pipeline,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            pick,
            light_position,
            frame: FrameBatch::new(),
        })
    }

    /// Runs the event loop, forwarding window events to `handler` until it
    /// asks to exit or the window is closed.
    pub fn run<H: WindowCallbacks>(mut self, event_loop: EventLoop<()>, mut handler: H) -> RenderResult<()> {
        let mut cursor = (0, 0);
        let mut left_held = false;

        event_loop.run(move |event, target| {
            target.set_control_flow(ControlFlow::Wait);

            let Event::WindowEvent { window_id, event } = event else {
                return;
            };
            if window_id != self.window.id() {
                return;
            }

            let response = match event {
                WindowEvent::CloseRequested => Response::Exit,
                WindowEvent::Resized(physical_size) => {
                    self.resize(physical_size);
                    handler.on_resize(physical_size.width, physical_size.height)
                }
                WindowEvent::RedrawRequested => match handler.on_display(&mut self) {
                    Ok(()) => Response::Ignored,
                    Err(RenderError::SurfaceLost) => {
                        log::warn!("surface lost, reconfiguring");
                        self.resize(self.window.inner_size());
                        Response::Redraw
                    }
                    Err(err) => {
                        log::error!("frame failed: {err}");
                        Response::Exit
                    }
                },
                WindowEvent::KeyboardInput { event, .. } => {
                    Self::handle_keyboard_input(event, cursor, &mut handler)
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = (position.x as i32, position.y as i32);
                    if left_held {
                        handler.on_mouse_drag(cursor.0, cursor.1)
                    } else {
                        Response::Ignored
                    }
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    left_held = left_button_held(left_held, button, state);
                    handler.on_mouse_button(button, state, cursor.0, cursor.1)
                }
                _ => Response::Ignored,
            };

            match response {
                Response::Redraw => self.window.request_redraw(),
                Response::Exit => target.exit(),
                Response::Ignored => {}
            }
        })?;
        Ok(())
    }

    fn handle_keyboard_input<H: WindowCallbacks>(
        event: KeyEvent,
        cursor: (i32, i32),
        handler: &mut H,
    ) -> Response {
        if event.state != ElementState::Pressed || event.repeat {
            return Response::Ignored;
        }
        match event.physical_key {
            PhysicalKey::Code(keycode) => handler.on_key(keycode, cursor.0, cursor.1),
            PhysicalKey::Unidentified(_) => Response::Ignored,
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.device, &self.surface_config);

        self.depth_view = create_depth_view(&self.device, new_size.width, new_size.height, "Depth Texture");
        self.pick = PickTarget::new(&self.device, new_size.width, new_size.height);
        log::debug!("resized to {}x{}", new_size.width, new_size.height);
    }

    fn upload_uniforms(&self) {
        let uniforms = Uniforms::new(self.frame.view_proj, self.light_position);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    fn vertex_buffer(&self, label: &str, vertices: &[Vertex]) -> Option<Buffer> {
        if vertices.is_empty() {
            return None;
        }
        Some(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }))
    }

    /// Viewport clipped to the attachment size.
    fn set_viewport(&self, render_pass: &mut wgpu::RenderPass<'_>, (width, height): (u32, u32)) {
        let w = self.frame.viewport.width.min(width);
        let h = self.frame.viewport.height.min(height);
        if w > 0 && h > 0 {
            render_pass.set_viewport(0.0, 0.0, w as f32, h as f32, 0.0, 1.0);
        }
    }

    /// Draws the batched triangles into the pick texture.
    fn render_pick_pass(&self) {
        self.upload_uniforms();
        let triangles = self.vertex_buffer("Pick Vertex Buffer", &self.frame.triangles);

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Pick Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Pick Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.pick.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(to_wgpu_color(self.frame.clear)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.pick.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.set_viewport(&mut render_pass, self.pick.size);
            if let Some(buffer) = &triangles {
                render_pass.set_pipeline(&self.pick_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..self.frame.triangles.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Copies one texel of the pick texture back to the CPU, blocking until
    /// the staging buffer is mapped.
    fn read_pick_texel(&self, x: u32, y: u32) -> RenderResult<IdColor> {
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Pick Readback Encoder"),
        });

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.pick.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &self.pick.staging,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = self.pick.staging.slice(..4);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::Maintain::Wait);
        rx.recv().map_err(|_| RenderError::Timeout)??;

        let texel = {
            let data = slice.get_mapped_range();
            IdColor::new(data[0], data[1], data[2])
        };
        self.pick.staging.unmap();
        Ok(texel)
    }
}

impl Canvas for Renderer {
    fn draw_cube(&mut self, model: Mat4, paint: Paint) {
        self.frame.push_cube(model, paint);
    }

    fn draw_line(&mut self, from: Vec3, to: Vec3, color: [f32; 3]) {
        for point in [from, to] {
            self.frame.lines.push(Vertex {
                position: point.to_array(),
                normal: [0.0; 3],
                color,
                lit: 0.0,
            });
        }
    }
}

impl FrameTarget for Renderer {
    fn begin_frame(&mut self, mode: RenderMode, viewport: Viewport, clear: IdColor) {
        self.frame.mode = mode;
        self.frame.viewport = viewport;
        self.frame.clear = clear;
        self.frame.lighting = true;
        self.frame.triangles.clear();
        self.frame.lines.clear();
    }

    fn set_lighting(&mut self, enabled: bool) {
        self.frame.lighting = enabled;
    }

    fn apply_camera(&mut self, projection: Mat4, view: Mat4) {
        self.frame.view_proj = projection * view;
    }

    fn read_pixel(&mut self, x: i32, y: i32) -> RenderResult<Option<IdColor>> {
        // Rendered here rather than in begin_frame: the batch is only
        // complete once the scene has drawn into it.
        self.render_pick_pass();

        let (width, height) = self.pick.size;
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return Ok(None);
        };
        if x >= width || y >= height {
            return Ok(None);
        }
        self.read_pick_texel(x, y).map(Some)
    }

    fn present(&mut self) -> RenderResult<()> {
        debug_assert_eq!(self.frame.mode, RenderMode::Display);
        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.upload_uniforms();
        let triangles = self.vertex_buffer("Vertex Buffer", &self.frame.triangles);
        let lines = self.vertex_buffer("Line Vertex Buffer", &self.frame.lines);

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(to_wgpu_color(self.frame.clear)),
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
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.set_viewport(
                &mut render_pass,
                (self.surface_config.width, self.surface_config.height),
            );
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            if let Some(buffer) = &triangles {
                render_pass.set_pipeline(&self.display_pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..self.frame.triangles.len() as u32, 0..1);
            }
            if let Some(buffer) = &lines {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..self.frame.lines.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn request_redraw(&mut self) {
        self.window.request_redraw();
    }
}
