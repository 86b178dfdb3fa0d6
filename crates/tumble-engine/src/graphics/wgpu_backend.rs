//! [`GraphicsContext`] on top of wgpu.
//!
//! The immediate-mode calls only mutate CPU-side state. Each `draw_triangles`
//! snapshots that state into a recorded draw (pipeline, bind group, vertex
//! buffer); [`WgpuGraphics::present`] replays the recorded draws in one render
//! pass against the swapchain image and a depth attachment.
//!
//! The n-th draw of a frame reuses the n-th uniform slot, so a steady frame
//! allocates nothing and only rewrites its uniform buffer.
//!
//! Pipelines are cached per (program, vertex layout, depth function).

use std::collections::{BTreeMap, HashMap};

use wgpu::util::DeviceExt;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::resources::DecodedImage;
use crate::shader::reflect::{ProgramReflection, reflect_program};

use super::{
    AttribLocation, BufferHandle, DepthFunc, GraphicsContext, ProgramHandle, TextureHandle,
    UniformLocation,
};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const DEFAULT_CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

// ── cpu-side state ────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct AttribPointer {
    components: u32,
    stride: u32,
    offset: u32,
}

#[derive(Debug, Copy, Clone, Default)]
struct AttribState {
    enabled: bool,
    pointer: Option<AttribPointer>,
}

/// One vertex attribute as the pipeline sees it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct VertexAttrib {
    location: u32,
    components: u32,
    offset: u32,
}

/// Vertex buffer layout derived from the enabled attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct VertexPlan {
    stride: u32,
    attributes: Vec<VertexAttrib>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    program: u32,
    vertex: VertexPlan,
    depth: Option<DepthFunc>,
}

/// Bindings that persist across calls, like GL's context state.
#[derive(Debug, Default)]
struct BoundState {
    program: Option<u32>,
    vertex_buffer: Option<u32>,
    texture: Option<u32>,
    depth: Option<DepthFunc>,
    attribs: BTreeMap<u32, AttribState>,
}

impl BoundState {
    /// Validates the enabled attributes against the program's inputs and the
    /// buffer size, returning the layout to draw with.
    fn plan_vertices(
        &self,
        reflection: &ProgramReflection,
        buffer_size: u64,
        first: u32,
        count: u32,
    ) -> Result<VertexPlan, String> {
        let mut stride = None;
        let mut attributes = Vec::new();

        for (&location, state) in self.attribs.iter().filter(|(_, s)| s.enabled) {
            let p = state
                .pointer
                .ok_or_else(|| format!("attribute {location} is enabled without a pointer"))?;
            if !(1..=4).contains(&p.components) {
                return Err(format!(
                    "attribute {location} has {} components; 1 to 4 are supported",
                    p.components
                ));
            }
            match stride {
                None => stride = Some(p.stride),
                Some(s) if s != p.stride => {
                    return Err(format!(
                        "attribute {location} uses stride {} but another enabled attribute uses {s}",
                        p.stride
                    ));
                }
                Some(_) => {}
            }
            attributes.push(VertexAttrib {
                location,
                components: p.components,
                offset: p.offset,
            });
        }

        let Some(stride) = stride else {
            return Err("no vertex attribute is enabled".into());
        };

        for (name, location) in &reflection.attributes {
            if !attributes.iter().any(|a| a.location == *location) {
                return Err(format!(
                    "vertex input `{name}` (location {location}) is not enabled"
                ));
            }
        }

        if count > 0 {
            let last = u64::from(first) + u64::from(count) - 1;
            for a in &attributes {
                let end = last * u64::from(stride) + u64::from(a.offset) + u64::from(a.components) * 4;
                if end > buffer_size {
                    return Err(format!(
                        "drawing {count} vertices from {first} reads {end} bytes but the buffer holds {buffer_size}"
                    ));
                }
            }
        }

        Ok(VertexPlan { stride, attributes })
    }
}

/// Writes `bytes` into the uniform member that starts at `offset`.
///
/// The write must cover exactly that member, so a value can never spill into
/// its neighbours.
fn write_uniform(
    reflection: &ProgramReflection,
    data: &mut [u8],
    offset: u32,
    bytes: &[u8],
) -> Result<(), String> {
    let field = reflection
        .uniforms
        .values()
        .find(|f| f.offset == offset)
        .ok_or_else(|| format!("no uniform member starts at offset {offset}"))?;
    if bytes.len() != field.size as usize {
        return Err(format!(
            "{}-byte write to the {}-byte uniform at offset {offset}",
            bytes.len(),
            field.size
        ));
    }
    let start = offset as usize;
    let data_len = data.len();
    let dst = data
        .get_mut(start..start + bytes.len())
        .ok_or_else(|| format!("uniform at offset {offset} lies outside the {}-byte block", data_len))?;
    dst.copy_from_slice(bytes);
    Ok(())
}

fn vertex_format(components: u32) -> wgpu::VertexFormat {
    match components {
        1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        3 => wgpu::VertexFormat::Float32x3,
        _ => wgpu::VertexFormat::Float32x4,
    }
}

fn compare_function(func: DepthFunc) -> wgpu::CompareFunction {
    match func {
        DepthFunc::Less => wgpu::CompareFunction::Less,
    }
}

/// A slot is reused while it samples the same texture and its buffer holds
/// the program's uniform block.
fn slot_fits(slot_texture: Option<u32>, slot_len: u64, texture: Option<u32>, len: u64) -> bool {
    slot_texture == texture && slot_len >= len
}

/// Uniform buffers are bound whole; keep them a multiple of 16 bytes.
fn uniform_buffer_len(block_size: u32) -> usize {
    (block_size.max(16) as usize).next_multiple_of(16)
}

// ── gpu objects ───────────────────────────────────────────────────────────

struct Program {
    reflection: ProgramReflection,
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    /// Current uniform block contents, copied into a uniform slot per draw.
    uniforms: Vec<u8>,
}

struct Texture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Uniform buffer plus the bind group that exposes it with one texture.
struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    texture: Option<u32>,
}

impl UniformSlot {
    fn fits(&self, texture: Option<u32>, len: u64) -> bool {
        slot_fits(self.texture, self.buffer.size(), texture, len)
    }
}

struct RecordedDraw {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    first: u32,
    count: u32,
}

struct DepthTarget {
    size: (u32, u32),
    view: wgpu::TextureView,
}

/// wgpu implementation of [`GraphicsContext`].
///
/// Programs use one fixed bind group: `@binding(0)` uniform block,
/// `@binding(1)` texture unit 0, `@binding(2)` sampler. Draws without a bound
/// texture sample a 1x1 white texture.
pub struct WgpuGraphics {
    device: wgpu::Device,
    queue: wgpu::Queue,
    color_format: wgpu::TextureFormat,

    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    sampler: wgpu::Sampler,
    white: Texture,

    programs: HashMap<u32, Program>,
    buffers: HashMap<u32, wgpu::Buffer>,
    textures: HashMap<u32, Texture>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    next_id: u32,

    bound: BoundState,
    clear_color: Option<[f32; 4]>,
    draws: Vec<RecordedDraw>,
    uniform_slots: Vec<UniformSlot>,
    depth: Option<DepthTarget>,
}

impl WgpuGraphics {
    pub fn new(gpu: &Gpu<'_>) -> Self {
        let device = gpu.device().clone();
        let queue = gpu.queue().clone();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tumble program bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tumble program pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tumble sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let white = upload_rgba8(&device, &queue, "tumble white texture", 1, 1, &[255; 4]);

        Self {
            device,
            queue,
            color_format: gpu.surface_format(),
            bind_group_layout,
            pipeline_layout,
            sampler,
            white,
            programs: HashMap::new(),
            buffers: HashMap::new(),
            textures: HashMap::new(),
            pipelines: HashMap::new(),
            next_id: 1,
            bound: BoundState::default(),
            clear_color: None,
            draws: Vec::new(),
            uniform_slots: Vec::new(),
            depth: None,
        }
    }

    /// Replays the draws recorded since the last present into the next
    /// swapchain image and presents it.
    ///
    /// The recording is discarded whether or not presentation succeeds.
    pub fn present(&mut self, gpu: &mut Gpu<'_>) -> Result<(), SurfaceErrorAction> {
        let draws = std::mem::take(&mut self.draws);
        let clear = self.clear_color.take().unwrap_or(DEFAULT_CLEAR);

        let size = gpu.size();
        if size.width == 0 || size.height == 0 {
            return Err(SurfaceErrorAction::SkipFrame);
        }

        let mut frame = match gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => return Err(gpu.handle_surface_error(err)),
        };

        let depth_view = self.depth_view(size.width, size.height);

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tumble frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(clear[0]),
                            g: f64::from(clear[1]),
                            b: f64::from(clear[2]),
                            a: f64::from(clear[3]),
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for draw in &draws {
                rpass.set_pipeline(&draw.pipeline);
                rpass.set_bind_group(0, &draw.bind_group, &[]);
                rpass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
                rpass.draw(draw.first..draw.first + draw.count, 0..1);
            }
        }

        gpu.submit(frame);
        Ok(())
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn depth_view(&mut self, width: u32, height: u32) -> wgpu::TextureView {
        if let Some(d) = self.depth.as_ref().filter(|d| d.size == (width, height)) {
            return d.view.clone();
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tumble depth"),
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
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("depth target {width}x{height}");
        self.depth = Some(DepthTarget {
            size: (width, height),
            view: view.clone(),
        });
        view
    }

    fn pipeline(&mut self, key: PipelineKey) -> Result<wgpu::RenderPipeline, String> {
        if let Some(p) = self.pipelines.get(&key) {
            return Ok(p.clone());
        }

        let program = self
            .programs
            .get(&key.program)
            .ok_or_else(|| format!("program #{} does not exist", key.program))?;

        let attributes: Vec<wgpu::VertexAttribute> = key
            .vertex
            .attributes
            .iter()
            .map(|a| wgpu::VertexAttribute {
                format: vertex_format(a.components),
                offset: u64::from(a.offset),
                shader_location: a.location,
            })
            .collect();

        let depth_stencil = match key.depth {
            Some(func) => wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: compare_function(func),
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            },
            None => wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            },
        };

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("tumble program pipeline"),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &program.vertex,
                    entry_point: Some(program.reflection.vertex_entry.as_str()),
                    compilation_options: Default::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: u64::from(key.vertex.stride),
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &attributes,
                    }],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &program.fragment,
                    entry_point: Some(program.reflection.fragment_entry.as_str()),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.color_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
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
                depth_stencil: Some(depth_stencil),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        log::debug!(
            "built pipeline for program #{} (stride {}, {} attributes, depth {:?})",
            key.program,
            key.vertex.stride,
            key.vertex.attributes.len(),
            key.depth
        );
        self.pipelines.insert(key, pipeline.clone());
        Ok(pipeline)
    }

    fn write_current_uniform(&mut self, location: UniformLocation, bytes: &[u8]) {
        let Some(program) = self.bound.program.and_then(|id| self.programs.get_mut(&id)) else {
            log::warn!("uniform write at {} with no program in use", location.0);
            return;
        };
        if let Err(e) = write_uniform(&program.reflection, &mut program.uniforms, location.0, bytes) {
            log::warn!("uniform write ignored: {e}");
        }
    }
}

fn uniform_slot(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    texture_view: &wgpu::TextureView,
    texture: Option<u32>,
    len: u64,
) -> UniformSlot {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("tumble uniforms"),
        size: len,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("tumble draw bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(texture_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    log::debug!("uniform slot of {len} bytes (texture {texture:?})");
    UniformSlot {
        buffer,
        bind_group,
        texture,
    }
}

fn upload_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Texture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    Texture {
        _texture: texture,
        view,
    }
}

impl GraphicsContext for WgpuGraphics {
    fn create_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle, String> {
        let reflection = reflect_program(vertex_source, fragment_source)?;

        let vertex = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tumble vertex shader"),
            source: wgpu::ShaderSource::Wgsl(vertex_source.to_owned().into()),
        });
        let fragment = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tumble fragment shader"),
            source: wgpu::ShaderSource::Wgsl(fragment_source.to_owned().into()),
        });

        let uniforms = vec![0; uniform_buffer_len(reflection.uniform_block_size)];
        let id = self.allocate_id();
        self.programs.insert(
            id,
            Program {
                reflection,
                vertex,
                fragment,
                uniforms,
            },
        );
        Ok(ProgramHandle::from_raw(id))
    }

    fn create_buffer(&mut self, data: &[u8]) -> Result<BufferHandle, String> {
        let max = self.device.limits().max_buffer_size;
        if data.len() as u64 > max {
            return Err(format!("{} bytes exceeds the {max}-byte buffer limit", data.len()));
        }
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tumble vertex buffer"),
                contents: data,
                usage: wgpu::BufferUsages::VERTEX,
            });
        let id = self.allocate_id();
        self.buffers.insert(id, buffer);
        Ok(BufferHandle::from_raw(id))
    }

    fn create_texture_2d(&mut self, image: &DecodedImage) -> Result<TextureHandle, String> {
        image.validate()?;
        let max = self.device.limits().max_texture_dimension_2d;
        if image.width > max || image.height > max {
            return Err(format!(
                "{}x{} exceeds the maximum texture size {max}",
                image.width, image.height
            ));
        }
        let texture = upload_rgba8(
            &self.device,
            &self.queue,
            "tumble texture",
            image.width,
            image.height,
            &image.pixels,
        );
        let id = self.allocate_id();
        self.textures.insert(id, texture);
        Ok(TextureHandle::from_raw(id))
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        let id = program.raw();
        if self.programs.remove(&id).is_none() {
            log::warn!("delete of unknown program #{id}");
        }
        self.pipelines.retain(|k, _| k.program != id);
        if self.bound.program == Some(id) {
            self.bound.program = None;
        }
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        let id = buffer.raw();
        match self.buffers.remove(&id) {
            Some(b) => b.destroy(),
            None => log::warn!("delete of unknown buffer #{id}"),
        }
        if self.bound.vertex_buffer == Some(id) {
            self.bound.vertex_buffer = None;
        }
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        let id = texture.raw();
        if self.textures.remove(&id).is_none() {
            log::warn!("delete of unknown texture #{id}");
        }
        self.uniform_slots.retain(|slot| slot.texture != Some(id));
        if self.bound.texture == Some(id) {
            self.bound.texture = None;
        }
    }

    fn attrib_location(&self, program: &ProgramHandle, name: &str) -> Option<AttribLocation> {
        let p = self.programs.get(&program.raw())?;
        p.reflection.attributes.get(name).map(|&l| AttribLocation(l))
    }

    fn uniform_location(&self, program: &ProgramHandle, name: &str) -> Option<UniformLocation> {
        let p = self.programs.get(&program.raw())?;
        p.reflection
            .uniforms
            .get(name)
            .map(|f| UniformLocation(f.offset))
    }

    fn enable_depth_test(&mut self, func: DepthFunc) {
        self.bound.depth = Some(func);
    }

    fn clear(&mut self, color: [f32; 4]) {
        // Clearing discards anything drawn earlier in the frame.
        self.draws.clear();
        self.clear_color = Some(color);
    }

    fn use_program(&mut self, program: &ProgramHandle) {
        self.bound.program = Some(program.raw());
    }

    fn uniform_matrix4(&mut self, location: UniformLocation, value: &[f32; 16]) {
        self.write_current_uniform(location, bytemuck::cast_slice(value));
    }

    fn uniform_vec3(&mut self, location: UniformLocation, value: [f32; 3]) {
        self.write_current_uniform(location, bytemuck::cast_slice(&value));
    }

    fn bind_vertex_buffer(&mut self, buffer: &BufferHandle) {
        self.bound.vertex_buffer = Some(buffer.raw());
    }

    fn enable_attrib(&mut self, location: AttribLocation) {
        self.bound.attribs.entry(location.0).or_default().enabled = true;
    }

    fn disable_attrib(&mut self, location: AttribLocation) {
        self.bound.attribs.entry(location.0).or_default().enabled = false;
    }

    fn attrib_pointer(&mut self, location: AttribLocation, components: u32, stride: u32, offset: u32) {
        self.bound.attribs.entry(location.0).or_default().pointer = Some(AttribPointer {
            components,
            stride,
            offset,
        });
    }

    fn bind_texture(&mut self, unit: u32, texture: &TextureHandle) {
        if unit != 0 {
            log::warn!("texture unit {unit} is not supported; only unit 0 is sampled");
            return;
        }
        self.bound.texture = Some(texture.raw());
    }

    fn draw_triangles(&mut self, first: u32, count: u32) -> Result<(), String> {
        let program_id = self.bound.program.ok_or("no program in use")?;
        let buffer_id = self.bound.vertex_buffer.ok_or("no vertex buffer bound")?;

        let program = self
            .programs
            .get(&program_id)
            .ok_or_else(|| format!("program #{program_id} was deleted"))?;
        let vertex_buffer = self
            .buffers
            .get(&buffer_id)
            .ok_or_else(|| format!("buffer #{buffer_id} was deleted"))?
            .clone();

        let vertex = self
            .bound
            .plan_vertices(&program.reflection, vertex_buffer.size(), first, count)?;
        if count == 0 {
            return Ok(());
        }

        let texture_id = self.bound.texture;
        let texture_view = match texture_id {
            Some(id) => match self.textures.get(&id) {
                Some(t) => &t.view,
                None => return Err(format!("texture #{id} was deleted")),
            },
            None => &self.white.view,
        };

        let slot_index = self.draws.len();
        let len = program.uniforms.len() as u64;
        let reusable = self
            .uniform_slots
            .get(slot_index)
            .is_some_and(|slot| slot.fits(texture_id, len));
        if !reusable {
            let slot = uniform_slot(
                &self.device,
                &self.bind_group_layout,
                &self.sampler,
                texture_view,
                texture_id,
                len,
            );
            self.uniform_slots.truncate(slot_index);
            self.uniform_slots.push(slot);
        }
        let slot = self
            .uniform_slots
            .get(slot_index)
            .ok_or_else(|| format!("no uniform slot for draw {slot_index}"))?;
        self.queue.write_buffer(&slot.buffer, 0, &program.uniforms);
        let bind_group = slot.bind_group.clone();

        let pipeline = self.pipeline(PipelineKey {
            program: program_id,
            vertex,
            depth: self.bound.depth,
        })?;

        self.draws.push(RecordedDraw {
            pipeline,
            bind_group,
            vertex_buffer,
            first,
            count,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::reflect::UniformField;

    fn reflection(inputs: &[(&str, u32)]) -> ProgramReflection {
        ProgramReflection {
            vertex_entry: "vs_main".into(),
            fragment_entry: "fs_main".into(),
            attributes: inputs.iter().map(|(n, l)| (n.to_string(), *l)).collect(),
            uniforms: HashMap::new(),
            uniform_block_size: 0,
        }
    }

    fn cube_state() -> BoundState {
        let mut s = BoundState::default();
        for (loc, comps, off) in [(0, 3, 0), (1, 2, 12), (2, 3, 20)] {
            s.attribs.insert(
                loc,
                AttribState {
                    enabled: true,
                    pointer: Some(AttribPointer {
                        components: comps,
                        stride: 32,
                        offset: off,
                    }),
                },
            );
        }
        s
    }

    const CUBE_BYTES: u64 = 36 * 32;

    // ── vertex planning ───────────────────────────────────────────────────

    #[test]
    fn cube_layout() {
        let r = reflection(&[("vertCoord", 0), ("vertTexCoord", 1), ("vertNormal", 2)]);
        let plan = cube_state().plan_vertices(&r, CUBE_BYTES, 0, 36).unwrap();
        assert_eq!(plan.stride, 32);
        assert_eq!(
            plan.attributes,
            vec![
                VertexAttrib { location: 0, components: 3, offset: 0 },
                VertexAttrib { location: 1, components: 2, offset: 12 },
                VertexAttrib { location: 2, components: 3, offset: 20 },
            ]
        );
    }

    #[test]
    fn disabled_attributes_are_left_out() {
        let mut s = cube_state();
        s.attribs.get_mut(&2).unwrap().enabled = false;
        let r = reflection(&[("vertCoord", 0), ("vertTexCoord", 1)]);
        let plan = s.plan_vertices(&r, CUBE_BYTES, 0, 36).unwrap();
        assert_eq!(plan.attributes.len(), 2);
    }

    #[test]
    fn shader_input_must_be_enabled() {
        let mut s = cube_state();
        s.attribs.get_mut(&0).unwrap().enabled = false;
        let r = reflection(&[("vertCoord", 0)]);
        let err = s.plan_vertices(&r, CUBE_BYTES, 0, 36).unwrap_err();
        assert!(err.contains("`vertCoord`"), "{err}");
    }

    #[test]
    fn nothing_enabled_is_an_error() {
        let s = BoundState::default();
        let err = s.plan_vertices(&reflection(&[]), CUBE_BYTES, 0, 3).unwrap_err();
        assert_eq!(err, "no vertex attribute is enabled");
    }

    #[test]
    fn enabled_without_pointer_is_an_error() {
        let mut s = BoundState::default();
        s.attribs.insert(4, AttribState { enabled: true, pointer: None });
        let err = s.plan_vertices(&reflection(&[]), CUBE_BYTES, 0, 3).unwrap_err();
        assert!(err.contains("attribute 4"), "{err}");
    }

    #[test]
    fn mixed_strides_are_rejected() {
        let mut s = cube_state();
        s.attribs.get_mut(&1).unwrap().pointer.as_mut().unwrap().stride = 16;
        let err = s.plan_vertices(&reflection(&[]), CUBE_BYTES, 0, 3).unwrap_err();
        assert!(err.contains("stride"), "{err}");
    }

    #[test]
    fn reading_past_the_buffer_is_rejected() {
        let r = reflection(&[]);
        let s = cube_state();
        assert!(s.plan_vertices(&r, CUBE_BYTES, 0, 36).is_ok());
        assert!(s.plan_vertices(&r, CUBE_BYTES, 1, 36).is_err());
        assert!(s.plan_vertices(&r, CUBE_BYTES, 36, 0).is_ok());
    }

    // ── helpers ───────────────────────────────────────────────────────────

    fn uniform_block(fields: &[(&str, u32, u32)]) -> (ProgramReflection, Vec<u8>) {
        let mut r = reflection(&[]);
        for &(name, offset, size) in fields {
            r.uniforms.insert(name.to_string(), UniformField { offset, size });
            r.uniform_block_size = r.uniform_block_size.max(offset + size);
        }
        let data = vec![0u8; uniform_buffer_len(r.uniform_block_size)];
        (r, data)
    }

    #[test]
    fn uniform_write_fills_its_member() {
        let (r, mut data) = uniform_block(&[("view", 0, 64), ("lightPosition", 64, 12)]);
        let light = [1.0f32, 2.0, 3.0];
        write_uniform(&r, &mut data, 64, bytemuck::cast_slice(&light)).unwrap();
        assert_eq!(&data[64..76], bytemuck::cast_slice::<f32, u8>(&light));
        assert!(data[..64].iter().all(|&b| b == 0));
    }

    #[test]
    fn oversized_uniform_write_leaves_neighbours_alone() {
        let (r, mut data) =
            uniform_block(&[("projection", 0, 64), ("model", 64, 16), ("view", 80, 64)]);
        let view = [7.0f32; 16];
        write_uniform(&r, &mut data, 80, bytemuck::cast_slice(&view)).unwrap();

        let err = write_uniform(&r, &mut data, 64, bytemuck::cast_slice(&[1.0f32; 16])).unwrap_err();
        assert!(err.contains("64-byte write to the 16-byte uniform"), "{err}");
        assert!(data[64..80].iter().all(|&b| b == 0));
        assert_eq!(&data[80..144], bytemuck::cast_slice::<f32, u8>(&view));
    }

    #[test]
    fn uniform_write_needs_a_member_at_the_offset() {
        let (r, mut data) = uniform_block(&[("view", 0, 64)]);
        let err = write_uniform(&r, &mut data, 4, &[0; 12]).unwrap_err();
        assert!(err.contains("offset 4"), "{err}");
    }

    #[test]
    fn uniform_slot_reuse() {
        assert!(slot_fits(Some(3), 224, Some(3), 224));
        assert!(slot_fits(None, 224, None, 16));
        assert!(!slot_fits(Some(3), 224, Some(4), 224));
        assert!(!slot_fits(None, 224, Some(3), 224));
        assert!(!slot_fits(Some(3), 16, Some(3), 224));
    }

    #[test]
    fn uniform_buffer_is_padded() {
        assert_eq!(uniform_buffer_len(0), 16);
        assert_eq!(uniform_buffer_len(220), 224);
        assert_eq!(uniform_buffer_len(224), 224);
    }

    #[test]
    fn formats() {
        assert_eq!(vertex_format(2), wgpu::VertexFormat::Float32x2);
        assert_eq!(vertex_format(3), wgpu::VertexFormat::Float32x3);
        assert_eq!(compare_function(DepthFunc::Less), wgpu::CompareFunction::Less);
    }
}
