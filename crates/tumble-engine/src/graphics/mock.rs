//! Recording [`GraphicsContext`] for tests.

use std::collections::{HashMap, HashSet};

use crate::resources::DecodedImage;

use super::{
    AttribLocation, BufferHandle, DepthFunc, GraphicsContext, ProgramHandle, TextureHandle,
    UniformLocation,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateProgram(u32),
    CreateBuffer(u32),
    CreateTexture(u32),
    DeleteProgram(u32),
    DeleteBuffer(u32),
    DeleteTexture(u32),
    EnableDepthTest(DepthFunc),
    Clear([f32; 4]),
    UseProgram(u32),
    UniformMatrix4(UniformLocation, [f32; 16]),
    UniformVec3(UniformLocation, [f32; 3]),
    BindVertexBuffer(u32),
    EnableAttrib(AttribLocation),
    DisableAttrib(AttribLocation),
    AttribPointer {
        location: AttribLocation,
        components: u32,
        stride: u32,
        offset: u32,
    },
    BindTexture { unit: u32, texture: u32 },
    DrawTriangles { first: u32, count: u32 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Kind {
    Program,
    Buffer,
    Texture,
}

pub(crate) struct MockContext {
    pub calls: Vec<Call>,
    /// Objects created so far.
    pub created: usize,
    /// Objects created and not yet deleted.
    pub live: HashSet<(Kind, u32)>,
    pub buffer_sizes: HashMap<u32, usize>,

    pub fail_compile: Option<String>,
    pub fail_texture: Option<String>,
    pub fail_draw: Option<String>,
    /// Names that resolve to no location.
    pub missing: HashSet<&'static str>,

    attribs: HashMap<&'static str, u32>,
    uniforms: HashMap<&'static str, u32>,
    next_id: u32,
}

impl MockContext {
    pub fn new() -> Self {
        let attribs = [("vertCoord", 0), ("vertTexCoord", 1), ("vertNormal", 2)];
        let uniforms = [
            ("projection", 0),
            ("view", 64),
            ("model", 128),
            ("lightPosition", 192),
            ("lightIntensities", 208),
        ];
        Self {
            calls: Vec::new(),
            created: 0,
            live: HashSet::new(),
            buffer_sizes: HashMap::new(),
            fail_compile: None,
            fail_texture: None,
            fail_draw: None,
            missing: HashSet::new(),
            attribs: attribs.into_iter().collect(),
            uniforms: uniforms.into_iter().collect(),
            next_id: 1,
        }
    }

    pub fn uniform(&self, name: &str) -> UniformLocation {
        UniformLocation(self.uniforms[name])
    }

    pub fn attrib(&self, name: &str) -> AttribLocation {
        AttribLocation(self.attribs[name])
    }

    /// Calls recorded since the most recent frame began.
    pub fn last_frame(&self) -> &[Call] {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, Call::EnableDepthTest(_)))
            .unwrap_or(0);
        &self.calls[start..]
    }

    pub fn frame_matrix(&self, name: &str) -> Option<[f32; 16]> {
        let loc = self.uniform(name);
        self.last_frame().iter().find_map(|c| match c {
            Call::UniformMatrix4(l, m) if *l == loc => Some(*m),
            _ => None,
        })
    }

    fn create(&mut self, kind: Kind) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.created += 1;
        self.live.insert((kind, id));
        id
    }

    fn delete(&mut self, kind: Kind, id: u32) {
        assert!(self.live.remove(&(kind, id)), "{kind:?} #{id} released twice or never created");
    }
}

impl GraphicsContext for MockContext {
    fn create_program(&mut self, _vs: &str, _fs: &str) -> Result<ProgramHandle, String> {
        if let Some(msg) = &self.fail_compile {
            return Err(msg.clone());
        }
        let id = self.create(Kind::Program);
        self.calls.push(Call::CreateProgram(id));
        Ok(ProgramHandle::from_raw(id))
    }

    fn create_buffer(&mut self, data: &[u8]) -> Result<BufferHandle, String> {
        let id = self.create(Kind::Buffer);
        self.buffer_sizes.insert(id, data.len());
        self.calls.push(Call::CreateBuffer(id));
        Ok(BufferHandle::from_raw(id))
    }

    fn create_texture_2d(&mut self, _image: &DecodedImage) -> Result<TextureHandle, String> {
        if let Some(msg) = &self.fail_texture {
            return Err(msg.clone());
        }
        let id = self.create(Kind::Texture);
        self.calls.push(Call::CreateTexture(id));
        Ok(TextureHandle::from_raw(id))
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.delete(Kind::Program, program.raw());
        self.calls.push(Call::DeleteProgram(program.raw()));
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        self.delete(Kind::Buffer, buffer.raw());
        self.calls.push(Call::DeleteBuffer(buffer.raw()));
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        self.delete(Kind::Texture, texture.raw());
        self.calls.push(Call::DeleteTexture(texture.raw()));
    }

    fn attrib_location(&self, _program: &ProgramHandle, name: &str) -> Option<AttribLocation> {
        if self.missing.contains(name) {
            return None;
        }
        self.attribs.get(name).map(|&l| AttribLocation(l))
    }

    fn uniform_location(&self, _program: &ProgramHandle, name: &str) -> Option<UniformLocation> {
        if self.missing.contains(name) {
            return None;
        }
        self.uniforms.get(name).map(|&l| UniformLocation(l))
    }

    fn enable_depth_test(&mut self, func: DepthFunc) {
        self.calls.push(Call::EnableDepthTest(func));
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.calls.push(Call::Clear(color));
    }

    fn use_program(&mut self, program: &ProgramHandle) {
        self.calls.push(Call::UseProgram(program.raw()));
    }

    fn uniform_matrix4(&mut self, location: UniformLocation, value: &[f32; 16]) {
        self.calls.push(Call::UniformMatrix4(location, *value));
    }

    fn uniform_vec3(&mut self, location: UniformLocation, value: [f32; 3]) {
        self.calls.push(Call::UniformVec3(location, value));
    }

    fn bind_vertex_buffer(&mut self, buffer: &BufferHandle) {
        self.calls.push(Call::BindVertexBuffer(buffer.raw()));
    }

    fn enable_attrib(&mut self, location: AttribLocation) {
        self.calls.push(Call::EnableAttrib(location));
    }

    fn disable_attrib(&mut self, location: AttribLocation) {
        self.calls.push(Call::DisableAttrib(location));
    }

    fn attrib_pointer(&mut self, location: AttribLocation, components: u32, stride: u32, offset: u32) {
        self.calls.push(Call::AttribPointer {
            location,
            components,
            stride,
            offset,
        });
    }

    fn bind_texture(&mut self, unit: u32, texture: &TextureHandle) {
        self.calls.push(Call::BindTexture {
            unit,
            texture: texture.raw(),
        });
    }

    fn draw_triangles(&mut self, first: u32, count: u32) -> Result<(), String> {
        if let Some(msg) = &self.fail_draw {
            return Err(msg.clone());
        }
        self.calls.push(Call::DrawTriangles { first, count });
        Ok(())
    }
}
