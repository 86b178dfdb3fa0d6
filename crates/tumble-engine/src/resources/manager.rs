use crate::error::{EngineError, Result};
use crate::geometry::GeometryDescriptor;
use crate::graphics::{BufferHandle, GraphicsContext, ProgramHandle, TextureHandle};

use super::decode::ImageDecoder;

/// Any GPU object the engine owns.
#[derive(Debug)]
pub enum GpuResource {
    Program(ProgramHandle),
    Buffer(BufferHandle),
    Texture(TextureHandle),
}

/// Creates and releases GPU objects.
///
/// Creation failures are mapped onto the engine error taxonomy; backends only
/// report diagnostic text.
pub struct ResourceManager {
    decoder: Box<dyn ImageDecoder>,
}

impl ResourceManager {
    pub fn new(decoder: Box<dyn ImageDecoder>) -> Self {
        Self { decoder }
    }

    /// Compiles and links a program.
    pub fn create_program(
        &self,
        ctx: &mut dyn GraphicsContext,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle> {
        let program = ctx
            .create_program(vertex_source, fragment_source)
            .map_err(EngineError::ShaderCompile)?;
        log::debug!("created program #{}", program.raw());
        Ok(program)
    }

    /// Uploads the geometry's float stream as a static vertex buffer.
    pub fn create_vertex_buffer(
        &self,
        ctx: &mut dyn GraphicsContext,
        geometry: &GeometryDescriptor<'_>,
    ) -> Result<BufferHandle> {
        let buffer = ctx
            .create_buffer(geometry.as_bytes())
            .map_err(EngineError::Backend)?;
        log::debug!(
            "created vertex buffer #{} ({} vertices, stride {})",
            buffer.raw(),
            geometry.vertex_count(),
            geometry.stride()
        );
        Ok(buffer)
    }

    /// Decodes `image_bytes` and uploads them as a 2D texture.
    pub fn load_texture(
        &self,
        ctx: &mut dyn GraphicsContext,
        image_bytes: &[u8],
    ) -> Result<TextureHandle> {
        let image = self
            .decoder
            .decode(image_bytes)
            .map_err(EngineError::TextureLoad)?;
        image.validate().map_err(EngineError::TextureLoad)?;

        let texture = ctx
            .create_texture_2d(&image)
            .map_err(EngineError::TextureLoad)?;
        log::debug!(
            "created texture #{} ({}x{})",
            texture.raw(),
            image.width,
            image.height
        );
        Ok(texture)
    }

    /// Releases one GPU object. The handle is consumed.
    pub fn release(&self, ctx: &mut dyn GraphicsContext, resource: GpuResource) {
        match resource {
            GpuResource::Program(p) => {
                log::debug!("releasing program #{}", p.raw());
                ctx.delete_program(p);
            }
            GpuResource::Buffer(b) => {
                log::debug!("releasing buffer #{}", b.raw());
                ctx.delete_buffer(b);
            }
            GpuResource::Texture(t) => {
                log::debug!("releasing texture #{}", t.raw());
                ctx.delete_texture(t);
            }
        }
    }
}

/// The GPU objects of one engine session.
///
/// Handles are lent out by reference only; the bundle is the sole owner until
/// [`release`](Self::release).
#[derive(Debug)]
pub struct GpuResources {
    pub(crate) program: ProgramHandle,
    pub(crate) buffer: BufferHandle,
    pub(crate) texture: TextureHandle,
}

impl GpuResources {
    pub(crate) fn new(program: ProgramHandle, buffer: BufferHandle, texture: TextureHandle) -> Self {
        Self {
            program,
            buffer,
            texture,
        }
    }

    pub fn program(&self) -> &ProgramHandle {
        &self.program
    }

    pub fn buffer(&self) -> &BufferHandle {
        &self.buffer
    }

    pub fn texture(&self) -> &TextureHandle {
        &self.texture
    }

    /// Releases every object exactly once.
    pub fn release(self, manager: &ResourceManager, ctx: &mut dyn GraphicsContext) {
        let Self {
            program,
            buffer,
            texture,
        } = self;
        manager.release(ctx, GpuResource::Program(program));
        manager.release(ctx, GpuResource::Buffer(buffer));
        manager.release(ctx, GpuResource::Texture(texture));
    }
}
