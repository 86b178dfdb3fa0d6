use crate::resources::DecodedImage;

use super::{AttribLocation, BufferHandle, ProgramHandle, TextureHandle, UniformLocation};

/// Depth comparison used when depth testing is enabled.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DepthFunc {
    Less,
}

/// Immediate-mode GPU capability.
///
/// Every engine operation that touches GPU state receives the context
/// explicitly; there is no ambient device. Calls are expected on the thread
/// that owns the underlying device and are executed in order.
///
/// Fallible methods report the backend's diagnostic text; the engine wraps it
/// into an [`EngineError`](crate::EngineError) of the appropriate kind.
pub trait GraphicsContext {
    // ── resources ─────────────────────────────────────────────────────────

    /// Compiles and links a program from vertex and fragment source text.
    fn create_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle, String>;

    /// Allocates a static vertex buffer holding `data`.
    fn create_buffer(&mut self, data: &[u8]) -> Result<BufferHandle, String>;

    /// Uploads decoded RGBA8 pixels as a 2D texture.
    fn create_texture_2d(&mut self, image: &DecodedImage) -> Result<TextureHandle, String>;

    fn delete_program(&mut self, program: ProgramHandle);
    fn delete_buffer(&mut self, buffer: BufferHandle);
    fn delete_texture(&mut self, texture: TextureHandle);

    // ── introspection ─────────────────────────────────────────────────────

    /// Location of a vertex input, or `None` if the program has no such input.
    fn attrib_location(&self, program: &ProgramHandle, name: &str) -> Option<AttribLocation>;

    /// Location of a uniform, or `None` if the program has no such uniform.
    fn uniform_location(&self, program: &ProgramHandle, name: &str) -> Option<UniformLocation>;

    // ── frame state ───────────────────────────────────────────────────────

    fn enable_depth_test(&mut self, func: DepthFunc);

    /// Clears color to `color` and depth to the far plane.
    fn clear(&mut self, color: [f32; 4]);

    fn use_program(&mut self, program: &ProgramHandle);

    /// Uploads a column-major 4x4 matrix to the active program.
    fn uniform_matrix4(&mut self, location: UniformLocation, value: &[f32; 16]);

    fn uniform_vec3(&mut self, location: UniformLocation, value: [f32; 3]);

    fn bind_vertex_buffer(&mut self, buffer: &BufferHandle);

    fn enable_attrib(&mut self, location: AttribLocation);

    fn disable_attrib(&mut self, location: AttribLocation);

    /// Describes where `location` reads from the bound vertex buffer.
    fn attrib_pointer(&mut self, location: AttribLocation, components: u32, stride: u32, offset: u32);

    fn bind_texture(&mut self, unit: u32, texture: &TextureHandle);

    /// Draws `count` vertices as a triangle list starting at `first`.
    fn draw_triangles(&mut self, first: u32, count: u32) -> Result<(), String>;
}
