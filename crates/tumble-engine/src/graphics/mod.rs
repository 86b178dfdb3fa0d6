//! Graphics backend abstraction.
//!
//! [`GraphicsContext`] is the immediate-mode capability the engine renders
//! through. [`WgpuGraphics`] implements it on top of wgpu; tests use a
//! recording mock.

mod context;
mod handles;
mod wgpu_backend;

#[cfg(test)]
pub(crate) mod mock;

pub use context::{DepthFunc, GraphicsContext};
pub use handles::{AttribLocation, BufferHandle, ProgramHandle, TextureHandle, UniformLocation};
pub use wgpu_backend::WgpuGraphics;
