//! Typed GPU object handles.
//!
//! Object handles are move-only: they are neither `Copy` nor `Clone`, and the
//! `delete_*` methods on [`GraphicsContext`](super::GraphicsContext) take them
//! by value. A handle therefore cannot be released twice or used after release.
//!
//! Locations are plain values resolved against a program and may be copied
//! freely; they become meaningless once their program is deleted.

macro_rules! object_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a backend-issued id. Only backends should call this.
            #[inline]
            pub fn from_raw(id: u32) -> Self {
                Self(id)
            }

            #[inline]
            pub fn raw(&self) -> u32 {
                self.0
            }
        }
    };
}

object_handle!(
    /// Linked shader program (vertex + fragment stage).
    ProgramHandle
);
object_handle!(
    /// Static vertex buffer.
    BufferHandle
);
object_handle!(
    /// 2D RGBA texture.
    TextureHandle
);

/// Vertex attribute slot of a program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AttribLocation(pub u32);

/// Uniform slot of a program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);
