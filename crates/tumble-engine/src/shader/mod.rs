//! Program introspection.
//!
//! - `bindings`: semantic names resolved to locations once per program
//! - `reflect`: WGSL reflection used by the wgpu backend to answer location queries

mod bindings;
pub(crate) mod reflect;

pub use bindings::{names, ShaderBindings};
