//! CPU-side vertex data and its interleaved layout.
//!
//! Geometry is a flat `f32` stream of fixed-size records. The layout metadata
//! exposed here is the single source of truth for attribute strides/offsets;
//! renderers must not hard-code them.

mod cube;
mod descriptor;

pub use cube::CUBE_VERTICES;
pub use descriptor::{AttributeLayout, GeometryDescriptor, FLOATS_PER_VERTEX};
