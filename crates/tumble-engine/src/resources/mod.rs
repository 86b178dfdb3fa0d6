//! GPU resource lifecycle.
//!
//! [`ResourceManager`] is the only place that creates or releases GPU objects.
//! Handles it hands out are owned by a [`GpuResources`] bundle which releases
//! them together, once.

mod decode;
mod manager;

pub use decode::{DecodedImage, ImageCrateDecoder, ImageDecoder};
pub use manager::{GpuResource, GpuResources, ResourceManager};
