//! winit event loop and the single application window.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
pub use winit::dpi::LogicalSize;
