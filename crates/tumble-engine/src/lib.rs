//! Tumble engine crate.
//!
//! Renders a lit, textured cube spinning about its vertical axis. The
//! [`Engine`] state machine talks to the GPU only through a
//! [`GraphicsContext`]; [`window::Runtime`] hosts it in a winit window backed
//! by wgpu.

pub mod coords;
pub mod device;
pub mod engine;
pub mod geometry;
pub mod graphics;
pub mod host;
pub mod logging;
pub mod render;
pub mod resources;
pub mod shader;
pub mod time;
pub mod window;

mod error;

pub use coords::{Point, ViewportConfig};
pub use engine::{Engine, EngineAssets, EngineStatus};
pub use error::{EngineError, Result};
pub use graphics::GraphicsContext;
pub use host::Lifecycle;
