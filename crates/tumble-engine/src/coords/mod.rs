//! Host-facing coordinate types.
//!
//! Both types use the same unit system (logical pixels, origin top-left, +Y
//! down) so that touch points and viewport sizes can be compared directly.

mod point;
mod viewport;

pub use point::Point;
pub use viewport::ViewportConfig;
