//! Frame-rate measurement for the window title.

mod fps;

pub use fps::FpsCounter;
