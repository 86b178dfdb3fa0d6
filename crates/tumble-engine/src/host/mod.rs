//! Contract between the platform loop and the engine.

mod lifecycle;

pub use lifecycle::Lifecycle;
