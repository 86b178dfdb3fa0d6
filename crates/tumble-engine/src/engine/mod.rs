//! Engine state machine.
//!
//! [`Engine`] is the sole owner of the session state: program bindings, GPU
//! objects, start time and touch location. Lifecycle:
//!
//! ```text
//! Uninitialized --start--> Running --stop--> Stopped
//! ```
//!
//! `draw`, `touch` and `config` are only valid while running.

mod assets;
mod controller;

pub use assets::EngineAssets;
pub use controller::{Engine, EngineStatus};
