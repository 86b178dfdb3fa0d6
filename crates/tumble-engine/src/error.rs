use thiserror::Error;

use crate::engine::EngineStatus;

/// Engine error taxonomy.
///
/// Everything except `InvalidState` and `Backend` can only occur during
/// `start` and is fatal for the session.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("malformed geometry: {float_count} floats is not a multiple of {per_vertex}")]
    Layout { float_count: usize, per_vertex: usize },

    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),

    #[error("texture load failed: {0}")]
    TextureLoad(String),

    #[error("required shader binding `{name}` not found")]
    ShaderBinding { name: &'static str },

    #[error("`{operation}` is not valid while the engine is {state}")]
    InvalidState {
        operation: &'static str,
        state: EngineStatus,
    },

    #[error("graphics backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
