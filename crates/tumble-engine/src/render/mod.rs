//! Per-frame rendering.
//!
//! `transforms` holds the pure model/view/projection math; `FrameRenderer`
//! drives a [`GraphicsContext`](crate::graphics::GraphicsContext) through one
//! frame using those matrices.

mod frame;
pub mod transforms;

pub use frame::{FrameInputs, FrameRenderer};
