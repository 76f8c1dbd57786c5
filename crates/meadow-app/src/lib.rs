//! Host side of the meadow scene: moves the character from key state, feeds
//! the camera and sky controllers once per frame, and hands their outputs to
//! a renderer.

pub mod demo;
mod error;
pub mod frame_loop;
pub mod movement;
pub mod scene;

pub use demo::{DemoSummary, LoggingSink, run_demo};
pub use error::AppError;
pub use frame_loop::{FIXED_DT, FrameLoop, MAX_FRAME_TIME};
pub use movement::{Gait, TargetMover};
pub use scene::{FrameOutput, FrameSink, Scene};
