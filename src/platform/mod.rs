//! Platform abstraction layer
//!
//! Everything the games need from the host, independent of browser or native:
//! - Input events folded into per-step keyboard/mouse state
//! - Fixed-timestep accumulation and FPS tracking

pub mod input;
pub mod time;

pub use input::{InputState, Key, MouseButton};
pub use time::{FixedTimestep, FpsCounter};
