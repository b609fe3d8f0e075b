//! Immediate-mode rendering
//!
//! Games record into a [`DrawList`]; [`shapes::tessellate`] turns it into
//! triangles and [`RenderState`] presents them through wgpu.

pub mod camera;
pub mod draw;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use camera::{Camera2D, Camera3D};
pub use draw::{DrawCmd, DrawList, measure_text, text_overlay_html};
pub use pipeline::{RenderState, letterbox};
pub use shapes::tessellate;
pub use vertex::{Color, Vertex, colors, fade, rgb, rgba};
