//! Geometry and color primitives shared by every layer

mod color;
mod size;
mod vec2;

pub use color::Rgba;
pub use size::Size;
pub use vec2::Vec2;
