//! Software rasterization into a character grid.

pub mod buffer;
pub mod fill;
pub mod lighting;
pub mod line;
pub mod overlay;
pub mod pipeline;
pub mod renderer;

pub use buffer::{Cell, DepthBuffer, FrameBuffer, Pixel, RenderTarget};
pub use lighting::LightingModel;
pub use pipeline::{ProjectedPrimitive, ProjectedVertex, Viewport};
pub use renderer::{FrameReport, Renderer};
