//! Wheel rendering
//!
//! `wheel` builds a backend-neutral frame (triangle mesh + label and icon
//! placements). `pipeline` draws the mesh with WebGPU; `raster` draws it in
//! software for snapshots and tests.

pub mod pipeline;
pub mod raster;
pub mod shapes;
pub mod vertex;
pub mod wheel;

pub use pipeline::{RenderError, WheelPipeline};
pub use vertex::{Vertex, colors, sector_color};
pub use wheel::{
    IconPlacement, LabelPlacement, WheelFrame, draw_wheel, font_px, truncate_label, wheel_radius,
};
