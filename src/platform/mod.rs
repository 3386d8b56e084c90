//! Platform abstraction layer
//!
//! Browser implementations of the capabilities the core is written against:
//! - Frame scheduling (requestAnimationFrame)
//! - Image loading (HtmlImageElement)
//! - Text and icon overlay (Canvas 2D)
//!
//! Native builds use `wheel::ManualScheduler` and `images::FsImageLoader`.

#[cfg(target_arch = "wasm32")]
pub mod web;
