//! Software rasterizer for wheel frames
//!
//! Used for native snapshots and tests. Fills the frame's triangle list with
//! per-vertex color interpolation and source-over blending, then stamps the
//! reward icons on top.

use glam::Vec2;
use image::{Rgba, RgbaImage};

use super::vertex::{Vertex, to_rgba8};
use super::wheel::WheelFrame;
use crate::images::{Icon, ImageCache};

/// Rasterize the frame mesh onto a `size × size` image
pub fn rasterize(frame: &WheelFrame, background: [f32; 4]) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(frame.size, frame.size, Rgba(to_rgba8(background)));
    for tri in frame.vertices.chunks_exact(3) {
        fill_triangle(&mut img, &tri[0], &tri[1], &tri[2]);
    }
    img
}

/// Signed doubled area of (a, b, p)
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn fill_triangle(img: &mut RgbaImage, v0: &Vertex, v1: &Vertex, v2: &Vertex) {
    let (a, b, c) = (
        Vec2::from(v0.position),
        Vec2::from(v1.position),
        Vec2::from(v2.position),
    );
    let area = edge(a, b, c);
    if area.abs() < f32::EPSILON {
        return;
    }

    let (w, h) = (img.width() as i32, img.height() as i32);
    let min_x = (a.x.min(b.x).min(c.x).floor() as i32).max(0);
    let max_x = (a.x.max(b.x).max(c.x).ceil() as i32).min(w - 1);
    let min_y = (a.y.min(b.y).min(c.y).floor() as i32).max(0);
    let max_y = (a.y.max(b.y).max(c.y).ceil() as i32).min(h - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            // Sample at pixel center
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(b, c, p) / area;
            let w1 = edge(c, a, p) / area;
            let w2 = edge(a, b, p) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let mut color = [0.0f32; 4];
            for (i, slot) in color.iter_mut().enumerate() {
                *slot = v0.color[i] * w0 + v1.color[i] * w1 + v2.color[i] * w2;
            }
            blend(img.get_pixel_mut(x as u32, y as u32), color);
        }
    }
}

/// Source-over blend of a float color onto an 8-bit pixel
fn blend(dst: &mut Rgba<u8>, src: [f32; 4]) {
    let alpha = src[3].clamp(0.0, 1.0);
    let d = dst.0.map(|c| c as f32 / 255.0);
    let out_a = alpha + d[3] * (1.0 - alpha);
    let mut out = [0.0f32; 4];
    for i in 0..3 {
        out[i] = if out_a > 0.0 {
            (src[i] * alpha + d[i] * d[3] * (1.0 - alpha)) / out_a
        } else {
            0.0
        };
    }
    out[3] = out_a;
    dst.0 = to_rgba8(out);
}

/// Stamp cached reward icons, axis-aligned at their placement centers
pub fn draw_icons(img: &mut RgbaImage, frame: &WheelFrame, cache: &ImageCache<Icon>) {
    for placement in &frame.icons {
        let Some(icon) = cache.get(&placement.label) else {
            continue;
        };
        let side = placement.size.round().max(1.0) as i32;
        let center = placement.center(frame.center);
        let left = (center.x - side as f32 / 2.0).round() as i32;
        let top = (center.y - side as f32 / 2.0).round() as i32;

        for dy in 0..side {
            for dx in 0..side {
                let (x, y) = (left + dx, top + dy);
                if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
                    continue;
                }
                // Nearest-neighbour scale
                let sx = (dx as u32 * icon.width() / side as u32).min(icon.width() - 1);
                let sy = (dy as u32 * icon.height() / side as u32).min(icon.height() - 1);
                let src = icon.get_pixel(sx, sy).0.map(|c| c as f32 / 255.0);
                blend(img.get_pixel_mut(x as u32, y as u32), src);
            }
        }
    }
}
