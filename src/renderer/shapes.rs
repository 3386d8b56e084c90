//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in pixel space (y down), so the
//! same mesh feeds both the GPU pipeline and the software rasterizer.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::polar_to_cartesian;

/// Tessellation density for curved edges
pub const SEGMENTS_PER_RADIAN: f32 = 16.0;

/// Segment count for an arc of `span` radians
#[inline]
fn segments_for(span: f32) -> u32 {
    ((span.abs() * SEGMENTS_PER_RADIAN).ceil() as u32).max(1)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    gradient_disc(center, radius, color, color)
}

/// Filled circle whose color blends from `inner` at the center to `outer`
/// at the rim (radial gradient)
pub fn gradient_disc(center: Vec2, radius: f32, inner: [f32; 4], outer: [f32; 4]) -> Vec<Vertex> {
    let segments = segments_for(TAU);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        let p1 = center + polar_to_cartesian(radius, theta1);
        let p2 = center + polar_to_cartesian(radius, theta2);

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, inner));
        vertices.push(Vertex::new(p1.x, p1.y, outer));
        vertices.push(Vertex::new(p2.x, p2.y, outer));
    }

    vertices
}

/// Filled pie slice from `theta_start` spanning `span` radians
pub fn sector(center: Vec2, radius: f32, theta_start: f32, span: f32, color: [f32; 4]) -> Vec<Vertex> {
    let segments = segments_for(span);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = theta_start + span * i as f32 / segments as f32;
        let theta2 = theta_start + span * (i + 1) as f32 / segments as f32;

        let p1 = center + polar_to_cartesian(radius, theta1);
        let p2 = center + polar_to_cartesian(radius, theta2);

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(center: Vec2, inner_radius: f32, outer_radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let segments = segments_for(TAU);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        let inner1 = center + polar_to_cartesian(inner_radius, theta1);
        let outer1 = center + polar_to_cartesian(outer_radius, theta1);
        let inner2 = center + polar_to_cartesian(inner_radius, theta2);
        let outer2 = center + polar_to_cartesian(outer_radius, theta2);

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Stroke of a circle: a ring of `width` centered on `radius`
pub fn circle_stroke(center: Vec2, radius: f32, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    ring(center, (radius - width / 2.0).max(0.0), radius + width / 2.0, color)
}

/// Straight segment from `a` to `b` with the given width
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Single filled triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}
