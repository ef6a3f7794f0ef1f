//! Shape generation for 2D primitives
//!
//! Every shape is a flat triangle list.

use glam::{Mat2, Vec2};
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for an axis-aligned rectangle
pub fn rect(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> Vec<Vertex> {
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    let (x2, y2) = (x + width, y + height);
    vec![
        Vertex::new(x, y, color),
        Vertex::new(x2, y, color),
        Vertex::new(x, y2, color),
        Vertex::new(x, y2, color),
        Vertex::new(x2, y, color),
        Vertex::new(x2, y2, color),
    ]
}

/// Rectangle shaded edge -> middle -> edge across its width
pub fn banded_rect(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    edge: [f32; 4],
    middle: [f32; 4],
) -> Vec<Vertex> {
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    let mid = x + width / 2.0;
    let y2 = y + height;
    let mut vertices = Vec::with_capacity(12);

    for (x1, c1, x2, c2) in [(x, edge, mid, middle), (mid, middle, x + width, edge)] {
        vertices.push(Vertex::new(x1, y, c1));
        vertices.push(Vertex::new(x2, y, c2));
        vertices.push(Vertex::new(x1, y2, c1));

        vertices.push(Vertex::new(x1, y2, c1));
        vertices.push(Vertex::new(x2, y, c2));
        vertices.push(Vertex::new(x2, y2, c2));
    }

    vertices
}

/// Thick line between two points
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

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

/// The player's arrowhead glyph, pointing right before rotation and scaling
pub fn glyph(center: Vec2, radius: f32, angle: f32, scale: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let transform = Mat2::from_angle(angle) * Mat2::from_diagonal(scale);
    [
        Vec2::new(radius + 8.0, 0.0),
        Vec2::new(-radius, -radius),
        Vec2::new(-radius, radius),
    ]
    .into_iter()
    .map(|p| {
        let p = center + transform * p;
        Vertex::new(p.x, p.y, color)
    })
    .collect()
}
