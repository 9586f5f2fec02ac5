//! Lasso and sparkle geometry

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors, rgba};
use crate::sim::LassoSelection;

const STROKE_WIDTH: f32 = 2.0;
const STROKE_ALPHA: f32 = 0.95;
const FILL_ALPHA: f32 = 0.12;
const FLASH_STROKE_ALPHA: f32 = 0.85;

/// Generate vertices for a thick polyline, optionally closed
pub fn polyline_stroke(points: &[Vec2], width: f32, color: [f32; 4], closed: bool) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let half = width / 2.0;
    let closing = (closed && points.len() > 2).then(|| (points[points.len() - 1], points[0]));
    let segments = points.windows(2).map(|w| (w[0], w[1])).chain(closing);

    let mut vertices = Vec::with_capacity(points.len() * 6);
    for (p1, p2) in segments {
        let dir = (p2 - p1).normalize_or_zero();
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x) * half;

        let v1a = p1 + perp;
        let v1b = p1 - perp;
        let v2a = p2 + perp;
        let v2b = p2 - perp;

        // Two triangles
        vertices.push(Vertex::new(v1a.x, v1a.y, color));
        vertices.push(Vertex::new(v1b.x, v1b.y, color));
        vertices.push(Vertex::new(v2a.x, v2a.y, color));

        vertices.push(Vertex::new(v2a.x, v2a.y, color));
        vertices.push(Vertex::new(v1b.x, v1b.y, color));
        vertices.push(Vertex::new(v2b.x, v2b.y, color));
    }

    vertices
}

/// Fan-triangulated fill (exact for convex paths)
pub fn polygon_fill(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let origin = points[0];
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for w in points[1..].windows(2) {
        vertices.push(Vertex::new(origin.x, origin.y, color));
        vertices.push(Vertex::new(w[0].x, w[0].y, color));
        vertices.push(Vertex::new(w[1].x, w[1].y, color));
    }

    vertices
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

/// In-progress gesture overlay: fill (3+ points) under the stroke (2+ points)
pub fn drawing_overlay(lasso: &LassoSelection) -> Vec<Vertex> {
    let points = lasso.points();
    if !lasso.is_drawing() || points.len() < 2 {
        return Vec::new();
    }

    let closed = points.len() >= 3;
    let mut vertices = if closed {
        polygon_fill(points, rgba(colors::LASSO, FILL_ALPHA))
    } else {
        Vec::new()
    };
    vertices.extend(polyline_stroke(
        points,
        STROKE_WIDTH,
        rgba(colors::LASSO, STROKE_ALPHA),
        closed,
    ));
    vertices
}

/// Confirmed-path outline at the given layer opacity
pub fn flash_outline(points: &[Vec2], opacity: f32) -> Vec<Vertex> {
    polyline_stroke(
        points,
        STROKE_WIDTH,
        rgba(colors::LASSO_FLASH, FLASH_STROKE_ALPHA * opacity),
        true,
    )
}
