//! Planar geometry helpers for lasso selection and spawn placement

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Total length of an open polyline (0 for fewer than two points)
pub fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Bounding box of a point set (`None` when empty)
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Shrink every edge inward by `amount`
    pub fn inset(&self, amount: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(amount),
            max: self.max - Vec2::splat(amount),
        }
    }

    /// True when the rectangle has no interior on some axis
    pub fn is_degenerate(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }
}

/// Even-odd point-in-polygon test.
///
/// The polygon is implicitly closed: the last vertex connects back to the first.
/// Fewer than three vertices never contain anything.
pub fn point_in_polygon(polygon: &[Vec2], p: Vec2) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[j];
        // Half-open span so a vertex exactly at p.y is counted once
        let straddles = (a.y <= p.y && p.y < b.y) || (b.y <= p.y && p.y < a.y);
        if straddles && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
