/// Plane geometry shared by perception, pathing and collision.
///
/// World space is y-down with the origin at the top-left corner of the
/// level, matching tile `(row, col)` order.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).length()
    }

    /// Angle in radians of the direction from `self` towards `target`.
    pub fn angle_to(self, target: Vec2) -> f64 {
        (target.y - self.y).atan2(target.x - self.x)
    }

    pub fn from_angle(angle: f64, length: f64) -> Self {
        Self::new(angle.cos() * length, angle.sin() * length)
    }

    /// Rescale to `length`.  The zero vector stays zero.
    pub fn with_length(self, length: f64) -> Self {
        let len = self.length();
        if len == 0.0 {
            Vec2::ZERO
        } else {
            self * (length / len)
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle, closed on all edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, width: f64, height: f64) -> Self {
        let half = Vec2::new(width / 2.0, height / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.min.x + self.max.x) / 2.0, (self.min.y + self.max.y) / 2.0)
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Grow by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Rect {
        let m = Vec2::new(margin, margin);
        Rect {
            min: self.min - m,
            max: self.max + m,
        }
    }
}

/// Where along `a → b` the segment first touches `rect`, as a fraction in
/// `[0, 1]`.  `Some(0.0)` when `a` already lies inside.
///
/// Slab clipping: the segment is trimmed against the x and y extents in
/// turn and survives only if a non-empty parameter range remains.
pub fn segment_entry(a: Vec2, b: Vec2, rect: &Rect) -> Option<f64> {
    let d = b - a;
    let mut t_enter = 0.0_f64;
    let mut t_exit = 1.0_f64;

    let axes = [
        (a.x, d.x, rect.min.x, rect.max.x),
        (a.y, d.y, rect.min.y, rect.max.y),
    ];
    for (origin, delta, lo, hi) in axes {
        if delta == 0.0 {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / delta;
        let mut near = (lo - origin) * inv;
        let mut far = (hi - origin) * inv;
        if near > far {
            std::mem::swap(&mut near, &mut far);
        }
        t_enter = t_enter.max(near);
        t_exit = t_exit.min(far);
        if t_enter > t_exit {
            return None;
        }
    }
    Some(t_enter)
}

pub fn segment_intersects(a: Vec2, b: Vec2, rect: &Rect) -> bool {
    segment_entry(a, b, rect).is_some()
}
