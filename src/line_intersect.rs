//! A pure-function line/line intersection primitive.
//!
//! This plays the role of the external collaborator specified only by its
//! contract: given two lines (each defined by two points), return a
//! candidate intersection point tagged with a validity flag. Both inputs
//! are treated as infinite lines, since the [resolver](crate::resolver)
//! only ever intersects the motion ray against unbounded grid lines.
//!
//! Adapted from `LineInterval::relate` in the teacher's `shapes/line_interval.rs`,
//! itself adapted from https://github.com/ucarion/line_intersection (MIT).
//!
//! Copyright (c) 2017 Ulysse Carion
//!
//! Permission is hereby granted, free of charge, to any person obtaining a copy
//! of this software and associated documentation files (the "Software"), to deal
//! in the Software without restriction, including without limitation the rights
//! to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//! copies of the Software, and to permit persons to whom the Software is
//! furnished to do so, subject to the following conditions:
//!
//! The above copyright notice and this permission notice shall be included in all
//! copies or substantial portions of the Software.
//!
//! THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//! IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//! FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//! AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//! LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//! OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//! SOFTWARE.

use crate::Point;
use bevy_math::Vec2;

/// The outcome of intersecting two infinite lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntersectionFlag {
    /// The lines cross at exactly one point; that point is actionable.
    ValidIntersection(Point),
    /// The lines are parallel (and not coincident).
    Parallel,
    /// The lines lie on top of one another.
    Coincident,
    /// Reserved for bounded-segment callers; infinite-line queries never
    /// produce this, since there is no interval to fall outside of.
    OutOfRange,
}

impl IntersectionFlag {
    #[inline]
    #[must_use]
    pub fn point(self) -> Option<Point> {
        match self {
            IntersectionFlag::ValidIntersection(p) => Some(p),
            _ => None,
        }
    }
}

/// Intersect the infinite line through `a0`->`a1` with the infinite line
/// through `b0`->`b1`.
#[must_use]
pub fn intersect_lines(a0: Point, a1: Point, b0: Point, b1: Point) -> IntersectionFlag {
    let p: Vec2 = a0.into();
    let q: Vec2 = b0.into();
    let r: Vec2 = Vec2::from(a1) - p;
    let s: Vec2 = Vec2::from(b1) - q;

    let r_cross_s = cross(r, s);
    let q_minus_p = q - p;
    let q_minus_p_cross_r = cross(q_minus_p, r);

    if r_cross_s == 0. {
        if q_minus_p_cross_r == 0. {
            IntersectionFlag::Coincident
        } else {
            IntersectionFlag::Parallel
        }
    } else {
        let t = cross(q_minus_p, s / r_cross_s);
        let point = p + r * t;
        IntersectionFlag::ValidIntersection(point.into())
    }
}

#[inline]
fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}
