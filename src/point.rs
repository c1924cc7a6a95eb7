#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::Direction;
use bevy_math::Vec2;
use std::ops::{Add, Mul, Neg, Sub};

/// A real-valued coordinate in map-local space.
///
/// The map's south-west corner sits at the map's origin; each cell spans
/// `step_size.x` by `step_size.y` from there. A `Point` may fall in a cell's
/// interior, on a grid line, or exactly on a grid corner.
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0., y: 0. };

    #[inline]
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    #[must_use]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    #[must_use]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    #[must_use]
    pub fn distance_squared_to(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[inline]
    #[must_use]
    pub fn distance_to(&self, other: Point) -> f32 {
        self.distance_squared_to(other).sqrt()
    }
}

impl From<(f32, f32)> for Point {
    #[inline]
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f32; 2]> for Point {
    #[inline]
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for (f32, f32) {
    #[inline]
    fn from(point: Point) -> Self {
        (point.x, point.y)
    }
}

impl From<Point> for Vec2 {
    #[inline]
    fn from(point: Point) -> Self {
        Vec2::new(point.x, point.y)
    }
}

impl From<Vec2> for Point {
    #[inline]
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl Add<Displacement> for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Displacement) -> Self::Output {
        Self::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

impl Sub for Point {
    type Output = Displacement;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Displacement::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A real-valued displacement, as supplied by an agent for a single step.
///
/// The zero displacement has no well-defined direction and is rejected by
/// [`Displacement::direction`].
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Displacement {
    pub(crate) dx: f32,
    pub(crate) dy: f32,
}

impl Displacement {
    #[inline]
    #[must_use]
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    #[inline]
    #[must_use]
    pub fn dx(&self) -> f32 {
        self.dx
    }

    #[inline]
    #[must_use]
    pub fn dy(&self) -> f32 {
        self.dy
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.dx == 0. && self.dy == 0.
    }

    /// Sign-normalize this displacement's components to `{-1, 0, 1}` and
    /// resolve the result to a compass [`Direction`].
    ///
    /// Returns `None` for the zero displacement, which has no direction.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        let sx = signum(self.dx);
        let sy = signum(self.dy);
        match (sx, sy) {
            (0, 0) => None,
            (1, 0) => Some(Direction::East),
            (1, 1) => Some(Direction::NorthEast),
            (0, 1) => Some(Direction::North),
            (-1, 1) => Some(Direction::NorthWest),
            (-1, 0) => Some(Direction::West),
            (-1, -1) => Some(Direction::SouthWest),
            (0, -1) => Some(Direction::South),
            (1, -1) => Some(Direction::SouthEast),
            _ => unreachable!("signum only produces -1, 0, or 1"),
        }
    }
}

#[inline]
fn signum(v: f32) -> i32 {
    if v > 0. {
        1
    } else if v < 0. {
        -1
    } else {
        0
    }
}

impl From<(f32, f32)> for Displacement {
    #[inline]
    fn from((dx, dy): (f32, f32)) -> Self {
        Self::new(dx, dy)
    }
}

impl Neg for Displacement {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.dx, -self.dy)
    }
}

impl Mul<f32> for Displacement {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.dx * rhs, self.dy * rhs)
    }
}
