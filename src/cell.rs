#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use std::fmt;

/// The semantic kind of a [`Cell`].
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Normal,
    Obstacle,
    Start,
    End,
}

impl CellKind {
    /// The default scalar value assigned to a freshly created cell of this kind.
    #[inline]
    #[must_use]
    pub fn default_value(&self) -> f32 {
        match self {
            CellKind::Normal => 1.,
            CellKind::Obstacle => -100.,
            CellKind::Start => 0.,
            CellKind::End => 100.,
        }
    }

    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CellKind::Normal => "NormalBlock",
            CellKind::Obstacle => "ObstacleBlock",
            CellKind::Start => "StartingBlock",
            CellKind::End => "EndingBlock",
        }
    }

    #[inline]
    #[must_use]
    pub fn is_obstacle(&self) -> bool {
        matches!(self, CellKind::Obstacle)
    }
}

/// A unit cell of a [`GridMap`](crate::GridMap).
///
/// Holds its kind, its integer anchor position (south-west corner, in cell
/// units), its unit size, and its scalar value.
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    kind: CellKind,
    anchor_x: f32,
    anchor_y: f32,
    width: f32,
    height: f32,
    value: f32,
}

impl Cell {
    /// Create a new cell of the given kind, anchored at `(anchor_x, anchor_y)`
    /// with the given `width`/`height`, using the kind's default value.
    #[inline]
    #[must_use]
    pub fn new(kind: CellKind, anchor_x: f32, anchor_y: f32, width: f32, height: f32) -> Self {
        Self {
            kind,
            anchor_x,
            anchor_y,
            width,
            height,
            value: kind.default_value(),
        }
    }

    /// Create a new cell with an explicit value, overriding the kind's default.
    #[inline]
    #[must_use]
    pub fn with_value(
        kind: CellKind,
        anchor_x: f32,
        anchor_y: f32,
        width: f32,
        height: f32,
        value: f32,
    ) -> Self {
        Self {
            kind,
            anchor_x,
            anchor_y,
            width,
            height,
            value,
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn anchor_x(&self) -> f32 {
        self.anchor_x
    }

    #[inline]
    #[must_use]
    pub fn anchor_y(&self) -> f32 {
        self.anchor_y
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.anchor_x + self.width / 2.
    }

    #[inline]
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.anchor_y + self.height / 2.
    }

    #[inline]
    pub(crate) fn set_kind(&mut self, kind: CellKind) {
        self.kind = kind;
        self.value = kind.default_value();
    }

    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at ({}, {}), value={}",
            self.label(),
            self.anchor_x,
            self.anchor_y,
            self.value
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(CellKind::Normal.default_value(), 1.);
        assert_eq!(CellKind::Obstacle.default_value(), -100.);
        assert_eq!(CellKind::Start.default_value(), 0.);
        assert_eq!(CellKind::End.default_value(), 100.);
    }

    #[test]
    fn test_center() {
        let cell = Cell::new(CellKind::Normal, 10., 4., 1., 1.);
        assert_eq!(cell.center_x(), 10.5);
        assert_eq!(cell.center_y(), 4.5);
    }

    #[test]
    fn test_set_kind_resets_value_to_new_kind_default() {
        let mut cell = Cell::new(CellKind::Normal, 0., 0., 1., 1.);
        cell.set_kind(CellKind::Obstacle);
        assert_eq!(cell.kind(), CellKind::Obstacle);
        assert_eq!(cell.value(), -100.);
    }
}
