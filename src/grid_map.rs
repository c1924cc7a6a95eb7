#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::{Cell, CellIndex, CellKind, GridWorldError, Point, Result};
use indexmap::IndexSet;
use std::fmt;

/// The answer to "what does this point touch", used by both the coordinate
/// evaluator and the directional passability rules so the two can never
/// disagree about which cells a point adjoins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_corner: bool,
    pub on_horizontal_edge: bool,
    pub on_vertical_edge: bool,
    pub nearest_idx: CellIndex,
}

/// A rectangular grid of unit [`Cell`]s, plus map-level metadata.
///
/// Construction is two-phase, matching the source this crate is derived
/// from: [`GridMap::new`] allocates the shape, and [`GridMap::initialize`]
/// fills it with Normal cells. Calling `initialize` twice fails with
/// [`GridWorldError::AlreadyInitialized`].
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct GridMap {
    name: String,
    rows: i32,
    cols: i32,
    origin: Point,
    step: Point,
    out_of_bounds_value: f32,
    cells: Vec<Vec<Cell>>,
    initialized: bool,
    start_idx: Option<CellIndex>,
    end_idx: Option<CellIndex>,
    obstacles: IndexSet<CellIndex>,
    corners: [Point; 4],
}

impl GridMap {
    /// Create an empty-sized grid map. Call [`GridMap::initialize`] before using it.
    pub fn new(
        rows: i32,
        cols: i32,
        origin: Point,
        step: Point,
        name: impl Into<String>,
        out_of_bounds_value: f32,
    ) -> Result<Self> {
        if rows <= 0 || cols <= 0 {
            return Err(GridWorldError::InvalidArgument(
                "rows and cols must be positive".into(),
            ));
        }
        if step.x() <= 0. || step.y() <= 0. {
            return Err(GridWorldError::InvalidArgument(
                "step size must be positive".into(),
            ));
        }
        Ok(Self {
            name: name.into(),
            rows,
            cols,
            origin,
            step,
            out_of_bounds_value,
            cells: Vec::new(),
            initialized: false,
            start_idx: None,
            end_idx: None,
            obstacles: IndexSet::new(),
            corners: [Point::ZERO; 4],
        })
    }

    /// Fill the grid with Normal cells of the given `value`, and compute the
    /// map's outer corners. Fails with [`GridWorldError::AlreadyInitialized`]
    /// if called more than once.
    pub fn initialize(&mut self, value: f32) -> Result<()> {
        if self.initialized {
            return Err(GridWorldError::AlreadyInitialized);
        }

        let mut cells = Vec::with_capacity(self.rows as usize);
        for r in 0..self.rows {
            let mut row = Vec::with_capacity(self.cols as usize);
            for c in 0..self.cols {
                let anchor = self.convert_index_to_point(CellIndex::new(r, c));
                row.push(Cell::with_value(
                    CellKind::Normal,
                    anchor.x(),
                    anchor.y(),
                    self.step.x(),
                    self.step.y(),
                    value,
                ));
            }
            cells.push(row);
        }

        let sw = self.origin;
        let ne = Point::new(
            self.origin.x() + self.cols as f32 * self.step.x(),
            self.origin.y() + self.rows as f32 * self.step.y(),
        );
        self.corners = [
            sw,
            Point::new(ne.x(), sw.y()),
            ne,
            Point::new(sw.x(), ne.y()),
        ];

        self.cells = cells;
        self.initialized = true;
        tracing::debug!(rows = self.rows, cols = self.cols, "grid map initialized");
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    #[inline]
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[inline]
    #[must_use]
    pub fn step_size(&self) -> Point {
        self.step
    }

    #[inline]
    #[must_use]
    pub fn out_of_bounds_value(&self) -> f32 {
        self.out_of_bounds_value
    }

    /// South-west, south-east, north-east, north-west outer corners, in that order.
    #[inline]
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        self.corners
    }

    #[inline]
    #[must_use]
    pub fn start_idx(&self) -> Option<CellIndex> {
        self.start_idx
    }

    #[inline]
    #[must_use]
    pub fn end_idx(&self) -> Option<CellIndex> {
        self.end_idx
    }

    #[inline]
    #[must_use]
    pub fn obstacles(&self) -> &IndexSet<CellIndex> {
        &self.obstacles
    }

    #[inline]
    fn in_bounds(&self, idx: CellIndex) -> bool {
        idx.in_bounds(self.rows, self.cols)
    }

    /// Look up the cell at the given index.
    ///
    /// Fails with [`GridWorldError::IndexOutOfRange`] if `idx` is outside
    /// the grid extents.
    pub fn cell_at(&self, idx: CellIndex) -> Result<&Cell> {
        self.get_cell(idx)
            .ok_or(GridWorldError::IndexOutOfRange(idx))
    }

    /// Like [`GridMap::cell_at`], but returns `None` instead of failing for
    /// an out-of-range index. Used internally wherever an out-of-grid
    /// neighbor is itself meaningful (the evaluator's and the passability
    /// rules' "off the edge" cases), rather than an error.
    #[inline]
    fn get_cell(&self, idx: CellIndex) -> Option<&Cell> {
        if !self.in_bounds(idx) {
            return None;
        }
        self.cells
            .get(idx.r() as usize)
            .and_then(|row| row.get(idx.c() as usize))
    }

    #[inline]
    fn get_cell_mut(&mut self, idx: CellIndex) -> Option<&mut Cell> {
        if !self.in_bounds(idx) {
            return None;
        }
        self.cells
            .get_mut(idx.r() as usize)
            .and_then(|row| row.get_mut(idx.c() as usize))
    }

    /// A cell outside the grid is never passable: the agent cannot leave the map.
    #[inline]
    pub(crate) fn is_passable(&self, idx: CellIndex) -> bool {
        match self.get_cell(idx) {
            Some(cell) => !cell.kind().is_obstacle(),
            None => false,
        }
    }

    #[inline]
    pub(crate) fn is_obstacle_at(&self, idx: CellIndex) -> bool {
        !self.is_passable(idx)
    }

    /// Replace the prior Start cell (if any) with Normal, then mark the
    /// cell at `idx` as Start.
    pub fn set_start(&mut self, idx: CellIndex) -> Result<()> {
        self.cell_at(idx)?;
        if let Some(prev) = self.start_idx.take() {
            self.overwrite_kind(prev, CellKind::Normal);
        }
        self.obstacles.shift_remove(&idx);
        self.overwrite_kind(idx, CellKind::Start);
        self.start_idx = Some(idx);
        tracing::debug!(?idx, "start cell set");
        Ok(())
    }

    /// Replace the prior End cell (if any) with Normal, then mark the cell
    /// at `idx` as End.
    pub fn set_end(&mut self, idx: CellIndex) -> Result<()> {
        self.cell_at(idx)?;
        if let Some(prev) = self.end_idx.take() {
            self.overwrite_kind(prev, CellKind::Normal);
        }
        self.obstacles.shift_remove(&idx);
        self.overwrite_kind(idx, CellKind::End);
        self.end_idx = Some(idx);
        tracing::debug!(?idx, "end cell set");
        Ok(())
    }

    /// Turn the cell at `idx` into an Obstacle.
    ///
    /// Fails with [`GridWorldError::ForbiddenObstacle`] if `idx` is the
    /// Start or End cell. A no-op (returns `Ok`) if `idx` is already an
    /// Obstacle.
    pub fn add_obstacle(&mut self, idx: CellIndex) -> Result<()> {
        self.cell_at(idx)?;
        if self.start_idx == Some(idx) || self.end_idx == Some(idx) {
            return Err(GridWorldError::ForbiddenObstacle(idx));
        }
        if self.obstacles.contains(&idx) {
            tracing::warn!(?idx, "obstacle already present, ignoring");
            return Ok(());
        }
        self.overwrite_kind(idx, CellKind::Obstacle);
        self.obstacles.insert(idx);
        tracing::debug!(?idx, "obstacle added");
        Ok(())
    }

    fn overwrite_kind(&mut self, idx: CellIndex, kind: CellKind) {
        if let Some(cell) = self.get_cell_mut(idx) {
            cell.set_kind(kind);
        }
    }

    /// Convert a cell index into the real-valued coordinate of its south-west anchor.
    #[inline]
    #[must_use]
    pub fn convert_index_to_point(&self, idx: CellIndex) -> Point {
        Point::new(
            self.origin.x() + idx.c() as f32 * self.step.x(),
            self.origin.y() + idx.r() as f32 * self.step.y(),
        )
    }

    /// Classify a point relative to the grid lines: is it a corner, does it
    /// lie on a horizontal and/or vertical grid line, and which cell is it
    /// nearest to.
    #[must_use]
    pub fn classify(&self, p: Point) -> Classification {
        let c = ((p.x() - self.origin.x()) / self.step.x()).floor() as i32;
        let r = ((p.y() - self.origin.y()) / self.step.y()).floor() as i32;
        let nearest_idx = CellIndex::new(r, c);
        let anchor = self.convert_index_to_point(nearest_idx);

        let on_horizontal_edge = p.y() == anchor.y();
        let on_vertical_edge = p.x() == anchor.x();

        Classification {
            is_corner: on_horizontal_edge && on_vertical_edge,
            on_horizontal_edge,
            on_vertical_edge,
            nearest_idx,
        }
    }

    #[must_use]
    pub fn is_east_boundary(&self, p: Point, eps: f32) -> bool {
        bounded_eq(p.x(), self.corners[1].x(), eps)
    }

    #[must_use]
    pub fn is_north_boundary(&self, p: Point, eps: f32) -> bool {
        bounded_eq(p.y(), self.corners[2].y(), eps)
    }

    #[must_use]
    pub fn is_west_boundary(&self, p: Point, eps: f32) -> bool {
        bounded_eq(p.x(), self.corners[0].x(), eps)
    }

    #[must_use]
    pub fn is_south_boundary(&self, p: Point, eps: f32) -> bool {
        bounded_eq(p.y(), self.corners[0].y(), eps)
    }

    /// True when `p` is at or beyond any of the map's four boundaries.
    #[must_use]
    pub fn is_out_of_or_on_boundary(&self, p: Point) -> bool {
        p.x() <= self.corners[0].x()
            || p.x() >= self.corners[1].x()
            || p.y() <= self.corners[0].y()
            || p.y() >= self.corners[2].y()
    }

    /// True when `p` is strictly beyond any of the map's four boundaries
    /// (exact boundary points are excluded).
    #[must_use]
    pub fn is_out_of_boundary(&self, p: Point) -> bool {
        p.x() < self.corners[0].x()
            || p.x() > self.corners[1].x()
            || p.y() < self.corners[0].y()
            || p.y() > self.corners[2].y()
    }

    /// True if `p` lies strictly inside the End cell.
    #[must_use]
    pub fn is_inside_end_cell(&self, p: Point) -> bool {
        if self.is_out_of_or_on_boundary(p) {
            return false;
        }
        let cls = self.classify(p);
        if cls.is_corner || cls.on_horizontal_edge || cls.on_vertical_edge {
            return false;
        }
        matches!(self.end_idx, Some(idx) if idx == cls.nearest_idx)
    }

    /// Attribute a scalar value to `p`, summing contributions from every
    /// cell it touches.
    ///
    /// Fails with [`GridWorldError::OutOfMap`] if `p` is strictly outside
    /// the map (exact boundary points are still evaluable).
    pub fn evaluate(&self, p: Point) -> Result<f32> {
        if self.is_out_of_boundary(p) {
            return Err(GridWorldError::OutOfMap { x: p.x(), y: p.y() });
        }

        let cls = self.classify(p);
        let idx = cls.nearest_idx;

        let indices: Vec<CellIndex> = if cls.is_corner {
            vec![idx, idx.west(), idx.west().south(), idx.south()]
        } else if cls.on_horizontal_edge {
            vec![idx, idx.south()]
        } else if cls.on_vertical_edge {
            vec![idx, idx.west()]
        } else {
            vec![idx]
        };

        Ok(self.sum_block_values(&indices))
    }

    /// The block-value summation rule: out-of-grid neighbors contribute
    /// `out_of_bounds_value` once no matter how many there are; every
    /// Obstacle neighbor contributes its own value; all remaining
    /// (Normal/Start/End) neighbors collectively contribute a single
    /// representative value.
    fn sum_block_values(&self, indices: &[CellIndex]) -> f32 {
        if let [single] = indices {
            return match self.get_cell(*single) {
                Some(cell) => cell.value(),
                None => self.out_of_bounds_value,
            };
        }

        let mut total = 0.;
        let mut saw_out_of_bounds = false;
        let mut normal_value: Option<f32> = None;

        for &idx in indices {
            match self.get_cell(idx) {
                None => saw_out_of_bounds = true,
                Some(cell) if cell.kind().is_obstacle() => total += cell.value(),
                Some(cell) => {
                    if normal_value.is_none() {
                        normal_value = Some(cell.value());
                    }
                }
            }
        }

        debug_assert!(
            saw_out_of_bounds || normal_value.is_some() || indices.iter().any(|i| self.get_cell(*i).is_some_and(|c| c.kind().is_obstacle())),
            "no neighbor recognized for {indices:?}"
        );

        if saw_out_of_bounds {
            total += self.out_of_bounds_value;
        }
        if let Some(v) = normal_value {
            total += v;
        }
        total
    }
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GridMap \"{}\"", self.name)?;
        writeln!(
            f,
            "r = {}, c = {}. origin = ({}, {}), step = ({}, {})",
            self.rows,
            self.cols,
            self.origin.x(),
            self.origin.y(),
            self.step.x(),
            self.step.y()
        )?;
        match self.start_idx {
            Some(idx) => writeln!(f, "starting cell at {idx:?}")?,
            None => writeln!(f, "no starting cell")?,
        }
        match self.end_idx {
            Some(idx) => writeln!(f, "ending cell at {idx:?}")?,
            None => writeln!(f, "no ending cell")?,
        }
        writeln!(f, "{} obstacles", self.obstacles.len())?;
        write!(f, "corners: {:?}", self.corners)
    }
}

#[inline]
fn bounded_eq(a: f32, b: f32, eps: f32) -> bool {
    debug_assert!(eps >= 0.);
    if eps == 0. {
        a == b
    } else {
        (a - b).abs() < eps
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scenario_map() -> GridMap {
        let mut map = GridMap::new(
            10,
            20,
            Point::new(0., 0.),
            Point::new(1., 1.),
            "scenario",
            -200.,
        )
        .unwrap();
        map.initialize(1.).unwrap();
        map.set_start(CellIndex::new(0, 0)).unwrap();
        map.set_end(CellIndex::new(9, 19)).unwrap();
        map.add_obstacle(CellIndex::new(4, 10)).unwrap();
        map.add_obstacle(CellIndex::new(5, 10)).unwrap();
        map.add_obstacle(CellIndex::new(6, 10)).unwrap();
        map
    }

    #[test]
    fn test_scenario_1_corner_with_start_and_three_oob() {
        let map = scenario_map();
        assert_eq!(map.evaluate(Point::new(0., 0.)).unwrap(), -200.);
    }

    #[test]
    fn test_scenario_2_corner_touching_two_obstacles_and_two_normals() {
        let map = scenario_map();
        assert_eq!(map.evaluate(Point::new(10., 5.)).unwrap(), -199.);
    }

    #[test]
    fn test_scenario_3_horizontal_edge_between_two_obstacles() {
        let map = scenario_map();
        assert_eq!(map.evaluate(Point::new(10.5, 5.)).unwrap(), -200.);
    }

    #[test]
    fn test_scenario_4_interior_of_obstacle() {
        let map = scenario_map();
        assert_eq!(map.evaluate(Point::new(10.99, 5.99)).unwrap(), -100.);
    }

    #[test]
    fn test_scenario_5_strict_exterior_fails() {
        let map = scenario_map();
        assert!(matches!(
            map.evaluate(Point::new(-1., -1.)),
            Err(GridWorldError::OutOfMap { .. })
        ));
    }

    #[test]
    fn test_obstacle_forbidden_on_start_and_end() {
        let mut map = scenario_map();
        assert!(matches!(
            map.add_obstacle(CellIndex::new(0, 0)),
            Err(GridWorldError::ForbiddenObstacle(_))
        ));
        assert!(matches!(
            map.add_obstacle(CellIndex::new(9, 19)),
            Err(GridWorldError::ForbiddenObstacle(_))
        ));
    }

    #[test]
    fn test_add_obstacle_twice_is_a_no_op() {
        let mut map = scenario_map();
        assert!(map.add_obstacle(CellIndex::new(4, 10)).is_ok());
        assert_eq!(map.obstacles().len(), 3);
    }

    #[test]
    fn test_initialize_twice_fails() {
        let mut map = GridMap::new(2, 2, Point::new(0., 0.), Point::new(1., 1.), "m", -1.).unwrap();
        map.initialize(1.).unwrap();
        assert!(matches!(
            map.initialize(1.),
            Err(GridWorldError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_classify_round_trip() {
        let map = scenario_map();
        let idx = CellIndex::new(4, 10);
        let p = map.convert_index_to_point(idx);
        let cls = map.classify(p);
        assert_eq!(cls.nearest_idx, idx);
        assert!(cls.is_corner);
    }

    #[test]
    fn test_out_of_or_on_boundary_vs_out_of_boundary_disagree_on_edge() {
        let map = scenario_map();
        let east_edge = Point::new(20., 5.);
        assert!(map.is_out_of_or_on_boundary(east_edge));
        assert!(!map.is_out_of_boundary(east_edge));
    }
}
