//! Directional passability: can an agent begin moving from a point in a
//! given compass direction without immediately crossing into an Obstacle
//! or off the edge of the map.

use crate::{CellIndex, Direction, GridMap, Point};

/// Answers "can the agent leave `p` heading in direction `d`" for the map.
///
/// A pure function of the map and the point: no state beyond its inputs.
#[must_use]
pub fn can_move(map: &GridMap, p: Point, dir: Direction) -> bool {
    if blocked_by_boundary(map, p, dir) {
        return false;
    }

    let cls = map.classify(p);
    touched_cells(cls.nearest_idx, cls.is_corner, cls.on_horizontal_edge, cls.on_vertical_edge, dir)
        .iter()
        .all(|&idx| map.is_passable(idx))
}

/// Leaving `p` toward `dir` would immediately cross a boundary the agent
/// cannot cross, independent of what lies beyond it.
fn blocked_by_boundary(map: &GridMap, p: Point, dir: Direction) -> bool {
    let e = map.is_east_boundary(p, 0.);
    let n = map.is_north_boundary(p, 0.);
    let w = map.is_west_boundary(p, 0.);
    let s = map.is_south_boundary(p, 0.);

    use Direction::*;
    match dir {
        East => e || n || s,
        North => n || e || w,
        West => w || n || s,
        South => s || e || w,
        NorthEast => n || e,
        NorthWest => n || w,
        SouthEast => s || e,
        SouthWest => s || w,
    }
}

/// The cells that would be immediately adjoined by motion in `dir` from a
/// point classified as `(is_corner, on_horizontal_edge, on_vertical_edge)`
/// nearest to `idx`.
///
/// Shared with the [resolver](crate::resolver), which consults the same
/// table at each grid-line event it crosses.
pub(crate) fn touched_cells(
    idx: CellIndex,
    is_corner: bool,
    on_horizontal_edge: bool,
    on_vertical_edge: bool,
    dir: Direction,
) -> Vec<CellIndex> {
    use Direction::*;

    if is_corner {
        match dir {
            East => vec![idx, idx.south()],
            NorthEast => vec![idx],
            North => vec![idx, idx.west()],
            NorthWest => vec![idx.west()],
            West => vec![idx.west(), idx.west().south()],
            SouthWest => vec![idx.west().south()],
            South => vec![idx.south(), idx.west().south()],
            SouthEast => vec![idx.south()],
        }
    } else if on_horizontal_edge {
        match dir {
            East => vec![idx, idx.south()],
            NorthEast => vec![idx],
            North => vec![idx],
            NorthWest => vec![idx.west()],
            West => vec![idx.west(), idx.west().south()],
            SouthWest => vec![idx.west().south()],
            South => vec![idx.south()],
            SouthEast => vec![idx.south()],
        }
    } else if on_vertical_edge {
        match dir {
            East => vec![idx],
            NorthEast => vec![idx],
            North => vec![idx, idx.west()],
            NorthWest => vec![idx.west()],
            West => vec![idx.west()],
            SouthWest => vec![idx.west()],
            South => vec![idx, idx.west()],
            SouthEast => vec![idx],
        }
    } else {
        vec![idx]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Point as P;

    fn scenario_map() -> GridMap {
        let mut map =
            GridMap::new(10, 20, P::new(0., 0.), P::new(1., 1.), "scenario", -200.).unwrap();
        map.initialize(1.).unwrap();
        map.set_start(CellIndex::new(0, 0)).unwrap();
        map.set_end(CellIndex::new(9, 19)).unwrap();
        map.add_obstacle(CellIndex::new(4, 10)).unwrap();
        map.add_obstacle(CellIndex::new(5, 10)).unwrap();
        map.add_obstacle(CellIndex::new(6, 10)).unwrap();
        map
    }

    #[test]
    fn test_cannot_leave_via_south_boundary() {
        let map = scenario_map();
        assert!(!can_move(&map, P::new(5., 0.), Direction::South));
        assert!(!can_move(&map, P::new(0., 0.), Direction::SouthWest));
    }

    #[test]
    fn test_blocked_by_obstacle_on_its_west_face() {
        let map = scenario_map();
        // (10, 4.5) is the vertical edge shared by obstacle (4,10) and clear (4,9).
        assert!(!can_move(&map, P::new(10., 4.5), Direction::East));
        assert!(can_move(&map, P::new(10., 4.5), Direction::West));
    }

    #[test]
    fn test_interior_point_not_blocked_in_clear_cell() {
        let map = scenario_map();
        assert!(can_move(&map, P::new(5.5, 5.5), Direction::North));
        assert!(can_move(&map, P::new(5.5, 5.5), Direction::NorthEast));
    }

    #[test]
    fn test_corner_touching_obstacle_blocks_toward_it() {
        let map = scenario_map();
        // corner (10, 5) touches obstacle (4,10) to its south-east-ish quadrant: (r-1,c) = (4,10).
        assert!(!can_move(&map, P::new(10., 5.), Direction::South));
    }
}
