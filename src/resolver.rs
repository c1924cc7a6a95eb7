//! The continuous-motion resolver: walks a displacement across grid lines,
//! stopping at the first obstacle or map boundary it meets.

use crate::line_intersect::intersect_lines;
use crate::passability::{can_move, touched_cells};
use crate::{CellIndex, Classification, Direction, Displacement, GridMap, GridWorldError, Point, Result};

/// Candidate events farther than this past the destination (in units of the
/// segment's own parametric `t`) are treated as never reached.
const OVERSHOOT_EPS: f32 = 1e-4;

/// The outcome of resolving one step of motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMotion {
    pub point: Point,
    pub reward: f32,
    pub terminated: bool,
}

/// Resolve motion from `origin` by displacement `v` against `map`.
///
/// A pure function of its three arguments: no state is retained between
/// calls. Fails with [`GridWorldError::InvalidArgument`] if `v` is the zero
/// displacement, since it has no direction to test passability against.
pub fn resolve(map: &GridMap, origin: Point, v: Displacement) -> Result<ResolvedMotion> {
    let dir = v
        .direction()
        .ok_or_else(|| GridWorldError::InvalidArgument("displacement must be nonzero".into()))?;

    if !can_move(map, origin, dir) {
        return finish(map, origin);
    }

    let target = origin + v;
    let final_point = walk(map, origin, target, v, dir);
    finish(map, final_point)
}

fn walk(map: &GridMap, origin: Point, target: Point, v: Displacement, dir: Direction) -> Point {
    // Generous defensive bound: a well-formed map can cross at most one grid
    // line per row and one per column before running off the map entirely.
    let max_iters = (map.rows() + map.cols()) as usize * 2 + 4;
    let mut p = origin;

    for _ in 0..max_iters {
        let cls = map.classify(p);
        let idx = cls.nearest_idx;

        let x_v = next_vertical_line_x(map, idx, &cls, v.dx());
        let y_h = next_horizontal_line_y(map, idx, &cls, v.dy());

        let v_candidate = x_v
            .and_then(|x| {
                intersect_lines(origin, target, Point::new(x, 0.), Point::new(x, 1.)).point()
            })
            .filter(|&q| !overshoots(origin, v, q));
        let h_candidate = y_h
            .and_then(|y| {
                intersect_lines(origin, target, Point::new(0., y), Point::new(1., y)).point()
            })
            .filter(|&q| !overshoots(origin, v, q));

        let chosen = match (h_candidate, v_candidate) {
            (None, None) => return target,
            (Some(h), None) => h,
            (None, Some(vv)) => vv,
            (Some(h), Some(vv)) => {
                if p.distance_to(h) <= p.distance_to(vv) {
                    h
                } else {
                    vv
                }
            }
        };

        if map.is_out_of_or_on_boundary(chosen) {
            return chosen;
        }

        let q_cls = map.classify(chosen);
        let touched = touched_cells(
            q_cls.nearest_idx,
            q_cls.is_corner,
            q_cls.on_horizontal_edge,
            q_cls.on_vertical_edge,
            dir,
        );
        if touched.iter().any(|&i| map.is_obstacle_at(i)) {
            return chosen;
        }

        p = chosen;
    }

    tracing::warn!("motion resolver exceeded its iteration cap, stopping defensively");
    p
}

/// True when `q`, expressed as a point on the line through `origin` in
/// direction `v`, lies beyond `origin + v` — a grid line the agent's
/// displacement isn't long enough to actually reach.
fn overshoots(origin: Point, v: Displacement, q: Point) -> bool {
    let t = if v.dx() != 0. {
        (q.x() - origin.x()) / v.dx()
    } else {
        (q.y() - origin.y()) / v.dy()
    };
    t > 1. + OVERSHOOT_EPS
}

#[inline]
fn next_vertical_line_x(map: &GridMap, idx: CellIndex, cls: &Classification, dx: f32) -> Option<f32> {
    if dx > 0. {
        Some(map.origin().x() + (idx.c() + 1) as f32 * map.step_size().x())
    } else if dx < 0. {
        let col = if cls.on_vertical_edge {
            idx.c() - 1
        } else {
            idx.c()
        };
        Some(map.origin().x() + col as f32 * map.step_size().x())
    } else {
        None
    }
}

/// Next horizontal grid line ahead, mirroring [`next_vertical_line_x`]: when
/// already standing on a horizontal edge and moving further down, `idx`
/// denotes the row whose south edge the point sits on, so the next line
/// south belongs to `idx.south()`.
#[inline]
fn next_horizontal_line_y(
    map: &GridMap,
    idx: CellIndex,
    cls: &Classification,
    dy: f32,
) -> Option<f32> {
    if dy > 0. {
        Some(map.origin().y() + (idx.r() + 1) as f32 * map.step_size().y())
    } else if dy < 0. {
        let row = if cls.on_horizontal_edge {
            idx.r() - 1
        } else {
            idx.r()
        };
        Some(map.origin().y() + row as f32 * map.step_size().y())
    } else {
        None
    }
}

fn finish(map: &GridMap, point: Point) -> Result<ResolvedMotion> {
    let reward = map.evaluate(point)?;
    let terminated = map.is_inside_end_cell(point);
    Ok(ResolvedMotion {
        point,
        reward,
        terminated,
    })
}
