//! RON-backed save and load for [`GridMap`] and [`Environment`].
//!
//! This is a codec, not a storage layer: it has no opinion on where the RON
//! text lives (file, socket, test fixture). Field names match the layout
//! used by the system this crate's data model is derived from, so documents
//! produced by that system's map editor remain loadable here.

use crate::{
    CellIndex, Displacement, Environment, GridMap, GridWorldError, Point, Result,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct GridMapDoc {
    name: String,
    rows: i32,
    cols: i32,
    origin: [f32; 2],
    #[serde(rename = "stepSize")]
    step_size: [f32; 2],
    #[serde(rename = "outOfBoundValue")]
    out_of_bound_value: f32,
    #[serde(rename = "haveStartingBlock")]
    have_starting_block: bool,
    #[serde(rename = "startingBlockIdx")]
    starting_block_idx: [i32; 2],
    #[serde(rename = "haveEndingBlock")]
    have_ending_block: bool,
    #[serde(rename = "endingBlockIdx")]
    ending_block_idx: [i32; 2],
    #[serde(rename = "obstacleIndices")]
    obstacle_indices: Vec<[i32; 2]>,
}

#[derive(Serialize, Deserialize)]
struct EnvironmentDoc {
    #[serde(rename = "mapFn")]
    map_fn: String,
    #[serde(rename = "maxSteps")]
    max_steps: u32,
    #[serde(rename = "visAgentRadius")]
    vis_agent_radius: f32,
    #[serde(rename = "visPathArrowWidth")]
    vis_path_arrow_width: f32,
    #[serde(rename = "agentCurrentLoc")]
    agent_current_loc: [f32; 2],
    #[serde(rename = "agentCurrentAct")]
    agent_current_act: [f32; 2],
    #[serde(rename = "agentLocs")]
    agent_locs: Vec<[f32; 2]>,
    #[serde(rename = "agentActs")]
    agent_acts: Vec<[f32; 2]>,
    #[serde(rename = "isTerminated")]
    is_terminated: bool,
    #[serde(rename = "nSteps")]
    n_steps: u32,
    #[serde(rename = "totalValue")]
    total_value: f32,
}

/// Serialize `map` to a RON document.
pub fn save_map(map: &GridMap) -> Result<String> {
    let doc = GridMapDoc {
        name: map.name().to_string(),
        rows: map.rows(),
        cols: map.cols(),
        origin: [map.origin().x(), map.origin().y()],
        step_size: [map.step_size().x(), map.step_size().y()],
        out_of_bound_value: map.out_of_bounds_value(),
        have_starting_block: map.start_idx().is_some(),
        starting_block_idx: idx_to_pair(map.start_idx()),
        have_ending_block: map.end_idx().is_some(),
        ending_block_idx: idx_to_pair(map.end_idx()),
        obstacle_indices: map.obstacles().iter().map(|idx| [idx.r(), idx.c()]).collect(),
    };
    ron::to_string(&doc).map_err(|e| GridWorldError::MalformedPersistedState(e.to_string()))
}

/// Reconstruct a [`GridMap`] from a RON document produced by [`save_map`].
///
/// The document carries only the map's structure (shape, origin, step,
/// starting/ending/obstacle indices), not per-cell values: the map is
/// re-initialized with Normal's default value and the recorded cells are
/// overwritten to their kinds, exactly as the originating editor would
/// replay them.
pub fn load_map(data: &str) -> Result<GridMap> {
    let doc: GridMapDoc =
        ron::from_str(data).map_err(|e| GridWorldError::MalformedPersistedState(e.to_string()))?;

    let mut map = GridMap::new(
        doc.rows,
        doc.cols,
        Point::new(doc.origin[0], doc.origin[1]),
        Point::new(doc.step_size[0], doc.step_size[1]),
        doc.name,
        doc.out_of_bound_value,
    )?;
    map.initialize(crate::CellKind::Normal.default_value())?;

    for [r, c] in doc.obstacle_indices {
        map.add_obstacle(CellIndex::new(r, c))?;
    }
    if doc.have_starting_block {
        let [r, c] = doc.starting_block_idx;
        map.set_start(CellIndex::new(r, c))?;
    }
    if doc.have_ending_block {
        let [r, c] = doc.ending_block_idx;
        map.set_end(CellIndex::new(r, c))?;
    }

    Ok(map)
}

/// Serialize `env`'s episode state to a RON document.
///
/// Fails with [`GridWorldError::MissingMap`] if `env` has no map bound,
/// since the document's `mapFn` field is meaningless without one.
pub fn save_environment(env: &Environment, map_fn: impl Into<String>) -> Result<String> {
    env.map().ok_or(GridWorldError::MissingMap)?;

    let act = env.act_history().last().copied().unwrap_or_default();
    let doc = EnvironmentDoc {
        map_fn: map_fn.into(),
        max_steps: env.max_steps(),
        vis_agent_radius: env.agent_radius(),
        vis_path_arrow_width: env.path_arrow_width(),
        agent_current_loc: [env.agent_current().x(), env.agent_current().y()],
        agent_current_act: [act.dx(), act.dy()],
        agent_locs: env.loc_history().iter().map(|p| [p.x(), p.y()]).collect(),
        agent_acts: env.act_history().iter().map(|d| [d.dx(), d.dy()]).collect(),
        is_terminated: env.is_terminated(),
        n_steps: env.n_steps(),
        total_value: env.total_value(),
    };
    ron::to_string(&doc).map_err(|e| GridWorldError::MalformedPersistedState(e.to_string()))
}

/// Reconstruct an [`Environment`] from a RON document produced by
/// [`save_environment`], bound to `map`.
///
/// The document's `mapFn` field is informational only: the caller supplies
/// the already-loaded `map` directly rather than this function resolving a
/// path itself.
pub fn load_environment(data: &str, name: impl Into<String>, map: GridMap) -> Result<Environment> {
    let doc: EnvironmentDoc =
        ron::from_str(data).map_err(|e| GridWorldError::MalformedPersistedState(e.to_string()))?;

    let mut env = Environment::with_map(name, map);
    let current_action = if doc.n_steps > 0 {
        Some(Displacement::new(doc.agent_current_act[0], doc.agent_current_act[1]))
    } else {
        None
    };
    env.restore(
        doc.max_steps,
        doc.vis_agent_radius,
        doc.vis_path_arrow_width,
        Point::new(doc.agent_current_loc[0], doc.agent_current_loc[1]),
        current_action,
        doc.agent_locs.into_iter().map(Point::from).collect(),
        doc.agent_acts
            .into_iter()
            .map(|[dx, dy]| Displacement::new(dx, dy))
            .collect(),
        doc.n_steps,
        doc.total_value,
        doc.is_terminated,
    );
    Ok(env)
}

fn idx_to_pair(idx: Option<CellIndex>) -> [i32; 2] {
    match idx {
        Some(idx) => [idx.r(), idx.c()],
        None => [0, 0],
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scenario_map() -> GridMap {
        let mut map =
            GridMap::new(10, 20, Point::new(0., 0.), Point::new(1., 1.), "scenario", -200.)
                .unwrap();
        map.initialize(1.).unwrap();
        map.set_start(CellIndex::new(0, 0)).unwrap();
        map.set_end(CellIndex::new(9, 19)).unwrap();
        map.add_obstacle(CellIndex::new(4, 10)).unwrap();
        map.add_obstacle(CellIndex::new(5, 10)).unwrap();
        map
    }

    #[test]
    fn test_map_round_trip_preserves_structure() {
        let map = scenario_map();
        let doc = save_map(&map).unwrap();
        let restored = load_map(&doc).unwrap();

        assert_eq!(restored.rows(), map.rows());
        assert_eq!(restored.cols(), map.cols());
        assert_eq!(restored.start_idx(), map.start_idx());
        assert_eq!(restored.end_idx(), map.end_idx());
        assert_eq!(restored.obstacles().len(), map.obstacles().len());
        assert_eq!(restored.evaluate(Point::new(10., 5.)).unwrap(), -199.);
    }

    #[test]
    fn test_environment_round_trip_preserves_episode_state() {
        let mut env = Environment::with_map("test-env", scenario_map());
        env.reset().unwrap();
        env.step(Displacement::new(1., 0.)).unwrap();
        env.step(Displacement::new(0., 1.)).unwrap();

        let doc = save_environment(&env, "scenario.ron").unwrap();
        let restored = load_environment(&doc, "test-env", scenario_map()).unwrap();

        assert_eq!(restored.agent_current(), env.agent_current());
        assert_eq!(restored.n_steps(), env.n_steps());
        assert_eq!(restored.total_value(), env.total_value());
        assert_eq!(restored.loc_history(), env.loc_history());
        assert_eq!(restored.is_terminated(), env.is_terminated());
    }

    #[test]
    fn test_save_environment_without_map_fails() {
        let env = Environment::new("no-map");
        assert!(matches!(
            save_environment(&env, "x.ron"),
            Err(GridWorldError::MissingMap)
        ));
    }
}
