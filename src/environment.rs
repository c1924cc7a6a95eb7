//! The episode state machine that drives the [resolver](crate::resolver)
//! step by step: `Fresh -> Active -> Terminated`.

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::{resolver, Displacement, GridMap, GridWorldError, Point, Result};
use std::fmt;

/// Where an [`Environment`] sits in its episode lifecycle.
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EnvPhase {
    #[default]
    Fresh,
    Active,
    Terminated,
}

/// Episode state machine wrapping a [`GridMap`].
///
/// `reset()` seeds the agent at the Start cell's center; `step()` drives the
/// [resolver](crate::resolver) and accumulates reward until termination.
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Environment {
    name: String,
    map: Option<GridMap>,
    phase: EnvPhase,
    agent_start: Option<Point>,
    agent_current: Point,
    current_action: Option<Displacement>,
    loc_history: Vec<Point>,
    act_history: Vec<Displacement>,
    n_steps: u32,
    max_steps: u32,
    total_value: f32,
    vis_agent_radius: f32,
    vis_path_arrow_width: f32,
}

impl Environment {
    /// Create an environment with no map bound yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            map: None,
            phase: EnvPhase::Fresh,
            agent_start: None,
            agent_current: Point::ZERO,
            current_action: None,
            loc_history: Vec::new(),
            act_history: Vec::new(),
            n_steps: 0,
            max_steps: 0,
            total_value: 0.,
            vis_agent_radius: 0.,
            vis_path_arrow_width: 0.,
        }
    }

    /// Create an environment already bound to `map`.
    #[must_use]
    pub fn with_map(name: impl Into<String>, map: GridMap) -> Self {
        let mut env = Self::new(name);
        env.map = Some(map);
        env
    }

    #[inline]
    pub fn set_map(&mut self, map: GridMap) {
        self.map = Some(map);
    }

    #[inline]
    #[must_use]
    pub fn map(&self) -> Option<&GridMap> {
        self.map.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> EnvPhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.phase == EnvPhase::Terminated
    }

    #[inline]
    pub fn set_max_steps(&mut self, max_steps: u32) {
        self.max_steps = max_steps;
    }

    #[inline]
    #[must_use]
    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    #[inline]
    #[must_use]
    pub fn n_steps(&self) -> u32 {
        self.n_steps
    }

    #[inline]
    #[must_use]
    pub fn total_value(&self) -> f32 {
        self.total_value
    }

    #[inline]
    #[must_use]
    pub fn agent_current(&self) -> Point {
        self.agent_current
    }

    #[inline]
    #[must_use]
    pub fn agent_start(&self) -> Option<Point> {
        self.agent_start
    }

    #[inline]
    #[must_use]
    pub fn loc_history(&self) -> &[Point] {
        &self.loc_history
    }

    #[inline]
    #[must_use]
    pub fn act_history(&self) -> &[Displacement] {
        &self.act_history
    }

    /// Radius to draw the agent at, scaled off the map's step size. A
    /// presentation knob only: not part of the episode's core contract.
    #[inline]
    #[must_use]
    pub fn agent_radius(&self) -> f32 {
        self.vis_agent_radius
    }

    /// Width to draw the agent's path arrows at.
    #[inline]
    #[must_use]
    pub fn path_arrow_width(&self) -> f32 {
        self.vis_path_arrow_width
    }

    /// Transition to Active: seed the agent at the Start cell's center and
    /// clear histories and counters.
    ///
    /// Fails with [`GridWorldError::MissingMap`] if no map is bound, or
    /// [`GridWorldError::MissingStart`] if the map has no Start cell set.
    pub fn reset(&mut self) -> Result<()> {
        let map = self.map.as_ref().ok_or(GridWorldError::MissingMap)?;
        let start_idx = map.start_idx().ok_or(GridWorldError::MissingStart)?;

        let anchor = map.convert_index_to_point(start_idx);
        let step = map.step_size();
        let start = Point::new(anchor.x() + step.x() / 2., anchor.y() + step.y() / 2.);

        self.agent_start = Some(start);
        self.agent_current = start;
        self.current_action = None;
        self.loc_history = vec![start];
        self.act_history = Vec::new();
        self.n_steps = 0;
        self.total_value = 0.;
        self.phase = EnvPhase::Active;

        let (w, h) = (step.x(), step.y());
        if w <= h {
            self.vis_agent_radius = w / 10.;
            self.vis_path_arrow_width = w / 10.;
        } else {
            self.vis_agent_radius = h / 10.;
            self.vis_path_arrow_width = w / 10.;
        }

        tracing::info!(name = %self.name, start = ?start, "environment reset");
        Ok(())
    }

    /// Advance one step by resolving `action` against the bound map.
    ///
    /// Returns the new agent position, the step's reward, and whether the
    /// episode is now terminated. Fails with
    /// [`GridWorldError::EpisodeTerminated`] if already terminated, or
    /// [`GridWorldError::MissingMap`] if no map is bound.
    pub fn step(&mut self, action: Displacement) -> Result<(Point, f32, bool)> {
        if self.phase == EnvPhase::Terminated {
            return Err(GridWorldError::EpisodeTerminated);
        }
        let map = self.map.as_ref().ok_or(GridWorldError::MissingMap)?;

        let motion = resolver::resolve(map, self.agent_current, action)?;

        self.agent_current = motion.point;
        self.current_action = Some(action);
        self.loc_history.push(motion.point);
        self.act_history.push(action);
        self.n_steps += 1;
        self.total_value += motion.reward;

        let step_capped = self.max_steps > 0 && self.n_steps >= self.max_steps;
        if motion.terminated || step_capped {
            self.phase = EnvPhase::Terminated;
        }

        tracing::debug!(
            point = ?motion.point,
            reward = motion.reward,
            terminated = self.is_terminated(),
            "environment step"
        );

        Ok((motion.point, motion.reward, self.is_terminated()))
    }

    /// Overwrite every episode field from a previously persisted snapshot.
    ///
    /// Used only by the [persistence collaborator](crate::persist); a map
    /// must already be bound via [`Environment::set_map`] or
    /// [`Environment::with_map`] before restoring onto it.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        &mut self,
        max_steps: u32,
        vis_agent_radius: f32,
        vis_path_arrow_width: f32,
        agent_current: Point,
        current_action: Option<Displacement>,
        loc_history: Vec<Point>,
        act_history: Vec<Displacement>,
        n_steps: u32,
        total_value: f32,
        terminated: bool,
    ) {
        self.max_steps = max_steps;
        self.vis_agent_radius = vis_agent_radius;
        self.vis_path_arrow_width = vis_path_arrow_width;
        self.agent_start = loc_history.first().copied();
        self.agent_current = agent_current;
        self.current_action = current_action;
        self.loc_history = loc_history;
        self.act_history = act_history;
        self.n_steps = n_steps;
        self.total_value = total_value;
        self.phase = if terminated {
            EnvPhase::Terminated
        } else {
            EnvPhase::Active
        };
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Environment \"{}\"", self.name)?;
        match &self.map {
            Some(map) => writeln!(f, "map: {}", map.name())?,
            None => writeln!(f, "(no map)")?,
        }
        writeln!(f, "phase = {:?}, maxSteps = {}", self.phase, self.max_steps)?;
        writeln!(
            f,
            "nSteps = {}, totalValue = {}",
            self.n_steps, self.total_value
        )?;
        write!(f, "agentCurrent = {:?}", self.agent_current)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::CellIndex;

    fn scenario_env() -> Environment {
        let mut map =
            GridMap::new(10, 20, Point::new(0., 0.), Point::new(1., 1.), "scenario", -200.)
                .unwrap();
        map.initialize(1.).unwrap();
        map.set_start(CellIndex::new(0, 0)).unwrap();
        map.set_end(CellIndex::new(9, 19)).unwrap();
        map.add_obstacle(CellIndex::new(4, 10)).unwrap();
        Environment::with_map("test-env", map)
    }

    #[test]
    fn test_reset_without_map_fails() {
        let mut env = Environment::new("no-map");
        assert!(matches!(env.reset(), Err(GridWorldError::MissingMap)));
    }

    #[test]
    fn test_reset_without_start_fails() {
        let mut map = GridMap::new(2, 2, Point::new(0., 0.), Point::new(1., 1.), "m", -1.).unwrap();
        map.initialize(1.).unwrap();
        let mut env = Environment::with_map("no-start", map);
        assert!(matches!(env.reset(), Err(GridWorldError::MissingStart)));
    }

    #[test]
    fn test_reset_seeds_agent_at_start_center() {
        let mut env = scenario_env();
        env.reset().unwrap();
        assert_eq!(env.agent_current(), Point::new(0.5, 0.5));
        assert_eq!(env.loc_history(), &[Point::new(0.5, 0.5)]);
        assert_eq!(env.n_steps(), 0);
    }

    #[test]
    fn test_step_after_termination_fails() {
        let mut env = scenario_env();
        env.reset().unwrap();
        env.set_max_steps(1);
        let (_, _, terminated) = env.step(Displacement::new(1., 0.)).unwrap();
        assert!(terminated);
        assert!(matches!(
            env.step(Displacement::new(1., 0.)),
            Err(GridWorldError::EpisodeTerminated)
        ));
    }

    #[test]
    fn test_step_accumulates_total_value() {
        let mut env = scenario_env();
        env.reset().unwrap();
        let (point, reward, _) = env.step(Displacement::new(1., 0.)).unwrap();
        assert_eq!(point, Point::new(1.5, 0.5));
        assert_eq!(reward, 1.);
        assert_eq!(env.total_value(), 1.);
        assert_eq!(env.n_steps(), 1);
    }
}
