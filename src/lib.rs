//! grid_world_env
//! ==============
//!
//! A 2D grid-world environment for reinforcement-learning-style agent
//! navigation. A rectangular [`GridMap`] is tiled with unit cells of four
//! semantic kinds (normal, obstacle, starting, ending); an [`Environment`]
//! holds an agent in continuous Euclidean coordinates, advancing it along a
//! straight line per step via the [motion resolver](resolver), stopping at
//! the first obstacle or map boundary, and accumulating reward sampled from
//! the cells the final position touches.

mod cell;
mod cell_index;
mod direction;
mod environment;
mod error;
mod grid_map;
mod line_intersect;
pub mod passability;
mod point;
pub mod resolver;

#[cfg(feature = "persist")]
pub mod persist;

pub use self::{
    cell::*, cell_index::*, direction::*, environment::*, error::*, grid_map::*, line_intersect::*,
    passability::can_move, point::*,
};
pub use resolver::{resolve, ResolvedMotion};
