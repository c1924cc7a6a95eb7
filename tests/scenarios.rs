use grid_world_env::{resolve, CellIndex, Displacement, Environment, GridMap, GridWorldError, Point};

fn scenario_map() -> GridMap {
    let mut map =
        GridMap::new(10, 20, Point::new(0., 0.), Point::new(1., 1.), "scenario", -200.).unwrap();
    map.initialize(1.).unwrap();
    map.set_start(CellIndex::new(0, 0)).unwrap();
    map.set_end(CellIndex::new(9, 19)).unwrap();
    map.add_obstacle(CellIndex::new(4, 10)).unwrap();
    map.add_obstacle(CellIndex::new(5, 10)).unwrap();
    map.add_obstacle(CellIndex::new(6, 10)).unwrap();
    map
}

#[test]
fn scenario_1_corner_with_start_and_three_out_of_bounds() {
    let map = scenario_map();
    assert_eq!(map.evaluate(Point::new(0., 0.)).unwrap(), -200.);
}

#[test]
fn scenario_2_corner_touching_two_obstacles_and_two_normals() {
    let map = scenario_map();
    assert_eq!(map.evaluate(Point::new(10., 5.)).unwrap(), -199.);
}

#[test]
fn scenario_3_horizontal_edge_between_two_obstacles() {
    let map = scenario_map();
    assert_eq!(map.evaluate(Point::new(10.5, 5.)).unwrap(), -200.);
}

#[test]
fn scenario_4_interior_of_obstacle_cell() {
    let map = scenario_map();
    assert_eq!(map.evaluate(Point::new(10.99, 5.99)).unwrap(), -100.);
}

#[test]
fn scenario_5_strict_exterior_is_out_of_map() {
    let map = scenario_map();
    assert!(matches!(
        map.evaluate(Point::new(-1., -1.)),
        Err(GridWorldError::OutOfMap { .. })
    ));
}

#[test]
fn scenario_6_clear_row_traverses_undisturbed_to_the_east_boundary() {
    let map = scenario_map();
    let motion = resolve(&map, Point::new(0.5, 0.5), Displacement::new(20., 0.)).unwrap();
    assert_eq!(motion.point, Point::new(20., 0.5));
    // row 0 has no obstacle at column 10, so the agent reaches the boundary untouched
    assert!(!map.obstacles().contains(&CellIndex::new(0, 10)));
}

#[test]
fn scenario_7_stops_at_the_west_face_of_an_obstacle() {
    let map = scenario_map();
    let motion = resolve(&map, Point::new(0.5, 4.5), Displacement::new(20., 0.)).unwrap();
    assert_eq!(motion.point, Point::new(10., 4.5));
}

#[test]
fn classify_round_trips_for_every_valid_index() {
    let map = scenario_map();
    for r in 0..map.rows() {
        for c in 0..map.cols() {
            let idx = CellIndex::new(r, c);
            let p = map.convert_index_to_point(idx);
            let cls = map.classify(p);
            assert_eq!(cls.nearest_idx, idx, "round-trip failed for {idx:?}");
        }
    }
    let origin_cls = map.classify(Point::new(0., 0.));
    assert!(origin_cls.is_corner);
}

#[test]
fn resolver_never_crosses_into_an_obstacle_interior() {
    let map = scenario_map();
    // Agent approaches the obstacle wall head-on from three different rows;
    // in each case the resolved point must land on the wall's west face,
    // never past it.
    for row in [4., 5., 6.] {
        let motion = resolve(&map, Point::new(9.5, row + 0.5), Displacement::new(5., 0.)).unwrap();
        assert_eq!(motion.point, Point::new(10., row + 0.5));
    }
}

#[test]
fn start_and_end_cells_reject_obstacle_placement() {
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
fn full_episode_reaches_the_end_cell_and_terminates() {
    let mut env = Environment::with_map("episode", scenario_map());
    env.reset().unwrap();
    assert_eq!(env.agent_current(), Point::new(0.5, 0.5));

    // Walk east along row 0 (no obstacles there), then north into the End cell's column.
    let (_, _, terminated) = env.step(Displacement::new(19., 0.)).unwrap();
    assert!(!terminated);
    let (point, _, terminated) = env.step(Displacement::new(0., 9.)).unwrap();
    assert!(terminated);
    assert!(env.is_terminated());
    assert_eq!(point, Point::new(19.5, 9.5));

    assert!(matches!(
        env.step(Displacement::new(1., 0.)),
        Err(GridWorldError::EpisodeTerminated)
    ));
}

#[test]
fn max_steps_terminates_an_episode_before_reaching_the_end_cell() {
    let mut env = Environment::with_map("capped", scenario_map());
    env.set_max_steps(1);
    env.reset().unwrap();
    let (_, _, terminated) = env.step(Displacement::new(1., 0.)).unwrap();
    assert!(terminated);
    assert!(env.is_terminated());
}
