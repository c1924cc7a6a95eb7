use grid_world_env::{CellIndex, GridMap, Point};

const ROWS: i32 = 10;
const COLS: i32 = 20;

fn main() {
    tracing_subscriber::fmt::init();

    let mut map = GridMap::new(
        ROWS,
        COLS,
        Point::new(0., 0.),
        Point::new(1., 1.),
        "demo",
        -200.,
    )
    .unwrap();
    map.initialize(1.).unwrap();
    map.set_start(CellIndex::new(0, 0)).unwrap();
    map.set_end(CellIndex::new(9, 19)).unwrap();
    map.add_obstacle(CellIndex::new(4, 10)).unwrap();
    map.add_obstacle(CellIndex::new(5, 10)).unwrap();
    map.add_obstacle(CellIndex::new(6, 10)).unwrap();

    println!("{map}");

    let coordinates = [
        Point::new(0., 0.),
        Point::new(10., 5.),
        Point::new(10.5, 5.),
        Point::new(10.99, 5.99),
        Point::new(-1., -1.),
        Point::new(20., 5.),
        Point::new(19.5, 9.5),
    ];

    for p in coordinates {
        match map.evaluate(p) {
            Ok(value) => println!("evaluate({}, {}) = {value}", p.x(), p.y()),
            Err(e) => println!("evaluate({}, {}) failed: {e}", p.x(), p.y()),
        }
    }
}
