use zooscape_core::{Cell, CellContent, CellCoord, Direction, WorldSnapshot, Zookeeper};
use zooscape_system_hazard::{Focus, Hazards};
use zooscape_world::Arena;

fn arena(width: u32, height: u32, keepers: &[CellCoord], walls: &[CellCoord]) -> Arena {
    let cells = (0..height)
        .flat_map(|y| (0..width).map(move |x| CellCoord::new(x, y)))
        .map(|coord| {
            let content = if walls.contains(&coord) {
                CellContent::Wall
            } else {
                CellContent::Empty
            };
            Cell::new(coord, content)
        })
        .collect();
    Arena::from_snapshot(&WorldSnapshot {
        tick: 0,
        cells,
        animals: Vec::new(),
        zookeepers: keepers.iter().map(|&coord| Zookeeper { coord }).collect(),
    })
    .expect("arena builds")
}

/// Brute-force restatement of the hazard rules used to cross-check the builder.
fn expected_unsafe(arena: &Arena, radius: u32, cell: CellCoord) -> bool {
    let bounds = arena.bounds();
    arena.zookeepers().iter().any(|&keeper| {
        if bounds.toroidal_distance(keeper, cell) <= radius {
            return true;
        }
        (1..=2u32).any(|step| {
            let projected_radius = radius.saturating_sub(2 * step).max(2);
            Direction::SEARCH_ORDER.iter().any(|&direction| {
                let (dx, dy) = direction.offset();
                let projected = bounds.offset(keeper, dx * i64::from(step), dy * i64::from(step));
                arena.is_traversable(projected)
                    && bounds.toroidal_distance(projected, cell) <= projected_radius
            })
        })
    })
}

#[test]
fn field_matches_brute_force_definition() {
    let keepers = [CellCoord::new(3, 4), CellCoord::new(28, 20)];
    let walls = [CellCoord::new(3, 2), CellCoord::new(5, 4), CellCoord::new(28, 21)];
    let arena = arena(32, 24, &keepers, &walls);
    let hazards = Hazards::default();
    let bot = CellCoord::new(16, 12);

    let field = hazards.build(&arena, bot, Focus::Other);
    assert_eq!(field.danger_radius(), 8);

    let mut expected_count = 0;
    for y in 0..24 {
        for x in 0..32 {
            let cell = CellCoord::new(x, y);
            let expected = expected_unsafe(&arena, field.danger_radius(), cell);
            if expected {
                expected_count += 1;
            }
            assert_eq!(
                field.contains(cell),
                expected,
                "cell {cell} disagrees with the hazard definition"
            );
        }
    }
    assert_eq!(field.len(), expected_count);
}

#[test]
fn danger_wraps_around_the_grid() {
    let keeper = CellCoord::new(0, 0);
    let arena = arena(30, 30, &[keeper], &[]);

    let field = Hazards::default().build(&arena, CellCoord::new(15, 15), Focus::Pellet);

    assert!(field.contains(CellCoord::new(29, 29)));
    assert!(field.contains(CellCoord::new(18, 0)), "12 steps left through the seam");
    assert!(!field.contains(CellCoord::new(15, 15)));
}

#[test]
fn zookeeper_cell_is_always_unsafe() {
    let keeper = CellCoord::new(2, 2);
    let arena = arena(5, 5, &[keeper], &[]);

    let field = Hazards::default().build(&arena, CellCoord::new(2, 3), Focus::Pellet);

    assert!(field.contains(keeper));
    assert_eq!(field.danger_radius(), 15);
    assert_eq!(field.len(), 25, "a radius this wide covers the whole grid");
}
