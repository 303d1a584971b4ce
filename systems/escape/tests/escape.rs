use zooscape_core::{
    Cell, CellContent, CellCoord, Direction, PositionHistory, WorldSnapshot, Zookeeper,
};
use zooscape_system_escape::{emergency_escape, RandomEscape};
use zooscape_world::Arena;

fn arena(width: u32, height: u32, walls: &[CellCoord], keepers: &[CellCoord]) -> Arena {
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

fn history_of(cells: &[CellCoord]) -> PositionHistory {
    let mut history = PositionHistory::with_capacity(6);
    for &cell in cells {
        history.push(cell);
    }
    history
}

#[test]
fn emergency_escape_moves_away_from_the_zookeepers() {
    let bot = CellCoord::new(10, 10);
    let keepers = [CellCoord::new(13, 9), CellCoord::new(10, 14)];
    let arena = arena(21, 21, &[], &keepers);

    let step = emergency_escape(&arena, bot, &history_of(&[])).expect("open neighbours");

    assert_eq!(step.direction, Direction::Left);
    assert_eq!(step.destination, CellCoord::new(9, 10));
    assert_eq!(step.nearest_threat, Some(5));
}

#[test]
fn emergency_escape_prefers_unvisited_cells() {
    let bot = CellCoord::new(10, 10);
    let keepers = [CellCoord::new(13, 9), CellCoord::new(10, 14)];
    let arena = arena(21, 21, &[], &keepers);
    let history = history_of(&[CellCoord::new(9, 10), bot]);

    let step = emergency_escape(&arena, bot, &history).expect("open neighbours");

    assert_ne!(step.destination, CellCoord::new(9, 10));
    assert_eq!(
        step.direction,
        Direction::Up,
        "the remaining neighbours tie on both distances, search order decides"
    );
}

#[test]
fn emergency_escape_without_zookeepers_follows_search_order() {
    let bot = CellCoord::new(2, 2);
    let arena = arena(5, 5, &[CellCoord::new(2, 1)], &[]);

    let step = emergency_escape(&arena, bot, &history_of(&[])).expect("open neighbours");

    assert_eq!(step.direction, Direction::Down);
}

#[test]
fn walled_in_bot_has_no_escape() {
    let bot = CellCoord::new(1, 1);
    let walls = [
        CellCoord::new(1, 0),
        CellCoord::new(1, 2),
        CellCoord::new(0, 1),
        CellCoord::new(2, 1),
    ];
    let arena = arena(3, 3, &walls, &[]);
    let history = history_of(&[]);

    assert!(emergency_escape(&arena, bot, &history).is_none());
    assert!(RandomEscape::from_seed(1).plan(&arena, bot, &history).is_none());
}

#[test]
fn random_escape_only_picks_unvisited_neighbours() {
    let bot = CellCoord::new(5, 5);
    let arena = arena(11, 11, &[], &[]);
    let history = history_of(&[CellCoord::new(5, 4), CellCoord::new(4, 5), bot]);

    for seed in 0..32 {
        let step = RandomEscape::from_seed(seed)
            .plan(&arena, bot, &history)
            .expect("open neighbours");
        assert!(
            matches!(step.direction, Direction::Down | Direction::Right),
            "seed {seed} picked a revisit: {:?}",
            step.direction
        );
    }
}

#[test]
fn random_escape_falls_back_to_safest_revisit() {
    let bot = CellCoord::new(5, 5);
    let arena = arena(11, 11, &[], &[CellCoord::new(5, 8)]);
    let history = history_of(&[
        CellCoord::new(5, 4),
        CellCoord::new(5, 6),
        CellCoord::new(4, 5),
        CellCoord::new(6, 5),
        bot,
    ]);

    let step = RandomEscape::from_seed(7)
        .plan(&arena, bot, &history)
        .expect("open neighbours");

    assert_eq!(step.direction, Direction::Up);
}

#[test]
fn seeded_planners_agree() {
    let bot = CellCoord::new(5, 5);
    let arena = arena(11, 11, &[], &[]);
    let history = history_of(&[]);
    let mut first = RandomEscape::from_seed(99);
    let mut second = RandomEscape::from_seed(99);

    for _ in 0..16 {
        assert_eq!(
            first.plan(&arena, bot, &history),
            second.plan(&arena, bot, &history)
        );
    }
}
