use std::collections::{BTreeSet, VecDeque};

use crawler_core::content::placeholder_repository;
use crawler_core::{GameConfig, GameRng, LevelLayout, RoomConnection, generate_level};
use proptest::{
    prop_assert, prop_assert_eq, prop_assert_ne,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};

fn neighbor((x, y): (usize, usize), connection: RoomConnection) -> Option<(usize, usize)> {
    match connection {
        RoomConnection::Left => Some((x.checked_sub(1)?, y)),
        RoomConnection::Right => Some((x + 1, y)),
        RoomConnection::Bottom => Some((x, y.checked_sub(1)?)),
        RoomConnection::Top => Some((x, y + 1)),
    }
}

fn opposite(connection: RoomConnection) -> RoomConnection {
    match connection {
        RoomConnection::Top => RoomConnection::Bottom,
        RoomConnection::Bottom => RoomConnection::Top,
        RoomConnection::Left => RoomConnection::Right,
        RoomConnection::Right => RoomConnection::Left,
    }
}

fn reachable_from_entry(layout: &LevelLayout) -> BTreeSet<(usize, usize)> {
    let mut seen = BTreeSet::from([layout.entry]);
    let mut queue = VecDeque::from([layout.entry]);
    while let Some(cell) = queue.pop_front() {
        let Some(room) = layout.room(cell) else { continue };
        for &connection in &room.connections {
            if let Some(next) = neighbor(cell, connection)
                && seen.insert(next)
            {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn check_layout(seed: u64, decay: f64) -> Result<(), TestCaseError> {
    let mut config = GameConfig::default();
    config.constants.generator_probability_decay = decay;
    let assets = placeholder_repository();
    let level = generate_level(1, &config, &assets, GameRng::seeded(seed))
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    let layout = &level.layout;

    prop_assert!(layout.rooms.len() >= 5, "the center cross is always placed");
    for room in &layout.rooms {
        for &connection in &room.connections {
            let next = neighbor(room.cell, connection);
            let other = next.and_then(|cell| layout.room(cell));
            prop_assert!(other.is_some(), "{:?} leads nowhere from {:?}", connection, room.cell);
            if let Some(other) = other {
                prop_assert!(other.connections.contains(&opposite(connection)));
            }
        }
    }

    let reachable = reachable_from_entry(layout);
    prop_assert_eq!(reachable.len(), layout.rooms.len(), "every room is reachable from the entry");
    prop_assert!(reachable.contains(&layout.exit));
    prop_assert_ne!(layout.entry, layout.exit);

    for door in [layout.entry, layout.exit] {
        let room = layout.room(door);
        prop_assert!(room.is_some_and(|room| !room.connections.contains(&RoomConnection::Top)));
    }
    prop_assert_eq!(level.doors.len(), 2);
    Ok(())
}

#[test]
fn generated_levels_are_connected_and_symmetric() {
    let mut runner = TestRunner::new(ProptestConfig { cases: 64, ..ProptestConfig::default() });
    runner
        .run(&(proptest::arbitrary::any::<u64>(), 0.0..=1.0f64), |(seed, decay)| {
            check_layout(seed, decay)
        })
        .unwrap();
}

#[test]
fn zero_decay_yields_the_center_cross() {
    let mut config = GameConfig::default();
    config.constants.generator_grid_size = 5;
    config.constants.generator_probability_decay = 0.0;
    let assets = placeholder_repository();

    let level = generate_level(1, &config, &assets, GameRng::seeded(9)).expect("level");
    let layout = &level.layout;
    let cells: Vec<_> = layout.rooms.iter().map(|room| room.cell).collect();
    assert_eq!(cells, vec![(1, 2), (2, 1), (2, 2), (2, 3), (3, 2)]);

    for room in layout.rooms.iter().filter(|room| room.cell != (2, 2)) {
        assert_eq!(room.connections.len(), 1, "outer room {:?}", room.cell);
    }
    assert_eq!(layout.room((2, 2)).map(|room| room.connections.len()), Some(4));
    assert_eq!((layout.entry, layout.exit), ((1, 2), (3, 2)));
}
