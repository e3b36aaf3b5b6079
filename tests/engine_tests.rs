use armada::{AttackOutcome, GameError, GameState, Grid, TOTAL_VESSEL_CELLS, VESSEL_LENGTHS};

fn count_marks(grid: &Grid, mark: char) -> usize {
    let mut count = 0;
    for row in 0..10 {
        for col in 0..10 {
            if grid.mark_at(row, col) == Some(mark) {
                count += 1;
            }
        }
    }
    count
}

fn place_standard_fleet(game: &mut GameState, slot: usize) {
    for (i, &length) in VESSEL_LENGTHS.iter().enumerate() {
        game.build_vessel(slot, i as i32, 0, length, "east").unwrap();
    }
}

#[test]
fn complete_fleet_covers_fourteen_distinct_cells() {
    let mut game = GameState::new(['A', 'B']);
    place_standard_fleet(&mut game, 0);
    assert!(game.setup_complete(0).unwrap());
    assert_eq!(count_marks(game.grid(0).unwrap(), 'A'), TOTAL_VESSEL_CELLS);
}

#[test]
fn placement_past_boundary_is_rejected_without_mutation() {
    let mut game = GameState::new(['A', 'B']);
    for &length in &[2usize, 3, 4] {
        let len = length;
        game.build_vessel(0, len as i32, 0, len, "east").unwrap();
    }
    // length 5 at (0,8) heading east would extend to column 12
    let err = game.build_vessel(0, 0, 8, 5, "east").unwrap_err();
    assert_eq!(err, GameError::OutOfBounds { row: 0, col: 10 });
    assert_eq!(game.grid(0).unwrap().mark_at(0, 8), Some(' '));
    assert_eq!(game.grid(0).unwrap().mark_at(0, 9), Some(' '));
    assert_eq!(game.fleet(0).unwrap().vessels().len(), 3);
}

#[test]
fn overlapping_placement_is_rejected_without_mutation() {
    let mut game = GameState::new(['A', 'B']);
    game.build_vessel(0, 0, 0, 2, "east").unwrap();
    // length 3 heading north from (2,1) would cross (0,1)
    let err = game.build_vessel(0, 2, 1, 3, "up").unwrap_err();
    assert_eq!(err, GameError::Occupied { row: 0, col: 1 });
    assert_eq!(game.grid(0).unwrap().mark_at(2, 1), Some(' '));
    assert_eq!(game.fleet(0).unwrap().vessels().len(), 1);
}

#[test]
fn length_three_vessel_east_scenario() {
    let mut game = GameState::new(['A', 'B']);
    game.build_vessel(1, 0, 0, 2, "south").unwrap();
    game.build_vessel(1, 0, 5, 3, "east").unwrap();

    let cruiser = &game.fleet(1).unwrap().vessels()[1];
    assert_eq!(cruiser.cells(), &[(0, 5), (0, 6), (0, 7)]);

    assert_eq!(game.attack(1, 0, 6, 'a').unwrap(), AttackOutcome::Hit);
    assert!(game.fleet(1).unwrap().vessels()[1].is_afloat());

    assert_eq!(game.attack(1, 0, 5, 'a').unwrap(), AttackOutcome::Hit);
    assert_eq!(
        game.attack(1, 0, 7, 'a').unwrap(),
        AttackOutcome::Sunk("Cruiser")
    );
    assert!(!game.fleet(1).unwrap().vessels()[1].is_afloat());
    // the destroyer keeps the match alive for that side
    assert!(game.match_ongoing());
}

#[test]
fn attack_out_of_bounds_is_rejected_without_mutation() {
    let mut game = GameState::new(['A', 'B']);
    game.build_vessel(1, 0, 0, 2, "east").unwrap();
    assert_eq!(
        game.attack(1, 10, 0, 'a').unwrap_err(),
        GameError::OutOfBounds { row: 10, col: 0 }
    );
    assert_eq!(game.fleet(1).unwrap().vessels()[0].hits(), 0);
}

#[test]
fn miss_marks_open_water() {
    let mut game = GameState::new(['A', 'B']);
    game.build_vessel(1, 0, 0, 2, "east").unwrap();
    assert_eq!(game.attack(1, 5, 5, 'a').unwrap(), AttackOutcome::Miss);
    assert_eq!(game.grid(1).unwrap().mark_at(5, 5), Some('*'));
}

#[test]
fn repeat_attack_on_hit_cell_counts_again() {
    // Documented quirk: no idempotence guard, so a duplicate hit can sink a
    // vessel with an unhit cell remaining.
    let mut game = GameState::new(['A', 'B']);
    game.build_vessel(1, 0, 5, 2, "east").unwrap();
    game.build_vessel(1, 2, 0, 3, "east").unwrap();

    assert_eq!(game.attack(1, 2, 0, 'a').unwrap(), AttackOutcome::Hit);
    assert_eq!(game.attack(1, 2, 0, 'a').unwrap(), AttackOutcome::Hit);
    assert_eq!(
        game.attack(1, 2, 0, 'a').unwrap(),
        AttackOutcome::Sunk("Cruiser")
    );
    let cruiser = &game.fleet(1).unwrap().vessels()[1];
    assert_eq!(cruiser.hits(), 3);
    assert!(!cruiser.is_afloat());
    // once sunk it stops matching, so its cells read as misses
    assert_eq!(game.attack(1, 2, 1, 'a').unwrap(), AttackOutcome::Miss);
}

#[test]
fn match_ends_when_one_fleet_is_sunk() {
    let mut game = GameState::new(['A', 'B']);
    place_standard_fleet(&mut game, 0);
    place_standard_fleet(&mut game, 1);
    assert!(game.match_ongoing());

    for (i, &length) in VESSEL_LENGTHS.iter().enumerate() {
        for col in 0..length {
            game.attack(1, i as i32, col as i32, 'a').unwrap();
        }
    }
    assert!(!game.match_ongoing());
    assert_eq!(game.winner(), 0);
}

#[test]
fn empty_fleet_has_nothing_afloat() {
    let game = GameState::new(['A', 'B']);
    // a match against an unbuilt fleet is already over
    assert!(!game.match_ongoing());
}
