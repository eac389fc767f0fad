use salvo::{
    Board, BoardError, Orientation, PlacementError, ShipType, ShotResult, BOARD_SIZE, SHIPS,
    TOTAL_SHIP_CELLS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn test_manual_place_and_sink() {
    let mut board = Board::new(BOARD_SIZE);
    let id = board.place(SHIPS[0], 0, 0, Orientation::Horizontal).unwrap();
    assert_eq!(id, 0);

    for c in 0..SHIPS[0].length() - 1 {
        assert_eq!(board.record_shot(0, c).unwrap(), ShotResult::Hit);
    }
    // final hit should sink
    assert_eq!(
        board.record_shot(0, SHIPS[0].length() - 1).unwrap(),
        ShotResult::Sink(0)
    );
    assert!(board.all_sunk());

    // firing again never reports a second sink
    assert_eq!(board.record_shot(0, 0).unwrap(), ShotResult::Hit);
    assert_eq!(board.record_shot(5, 5).unwrap(), ShotResult::Miss);
    assert!(board.misses().contains(5, 5));
}

#[test]
fn test_shot_out_of_bounds() {
    let mut board = Board::new(BOARD_SIZE);
    assert_eq!(
        board.record_shot(BOARD_SIZE, 0).unwrap_err(),
        BoardError::OutOfBounds {
            row: BOARD_SIZE,
            col: 0,
            size: BOARD_SIZE
        }
    );
}

#[test]
fn test_place_far_origin_rejected() {
    let mut board = Board::new(BOARD_SIZE);
    for (row, col, orientation) in [
        (0, usize::MAX, Orientation::Horizontal),
        (usize::MAX - 1, 0, Orientation::Vertical),
    ] {
        let err = board.place(SHIPS[0], row, col, orientation).unwrap_err();
        assert!(matches!(err, BoardError::ShipOutOfBounds { name: "Carrier", .. }));
    }
    assert!(board.ships().is_empty());
}

#[test]
fn test_overlap_rejected() {
    let mut board = Board::new(BOARD_SIZE);
    board.place(SHIPS[0], 2, 2, Orientation::Vertical).unwrap();
    let err = board
        .place(SHIPS[1], 3, 0, Orientation::Horizontal)
        .unwrap_err();
    assert_eq!(err, BoardError::ShipOverlaps { name: "Battleship" });
}

#[test]
fn test_place_random_all_ships_no_overlap() {
    let mut rng = SmallRng::seed_from_u64(42);
    let board = Board::place_random(&SHIPS, BOARD_SIZE, &mut rng).unwrap();
    assert_eq!(board.ships().len(), SHIPS.len());
    assert_eq!(
        board.ship_map().count_ones(),
        TOTAL_SHIP_CELLS,
        "all ships should be placed without overlap"
    );
}

#[test]
fn test_place_random_small_board() {
    // 17 cells on a 6x6 board is close to the half-board limit
    let mut rng = SmallRng::seed_from_u64(7);
    let board = Board::place_random(&SHIPS, 6, &mut rng).unwrap();
    assert_eq!(board.ship_map().count_ones(), TOTAL_SHIP_CELLS);
}

#[test]
fn test_fleet_capacity_checks() {
    let mut rng = SmallRng::seed_from_u64(1);
    assert!(matches!(
        Board::place_random(&SHIPS, 4, &mut rng),
        Err(PlacementError::ShipTooLong { name: "Carrier", .. })
    ));
    assert!(matches!(
        Board::place_random(&SHIPS, 5, &mut rng),
        Err(PlacementError::FleetTooLarge { required: 17, capacity: 12, size: 5 })
    ));
    assert_eq!(
        Board::place_random(&SHIPS, 0, &mut rng).unwrap_err(),
        PlacementError::EmptyBoard
    );
}

#[test]
fn test_solution_grid_roundtrip() {
    let mut rng = SmallRng::seed_from_u64(99);
    let board = Board::place_random(&SHIPS, BOARD_SIZE, &mut rng).unwrap();
    let grid = board.solution_grid();
    let occupied = grid.iter().flatten().filter(|cell| cell.is_some()).count();
    assert_eq!(occupied, TOTAL_SHIP_CELLS);

    let rebuilt = Board::from_solution_grid(&SHIPS, &grid).unwrap();
    assert_eq!(rebuilt.solution_grid(), grid);
    assert_eq!(rebuilt.ship_map(), board.ship_map());
}

#[test]
fn test_solution_grid_rejects_bent_ship() {
    let fleet = [ShipType::new("Destroyer", 2)];
    let mut grid = vec![vec![None; 3]; 3];
    grid[0][0] = Some("Destroyer".to_string());
    grid[1][1] = Some("Destroyer".to_string());
    assert!(matches!(
        Board::from_solution_grid(&fleet, &grid),
        Err(PlacementError::InvalidGrid(_))
    ));
}

#[test]
fn test_solution_grid_rejects_unknown_ship() {
    let fleet = [ShipType::new("Destroyer", 2)];
    let mut grid = vec![vec![None; 3]; 3];
    grid[0][0] = Some("Destroyer".to_string());
    grid[0][1] = Some("Destroyer".to_string());
    grid[2][2] = Some("Rowboat".to_string());
    let err = Board::from_solution_grid(&fleet, &grid).unwrap_err();
    assert_eq!(err, PlacementError::InvalidGrid("unknown ship 'Rowboat'".to_string()));
}

#[test]
fn test_solution_grid_rejects_ragged_rows() {
    let fleet = [ShipType::new("Destroyer", 2)];
    let grid = vec![vec![None; 3], vec![None; 2], vec![None; 3]];
    assert!(matches!(
        Board::from_solution_grid(&fleet, &grid),
        Err(PlacementError::InvalidGrid(_))
    ));
}
