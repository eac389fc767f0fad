use salvo::{Board, ShotResult, BOARD_SIZE, NUM_SHIPS, SHIPS, TOTAL_SHIP_CELLS};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

fn random_board(seed: u64, size: usize) -> Board {
    let mut rng = SmallRng::seed_from_u64(seed);
    Board::place_random(&SHIPS, size, &mut rng).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn placement_covers_fleet_exactly(seed in any::<u64>(), size in 6usize..=12) {
        let board = random_board(seed, size);
        prop_assert_eq!(board.ship_map().count_ones(), TOTAL_SHIP_CELLS);
        for (id, ship) in board.ships().iter().enumerate() {
            prop_assert_eq!(ship.ship_type(), SHIPS[id]);
            for (r, c) in ship.cells() {
                prop_assert!(r < size && c < size);
                prop_assert_eq!(board.ship_at(r, c), Some(id));
            }
        }
    }

    #[test]
    fn solution_grid_roundtrip(seed in any::<u64>()) {
        let board = random_board(seed, BOARD_SIZE);
        let grid = board.solution_grid();
        let rebuilt = Board::from_solution_grid(&SHIPS, &grid).unwrap();
        prop_assert_eq!(rebuilt.solution_grid(), grid);
    }

    #[test]
    fn each_ship_sinks_once(seed in any::<u64>()) {
        let mut board = random_board(seed, BOARD_SIZE);
        let mut sinks = Vec::new();
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                if let ShotResult::Sink(id) = board.record_shot(r, c).unwrap() {
                    sinks.push(id);
                }
            }
        }
        // a second sweep reports no new sinks
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                prop_assert!(board.record_shot(r, c).unwrap().sunk().is_none());
            }
        }
        sinks.sort_unstable();
        prop_assert_eq!(sinks, (0..NUM_SHIPS).collect::<Vec<_>>());
        prop_assert!(board.all_sunk());
        prop_assert_eq!(board.hits().count_ones(), TOTAL_SHIP_CELLS);
    }
}
