use std::fs;

use rand::{rngs::SmallRng, SeedableRng};
use salvo::{
    game_rng, run_comparison, run_single, AlgorithmRegistry, Board, CancelToken, CompareRequest,
    PlacementError, PlacementStrategy, RunError, RunRequest, SimConfig, SolutionGrid, BOARD_SIZE,
    SHIPS,
};

fn grid(seed: u64) -> SolutionGrid {
    let mut rng = SmallRng::seed_from_u64(seed);
    Board::place_random(&SHIPS, BOARD_SIZE, &mut rng)
        .unwrap()
        .solution_grid()
}

#[test]
fn run_request_defaults() {
    let request: RunRequest =
        serde_json::from_str(r#"{"algorithm": "smarttarget", "num_simulations": 5, "seed": 3}"#).unwrap();
    assert_eq!(request.algorithm, "smarttarget");
    assert_eq!(request.ship_placement_strategy, PlacementStrategy::RandomEachRound);
    assert!(request.placement_grids.is_empty());
    assert_eq!(request.config.num_simulations, 5);
    assert_eq!(request.config.seed, Some(3));
    assert_eq!(request.config.board_size, BOARD_SIZE);
}

#[test]
fn compare_request_parses_strategy() {
    let request: CompareRequest = serde_json::from_str(
        r#"{"algorithms": ["randomsearch", "smarttarget"], "ship_placement_strategy": "random_from_set"}"#,
    )
    .unwrap();
    assert_eq!(request.algorithms.len(), 2);
    assert_eq!(request.ship_placement_strategy, PlacementStrategy::RandomFromSet);
    assert_eq!(request.config, SimConfig::default());
}

#[test]
fn strategy_names() {
    for strategy in [
        PlacementStrategy::RandomEachRound,
        PlacementStrategy::FixedForAllRounds,
        PlacementStrategy::RandomFromSet,
    ] {
        assert_eq!(strategy.as_str().parse::<PlacementStrategy>(), Ok(strategy));
        assert_eq!(strategy.to_string(), strategy.as_str());
    }
    assert!("random".parse::<PlacementStrategy>().is_err());
}

#[test]
fn fixed_placement_needs_exactly_one_grid() {
    let fixed = PlacementStrategy::FixedForAllRounds;
    assert!(matches!(
        fixed.resolve(&SHIPS, BOARD_SIZE, &[]),
        Err(PlacementError::MissingGrid { .. })
    ));
    assert!(matches!(
        fixed.resolve(&SHIPS, BOARD_SIZE, &[grid(1), grid(2)]),
        Err(PlacementError::InvalidGrid(_))
    ));
    assert!(matches!(
        fixed.resolve(&SHIPS, 12, &[grid(1)]),
        Err(PlacementError::InvalidGrid(_))
    ));
    assert!(matches!(
        PlacementStrategy::RandomFromSet.resolve(&SHIPS, BOARD_SIZE, &[]),
        Err(PlacementError::MissingGrid { .. })
    ));
}

#[test]
fn fixed_placement_reuses_grid() {
    let fixed = grid(5);
    let placement = PlacementStrategy::FixedForAllRounds
        .resolve(&SHIPS, BOARD_SIZE, std::slice::from_ref(&fixed))
        .unwrap();
    for index in 0..5 {
        let board = placement.board_for_game(&mut game_rng(1, index));
        assert_eq!(board.solution_grid(), fixed);
    }
}

#[test]
fn placement_from_set_stays_in_set() {
    let set = vec![grid(1), grid(2), grid(3)];
    let placement = PlacementStrategy::RandomFromSet
        .resolve(&SHIPS, BOARD_SIZE, &set)
        .unwrap();
    let mut seen = vec![false; set.len()];
    for index in 0..60 {
        let board = placement.board_for_game(&mut game_rng(7, index));
        let pos = set.iter().position(|g| *g == board.solution_grid()).unwrap();
        seen[pos] = true;
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn fixed_run_reports_that_grid() {
    let registry = AlgorithmRegistry::with_builtins();
    let fixed = grid(21);
    let request = RunRequest {
        algorithm: "p2m2enhanced".to_string(),
        ship_placement_strategy: PlacementStrategy::FixedForAllRounds,
        placement_grids: vec![fixed.clone()],
        config: SimConfig::default().with_simulations(20).with_seed(4),
    };
    let result = run_single(&registry, &request, &CancelToken::new()).unwrap();
    assert_eq!(result.visualizations.sample_game.solution_grid, fixed);
    assert_eq!(
        result.simulation_parameters.ship_placement_strategy,
        PlacementStrategy::FixedForAllRounds
    );
}

#[test]
fn invalid_grid_fails_run() {
    let registry = AlgorithmRegistry::with_builtins();
    let mut bad = grid(21);
    for row in bad.iter_mut() {
        for cell in row.iter_mut() {
            if cell.as_deref() == Some("Destroyer") {
                *cell = None;
            }
        }
    }
    let request = RunRequest {
        algorithm: "randomsearch".to_string(),
        ship_placement_strategy: PlacementStrategy::FixedForAllRounds,
        placement_grids: vec![bad],
        config: SimConfig::default().with_simulations(5).with_seed(4),
    };
    let err = run_single(&registry, &request, &CancelToken::new()).unwrap_err();
    assert!(matches!(err, RunError::Placement(PlacementError::InvalidGrid(_))));
}

#[test]
fn single_result_json_shape() {
    let registry = AlgorithmRegistry::with_builtins();
    let request = RunRequest {
        algorithm: "huntandtarget".to_string(),
        ship_placement_strategy: PlacementStrategy::RandomEachRound,
        placement_grids: Vec::new(),
        config: SimConfig::default().with_simulations(10).with_seed(8),
    };
    let result = run_single(&registry, &request, &CancelToken::new()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["algorithm_name"], "Hunt and Target");
    assert!(json["analysis"]["summary_stats"]["mean"].is_number());
    assert!(json["analysis"]["histogram"]["bins"].is_array());
    let shot = &json["visualizations"]["sample_game"]["shots"][0];
    assert_eq!(shot.as_array().map(Vec::len), Some(2));
    assert_eq!(json["visualizations"]["sample_game"]["solution_grid"].as_array().map(Vec::len), Some(BOARD_SIZE));
    assert_eq!(json["visualizations"]["heat_map"].as_array().map(Vec::len), Some(BOARD_SIZE));
    assert_eq!(json["simulation_parameters"]["ship_placement_strategy"], "random_each_round");
    assert_eq!(json["simulation_parameters"]["seed"], 8);
    assert_eq!(json["raw_data"]["shots_per_game"].as_array().map(Vec::len), Some(10));
}

#[test]
fn comparison_json_shape() {
    let registry = AlgorithmRegistry::with_builtins();
    let request = CompareRequest {
        algorithms: vec!["p2m2stdirectional".to_string(), "smarttarget".to_string()],
        ship_placement_strategy: PlacementStrategy::RandomEachRound,
        placement_grids: Vec::new(),
        config: SimConfig::default().with_simulations(30).with_seed(2),
    };
    let result = run_comparison(&registry, &request, &CancelToken::new()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    let entry = &json["individual_results"]["smarttarget"];
    assert_eq!(entry["algorithm_name"], "Smart Target");
    assert!(entry["mean"].is_number());
    assert_eq!(entry["total_simulations"], 30);
    assert!(entry["histogram"]["frequencies"].is_array());
    assert!(entry["sample_game"]["shots"].is_array());
    assert!(json["individual_results"]["p2m2stdirectional"].is_object());
    assert!(json["comparison_analysis"]["p_value"].is_number());
    assert_eq!(json["simulation_parameters"]["algorithms"][0], "p2m2stdirectional");
}

#[test]
fn comparison_with_one_game_each() {
    let registry = AlgorithmRegistry::with_builtins();
    let request = CompareRequest {
        algorithms: vec!["randomsearch".to_string(), "huntandtarget".to_string()],
        ship_placement_strategy: PlacementStrategy::RandomEachRound,
        placement_grids: Vec::new(),
        config: SimConfig::default().with_simulations(1).with_seed(5),
    };
    let result = run_comparison(&registry, &request, &CancelToken::new()).unwrap();
    let anova = &result.comparison_analysis;
    assert_eq!(anova.df_between, 1);
    assert_eq!(anova.df_within, 0);
    assert_eq!(anova.ss_within, 0.0);
    let games: Vec<usize> = result
        .individual_results
        .values()
        .map(|r| r.summary_stats.total_simulations)
        .collect();
    assert_eq!(games, vec![1, 1]);
    if anova.ss_between == 0.0 {
        assert_eq!((anova.f_statistic, anova.p_value), (0.0, 1.0));
    } else {
        assert_eq!((anova.f_statistic, anova.p_value), (f64::INFINITY, 0.0));
    }
}

#[test]
fn registry_lists_builtins_by_name() {
    let registry = AlgorithmRegistry::with_builtins();
    let names: Vec<_> = registry.list().into_iter().map(|info| info.name).collect();
    assert_eq!(
        names,
        vec![
            "Hunt and Target",
            "P2M2 Enhanced",
            "P2M2 Optimized",
            "P2M2-ST (Directional)",
            "Random Search",
            "Smart Target",
        ]
    );
}

#[test]
fn registry_rejects_duplicates_and_bad_json() {
    let mut registry = AlgorithmRegistry::with_builtins();
    let json = r#"{"name": "X", "initial_state": "S", "states": {"S": {}}}"#;
    assert!(matches!(
        registry.register_json("randomsearch", json),
        Err(RunError::DuplicateAlgorithm(id)) if id == "randomsearch"
    ));
    assert!(matches!(
        registry.register_json("broken", "{ not json"),
        Err(RunError::Validation { .. })
    ));
    registry.register_json("idle", json).unwrap();
    assert_eq!(registry.len(), 7);
    assert!(registry.resolve("idle").is_ok());
}

#[test]
fn load_dir_skips_bad_files() {
    let dir = std::env::temp_dir().join(format!("salvo-registry-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("good.json"),
        r#"{"name": "Good", "initial_state": "S", "states": {"S": {}}}"#,
    )
    .unwrap();
    fs::write(dir.join("bad.json"), "[1, 2").unwrap();
    fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let mut registry = AlgorithmRegistry::new();
    let loaded = registry.load_dir(&dir);
    fs::remove_dir_all(&dir).unwrap();

    assert_eq!(loaded.unwrap(), vec!["good".to_string()]);
    assert_eq!(registry.list()[0].name, "Good");
    assert!(!registry.contains("bad"));
}

#[test]
fn load_dir_missing_directory() {
    let mut registry = AlgorithmRegistry::new();
    let missing = std::env::temp_dir().join("salvo-no-such-directory");
    assert!(matches!(registry.load_dir(&missing), Err(RunError::Io { .. })));
}
