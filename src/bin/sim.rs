use salvo::{play_one, AlgorithmRegistry, CancelToken, PlacementStrategy, SimConfig, SHIPS};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <algorithm-id> <seed>", args[0]);
        std::process::exit(1);
    }
    let algorithm = &args[1];
    let seed: u64 = args[2].parse()?;

    let registry = AlgorithmRegistry::with_builtins();
    let definition = registry.resolve(algorithm)?;
    let config = SimConfig::default();
    let placement = PlacementStrategy::RandomEachRound.resolve(&SHIPS, config.board_size, &[])?;

    let outcome = play_one(
        &definition,
        &placement,
        config.shot_cap(),
        seed,
        0,
        &CancelToken::new(),
    )?;

    let shots: Vec<[usize; 2]> = outcome.shots.iter().map(|s| [s.row, s.col]).collect();
    let result = json!({
        "algorithm": algorithm,
        "seed": seed,
        "shots_to_win": outcome.shots_to_win,
        "shots": shots,
        "solution_grid": outcome.solution_grid,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
