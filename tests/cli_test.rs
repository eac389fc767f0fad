use std::process::Command;

fn salvo(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_salvo"))
        .args(args)
        .env("SALVO_LOG", "off")
        .output()
        .expect("failed to run salvo binary")
}

#[test]
fn list_prints_builtins() {
    let output = salvo(&["list"]);
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("invalid json");
    let ids: Vec<_> = v
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|e| e["id"].as_str())
        .collect();
    assert_eq!(ids.len(), 6);
    assert!(ids.contains(&"p2m2stdirectional"));
}

#[test]
fn list_includes_algorithm_directory() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/algorithms");
    let output = salvo(&["list", "--algorithms-dir", dir]);
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("invalid json");
    assert_eq!(v.as_array().map(Vec::len), Some(8));
}

#[test]
fn run_prints_result() {
    let output = salvo(&["run", "--algorithm", "randomsearch", "--simulations", "5", "--seed", "3"]);
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("invalid json");
    assert_eq!(v["simulation_parameters"]["seed"], 3);
    assert_eq!(v["analysis"]["summary_stats"]["total_simulations"], 5);
}

#[test]
fn compare_prints_anova() {
    let output = salvo(&[
        "compare",
        "--algorithms",
        "randomsearch",
        "smarttarget",
        "--simulations",
        "20",
        "--seed",
        "1",
        "--threads",
        "2",
    ]);
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("invalid json");
    assert!(v["comparison_analysis"]["f_statistic"].is_number());
}

#[test]
fn unknown_algorithm_fails() {
    let output = salvo(&["run", "--algorithm", "montecarlo", "--simulations", "5"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("montecarlo"));
}
