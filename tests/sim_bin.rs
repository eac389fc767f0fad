use std::process::Command;

#[test]
fn sim_binary_smoke() {
    let output = Command::new(env!("CARGO_BIN_EXE_sim"))
        .args(["huntandtarget", "12"])
        .output()
        .expect("failed to run sim binary");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("non utf8 output");
    let v: serde_json::Value = serde_json::from_str(stdout.trim()).expect("invalid json");
    assert_eq!(v["algorithm"], "huntandtarget");
    assert_eq!(v["seed"], 12);
    let shots = v["shots_to_win"].as_u64().expect("shots_to_win");
    assert!((17..=100).contains(&shots));
    assert_eq!(v["shots"].as_array().map(Vec::len), Some(shots as usize));
}

#[test]
fn sim_binary_is_deterministic() {
    let run = || {
        Command::new(env!("CARGO_BIN_EXE_sim"))
            .args(["smarttarget", "99"])
            .output()
            .expect("failed to run sim binary")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn sim_binary_rejects_unknown_algorithm() {
    let output = Command::new(env!("CARGO_BIN_EXE_sim"))
        .args(["montecarlo", "1"])
        .output()
        .expect("failed to run sim binary");
    assert!(!output.status.success());
}
