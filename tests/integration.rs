//! Integration tests for the conquest binaries.
//!
//! Spawns the binaries with fixed seeds and checks the narration on stdout.

use std::path::PathBuf;
use std::process::{Command, Output};

use conquest::engine::{closing_message, Engine, SimConfig};
use conquest::protocol::{Frame, Scenario};

fn run_conquest(args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_conquest");
    Command::new(exe)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to start conquest")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("conquest-{}-{}", std::process::id(), name))
}

#[test]
fn total_losses_game_names_a_winner() {
    let output = run_conquest(&["--seed", "7", "--total-losses", "--turns-per-sec", "0"]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    let last = lines.last().unwrap();
    assert!(last.ends_with("has won the game!"), "last line: {}", last);

    let wars = lines
        .iter()
        .filter(|l| l.contains(" declared war against "))
        .count();
    assert_eq!(wars, 15, "each total-losses war removes one of 16 nations");
}

#[test]
fn same_seed_same_narration() {
    let args = ["--seed", "42", "--turns-per-sec", "0", "--max-turns", "200"];
    let a = run_conquest(&args);
    let b = run_conquest(&args);
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn turn_cap_reports_no_winner() {
    let output = run_conquest(&["--seed", "3", "--turns-per-sec", "0", "--max-turns", "2"]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.last().unwrap(), "No winner after 2 turns.");
}

#[test]
fn frames_file_has_setup_frame_plus_one_per_turn() {
    let path = temp_path("frames.jsonl");
    let output = run_conquest(&[
        "--seed",
        "11",
        "--turns-per-sec",
        "0",
        "--max-turns",
        "5",
        "--frames",
        path.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let text = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    let frames: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(frames.len(), 6);
    assert_eq!(frames[0]["turn"], 0);
    assert_eq!(frames[5]["turn"], 5);
    assert_eq!(frames[0]["territories"].as_array().unwrap().len(), 16);
}

const DUEL: &str = r#"{ "nations": [
    { "name": "Left", "strength": 2, "coords": [0, 0], "neighbors": { "e": "Right" } },
    { "name": "Right", "strength": 1, "coords": [100, 0] }
] }"#;

#[test]
fn custom_scenario_is_used() {
    let path = temp_path("duel.json");
    std::fs::write(&path, DUEL).unwrap();

    let output = run_conquest(&[
        "--scenario",
        path.to_str().unwrap(),
        "--seed",
        "5",
        "--turns-per-sec",
        "0",
    ]);
    let _ = std::fs::remove_file(&path);
    assert!(output.status.success());

    // The winner may have been renamed by an ideology change along the way.
    let lines = stdout_lines(&output);
    let last = lines.last().unwrap();
    assert!(
        last.ends_with("Left has won the game!") || last.ends_with("Right has won the game!"),
        "last line: {}",
        last
    );

    let config = SimConfig {
        seed: 5,
        turns_per_sec: 0,
        ..SimConfig::default()
    };
    let scenario = Scenario::parse(DUEL).unwrap();
    let mut engine = Engine::from_scenario(&scenario, Some(config)).unwrap();
    let result = engine.run(&mut |_: &Frame| {});
    assert_eq!(last, &closing_message(&result));
}

#[test]
fn missing_scenario_file_aborts() {
    let path = temp_path("absent.json");
    let output = run_conquest(&["--scenario", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read scenario"), "stderr: {}", stderr);
}

#[test]
fn malformed_scenario_aborts_before_play() {
    let path = temp_path("bad.json");
    std::fs::write(
        &path,
        r#"{ "nations": [
            { "name": "Twin", "strength": 1, "coords": [0, 0] },
            { "name": "Twin", "strength": 1, "coords": [1, 0] }
        ] }"#,
    )
    .unwrap();

    let output = run_conquest(&["--scenario", path.to_str().unwrap()]);
    let _ = std::fs::remove_file(&path);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("duplicate nation name: 'Twin'"), "stderr: {}", stderr);
}

#[test]
fn batch_writes_one_record_per_game() {
    let exe = env!("CARGO_BIN_EXE_batch");
    let output = Command::new(exe)
        .args(["--games", "3", "--threads", "2", "--seed", "1", "--total-losses", "--quiet"])
        .output()
        .expect("failed to start batch");
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 3);
    for r in &records {
        assert!(r["winner"].is_string());
        assert!(r["turns"].as_u64().unwrap() >= 15);
    }
}
