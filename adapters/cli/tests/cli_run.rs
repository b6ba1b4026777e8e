use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

fn maze_pursuit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_maze-pursuit"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to invoke maze-pursuit binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is utf-8")
}

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::write(&path, contents).expect("scratch file written");
    path
}

#[test]
fn run_prints_every_tick_and_a_summary() {
    let output = maze_pursuit(&["run", "--ticks", "3"]);
    assert!(output.status.success(), "run failed: {output:?}");

    let text = stdout(&output);
    let ticks = text.lines().filter(|line| line.starts_with("tick")).count();
    assert_eq!(ticks, 3);
    assert!(text.contains("simulated 3 tick(s) with 2 ghost(s)"));
}

#[test]
fn exported_layout_runs_unchanged() {
    let export = maze_pursuit(&["export"]);
    assert!(export.status.success(), "export failed: {export:?}");
    let layout = stdout(&export).trim().to_owned();
    assert!(layout.starts_with("maze:v1:19x13:"));

    let run = maze_pursuit(&["run", "--layout", &layout, "--ticks", "1"]);
    assert!(run.status.success(), "run with layout failed: {run:?}");
    assert!(stdout(&run).contains("ghost 0 (2,1)"));
}

#[test]
fn maze_file_and_config_drive_the_run() {
    let maze = scratch_file("corridor.maze", "#######\n#G...P#\n#######\n");
    let config = scratch_file(
        "corridor.toml",
        "ticks = 5\n\n[target]\nmotion = \"script\"\nmoves = [\"up\"]\n",
    );

    let output = maze_pursuit(&[
        "run",
        "--maze",
        maze.to_str().expect("utf-8 path"),
        "--config",
        config.to_str().expect("utf-8 path"),
        "--render",
    ]);
    assert!(output.status.success(), "run failed: {output:?}");

    let text = stdout(&output);
    assert!(text.contains("#....X#"));
    assert!(text.contains("target caught on tick 4"));
}

#[test]
fn invalid_layout_fails_with_context() {
    let output = maze_pursuit(&["run", "--layout", "maze:v9:3x3:e30"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to decode layout string"), "{stderr}");
}

#[test]
fn maze_and_layout_flags_conflict() {
    let output = maze_pursuit(&["export", "--maze", "a.maze", "--layout", "maze:v1:1x1:e30"]);
    assert!(!output.status.success());
}
