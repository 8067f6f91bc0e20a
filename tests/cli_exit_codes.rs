use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

/// Run the binary against an empty settings file inside `dir`
fn blocksweep(dir: &Path, args: &[&str]) -> Output {
    let settings = dir.join("blocksweep.toml");
    std::fs::write(&settings, "").unwrap();
    Command::new(env!("CARGO_BIN_EXE_blocksweep"))
        .args(args)
        .arg("--config")
        .arg(&settings)
        .arg("--dir")
        .arg(dir)
        .arg("--csv")
        .arg(dir.join("results.csv"))
        .env_remove("BLOCKSWEEP_SIZE_GB")
        .env_remove("BLOCKSWEEP_DIR")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_unparsable_size_exits_1() {
    let dir = tempdir().unwrap();
    let out = blocksweep(dir.path(), &["--size-gb", "abc", "-y"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("--size-gb"));
}

#[test]
fn test_unknown_block_unit_exits_1() {
    let dir = tempdir().unwrap();
    let out = blocksweep(dir.path(), &["-b", "4Q", "-y"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_unknown_flag_exits_1() {
    let dir = tempdir().unwrap();
    let out = blocksweep(dir.path(), &["--no-such-flag"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_negative_size_exits_1() {
    let dir = tempdir().unwrap();
    let out = blocksweep(dir.path(), &["--size-gb=-1", "-y"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_zero_size_without_detection_exits_1_before_io() {
    let dir = tempdir().unwrap();
    let out = blocksweep(dir.path(), &["--size-gb", "0", "--no-detect", "-y"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.path().join("testfile.bin").exists());
    assert!(!dir.path().join("results.csv").exists());
}

#[test]
fn test_help_and_version_exit_0() {
    let dir = tempdir().unwrap();
    for flag in ["--help", "--version"] {
        let out = blocksweep(dir.path(), &[flag]);
        assert_eq!(out.status.code(), Some(0), "{}", flag);
        assert!(!out.stdout.is_empty());
    }
}

#[test]
fn test_small_sweep_exits_0() {
    let dir = tempdir().unwrap();
    let out = blocksweep(
        dir.path(),
        &["--size-gb", "0.0001", "-b", "4K,64K", "--seed", "5", "-y"],
    );
    assert_eq!(out.status.code(), Some(0));

    let csv = std::fs::read_to_string(dir.path().join("results.csv")).unwrap();
    let blocks: Vec<&str> = csv
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(blocks, vec!["4096", "65536"]);
    assert!(!dir.path().join("testfile.bin").exists());
}
