use std::process::Command;

use tempfile::tempdir;

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_raw_ultrahdr_rs"));
    cmd.env_remove("RUST_LOG")
        .env_remove("ULTRAHDR_APP")
        .env_remove("FFMPEG_PATH");
    cmd
}

#[test]
fn missing_input_exits_with_failure_and_names_path() {
    let dir = tempdir().unwrap();
    let output = cli()
        .current_dir(dir.path())
        .args(["missing.arw", "missing.hif"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.arw"), "stderr: {stderr}");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_arguments_are_a_usage_error() {
    let output = cli().arg("only-input.arw").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn unreadable_raw_fails_and_cleans_up() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("broken.arw"), b"not a raw file").unwrap();

    let output = cli()
        .current_dir(dir.path())
        .args(["broken.arw", "broken.hif"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let mut entries: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, ["broken.arw"]);
}
