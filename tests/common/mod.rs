//! Shared integration-test helpers for running the `trainconf` binary.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Returns the path to a file in `tests/fixtures/`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Runs `trainconf` with `args` and waits for it to exit.
///
/// Environment overrides that would change the outcome are cleared.
pub fn run(args: &[&str]) -> Output {
    run_in(Path::new(env!("CARGO_MANIFEST_DIR")), args)
}

/// Runs `trainconf` from `dir` with `args`.
pub fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trainconf"))
        .args(args)
        .current_dir(dir)
        .env_remove("TRAINCONF_CONFIG")
        .env_remove("TRAINCONF_LOG_LEVEL")
        .env_remove("TRAINCONF_LOG_ROOT")
        .env_remove("TRAINCONF_MAX_CONFIG_SIZE")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run trainconf")
}

/// Captured stdout as text.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Captured stderr as text.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Writes the fixture `name` into `dir` with `checkpoint_dir` resuming from
/// `resume_from`, returning the written path.
pub fn write_resuming_config(dir: &Path, name: &str, resume_from: &Path) -> PathBuf {
    let base = std::fs::read_to_string(fixture_path("resnet18_cifar10.yml"))
        .expect("fixture readable");
    let content = base.replace(
        "    from_checkpoint: false\n",
        &format!(
            "    from_checkpoint: true\n    checkpoint_dir: '{}'\n",
            resume_from.display()
        ),
    );
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write config");
    path
}
