#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

pub fn diarist_cmd() -> Command {
    let mut cmd = Command::cargo_bin("diarist").unwrap();
    cmd.env_remove("DIARIST_DIR");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run `diarist new` in `dir` and return the id it reports.
pub fn create_entry(dir: &Path, args: &[&str]) -> String {
    let output = diarist_cmd()
        .current_dir(dir)
        .arg("new")
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "new failed: {:?}", output);

    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .split_whitespace()
        .nth(1)
        .expect("id in output")
        .to_string()
}
