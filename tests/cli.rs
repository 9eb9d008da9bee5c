use std::process::{Command, Stdio};

use tempfile::TempDir;

fn mob_outside_repository(args: &[&str]) -> std::process::Output {
    let temp = TempDir::new().expect("temp dir");
    Command::new(env!("CARGO_BIN_EXE_mob"))
        .args(args)
        .current_dir(temp.path())
        // Keep git from discovering a repository above the temp dir.
        .env(
            "GIT_CEILING_DIRECTORIES",
            temp.path().parent().unwrap_or(temp.path()),
        )
        .stdin(Stdio::null())
        .output()
        .expect("run mob")
}

#[test]
fn version_prints_package_version() {
    let output = mob_outside_repository(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("v{}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_lists_every_verb() {
    let output = mob_outside_repository(&["help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for verb in ["[s]tart", "[n]ext", "[d]one", "[r]eset", "status", "share"] {
        assert!(stdout.contains(verb), "help should mention {verb}, got: {stdout}");
    }
}

#[test]
fn status_outside_repository_fails() {
    let output = mob_outside_repository(&["status"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("current branch"),
        "expected repository error, got: {stderr:?}"
    );
}

#[test]
fn unknown_verb_is_a_usage_error() {
    let output = mob_outside_repository(&["dance"]);
    assert_eq!(output.status.code(), Some(2));
}
