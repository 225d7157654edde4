// Smoke tests for the non-interactive subcommands. HOME points at a temp dir
// so the library, session log and config never touch the real ones.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

fn glance(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("glance").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{output:?}");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    let help = stdout_of(glance(home.path()).arg("--help"));
    for sub in ["read", "add", "list", "review", "stats"] {
        assert!(help.contains(sub), "missing {sub} in {help}");
    }
}

#[test]
fn add_then_list_shows_item() {
    let home = TempDir::new().unwrap();
    let text = home.path().join("walden.txt");
    fs::write(&text, "I went to the woods to live deliberately.").unwrap();

    let added = stdout_of(glance(home.path()).arg("add").arg(&text));
    assert!(added.contains("walden"));
    assert!(added.contains("8 words"));

    // adding the same file again does not duplicate it
    stdout_of(glance(home.path()).arg("add").arg(&text));

    let listed = stdout_of(glance(home.path()).arg("list"));
    assert_eq!(listed.lines().count(), 1);
    assert!(listed.contains("walden"));
    assert!(listed.contains("0%"));
}

#[test]
fn list_empty_library() {
    let home = TempDir::new().unwrap();
    let listed = stdout_of(glance(home.path()).arg("list"));
    assert!(listed.contains("library is empty"));
}

#[test]
fn stats_on_fresh_install() {
    let home = TempDir::new().unwrap();
    let csv = home.path().join("sessions.csv");
    let stats = stdout_of(glance(home.path()).arg("stats").arg("--csv").arg(&csv));

    assert!(stats.contains("sessions     0"));
    assert!(stats.contains("streak       0 days"));
    assert!(stats.contains("exported 0 sessions"));
    assert!(csv.exists());
}

#[test]
fn read_requires_a_tty() {
    let home = TempDir::new().unwrap();
    let text = home.path().join("notes.txt");
    fs::write(&text, "short text").unwrap();

    let output = glance(home.path())
        .arg("read")
        .arg(&text)
        .write_stdin("")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stdin must be a tty"));
}

#[test]
fn read_rejects_unknown_mode() {
    let home = TempDir::new().unwrap();
    let output = glance(home.path())
        .args(["read", "notes.txt", "--mode", "scroll"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
