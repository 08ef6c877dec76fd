use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Command;
use std::process::Output;

/// Stand-in for the cluster binary.
///
/// Members log their argv and idle until killed. `add-space` appends the
/// description to `spaces` next to the script and `list-spaces` prints it back.
pub const FAKE_HYPERDEX: &str = r#"#!/bin/sh
dir=$(dirname "$0")
case "$1" in
    coordinator|daemon)
        echo "argv: $*"
        exec sleep 60
        ;;
    add-space)
        cat >> "$dir/spaces"
        echo >> "$dir/spaces"
        ;;
    list-spaces)
        cat "$dir/spaces" 2>/dev/null
        ;;
    *)
        echo "unknown subcommand $1" >&2
        exit 2
        ;;
esac
"#;

pub fn install_fake_hyperdex(root: &Path) {
    let path = root.join("hyperdex");
    std::fs::write(&path, FAKE_HYPERDEX).unwrap();
    let mut permissions = std::fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).unwrap();
}

/// Runs the runner binary with `args`, using `root` as repository root.
pub fn run_runner(
    root: &Path,
    settle_ms: u64,
    args: &[&str],
) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hyperdex-test-runner"))
        .arg("--exec-path")
        .arg(root)
        .args(args)
        .env_remove("CONFIG_PATH")
        .env("RUNNER__READINESS__PROBE", "false")
        .env("RUNNER__READINESS__SETTLE_MS", settle_ms.to_string())
        .env("RUST_LOG", "debug")
        .output()
        .expect("runner binary should start")
}
