#![cfg(unix)]

mod common;

use common::install_fake_hyperdex;
use common::run_runner;

#[test]
fn space_is_visible_to_the_test_command() {
    let root = tempfile::tempdir().unwrap();
    install_fake_hyperdex(root.path());
    let base = root.path().join("base");

    let output = run_runner(
        root.path(),
        0,
        &[
            "--coordinators",
            "1",
            "--daemons",
            "1",
            "--space",
            "myspace",
            "--base",
            base.to_str().unwrap(),
            "--clean",
            "--",
            "sh",
            "-c",
            "{PATH}/hyperdex list-spaces | grep -qx myspace",
        ],
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(!base.exists());
}

#[test]
fn failing_command_exit_code_is_forwarded() {
    let root = tempfile::tempdir().unwrap();
    install_fake_hyperdex(root.path());
    let base = root.path().join("base");

    let output = run_runner(
        root.path(),
        0,
        &["--base", base.to_str().unwrap(), "--clean", "sh", "-c", "exit 3"],
    );

    assert_eq!(output.status.code(), Some(3));
    assert!(!base.exists());
}

#[test]
fn command_output_stays_on_stdout() {
    let root = tempfile::tempdir().unwrap();
    install_fake_hyperdex(root.path());
    let base = root.path().join("base");

    let output = run_runner(
        root.path(),
        0,
        &["--base", base.to_str().unwrap(), "--clean", "echo", "{HOST}:{PORT}"],
    );

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "localhost:1982\n");
}

#[test]
fn every_member_joins_the_bootstrap_coordinator() {
    let root = tempfile::tempdir().unwrap();
    install_fake_hyperdex(root.path());
    let base = root.path().join("base");

    let output = run_runner(
        root.path(),
        300,
        &[
            "--coordinators",
            "3",
            "--daemons",
            "2",
            "--base",
            base.to_str().unwrap(),
            "true",
        ],
    );
    assert!(output.status.success());

    let log = |member: &str| {
        std::fs::read_to_string(base.join(member).join("hyperdex-test-runner.log")).unwrap()
    };

    assert!(!log("coord0").contains("--connect"));
    for (member, port) in [("coord1", 1983), ("coord2", 1984)] {
        let content = log(member);
        assert!(content.contains(&format!("--listen-port {port} --connect localhost --connect-port 1982")));
    }
    for (member, port) in [("daemon0", 2012), ("daemon1", 2013)] {
        let content = log(member);
        assert!(content.contains(&format!(
            "--listen-port {port} --coordinator localhost --coordinator-port 1982"
        )));
    }
}

#[test]
fn existing_environment_aborts_the_run() {
    let root = tempfile::tempdir().unwrap();
    install_fake_hyperdex(root.path());
    let base = root.path().join("base");
    std::fs::create_dir_all(base.join("coord0")).unwrap();
    let marker = root.path().join("ran");

    let output = run_runner(
        root.path(),
        0,
        &["--base", base.to_str().unwrap(), "touch", marker.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    // reported once, through the log
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("environment already exists").count(), 1);
    assert!(stderr.contains("run failed"));
    assert!(!marker.exists());
}

#[test]
fn rejected_space_aborts_before_the_command() {
    let root = tempfile::tempdir().unwrap();
    install_fake_hyperdex(root.path());
    // a directory where the description should go makes add-space fail
    std::fs::create_dir(root.path().join("spaces")).unwrap();
    let base = root.path().join("base");
    let marker = root.path().join("ran");

    let output = run_runner(
        root.path(),
        0,
        &[
            "--space",
            "myspace",
            "--base",
            base.to_str().unwrap(),
            "--clean",
            "touch",
            marker.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("add-space rejected"));
    assert!(!marker.exists());
    assert!(!base.exists());
}
