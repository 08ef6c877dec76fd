use std::path::PathBuf;

use super::*;
use crate::Error;

fn ctx() -> CommandContext {
    CommandContext {
        path: PathBuf::from("/opt/x"),
        host: "localhost".to_string(),
        port: 1982,
    }
}

#[test]
fn test_substitute_resolves_host_and_port() {
    assert_eq!(
        substitute("--endpoint={HOST}:{PORT}", &ctx()).unwrap(),
        "--endpoint=localhost:1982"
    );
}

#[test]
fn test_substitute_resolves_path() {
    assert_eq!(
        substitute("{PATH}/test/sh/simple.sh", &ctx()).unwrap(),
        "/opt/x/test/sh/simple.sh"
    );
}

#[test]
fn test_substitute_leaves_plain_arguments_alone() {
    assert_eq!(substitute("--verbose", &ctx()).unwrap(), "--verbose");
    assert_eq!(substitute("", &ctx()).unwrap(), "");
}

#[test]
fn test_substitute_unescapes_doubled_braces() {
    assert_eq!(
        substitute("{{\"port\": {PORT}}}", &ctx()).unwrap(),
        "{\"port\": 1982}"
    );
}

#[test]
fn test_substitute_rejects_unknown_placeholder() {
    match substitute("{USER}@{HOST}", &ctx()) {
        Err(Error::Template { template, reason }) => {
            assert_eq!(template, "{USER}@{HOST}");
            assert!(reason.contains("{USER}"));
        }
        other => panic!("expected Template error, got {:?}", other),
    }
}

#[test]
fn test_substitute_rejects_malformed_templates() {
    assert!(substitute("{HOST", &ctx()).is_err());
    assert!(substitute("HOST}", &ctx()).is_err());
    assert!(substitute("{{HOST}", &ctx()).is_err());
    assert!(substitute("{HO{ST}", &ctx()).is_err());
}

#[test]
fn test_substitute_all_keeps_argument_boundaries() {
    let args = vec![
        "python".to_string(),
        "{PATH}/test/python/simple.py".to_string(),
        "{HOST}".to_string(),
        "{PORT}".to_string(),
    ];

    let resolved = substitute_all(&args, &ctx()).unwrap();

    assert_eq!(
        resolved,
        vec!["python", "/opt/x/test/python/simple.py", "localhost", "1982"]
    );
}

#[test]
fn test_context_comes_from_bootstrap_coordinator() {
    let cluster = crate::ClusterConfig {
        host: "127.0.0.1".to_string(),
        coordinator_port: 4000,
        exec_path: PathBuf::from("/src/hyperdex"),
        ..crate::ClusterConfig::default()
    };

    let ctx = CommandContext::from_config(&cluster).unwrap();

    assert_eq!(ctx.path, PathBuf::from("/src/hyperdex"));
    assert_eq!(ctx.host, "127.0.0.1");
    assert_eq!(ctx.port, 4000);
}
