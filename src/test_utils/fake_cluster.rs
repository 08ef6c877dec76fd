use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;

use crate::ClusterConfig;
use crate::ReadinessConfig;

/// Cluster binary that logs its argv and environment, then idles until killed.
pub(crate) const IDLE_SCRIPT: &str = r#"#!/bin/sh
echo "argv: $*"
echo "exec_path: $HYPERDEX_EXEC_PATH"
echo "coord_lib: $HYPERDEX_COORD_LIB"
echo "path: $PATH"
echo "home: ${HOME:-unset}"
exec sleep 60
"#;

/// Cluster binary that dies right away.
pub(crate) const CRASH_SCRIPT: &str = r#"#!/bin/sh
echo "boom" >&2
exit 3
"#;

/// Writes `script` as an executable named `name` into `dir`.
pub(crate) fn install_script(
    dir: &Path,
    name: &str,
    script: &str,
) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, script).unwrap();
    let mut permissions = std::fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).unwrap();
    path
}

/// Cluster config running `binary` from `exec_path` inside `base`.
pub(crate) fn fake_cluster_config(
    exec_path: &Path,
    base: &Path,
    binary: &str,
) -> ClusterConfig {
    ClusterConfig {
        binary: binary.to_string(),
        exec_path: exec_path.to_path_buf(),
        base_dir: Some(base.to_path_buf()),
        ..ClusterConfig::default()
    }
}

/// No port probing and a short settling pause.
pub(crate) fn quick_readiness(settle_ms: u64) -> ReadinessConfig {
    ReadinessConfig {
        probe: false,
        settle_ms,
        ..ReadinessConfig::default()
    }
}
