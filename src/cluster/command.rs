use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use tokio::process::Command;

use crate::constants::ENV_COORDINATOR_LIB;
use crate::constants::ENV_EXEC_PATH;
use crate::constants::ENV_LOG_TO_STDERR;
use crate::constants::ENV_MIN_LOG_LEVEL;
use crate::constants::ENV_PATH;
use crate::ClusterConfig;
use crate::Error;
use crate::Result;
use crate::Role;

/// The complete environment of every cluster member.
///
/// Built once per bring-up. Spawned members see exactly these variables and
/// nothing inherited from the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEnv {
    vars: BTreeMap<String, OsString>,
}

impl ProcessEnv {
    /// Builds the member environment.
    ///
    /// `exec_path` must be absolute; `inherited_path` is the runner's own `PATH`
    /// and gets `exec_path` prepended so freshly built binaries win.
    pub fn build(
        cluster: &ClusterConfig,
        exec_path: &Path,
        inherited_path: Option<&OsStr>,
    ) -> Result<Self> {
        let mut vars = BTreeMap::new();
        vars.insert(ENV_LOG_TO_STDERR.to_string(), OsString::new());
        vars.insert(
            ENV_MIN_LOG_LEVEL.to_string(),
            OsString::from(cluster.min_log_level.to_string()),
        );
        vars.insert(ENV_EXEC_PATH.to_string(), exec_path.as_os_str().to_os_string());
        vars.insert(
            ENV_COORDINATOR_LIB.to_string(),
            cluster.resolved_coordinator_lib(exec_path).into_os_string(),
        );
        vars.insert(ENV_PATH.to_string(), extended_path(exec_path, inherited_path)?);

        Ok(Self { vars })
    }

    /// Same as [`ProcessEnv::build`] with the runner's current `PATH`.
    pub fn from_current(
        cluster: &ClusterConfig,
        exec_path: &Path,
    ) -> Result<Self> {
        let inherited = std::env::var_os(ENV_PATH);
        Self::build(cluster, exec_path, inherited.as_deref())
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&OsStr> {
        self.vars.get(key).map(OsString::as_os_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_os_str()))
    }

    /// Replaces the environment of `cmd` with this one.
    pub fn apply(
        &self,
        cmd: &mut Command,
    ) {
        cmd.env_clear();
        cmd.envs(self.iter());
    }
}

fn extended_path(
    exec_path: &Path,
    inherited_path: Option<&OsStr>,
) -> Result<OsString> {
    let mut entries: Vec<PathBuf> = vec![exec_path.to_path_buf()];
    if let Some(inherited) = inherited_path {
        entries.extend(std::env::split_paths(inherited).filter(|p| !p.as_os_str().is_empty()));
    }

    std::env::join_paths(entries)
        .map_err(|e| Error::InvalidConfig(format!("cannot extend PATH with {}: {}", exec_path.display(), e)))
}

/// Arguments of coordinator `ordinal`.
///
/// Ordinal 0 bootstraps the cluster; every other coordinator joins it.
pub fn coordinator_args(
    cluster: &ClusterConfig,
    ordinal: usize,
) -> Result<Vec<String>> {
    let mut args = vec![
        Role::Coordinator.subcommand().to_string(),
        "--foreground".to_string(),
        "--listen".to_string(),
        cluster.host.clone(),
        "--listen-port".to_string(),
        cluster.coordinator_port_of(ordinal)?.to_string(),
    ];
    if ordinal > 0 {
        args.extend([
            "--connect".to_string(),
            cluster.host.clone(),
            "--connect-port".to_string(),
            cluster.coordinator_port.to_string(),
        ]);
    }
    Ok(args)
}

/// Arguments of daemon `ordinal`. Daemons always register with the bootstrap
/// coordinator.
pub fn daemon_args(
    cluster: &ClusterConfig,
    ordinal: usize,
) -> Result<Vec<String>> {
    Ok(vec![
        Role::Daemon.subcommand().to_string(),
        "-t".to_string(),
        cluster.daemon_threads.to_string(),
        "--foreground".to_string(),
        "--listen".to_string(),
        cluster.host.clone(),
        "--listen-port".to_string(),
        cluster.daemon_port_of(ordinal)?.to_string(),
        "--coordinator".to_string(),
        cluster.host.clone(),
        "--coordinator-port".to_string(),
        cluster.coordinator_port.to_string(),
    ])
}
