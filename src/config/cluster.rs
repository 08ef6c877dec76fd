use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_BINARY;
use crate::constants::DEFAULT_COORDINATOR_LIB;
use crate::constants::DEFAULT_COORDINATOR_PORT;
use crate::constants::DEFAULT_DAEMON_PORT;
use crate::constants::DEFAULT_DAEMON_THREADS;
use crate::constants::DEFAULT_HOST;
use crate::constants::DEFAULT_LOG_FILE;
use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClusterConfig {
    /// Cluster executable, resolved through the member environment's PATH
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Host every member listens on and connects to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port of coordinator ordinal 0; ordinal `i` listens on `coordinator_port + i`
    #[serde(default = "default_coordinator_port")]
    pub coordinator_port: u16,

    /// Port of daemon ordinal 0; ordinal `i` listens on `daemon_port + i`
    #[serde(default = "default_daemon_port")]
    pub daemon_port: u16,

    #[serde(default = "default_daemon_threads")]
    pub daemon_threads: u32,

    /// Repository root holding the freshly built binaries
    #[serde(default = "default_exec_path")]
    pub exec_path: PathBuf,

    /// Coordinator loadable library; relative paths are resolved against `exec_path`
    #[serde(default = "default_coordinator_lib")]
    pub coordinator_lib: PathBuf,

    /// `GLOG_minloglevel` handed to every member
    #[serde(default)]
    pub min_log_level: u8,

    /// Name of the combined stdout/stderr log inside each working directory
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Shared base directory; a fresh temporary directory when unset
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    /// Remove the base directory on teardown
    #[serde(default)]
    pub clean: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            host: default_host(),
            coordinator_port: default_coordinator_port(),
            daemon_port: default_daemon_port(),
            daemon_threads: default_daemon_threads(),
            exec_path: default_exec_path(),
            coordinator_lib: default_coordinator_lib(),
            min_log_level: 0,
            log_file: default_log_file(),
            base_dir: None,
            clean: false,
        }
    }
}

impl ClusterConfig {
    /// Validates cluster configuration consistency
    /// # Errors
    /// Returns `Error::InvalidConfig` if any configuration rules are violated
    pub fn validate(&self) -> Result<()> {
        if self.binary.trim().is_empty() {
            return Err(Error::InvalidConfig("binary cannot be empty".into()));
        }

        if self.host.trim().is_empty() {
            return Err(Error::InvalidConfig("host cannot be empty".into()));
        }

        if self.coordinator_port == 0 || self.daemon_port == 0 {
            return Err(Error::InvalidConfig(
                "coordinator_port and daemon_port must be non-zero".into(),
            ));
        }

        if self.daemon_threads == 0 {
            return Err(Error::InvalidConfig("daemon_threads must be at least 1".into()));
        }

        if self.log_file.is_empty() || self.log_file.contains(std::path::MAIN_SEPARATOR) {
            return Err(Error::InvalidConfig(format!(
                "log_file must be a plain file name, got {:?}",
                self.log_file
            )));
        }

        if self.exec_path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("exec_path cannot be empty".into()));
        }

        Ok(())
    }

    /// Checks that `coordinators` + `daemons` members fit into the port space
    /// without two members sharing a port.
    pub fn validate_topology(
        &self,
        coordinators: usize,
        daemons: usize,
    ) -> Result<()> {
        let coordinator_range = port_range(self.coordinator_port, coordinators, "coordinator")?;
        let daemon_range = port_range(self.daemon_port, daemons, "daemon")?;

        if let (Some((c_lo, c_hi)), Some((d_lo, d_hi))) = (coordinator_range, daemon_range) {
            if c_lo <= d_hi && d_lo <= c_hi {
                return Err(Error::InvalidConfig(format!(
                    "coordinator ports {c_lo}..={c_hi} overlap daemon ports {d_lo}..={d_hi}"
                )));
            }
        }

        Ok(())
    }

    /// Listen port of coordinator `ordinal`
    ///
    /// # Errors
    /// `Error::InvalidConfig` when the port would be past 65535.
    pub fn coordinator_port_of(
        &self,
        ordinal: usize,
    ) -> Result<u16> {
        offset_port(self.coordinator_port, ordinal, "coordinator")
    }

    /// Listen port of daemon `ordinal`
    pub fn daemon_port_of(
        &self,
        ordinal: usize,
    ) -> Result<u16> {
        offset_port(self.daemon_port, ordinal, "daemon")
    }

    /// `exec_path` as an absolute path
    pub fn resolved_exec_path(&self) -> Result<PathBuf> {
        Ok(std::path::absolute(&self.exec_path)?)
    }

    /// `coordinator_lib` joined to the absolute `exec_path` when relative
    pub fn resolved_coordinator_lib(
        &self,
        exec_path: &Path,
    ) -> PathBuf {
        if self.coordinator_lib.is_absolute() {
            self.coordinator_lib.clone()
        } else {
            exec_path.join(&self.coordinator_lib)
        }
    }
}

fn offset_port(
    base: u16,
    ordinal: usize,
    role: &str,
) -> Result<u16> {
    u16::try_from(ordinal)
        .ok()
        .and_then(|offset| base.checked_add(offset))
        .ok_or_else(|| Error::InvalidConfig(format!("{role}{ordinal} has no port: {base} + {ordinal} exceeds 65535")))
}

fn port_range(
    base: u16,
    count: usize,
    role: &str,
) -> Result<Option<(u16, u16)>> {
    if count == 0 {
        return Ok(None);
    }
    let last = u16::try_from(count - 1)
        .ok()
        .and_then(|offset| base.checked_add(offset))
        .ok_or_else(|| {
            Error::InvalidConfig(format!("{count} {role}s starting at port {base} exceed the port range"))
        })?;
    Ok(Some((base, last)))
}

fn default_binary() -> String {
    DEFAULT_BINARY.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_coordinator_port() -> u16 {
    DEFAULT_COORDINATOR_PORT
}
fn default_daemon_port() -> u16 {
    DEFAULT_DAEMON_PORT
}
fn default_daemon_threads() -> u32 {
    DEFAULT_DAEMON_THREADS
}
fn default_exec_path() -> PathBuf {
    PathBuf::from(".")
}
fn default_coordinator_lib() -> PathBuf {
    PathBuf::from(DEFAULT_COORDINATOR_LIB)
}
fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}
