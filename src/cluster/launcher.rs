use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;

use futures::future::try_join_all;
use tokio::process::Child;
use tokio::process::Command;
use tokio::time::sleep;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::coordinator_args;
use super::daemon_args;
use super::Coordinator;
use super::Daemon;
use super::ProcessEnv;
use super::Role;
use crate::async_task::task_with_timeout_and_exponential_backoff;
use crate::constants::BASE_DIR_PREFIX;
use crate::file_io::create_fresh_dir;
use crate::file_io::create_log_file;
use crate::file_io::create_temp_base_dir;
use crate::file_io::remove_dir_all_blocking;
use crate::file_io::remove_dir_all_if_exists;
use crate::net::is_server_ready;
use crate::phase_timer::PhaseTimer;
use crate::BackoffPolicy;
use crate::ClusterConfig;
use crate::Error;
use crate::ReadinessConfig;
use crate::Result;

/// A spawned cluster member
struct Member {
    role: Role,
    ordinal: usize,
    address: String,
    log: PathBuf,
    child: Child,
}

/// Owns the processes and the base directory of one local cluster.
///
/// Lifecycle: `new()` (unconfigured) -> `setup()` (running) -> `cleanup()`
/// (terminated). A launcher dropped between `setup()` and `cleanup()`, by a
/// panic or a cancelled future, tears down in `Drop`: members are killed and
/// a `clean` base directory is removed synchronously.
pub struct ClusterLauncher {
    config: ClusterConfig,
    readiness: ReadinessConfig,
    coordinators: usize,
    daemons: usize,
    base: Option<PathBuf>,
    processes: Vec<Member>,
    torn_down: bool,
}

impl ClusterLauncher {
    pub fn new(
        config: ClusterConfig,
        readiness: ReadinessConfig,
        coordinators: usize,
        daemons: usize,
    ) -> Self {
        let base = config.base_dir.clone();
        Self {
            config,
            readiness,
            coordinators,
            daemons,
            base,
            processes: Vec::new(),
            torn_down: true,
        }
    }

    /// Starts all coordinators, waits for them, then starts all daemons and
    /// waits for those.
    ///
    /// # Errors
    /// - `Error::EnvironmentConflict` when a member's working directory exists
    /// - `Error::Spawn` when the cluster binary cannot be started
    /// - `Error::NotReady` / `Error::ProcessExited` when a phase never settles
    ///
    /// Members spawned before the failure stay recorded for `cleanup()`.
    pub async fn setup(&mut self) -> Result<()> {
        self.config.validate_topology(self.coordinators, self.daemons)?;
        self.torn_down = false;

        let base = self.ensure_base_dir()?;
        let exec_path = self.config.resolved_exec_path()?;
        let env = ProcessEnv::from_current(&self.config, &exec_path)?;

        info!(
            base = %base.display(),
            coordinators = self.coordinators,
            daemons = self.daemons,
            "starting cluster"
        );

        {
            let _timer = PhaseTimer::start(Role::Coordinator, self.coordinators);
            for ordinal in 0..self.coordinators {
                self.launch(Role::Coordinator, ordinal, &base, &env)?;
            }
            self.await_phase(Role::Coordinator).await?;
        }

        {
            let _timer = PhaseTimer::start(Role::Daemon, self.daemons);
            for ordinal in 0..self.daemons {
                self.launch(Role::Daemon, ordinal, &base, &env)?;
            }
            self.await_phase(Role::Daemon).await?;
        }

        info!("cluster is up");
        Ok(())
    }

    /// Kills and reaps every recorded member, then removes the base directory
    /// when `clean` is set.
    ///
    /// Members that already exited are fine, as is a base directory that is
    /// already gone. Calling it again is a no-op.
    pub async fn cleanup(&mut self) -> Result<()> {
        self.torn_down = true;
        let members = std::mem::take(&mut self.processes);
        for mut member in members {
            if let Err(e) = member.child.start_kill() {
                debug!(
                    "{}{} could not be signalled (already exited?): {}",
                    member.role, member.ordinal, e
                );
            }
            match member.child.wait().await {
                Ok(status) => debug!("{}{} terminated with {}", member.role, member.ordinal, status),
                Err(e) => warn!("failed to reap {}{}: {}", member.role, member.ordinal, e),
            }
        }

        if let Some(base) = &self.base {
            if self.config.clean {
                if remove_dir_all_if_exists(base).await? {
                    info!("removed {}", base.display());
                }
            } else if base.exists() {
                info!("cluster logs retained at {}", base.display());
            }
        }
        Ok(())
    }

    /// Base directory, known once `setup()` ran or when configured
    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    /// Coordinator 0, the one every other member connects to
    pub fn bootstrap(&self) -> Coordinator {
        Coordinator {
            host: self.config.host.clone(),
            port: self.config.coordinator_port,
        }
    }

    /// # Errors
    /// `Error::InvalidConfig` when a coordinator port falls outside the port range.
    pub fn coordinators(&self) -> Result<Vec<Coordinator>> {
        (0..self.coordinators)
            .map(|ordinal| {
                Ok(Coordinator {
                    host: self.config.host.clone(),
                    port: self.config.coordinator_port_of(ordinal)?,
                })
            })
            .collect()
    }

    pub fn daemons(&self) -> Result<Vec<Daemon>> {
        (0..self.daemons)
            .map(|ordinal| {
                Ok(Daemon {
                    host: self.config.host.clone(),
                    port: self.config.daemon_port_of(ordinal)?,
                })
            })
            .collect()
    }

    /// OS pids of the recorded members, in launch order
    pub fn pids(&self) -> Vec<u32> {
        self.processes.iter().filter_map(|m| m.child.id()).collect()
    }

    /// Number of recorded members
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    fn ensure_base_dir(&mut self) -> Result<PathBuf> {
        let base = match &self.base {
            Some(base) => {
                std::fs::create_dir_all(base)?;
                base.clone()
            }
            None => create_temp_base_dir(BASE_DIR_PREFIX)?,
        };
        self.base = Some(base.clone());
        Ok(base)
    }

    fn launch(
        &mut self,
        role: Role,
        ordinal: usize,
        base: &Path,
        env: &ProcessEnv,
    ) -> Result<()> {
        let (args, port) = match role {
            Role::Coordinator => (
                coordinator_args(&self.config, ordinal)?,
                self.config.coordinator_port_of(ordinal)?,
            ),
            Role::Daemon => (
                daemon_args(&self.config, ordinal)?,
                self.config.daemon_port_of(ordinal)?,
            ),
        };

        let cwd = base.join(role.dir_name(ordinal));
        create_fresh_dir(&cwd)?;

        let log = cwd.join(&self.config.log_file);
        let stdout = create_log_file(&log)?;
        let stderr = stdout.try_clone()?;

        let mut cmd = Command::new(&self.config.binary);
        cmd.args(&args)
            .current_dir(&cwd)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .kill_on_drop(true);
        env.apply(&mut cmd);

        let child = cmd.spawn().map_err(|source| Error::Spawn {
            program: self.config.binary.clone(),
            source,
        })?;

        info!(
            pid = child.id(),
            port,
            cwd = %cwd.display(),
            "started {}{}",
            role,
            ordinal
        );
        debug!("{}{} argv: {} {:?}", role, ordinal, self.config.binary, args);

        self.processes.push(Member {
            role,
            ordinal,
            address: format!("{}:{}", self.config.host, port),
            log,
            child,
        });
        Ok(())
    }

    /// Barrier after launching every member of `role`.
    async fn await_phase(
        &mut self,
        role: Role,
    ) -> Result<()> {
        if self.readiness.probe {
            let targets: Vec<(usize, String)> = self
                .processes
                .iter()
                .filter(|m| m.role == role)
                .map(|m| (m.ordinal, m.address.clone()))
                .collect();

            let policy = self.readiness.backoff;
            let probes = targets
                .iter()
                .map(|(ordinal, address)| wait_until_listening(role, *ordinal, address, policy));

            if let Err(e) = try_join_all(probes).await {
                // A crashed member explains a failed probe better than the probe does.
                self.ensure_alive(role)?;
                return Err(e);
            }
        }

        let settle = self.readiness.settle_interval();
        if !settle.is_zero() {
            debug!("letting {} members settle for {:?}", role, settle);
            sleep(settle).await;
        }

        self.ensure_alive(role)
    }

    fn ensure_alive(
        &mut self,
        role: Role,
    ) -> Result<()> {
        for member in self.processes.iter_mut().filter(|m| m.role == role) {
            if let Some(status) = member.child.try_wait()? {
                warn!(
                    "{}{} exited during bring-up with {}, see {}",
                    member.role,
                    member.ordinal,
                    status,
                    member.log.display()
                );
                return Err(Error::ProcessExited {
                    role: member.role,
                    ordinal: member.ordinal,
                    status,
                    log: member.log.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Drop for ClusterLauncher {
    fn drop(&mut self) {
        if self.torn_down {
            return;
        }
        warn!("cluster dropped without cleanup, tearing it down");

        for member in &mut self.processes {
            if let Err(e) = member.child.start_kill() {
                debug!("{}{} could not be signalled: {}", member.role, member.ordinal, e);
            }
        }

        if !self.config.clean {
            return;
        }
        if let Some(base) = &self.base {
            match remove_dir_all_blocking(base) {
                Ok(true) => info!("removed {}", base.display()),
                Ok(false) => {}
                Err(e) => error!("failed to remove {}: {}", base.display(), e),
            }
        }
    }
}

/// Polls `address` until it accepts TCP connections.
pub(crate) async fn wait_until_listening(
    role: Role,
    ordinal: usize,
    address: &str,
    policy: BackoffPolicy,
) -> Result<()> {
    task_with_timeout_and_exponential_backoff(
        || async move {
            if is_server_ready(address).await {
                Ok(())
            } else {
                Err(Error::NotReady {
                    role,
                    ordinal,
                    address: address.to_string(),
                })
            }
        },
        policy,
    )
    .await
    .map_err(|e| match e {
        Error::NotReady { .. } => e,
        _ => Error::NotReady {
            role,
            ordinal,
            address: address.to_string(),
        },
    })?;

    debug!("{}{} is accepting connections on {}", role, ordinal, address);
    Ok(())
}
