use std::process::ExitStatus;
use std::sync::Arc;

use tokio::process::Command;
use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tokio::time::sleep;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::substitute_all;
use super::CommandContext;
use crate::AdminClient;
use crate::ClusterLauncher;
use crate::CommandAdminClient;
use crate::Error;
use crate::Result;
use crate::RunnerConfig;

/// What to run and against how large a cluster
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Space definition handed verbatim to the admin client
    pub space: Option<String>,
    pub coordinators: usize,
    pub daemons: usize,
    /// Command template; every element may use `{PATH}`, `{HOST}`, `{PORT}`
    pub command: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            space: None,
            coordinators: 1,
            daemons: 1,
            command: Vec::new(),
        }
    }
}

pub struct Driver {
    config: RunnerConfig,
    options: RunOptions,
    admin: Option<Arc<dyn AdminClient>>,
}

impl Driver {
    pub fn new(
        config: RunnerConfig,
        options: RunOptions,
    ) -> Self {
        Self {
            config,
            options,
            admin: None,
        }
    }

    /// Provisions spaces through `admin` instead of the cluster binary.
    pub fn with_admin(
        mut self,
        admin: Arc<dyn AdminClient>,
    ) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Runs the whole sequence and returns the user command's exit code.
    ///
    /// The cluster is torn down exactly once on every path: success, user
    /// command failure, bring-up or admin fault, and SIGINT/SIGTERM. A fault is
    /// returned after teardown completed.
    pub async fn run(self) -> Result<i32> {
        let mut launcher = ClusterLauncher::new(
            self.config.cluster.clone(),
            self.config.readiness.clone(),
            self.options.coordinators,
            self.options.daemons,
        );

        let outcome = tokio::select! {
            outcome = self.bring_up_and_execute(&mut launcher) => outcome,
            signal = shutdown_signal() => {
                warn!("{} received, tearing the cluster down", signal);
                Err(Error::Interrupted(signal))
            }
        };

        let teardown = launcher.cleanup().await;

        match (outcome, teardown) {
            (Ok(code), Ok(())) => Ok(code),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(teardown_error)) => {
                error!("teardown failed after {}: {}", e, teardown_error);
                Err(e)
            }
        }
    }

    async fn bring_up_and_execute(
        &self,
        launcher: &mut ClusterLauncher,
    ) -> Result<i32> {
        launcher.setup().await?;

        if let Some(space) = &self.options.space {
            self.settle().await;
            self.admin_client()?.add_space(space).await?;
        }
        self.settle().await;

        let ctx = CommandContext::from_config(&self.config.cluster)?;
        let argv = substitute_all(&self.options.command, &ctx)?;
        execute(&argv).await
    }

    fn admin_client(&self) -> Result<Arc<dyn AdminClient>> {
        match &self.admin {
            Some(admin) => Ok(admin.clone()),
            None => Ok(Arc::new(CommandAdminClient::for_cluster(&self.config.cluster)?)),
        }
    }

    async fn settle(&self) {
        let interval = self.config.readiness.settle_interval();
        if !interval.is_zero() {
            sleep(interval).await;
        }
    }
}

/// Runs `argv` with the runner's own stdio and environment.
///
/// An empty command does nothing and succeeds.
pub(crate) async fn execute(argv: &[String]) -> Result<i32> {
    let Some((program, args)) = argv.split_first() else {
        info!("no command given, cluster was up");
        return Ok(0);
    };

    info!("running {:?}", argv);
    let status = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|source| Error::Spawn {
            program: program.clone(),
            source,
        })?;

    let code = exit_code(status);
    if status.success() {
        info!("command succeeded");
    } else {
        warn!("command failed with exit code {}", code);
    }
    Ok(code)
}

/// Exit code to report for `status`; `128 + signal` for a killed command.
pub(crate) fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

async fn shutdown_signal() -> &'static str {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!("cannot listen for SIGTERM: {}", e);
            return std::future::pending().await;
        }
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => "SIGINT",
            Err(e) => {
                warn!("cannot listen for SIGINT: {}", e);
                std::future::pending().await
            }
        },
        _ = sigterm.recv() => "SIGTERM",
    }
}
