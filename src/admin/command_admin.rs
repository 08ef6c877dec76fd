use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;
use tracing::info;

use super::AdminClient;
use crate::AdminError;
use crate::ClusterConfig;
use crate::Coordinator;
use crate::ProcessEnv;
use crate::Result;

/// Admin client backed by the cluster binary's own admin subcommands.
///
/// Runs `<binary> add-space -h <host> -p <port>` with the space description on
/// stdin, in the same environment as the cluster members.
pub struct CommandAdminClient {
    binary: String,
    coordinator: Coordinator,
    env: ProcessEnv,
}

impl CommandAdminClient {
    pub fn new(
        binary: impl Into<String>,
        coordinator: Coordinator,
        env: ProcessEnv,
    ) -> Self {
        Self {
            binary: binary.into(),
            coordinator,
            env,
        }
    }

    /// Client talking to the bootstrap coordinator of `cluster`.
    pub fn for_cluster(cluster: &ClusterConfig) -> Result<Self> {
        let exec_path = cluster.resolved_exec_path()?;
        let env = ProcessEnv::from_current(cluster, &exec_path)?;
        let coordinator = Coordinator {
            host: cluster.host.clone(),
            port: cluster.coordinator_port,
        };
        Ok(Self::new(cluster.binary.clone(), coordinator, env))
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub(crate) fn add_space_args(&self) -> Vec<String> {
        vec![
            "add-space".to_string(),
            "-h".to_string(),
            self.coordinator.host.clone(),
            "-p".to_string(),
            self.coordinator.port.to_string(),
        ]
    }

    fn spawn_error(
        &self,
        source: std::io::Error,
    ) -> AdminError {
        AdminError::Spawn {
            program: self.binary.clone(),
            source,
        }
    }
}

#[async_trait]
impl AdminClient for CommandAdminClient {
    async fn add_space(
        &self,
        description: &str,
    ) -> Result<()> {
        info!(coordinator = %self.coordinator.address(), "adding space");
        debug!("space description: {}", description);

        let mut cmd = Command::new(&self.binary);
        cmd.args(self.add_space_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        self.env.apply(&mut cmd);

        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            // a tool that exits early is judged by its exit status below
            if let Err(e) = stdin.write_all(description.as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(self.spawn_error(e).into());
                }
            }
            // closing stdin ends the description
            drop(stdin);
        }

        let output = child.wait_with_output().await.map_err(|e| self.spawn_error(e))?;
        if !output.status.success() {
            return Err(AdminError::Rejected {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        info!("space added");
        Ok(())
    }
}
