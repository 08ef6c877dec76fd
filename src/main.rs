use std::path::PathBuf;

use clap::Parser;
use hyperdex_test_runner::Driver;
use hyperdex_test_runner::Error;
use hyperdex_test_runner::Result;
use hyperdex_test_runner::RunOptions;
use hyperdex_test_runner::RunnerConfig;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

/// Exit code when a shutdown signal ended the run
const EXIT_INTERRUPTED: i32 = 130;
/// Exit code for faults of the runner itself
const EXIT_FAULT: i32 = 1;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Space definition to add once the cluster is up
    #[arg(long)]
    space: Option<String>,

    /// Number of coordinator processes
    #[arg(long, default_value_t = 1)]
    coordinators: usize,

    /// Number of daemon processes
    #[arg(long, default_value_t = 1)]
    daemons: usize,

    /// Base directory for the members' working directories (default: fresh temp dir)
    #[arg(long)]
    base: Option<PathBuf>,

    /// Remove the base directory after the run
    #[arg(long)]
    clean: bool,

    /// Repository root holding the binaries under test (default: current directory)
    #[arg(long)]
    exec_path: Option<PathBuf>,

    /// Extra configuration file layered over CONFIG_PATH
    #[arg(long)]
    config: Option<String>,

    /// Command to run against the cluster; {PATH}, {HOST} and {PORT} are substituted
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_observability();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(Error::Interrupted(signal)) => {
            error!("run interrupted by {}", signal);
            EXIT_INTERRUPTED
        }
        Err(e) => {
            error!("run failed: {}", e);
            EXIT_FAULT
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    let config = load_config(&cli)?;
    let options = RunOptions {
        space: cli.space,
        coordinators: cli.coordinators,
        daemons: cli.daemons,
        command: cli.args,
    };

    Driver::new(config, options).run().await
}

fn load_config(cli: &Cli) -> Result<RunnerConfig> {
    let mut config = RunnerConfig::new()?;
    if let Some(path) = &cli.config {
        config = config.with_override_config(path)?;
    }

    // command line flags have the last word
    if let Some(base) = &cli.base {
        config.cluster.base_dir = Some(base.clone());
    }
    if cli.clean {
        config.cluster.clean = true;
    }
    if let Some(exec_path) = &cli.exec_path {
        config.cluster.exec_path = exec_path.clone();
    }

    config.validate()
}

/// Logs go to stderr; stdout belongs to the test command.
fn init_observability() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);
    tracing_subscriber::registry().with(layer).init();
}
