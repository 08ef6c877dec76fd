// -
// Cluster topology defaults

/// Listen port of the bootstrap coordinator (ordinal 0)
pub(crate) const DEFAULT_COORDINATOR_PORT: u16 = 1982;
/// Listen port of daemon ordinal 0
pub(crate) const DEFAULT_DAEMON_PORT: u16 = 2012;
pub(crate) const DEFAULT_HOST: &str = "localhost";
pub(crate) const DEFAULT_BINARY: &str = "hyperdex";
pub(crate) const DEFAULT_DAEMON_THREADS: u32 = 1;

// -
// On-disk layout

pub(crate) const COORDINATOR_DIR_PREFIX: &str = "coord";
pub(crate) const DAEMON_DIR_PREFIX: &str = "daemon";
pub(crate) const DEFAULT_LOG_FILE: &str = "hyperdex-test-runner.log";
pub(crate) const BASE_DIR_PREFIX: &str = "hyperdex-test-";
pub(crate) const DEFAULT_COORDINATOR_LIB: &str = ".libs/libhyperdex-coordinator";

// -
// Environment handed to every cluster member

pub(crate) const ENV_LOG_TO_STDERR: &str = "GLOG_logtostderr";
pub(crate) const ENV_MIN_LOG_LEVEL: &str = "GLOG_minloglevel";
pub(crate) const ENV_EXEC_PATH: &str = "HYPERDEX_EXEC_PATH";
pub(crate) const ENV_COORDINATOR_LIB: &str = "HYPERDEX_COORD_LIB";
pub(crate) const ENV_PATH: &str = "PATH";

// -
// User command placeholders

pub const PLACEHOLDER_PATH: &str = "PATH";
pub const PLACEHOLDER_HOST: &str = "HOST";
pub const PLACEHOLDER_PORT: &str = "PORT";
