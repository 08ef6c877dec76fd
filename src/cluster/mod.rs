//! Local cluster bring-up and teardown.
//!
//! A cluster is `N` coordinators and `M` daemons of the external database,
//! each running as its own OS process in `<base>/coord<i>` or
//! `<base>/daemon<i>`. Coordinator 0 bootstraps the cluster; every other
//! member connects to it.

mod command;
mod launcher;
pub use command::*;
pub use launcher::*;


use std::fmt;

use crate::constants::COORDINATOR_DIR_PREFIX;
use crate::constants::DAEMON_DIR_PREFIX;

/// One coordination-service endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinator {
    pub host: String,
    pub port: u16,
}

/// One storage node endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Daemon {
    pub host: String,
    pub port: u16,
}

impl Coordinator {
    /// `host:port`, as accepted by `TcpStream::connect`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Daemon {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Coordinator,
    Daemon,
}

impl Role {
    /// Subcommand of the cluster binary starting this role
    pub fn subcommand(&self) -> &'static str {
        match self {
            Role::Coordinator => "coordinator",
            Role::Daemon => "daemon",
        }
    }

    /// Working directory name of member `ordinal`
    pub fn dir_name(
        &self,
        ordinal: usize,
    ) -> String {
        format!("{self}{ordinal}")
    }
}

impl fmt::Display for Role {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Role::Coordinator => f.write_str(COORDINATOR_DIR_PREFIX),
            Role::Daemon => f.write_str(DAEMON_DIR_PREFIX),
        }
    }
}
