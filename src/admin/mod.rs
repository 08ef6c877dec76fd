//! Administrative access to a running cluster.
//!
//! The admin protocol itself is owned by the database; the runner only needs
//! to provision a space before the test command starts.

mod command_admin;
pub use command_admin::*;


use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::Result;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AdminClient: Send + Sync {
    /// Creates the space described by `description`, returning once the
    /// coordinator accepted it.
    async fn add_space(
        &self,
        description: &str,
    ) -> Result<()>;
}
