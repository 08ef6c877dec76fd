//! Boots a throwaway HyperDex cluster for a test command.
//!
//! A run starts `N` coordinators and `M` daemons as local processes, each in
//! its own working directory under a shared base directory, optionally adds a
//! space through the admin client, runs the test command with `{PATH}`,
//! `{HOST}` and `{PORT}` filled in, and always tears the cluster down again.

mod admin;
mod cluster;
mod config;
mod constants;
mod driver;
mod errors;
pub mod utils;

pub use admin::*;
pub use cluster::*;
pub use config::*;
pub use constants::PLACEHOLDER_HOST;
pub use constants::PLACEHOLDER_PATH;
pub use constants::PLACEHOLDER_PORT;
pub use driver::*;
pub use errors::*;
pub use utils::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
