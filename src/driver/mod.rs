//! One test run: bring the cluster up, provision, run the command, tear down.

mod runner;
mod substitute;
pub use runner::*;
pub use substitute::*;

#[cfg(test)]
mod substitute_test;
