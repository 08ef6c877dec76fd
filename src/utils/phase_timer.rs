use tokio::time::Instant;
use tracing::info;

use crate::Role;

/// Reports how long launching and awaiting every member of one role took.
///
/// The report is emitted on drop, so a phase aborted by `?` is still timed.
pub struct PhaseTimer {
    role: Role,
    members: usize,
    start: Instant,
}

impl PhaseTimer {
    pub fn start(
        role: Role,
        members: usize,
    ) -> Self {
        Self {
            role,
            members,
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        info!(
            role = %self.role,
            members = self.members,
            elapsed_ms = self.elapsed_ms(),
            "{} phase ended",
            self.role
        );
    }
}
