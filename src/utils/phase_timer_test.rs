use std::time::Duration;

use super::phase_timer::PhaseTimer;
use crate::Role;

#[tokio::test(start_paused = true)]
async fn test_phase_timer_measures_the_phase() {
    let timer = PhaseTimer::start(Role::Daemon, 3);

    tokio::time::advance(Duration::from_millis(250)).await;

    assert_eq!(timer.elapsed_ms(), 250);
}
