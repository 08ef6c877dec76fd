pub mod async_task;
pub mod file_io;
pub mod net;
pub mod phase_timer;

#[cfg(test)]
mod file_io_test;
#[cfg(test)]
mod phase_timer_test;
