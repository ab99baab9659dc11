//! Small daemon that watches how long the desktop has gone without user input and runs one
//! command when it becomes idle and another one when it wakes up again.
//! Everything is driven by a single polling loop, see [daemon::scheduler].
//!

pub mod daemon;
pub mod idle_api;
pub mod utils;
