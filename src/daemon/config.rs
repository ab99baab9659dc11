use crate::utils::interval::Interval;

use super::args::DaemonArgs;

/// Settings of a running daemon. Built once from the command line and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Idle duration at which the machine counts as idle.
    pub timeout: Interval,
    pub verbosity: u8,
    pub idle_cmd: String,
    pub wake_cmd: Option<String>,
}

impl From<&DaemonArgs> for Config {
    fn from(args: &DaemonArgs) -> Self {
        Self {
            timeout: Interval::from_secs(args.timeout),
            verbosity: args.verbose,
            idle_cmd: args.idle_cmd.clone(),
            wake_cmd: args.wake_cmd.clone(),
        }
    }
}
