use anyhow::Result;
use runner::{CommandRunner, ShellRunner};
use scheduler::IdleScheduler;
use tracing::info;

use crate::{
    idle_api::{GenericIdleSource, IdleSource},
    utils::clock::{Clock, DefaultClock},
};

pub mod args;
pub mod config;
pub mod runner;
pub mod scheduler;
pub mod state;

use args::DaemonArgs;
use config::Config;

/// Represents the starting point for the daemon. Returns only when something fatal happened;
/// the idle source is released on the way out.
pub async fn start_daemon(args: DaemonArgs) -> Result<()> {
    let config = Config::from(&args);
    let source = GenericIdleSource::new()?;
    let runner = ShellRunner::new(args.shell);

    info!(
        "Starting with timeout {}s, idle command {:?}, wake command {:?}",
        config.timeout.secs(),
        config.idle_cmd,
        config.wake_cmd
    );
    create_scheduler(config, source, runner, DefaultClock)
        .run()
        .await
}

fn create_scheduler(
    config: Config,
    source: impl IdleSource + 'static,
    runner: impl CommandRunner + 'static,
    clock: impl Clock,
) -> IdleScheduler {
    IdleScheduler::new(config, Box::new(source), Box::new(runner), Box::new(clock))
}
