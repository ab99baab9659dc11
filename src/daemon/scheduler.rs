//! The polling loop. Each iteration samples the idle time, fires a command if the user crossed
//! the timeout in either direction and works out how long to sleep before looking again.

use anyhow::{Context, Result};
use tracing::{debug, info, trace, warn};

use crate::{
    idle_api::IdleSource,
    utils::{
        clock::{sleep_for, Clock},
        interval::Interval,
    },
};

use super::{
    config::Config,
    runner::CommandRunner,
    state::{State, Transition},
};

/// How often activity is checked for while idle. This bounds how late a wake up is noticed.
pub const IDLE_POLL_INTERVAL: Interval = Interval::ONE_SECOND;

pub struct IdleScheduler {
    config: Config,
    source: Box<dyn IdleSource>,
    runner: Box<dyn CommandRunner>,
    clock: Box<dyn Clock>,
    state: State,
}

impl IdleScheduler {
    pub fn new(
        config: Config,
        source: Box<dyn IdleSource>,
        runner: Box<dyn CommandRunner>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            config,
            source,
            runner,
            clock,
            state: State::Unknown,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Runs a single iteration and returns how long to wait before the next one.
    pub async fn tick(&mut self) -> Result<Interval> {
        let before = self.read_clock();
        let idle = Interval::from_millis(
            self.source
                .idle_time()
                .context("cannot query idle time")?,
        );

        let transition = self.state.classify(idle, self.config.timeout);
        match transition {
            Transition::BecameIdle => {
                info!("idle for {}", idle.display_millis());
                run_command(self.runner.as_mut(), &self.config.idle_cmd).await?;
            }
            Transition::BecameActive => {
                info!("waking up, idle for {}", idle.display_millis());
                if let Some(wake_cmd) = &self.config.wake_cmd {
                    run_command(self.runner.as_mut(), wake_cmd).await?;
                }
            }
            Transition::StillIdle | Transition::StillActive => {}
        }
        self.state = transition.state();

        // While idle the next check is a fixed second away and the time spent here is ignored,
        // even if the idle command just ran.
        if self.state == State::Idle {
            trace!("waiting {IDLE_POLL_INTERVAL}...");
            return Ok(IDLE_POLL_INTERVAL);
        }

        // Sleep until the idle time would reach the timeout if nothing else happens.
        let wait = self.config.timeout.saturating_sub(idle);
        if self.config.verbosity == 2 {
            debug!("waiting {wait}...");
        }
        let wait = match before {
            Some(before) => self.subtract_elapsed(wait, before),
            None => wait,
        };
        trace!("waiting {wait}...");
        Ok(wait)
    }

    /// Executes the scheduler loop. Only returns on a fatal error.
    pub async fn run(mut self) -> Result<()> {
        loop {
            let wait = self.tick().await?;
            sleep_for(self.clock.as_ref(), wait.to_duration()).await;
        }
    }

    fn read_clock(&self) -> Option<Interval> {
        self.clock
            .wall_time()
            .inspect_err(|e| warn!("cannot read clock: {e:#}"))
            .ok()
    }

    fn subtract_elapsed(&self, wait: Interval, before: Interval) -> Interval {
        let Some(after) = self.read_clock() else {
            return wait;
        };
        let elapsed = after.saturating_sub(before);
        trace!("subtracting {elapsed} from sleep interval");
        wait.saturating_sub(elapsed)
    }
}

async fn run_command(runner: &mut dyn CommandRunner, command: &str) -> Result<()> {
    info!("running: {command}");
    let status = runner.run(command).await?;
    info!("{status}");
    Ok(())
}
