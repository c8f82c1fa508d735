//! Environment status polling
//!
//! Actions are queued by the platform and applied asynchronously. Before
//! dispatching, commands wait for the environment to settle so they never race
//! a running deployment; in watch mode they poll again until the triggered
//! action has run to completion.

use std::time::Duration;

use colored::*;
use qovery_client::ScopeApi;
use qovery_core::domain::status::{EnvironmentStatuses, State};
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::error::CliError;

/// Polling cadence and deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl WaitPolicy {
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        Self { interval, max_wait }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_wait: Duration::from_secs(3600),
        }
    }
}

/// Block until the environment reaches a terminal state
///
/// # Returns
/// The terminal state observed
///
/// # Errors
/// [`CliError::Timeout`] once `policy.max_wait` has elapsed.
pub async fn wait_for_terminal_state<A>(
    api: &A,
    environment_id: &str,
    policy: WaitPolicy,
) -> Result<State, CliError>
where
    A: ScopeApi + ?Sized,
{
    poll_until_terminal(api, environment_id, policy, |state| {
        info!("Environment {} is {}, waiting", environment_id, state);
    })
    .await
}

/// Follow an environment after an action was triggered
///
/// Prints each state change, then returns the per-service statuses observed
/// once the environment settled.
pub async fn watch_environment<A>(
    api: &A,
    environment_id: &str,
    policy: WaitPolicy,
) -> Result<EnvironmentStatuses, CliError>
where
    A: ScopeApi + ?Sized,
{
    // Give the platform one interval to pick the action up, otherwise the
    // previous terminal state would end the watch immediately.
    sleep(policy.interval).await;

    let mut last: Option<State> = None;
    let state = poll_until_terminal(api, environment_id, policy, |state| {
        if last != Some(state) {
            println!("  {} {}", "▸".cyan(), state.to_string().yellow());
            last = Some(state);
        }
    })
    .await?;

    println!("  {} {}", "▸".cyan(), colorize_state(state));
    Ok(api.get_environment_statuses(environment_id).await?)
}

async fn poll_until_terminal<A, F>(
    api: &A,
    environment_id: &str,
    policy: WaitPolicy,
    mut on_pending: F,
) -> Result<State, CliError>
where
    A: ScopeApi + ?Sized,
    F: FnMut(State),
{
    let started = Instant::now();

    loop {
        let status = api.get_environment_status(environment_id).await?;
        debug!("Environment {} status: {}", environment_id, status.state);

        if status.state.is_terminal() {
            return Ok(status.state);
        }

        on_pending(status.state);

        let waited = started.elapsed();
        if waited >= policy.max_wait {
            return Err(CliError::Timeout {
                environment_id: environment_id.to_string(),
                waited,
            });
        }

        sleep(policy.interval).await;
    }
}

/// Colour a state for terminal output
pub fn colorize_state(state: State) -> ColoredString {
    let label = state.to_string();
    if state.is_error() {
        label.red().bold()
    } else if state.is_terminal() {
        label.green().bold()
    } else {
        label.yellow()
    }
}
