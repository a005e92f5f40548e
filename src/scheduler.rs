//! Daily scheduling of briefing runs.
//!
//! Two mutually exclusive modes:
//!
//! - **In-process**: [`DailyScheduler`] polls once a minute and runs the
//!   briefing job whenever a registered time of day comes due, until the
//!   shutdown future resolves.
//! - **Cron**: [`setup_cron_job`] produces a one-line shell command that
//!   appends a matching entry to the user's crontab; [`install_crontab`]
//!   runs it.
//!
//! # Loop states
//!
//! ```text
//! Idle --register--> Waiting --due--> Running --job returns--> Waiting
//!                       |
//!                       +--shutdown--> Stopped
//! ```
//!
//! Shutdown is only observed while waiting; a running job always completes.

use crate::error::{BriefingError, Result};
use crate::models::{Category, ScheduleSpec, TimeOfDay};
use chrono::{Duration, Local, NaiveDateTime};
use std::future::Future;
use std::path::Path;
use std::time::Duration as StdDuration;
use tokio::process::Command;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

/// How often the in-process loop checks for due jobs.
pub const POLL_INTERVAL: StdDuration = StdDuration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Waiting,
    Running,
    Stopped,
}

/// One registration: a time of day and when it next fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyJob {
    pub at: TimeOfDay,
    pub next_run: NaiveDateTime,
}

/// The first moment strictly after `now` whose wall-clock time is `at`.
pub fn next_occurrence(at: TimeOfDay, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(at.to_naive_time());
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

#[derive(Debug)]
pub struct DailyScheduler {
    jobs: Vec<DailyJob>,
    state: SchedulerState,
    poll_interval: StdDuration,
}

impl DailyScheduler {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            state: SchedulerState::Idle,
            poll_interval: POLL_INTERVAL,
        }
    }

    #[cfg(test)]
    pub fn with_poll_interval(mut self, poll_interval: StdDuration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn jobs(&self) -> &[DailyJob] {
        &self.jobs
    }

    /// Add a daily trigger at `at`.
    ///
    /// Registrations are not de-duplicated: registering the same time twice
    /// runs the job twice when it comes due.
    pub fn register(&mut self, at: TimeOfDay, now: NaiveDateTime) {
        let next_run = next_occurrence(at, now);
        info!(%at, %next_run, "Registered daily job");
        self.jobs.push(DailyJob { at, next_run });
        if self.state == SchedulerState::Idle {
            self.state = SchedulerState::Waiting;
        }
    }

    /// Indices of jobs due at `now`.
    pub fn due_jobs(&self, now: NaiveDateTime) -> Vec<usize> {
        self.jobs
            .iter()
            .enumerate()
            .filter(|(_, job)| job.next_run <= now)
            .map(|(i, _)| i)
            .collect()
    }

    /// Run every job due at `now`, one after another, and reschedule each for
    /// its next day. Returns how many ran.
    pub async fn run_pending<F, Fut>(&mut self, now: NaiveDateTime, job: &mut F) -> usize
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        let due = self.due_jobs(now);
        for &i in &due {
            self.state = SchedulerState::Running;
            info!(at = %self.jobs[i].at, "Running scheduled briefing");
            job().await;
            self.jobs[i].next_run = next_occurrence(self.jobs[i].at, now);
            debug!(next_run = %self.jobs[i].next_run, "Rescheduled job");
            self.state = SchedulerState::Waiting;
        }
        due.len()
    }

    /// Poll until `shutdown` resolves.
    ///
    /// The shutdown future is raced only against the poll sleep, so a job
    /// that has started always runs to completion.
    #[instrument(level = "info", skip_all, fields(jobs = self.jobs.len()))]
    pub async fn run<F, Fut, S>(&mut self, mut job: F, shutdown: S)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            let now = Local::now().naive_local();
            self.run_pending(now, &mut job).await;

            tokio::select! {
                _ = &mut shutdown => {
                    self.state = SchedulerState::Stopped;
                    info!("Scheduler stopped");
                    return;
                }
                _ = sleep(self.poll_interval) => {}
            }
        }
    }
}

/// Characters that cannot appear in a crontab line built by [`cron_entry`]:
/// quotes and shell expansions would break the `"..."` and `echo '...'`
/// quoting, and crontab turns `%` into a newline.
const CRON_UNSAFE: &[char] = &['\'', '"', '%', '$', '`', '\\', '\n'];

/// The crontab line for a daily run:
/// `MINUTE HOUR * * * cd "DIR" && "CMD" CATEGORY --api-key KEY`.
///
/// # Errors
///
/// [`BriefingError::Validation`] if the directory, command or key contains a
/// character from [`CRON_UNSAFE`].
pub fn cron_entry(
    at: TimeOfDay,
    category: Category,
    api_key: &str,
    workdir: &Path,
    run_command: &str,
) -> Result<String> {
    let workdir = workdir.display().to_string();
    for (what, value) in [
        ("working directory", workdir.as_str()),
        ("executable path", run_command),
        ("API key", api_key),
    ] {
        if let Some(c) = value.chars().find(|c| CRON_UNSAFE.contains(c)) {
            return Err(BriefingError::Validation(format!(
                "{what} contains {c:?}, which cannot be used in a crontab entry"
            )));
        }
    }
    Ok(format!(
        "{} {} * * * cd \"{}\" && \"{}\" {} --api-key {}",
        at.minute, at.hour, workdir, run_command, category, api_key
    ))
}

/// Wrap a crontab line in a shell command that appends it to the user's crontab.
///
/// # Errors
///
/// [`BriefingError::Validation`] if the entry contains a single quote, which
/// cannot be embedded in the quoted `echo`.
pub fn crontab_command(entry: &str) -> Result<String> {
    if entry.contains('\'') {
        return Err(BriefingError::Validation(
            "crontab entry must not contain single quotes".to_string(),
        ));
    }
    Ok(format!(
        "(crontab -l 2>/dev/null; echo '{}') | crontab -",
        entry
    ))
}

/// Build the crontab installation command for `spec`, re-running this
/// executable from the current working directory.
pub fn setup_cron_job(spec: &ScheduleSpec) -> Result<String> {
    let exe = std::env::current_exe()?;
    let workdir = std::env::current_dir()?;
    let entry = cron_entry(
        spec.time_of_day,
        spec.category,
        &spec.api_key,
        &workdir,
        &exe.display().to_string(),
    )?;
    crontab_command(&entry)
}

/// Execute a crontab installation command through `sh -c`.
#[instrument(level = "info", skip_all)]
pub async fn install_crontab(command: &str) -> Result<()> {
    let status = Command::new("sh").arg("-c").arg(command).status().await?;
    if status.success() {
        info!("Installed crontab entry");
        Ok(())
    } else {
        error!(%status, "crontab installation command failed");
        Err(BriefingError::Cron(format!("command exited with {status}")))
    }
}
