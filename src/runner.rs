use crate::error::{EmptyJobListSnafu, Error, Result};
use crate::progress::ProgressReporter;
use crate::wrap_err;
use futures::stream::{self, StreamExt};
use snafu::ensure;

pub mod error;
pub mod executor;
pub mod manifest;

pub use self::executor::{JobExecutor, ShellExecutor};
pub use self::manifest::{Manifest, load_manifest};

/// A named shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub name: String,
    pub command: String,
}

impl JobSpec {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
        }
    }

    /// Use the command line itself as the job name.
    pub fn from_command(command: impl Into<String>) -> Self {
        let command = command.into();
        Self {
            name: command.clone(),
            command,
        }
    }
}

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub name: String,
    pub success: bool,
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    pub stderr: String,
}

impl JobOutcome {
    fn not_started(name: &str, error: &Error) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            code: None,
            stderr: error.to_string(),
        }
    }

    fn failure_report(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exited with status {code}"),
            None => "did not complete".to_string(),
        };
        let stderr = self.stderr.trim_end();
        if stderr.is_empty() {
            format!("error: {} {status}", self.name)
        } else {
            format!("error: {} {status}\n{stderr}", self.name)
        }
    }
}

/// Result of a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: Vec<JobOutcome>,
}

impl RunSummary {
    pub fn failed_names(&self) -> Vec<String> {
        self.failed.iter().map(|o| o.name.clone()).collect()
    }
}

/// Runs jobs with bounded parallelism and reports them on a progress line.
pub struct JobRunner<E> {
    executor: E,
    parallelism: usize,
}

impl<E: JobExecutor> JobRunner<E> {
    pub fn new(executor: E, parallelism: usize) -> Self {
        Self {
            executor,
            parallelism: parallelism.max(1),
        }
    }

    /// Run every job, at most `parallelism` at a time.
    ///
    /// Failures are printed above the progress line as they happen; the caller
    /// still owns `progress` and must end it.
    pub async fn run(&self, jobs: Vec<JobSpec>, progress: &ProgressReporter) -> Result<RunSummary> {
        ensure!(!jobs.is_empty(), EmptyJobListSnafu);
        log::debug!(
            "run jobs_count={} parallelism={}",
            jobs.len(),
            self.parallelism
        );

        let outcomes: Vec<Result<JobOutcome>> = stream::iter(jobs)
            .map(|job| self.run_one(job, progress))
            .buffer_unordered(self.parallelism)
            .collect()
            .await;

        let mut summary = RunSummary::default();
        for outcome in outcomes {
            let outcome = outcome?;
            if outcome.success {
                summary.succeeded += 1;
            } else {
                summary.failed.push(outcome);
            }
        }
        Ok(summary)
    }

    async fn run_one(&self, job: JobSpec, progress: &ProgressReporter) -> Result<JobOutcome> {
        progress.start(&job.name)?;

        let outcome = match wrap_err!(
            self.executor.execute(&job).await,
            JobFailed {
                name: job.name.clone()
            }
        ) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::debug!("{e}");
                JobOutcome::not_started(&job.name, &e)
            }
        };

        if !outcome.success {
            progress.println(&outcome.failure_report())?;
        }
        progress.finish(&job.name)?;
        Ok(outcome)
    }
}
