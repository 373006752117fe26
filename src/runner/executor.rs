use crate::error::Result;
use crate::runner::{JobOutcome, JobSpec};
use std::process::Stdio;
use tokio::process::Command;

/// Trait for executing a single job.
pub trait JobExecutor {
    /// Run the job to completion.
    ///
    /// # Arguments
    /// * `job` - The job to run
    ///
    /// # Returns
    /// * `Result<JobOutcome>` - How the job ended; `Err` only if it could not be started
    async fn execute(&self, job: &JobSpec) -> Result<JobOutcome>;
}

/// Implementation of JobExecutor that runs commands through the platform shell.
pub struct ShellExecutor {
    shell: &'static str,
    flag: &'static str,
}

impl ShellExecutor {
    /// Create an executor for the default shell of this platform.
    pub fn new() -> Self {
        if cfg!(windows) {
            Self {
                shell: "cmd",
                flag: "/C",
            }
        } else {
            Self {
                shell: "sh",
                flag: "-c",
            }
        }
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl JobExecutor for ShellExecutor {
    async fn execute(&self, job: &JobSpec) -> Result<JobOutcome> {
        log::debug!("execute job={} command={}", job.name, job.command);
        // Output is captured so child processes cannot scribble over the progress line.
        let output = Command::new(self.shell)
            .arg(self.flag)
            .arg(&job.command)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(JobOutcome {
            name: job.name.clone(),
            success: output.status.success(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
