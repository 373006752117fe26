use clap::{Parser, Subcommand};
use snafu::ensure;
use std::path::PathBuf;

use crate::config::DisplayConfig;
use crate::error::{JobsFailedSnafu, Result};
use crate::progress::{ProgressReporter, StderrConsole, TraceSwitch};
use crate::runner::{JobRunner, JobSpec, ShellExecutor, load_manifest};

const DEFAULT_TITLE: &str = "Running";

#[derive(Debug, Parser)]
#[command(
    name = "progline",
    version,
    about = "Run shell jobs behind a single self-updating progress line"
)]
pub struct Args {
    #[command(flatten)]
    pub display: DisplayArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags controlling the progress line; each one can only switch a setting on.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DisplayArgs {
    /// Never draw the progress line
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Draw immediately instead of after half a second
    #[arg(long, global = true)]
    pub no_delay: bool,

    /// Show an elapsed clock refreshed every second
    #[arg(long, global = true)]
    pub elapsed: bool,

    /// Cut the line down to the terminal width
    #[arg(long, global = true)]
    pub elide: bool,

    /// Write debug logs to stderr (the progress line is suppressed)
    #[arg(long, global = true)]
    pub trace: bool,
}

impl DisplayArgs {
    /// Merge these flags over configuration loaded from the environment.
    pub fn apply(&self, config: &mut DisplayConfig) {
        config.quiet |= self.quiet;
        config.no_delay |= self.no_delay;
        config.show_elapsed |= self.elapsed;
        config.elide |= self.elide;
        config.trace |= self.trace;
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run each COMMAND through the shell
    Run {
        /// Number of jobs to run at once
        #[arg(short, long, env = "PROGLINE_JOBS", default_value_t = 1)]
        jobs: usize,

        /// Label shown at the start of the progress line
        #[arg(short, long, default_value = DEFAULT_TITLE)]
        title: String,

        /// Suffix appended to the done and total counts
        #[arg(long)]
        units: Option<String>,

        /// Show a plain counter instead of a percentage
        #[arg(long)]
        no_total: bool,

        #[arg(required = true)]
        commands: Vec<String>,
    },
    /// Run the tasks listed in a JSON manifest
    Batch {
        manifest: PathBuf,

        /// Number of jobs to run at once, overriding the manifest
        #[arg(short, long, env = "PROGLINE_JOBS")]
        jobs: Option<usize>,
    },
}

/// Everything needed to drive one progress line over a set of jobs.
struct RunPlan {
    title: String,
    units: String,
    known_total: bool,
    parallelism: usize,
    jobs: Vec<JobSpec>,
}

pub async fn run(args: Args, config: DisplayConfig, trace: TraceSwitch) -> Result<()> {
    let plan = match args.command {
        Command::Run {
            jobs,
            title,
            units,
            no_total,
            commands,
        } => RunPlan {
            title,
            units: units.unwrap_or_default(),
            known_total: !no_total,
            parallelism: jobs,
            jobs: commands.into_iter().map(JobSpec::from_command).collect(),
        },
        Command::Batch { manifest, jobs } => {
            let manifest = load_manifest(&manifest).await?;
            RunPlan {
                title: manifest
                    .title
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                units: manifest.units.clone().unwrap_or_default(),
                known_total: true,
                parallelism: jobs.or(manifest.jobs).unwrap_or(1),
                jobs: manifest.job_specs(),
            }
        }
    };

    execute_plan(plan, &config, trace).await
}

async fn execute_plan(plan: RunPlan, config: &DisplayConfig, trace: TraceSwitch) -> Result<()> {
    let total = if plan.known_total {
        plan.jobs.len() as i64
    } else {
        0
    };
    let progress = ProgressReporter::with_console(
        plan.title,
        config.progress_options(total, &plan.units),
        StderrConsole::new(trace),
    );

    let runner = JobRunner::new(ShellExecutor::new(), plan.parallelism);
    let result = runner.run(plan.jobs, &progress).await;
    progress.end()?;
    let summary = result?;

    println!(
        "{} succeeded, {} failed",
        summary.succeeded,
        summary.failed.len()
    );
    ensure!(
        summary.failed.is_empty(),
        JobsFailedSnafu {
            failed: summary.failed_names()
        }
    );
    Ok(())
}
