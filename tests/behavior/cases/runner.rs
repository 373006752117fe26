use crate::*;
use progline::error::{Error, Result};
use progline::progress::ProgressOptions;
use progline::runner::{JobExecutor, JobOutcome, JobRunner, JobSpec};
use std::time::Duration;

pub fn tests(tests: &mut Vec<Trial>) {
    tests.extend(trials!(
        test_runner_reports_every_job,
        test_runner_counts_jobs_that_cannot_start_as_failed,
        test_runner_shows_job_count_when_parallel,
        test_runner_rejects_empty_job_list,
    ));
}

/// Executor that pretends to run jobs, failing the ones it was told to fail.
struct FakeExecutor {
    failing: Vec<&'static str>,
    unstartable: Vec<&'static str>,
    duration: Duration,
}

impl FakeExecutor {
    fn succeeding() -> Self {
        Self {
            failing: vec![],
            unstartable: vec![],
            duration: Duration::ZERO,
        }
    }
}

impl JobExecutor for FakeExecutor {
    async fn execute(&self, job: &JobSpec) -> Result<JobOutcome> {
        if self.unstartable.contains(&job.name.as_str()) {
            return Err(Error::Io {
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such shell"),
            });
        }
        tokio::time::sleep(self.duration).await;
        let success = !self.failing.contains(&job.name.as_str());
        Ok(JobOutcome {
            name: job.name.clone(),
            success,
            code: Some(if success { 0 } else { 1 }),
            stderr: if success { String::new() } else { "boom\n".to_string() },
        })
    }
}

fn jobs(names: &[&str]) -> Vec<JobSpec> {
    names
        .iter()
        .map(|name| JobSpec::new(*name, format!("run {name}")))
        .collect()
}

fn test_runner_reports_every_job() {
    paused_runtime().block_on(async {
        let (progress, console) =
            terminal_reporter("Run", ProgressOptions::default().delay(false).total(3));
        let executor = FakeExecutor {
            failing: vec!["b"],
            ..FakeExecutor::succeeding()
        };
        let runner = JobRunner::new(executor, 1);

        let summary = runner.run(jobs(&["a", "b", "c"]), &progress).await.unwrap();
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed_names(), vec!["b".to_string()]);
        assert_eq!(progress.done(), 3);
        assert_eq!(progress.active_jobs(), 0);
        assert!(!progress.shows_job_count());

        let contents = console.contents();
        assert!(contents.contains("started a"));
        assert!(contents.contains("\r\x1b[2Kerror: b exited with status 1\nboom\n"));
        assert!(last_line(&console).starts_with("\rRun: 100% (3/3) finished c"));
        progress.end().unwrap();
    });
}

fn test_runner_counts_jobs_that_cannot_start_as_failed() {
    paused_runtime().block_on(async {
        let (progress, console) =
            terminal_reporter("Run", ProgressOptions::default().delay(false).total(2));
        let executor = FakeExecutor {
            unstartable: vec!["ghost"],
            ..FakeExecutor::succeeding()
        };
        let runner = JobRunner::new(executor, 2);

        let summary = runner.run(jobs(&["ghost", "real"]), &progress).await.unwrap();
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].code, None);
        assert!(summary.failed[0].stderr.contains("Job 'ghost' failed"));
        assert!(console.contents().contains("error: ghost did not complete"));
        assert_eq!(progress.done(), 2);
        progress.end().unwrap();
    });
}

fn test_runner_shows_job_count_when_parallel() {
    paused_runtime().block_on(async {
        let (progress, console) =
            terminal_reporter("Par", ProgressOptions::default().delay(false).total(4));
        let executor = FakeExecutor {
            duration: Duration::from_secs(1),
            ..FakeExecutor::succeeding()
        };
        let runner = JobRunner::new(executor, 2);

        let summary = runner
            .run(jobs(&["a", "b", "c", "d"]), &progress)
            .await
            .unwrap();
        assert_eq!(summary.succeeded, 4);
        assert!(progress.shows_job_count());
        assert_eq!(progress.active_jobs(), 0);
        assert!(console.contents().contains("[2 jobs] "));
        progress.end().unwrap();
    });
}

fn test_runner_rejects_empty_job_list() {
    paused_runtime().block_on(async {
        let (progress, _console) = terminal_reporter("Run", ProgressOptions::default());
        let runner = JobRunner::new(FakeExecutor::succeeding(), 1);
        let err = runner.run(vec![], &progress).await.unwrap_err();
        assert!(matches!(err, Error::EmptyJobList));
        progress.end().unwrap();
    });
}
