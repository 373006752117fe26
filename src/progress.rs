use crate::error::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub mod console;
pub mod constants;
pub mod format;
mod ticker;

pub use self::console::{BufferConsole, Console, StderrConsole, TraceSwitch};

use self::constants::{CSI_ERASE_LINE, CSI_ERASE_LINE_AFTER, QUIET_HOLDOFF, SHOW_DELAY};
use self::format::{duration_str, elapsed_str, elide, jobs_str, percent};

/// Construction options for a [`ProgressReporter`].
#[derive(Debug, Clone)]
pub struct ProgressOptions {
    /// Expected number of units; zero or negative means unknown.
    pub total: i64,
    /// Suffix appended to the done and total counts.
    pub units: String,
    /// Hold back output until half a second has passed.
    pub delay: bool,
    /// Never produce any output.
    pub quiet: bool,
    /// Show an elapsed clock, refreshed in the background once a second.
    pub show_elapsed: bool,
    /// Cut lines down to the terminal width.
    pub elide: bool,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self {
            total: 0,
            units: String::new(),
            delay: true,
            quiet: false,
            show_elapsed: false,
            elide: false,
        }
    }
}

impl ProgressOptions {
    pub fn total(mut self, total: i64) -> Self {
        self.total = total;
        self
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn delay(mut self, delay: bool) -> Self {
        self.delay = delay;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn show_elapsed(mut self, show_elapsed: bool) -> Self {
        self.show_elapsed = show_elapsed;
        self
    }

    pub fn elide(mut self, elide: bool) -> Self {
        self.elide = elide;
        self
    }
}

/// Mutable part of a progress line.
#[derive(Debug, Default)]
struct State {
    done: i64,
    // Latches: once true they stay true.
    visible: bool,
    show_jobs: bool,
    active: i64,
    last_msg: Option<String>,
}

/// Everything the caller and the refresh ticker both need.
pub(crate) struct Shared {
    title: String,
    total: i64,
    units: String,
    show_elapsed: bool,
    elide: bool,
    start: Instant,
    console: Arc<dyn Console>,
    state: Mutex<State>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn elapsed(&self) -> Duration {
        Instant::now().saturating_duration_since(self.start)
    }

    fn suppressed(&self) -> bool {
        !self.console.is_terminal() || self.console.is_tracing()
    }

    /// Apply an increment and message, then redraw the line if it should be shown.
    fn render(&self, state: &mut State, inc: i64, msg: Option<String>) -> Result<()> {
        state.done += inc;
        if msg.is_some() {
            state.last_msg = msg;
        }

        if self.suppressed() {
            return Ok(());
        }

        let elapsed = self.elapsed();
        if !state.visible {
            if elapsed < SHOW_DELAY {
                return Ok(());
            }
            state.visible = true;
        }

        let line = self.compose(state, elapsed);
        self.write_line(&line, "")
    }

    /// Redraw from the background ticker unless the reporter has already ended.
    pub(crate) fn refresh(&self, stop: &CancellationToken) -> Result<()> {
        let mut state = self.lock();
        if stop.is_cancelled() {
            return Ok(());
        }
        self.render(&mut state, 0, None)
    }

    fn compose(&self, state: &State, elapsed: Duration) -> String {
        if self.total <= 0 {
            return format!("{}: {},{CSI_ERASE_LINE_AFTER}", self.title, state.done);
        }

        let jobs = if state.show_jobs {
            format!("[{}] ", jobs_str(state.active))
        } else {
            String::new()
        };
        let clock = if self.show_elapsed {
            format!(" {} |", elapsed_str(elapsed.as_secs_f64()))
        } else {
            String::new()
        };
        format!(
            "{}: {:>2}% {jobs}({}{units}/{}{units}){clock} {}{CSI_ERASE_LINE_AFTER}",
            self.title,
            percent(state.done, self.total),
            state.done,
            self.total,
            state.last_msg.as_deref().unwrap_or_default(),
            units = self.units,
        )
    }

    fn summary(&self, state: &State) -> String {
        let duration = duration_str(self.elapsed().as_secs_f64());
        if self.total <= 0 {
            format!(
                "{}: {}, done in {duration}{CSI_ERASE_LINE_AFTER}",
                self.title, state.done
            )
        } else {
            format!(
                "{}: {:>3}% ({}{units}/{}{units}), done in {duration}{CSI_ERASE_LINE_AFTER}",
                self.title,
                percent(state.done, self.total),
                state.done,
                self.total,
                units = self.units,
            )
        }
    }

    /// Move to column zero, elide if requested, and write the line followed by `terminator`.
    fn write_line(&self, line: &str, terminator: &str) -> Result<()> {
        let mut out = format!("\r{line}");
        if self.elide {
            if let Some(columns) = self.console.columns() {
                out = elide(out, columns);
            }
        }
        out.push_str(terminator);
        self.console.write_str(&out)?;
        Ok(())
    }
}

/// A single self-overwriting progress line.
///
/// The reporter is driven by [`start`](Self::start), [`finish`](Self::finish)
/// and [`update`](Self::update) and must be finalized with [`end`](Self::end).
/// When the elapsed clock is enabled a background task redraws the line every
/// second: a tokio task when built inside a runtime, a thread otherwise. That
/// task only stops when `end` is called, so dropping a reporter without ending
/// it leaves the task running until the runtime or process shuts down.
pub struct ProgressReporter {
    shared: Arc<Shared>,
    stop: CancellationToken,
    thread_stop: Option<Arc<ticker::StopSignal>>,
}

impl ProgressReporter {
    /// Create a reporter that draws on standard error.
    pub fn new(title: impl Into<String>, options: ProgressOptions) -> Self {
        Self::with_console(title, options, StderrConsole::default())
    }

    /// Create a reporter that draws on the given console.
    pub fn with_console(
        title: impl Into<String>,
        options: ProgressOptions,
        console: impl Console + 'static,
    ) -> Self {
        let console: Arc<dyn Console> = Arc::new(console);
        let title = title.into();

        let mut start = Instant::now();
        let mut visible = !options.delay;
        if options.quiet {
            visible = false;
            start += QUIET_HOLDOFF;
        }

        log::debug!(
            "progress title={} total={} delay={} quiet={} show_elapsed={} elide={}",
            title,
            options.total,
            options.delay,
            options.quiet,
            options.show_elapsed,
            options.elide
        );

        let shared = Arc::new(Shared {
            title,
            total: options.total,
            units: options.units,
            show_elapsed: options.show_elapsed,
            elide: options.elide && console.is_terminal(),
            start,
            console,
            state: Mutex::new(State {
                visible,
                ..State::default()
            }),
        });

        let stop = CancellationToken::new();
        let thread_stop = if !options.quiet && options.show_elapsed {
            ticker::spawn(Arc::clone(&shared), stop.clone())
        } else {
            None
        };

        Self {
            shared,
            stop,
            thread_stop,
        }
    }

    /// Record that a job named `name` has started.
    pub fn start(&self, name: &str) -> Result<()> {
        let mut state = self.shared.lock();
        state.active += 1;
        state.show_jobs = state.show_jobs || state.active > 1;
        self.shared
            .render(&mut state, 0, Some(format!("started {name}")))
    }

    /// Record that a job named `name` has finished, counting it as one unit done.
    pub fn finish(&self, name: &str) -> Result<()> {
        let mut state = self.shared.lock();
        let result = self
            .shared
            .render(&mut state, 1, Some(format!("finished {name}")));
        state.active -= 1;
        result
    }

    /// Add `inc` completed units and redraw. Without a message the previous one is reused.
    pub fn update(&self, inc: i64, msg: Option<&str>) -> Result<()> {
        let mut state = self.shared.lock();
        self.shared.render(&mut state, inc, msg.map(str::to_string))
    }

    /// Print a full line of text above the progress line without corrupting it.
    pub fn println(&self, text: &str) -> Result<()> {
        let mut state = self.shared.lock();
        if self.shared.suppressed() || !state.visible {
            self.shared.console.write_str(&format!("{text}\n"))?;
            return Ok(());
        }
        self.shared
            .console
            .write_str(&format!("\r{CSI_ERASE_LINE}{text}\n"))?;
        self.shared.render(&mut state, 0, None)
    }

    /// Stop the refresh ticker and print the final summary line.
    pub fn end(self) -> Result<()> {
        self.stop.cancel();
        if let Some(signal) = &self.thread_stop {
            signal.stop();
        }

        let state = self.shared.lock();
        if self.shared.suppressed() || !state.visible {
            return Ok(());
        }
        let summary = self.shared.summary(&state);
        self.shared.write_line(&summary, "\n")
    }

    pub fn title(&self) -> &str {
        &self.shared.title
    }

    pub fn total(&self) -> i64 {
        self.shared.total
    }

    pub fn done(&self) -> i64 {
        self.shared.lock().done
    }

    pub fn active_jobs(&self) -> i64 {
        self.shared.lock().active
    }

    pub fn is_visible(&self) -> bool {
        self.shared.lock().visible
    }

    pub fn shows_job_count(&self) -> bool {
        self.shared.lock().show_jobs
    }

    pub fn last_message(&self) -> Option<String> {
        self.shared.lock().last_msg.clone()
    }
}
