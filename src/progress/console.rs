// Terminal collaborators consumed by the progress reporter
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

// Stderr is checked once per process, the way a shell checks its controlling terminal.
static STDERR_IS_TERMINAL: LazyLock<bool> = LazyLock::new(|| io::stderr().is_terminal());

/// Output side of a progress reporter.
///
/// All terminal capability queries go through this trait so the reporter can be
/// driven without touching the real process streams.
pub trait Console: Send + Sync {
    /// Whether the output stream is an interactive terminal.
    fn is_terminal(&self) -> bool;

    /// Whether diagnostics are currently being traced onto the same stream.
    fn is_tracing(&self) -> bool;

    /// Current terminal width in columns, if it can be determined.
    fn columns(&self) -> Option<usize>;

    /// Write the string and flush it immediately.
    fn write_str(&self, s: &str) -> io::Result<()>;
}

/// Shared on/off flag telling reporters that trace output owns stderr.
#[derive(Debug, Clone, Default)]
pub struct TraceSwitch(Arc<AtomicBool>);

impl TraceSwitch {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Release);
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Console writing to the process's standard error.
#[derive(Debug, Clone, Default)]
pub struct StderrConsole {
    trace: TraceSwitch,
}

impl StderrConsole {
    pub fn new(trace: TraceSwitch) -> Self {
        Self { trace }
    }
}

impl Console for StderrConsole {
    fn is_terminal(&self) -> bool {
        *STDERR_IS_TERMINAL
    }

    fn is_tracing(&self) -> bool {
        self.trace.is_enabled()
    }

    fn columns(&self) -> Option<usize> {
        // crossterm measures the controlling tty (or stdout), not stderr itself.
        crossterm::terminal::size()
            .ok()
            .map(|(cols, _rows)| cols as usize)
    }

    fn write_str(&self, s: &str) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(s.as_bytes())?;
        stderr.flush()
    }
}

/// In-memory console that records everything written to it.
///
/// Useful for embedding the reporter somewhere other than a terminal and for
/// inspecting rendered lines.
#[derive(Debug, Default)]
pub struct BufferConsole {
    terminal: bool,
    columns: Option<usize>,
    trace: TraceSwitch,
    output: Mutex<String>,
}

impl BufferConsole {
    /// A console that claims to be an interactive terminal of unknown width.
    pub fn terminal() -> Self {
        Self {
            terminal: true,
            ..Self::default()
        }
    }

    /// A console that behaves like a redirected file or pipe.
    pub fn redirected() -> Self {
        Self::default()
    }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_trace(mut self, trace: TraceSwitch) -> Self {
        self.trace = trace;
        self
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of separate lines rendered so far, counted by their leading '\r'.
    pub fn render_count(&self) -> usize {
        self.contents().matches('\r').count()
    }
}

impl Console for BufferConsole {
    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn is_tracing(&self) -> bool {
        self.trace.is_enabled()
    }

    fn columns(&self) -> Option<usize> {
        self.columns
    }

    fn write_str(&self, s: &str) -> io::Result<()> {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(s);
        Ok(())
    }
}

impl<C: Console + ?Sized> Console for Arc<C> {
    fn is_terminal(&self) -> bool {
        (**self).is_terminal()
    }

    fn is_tracing(&self) -> bool {
        (**self).is_tracing()
    }

    fn columns(&self) -> Option<usize> {
        (**self).columns()
    }

    fn write_str(&self, s: &str) -> io::Result<()> {
        (**self).write_str(s)
    }
}
