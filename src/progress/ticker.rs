// Background redraw of the elapsed clock
use crate::progress::Shared;
use crate::progress::constants::REFRESH_INTERVAL;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// Wakes a ticker thread that is waiting out its refresh interval.
#[derive(Debug, Default)]
pub(crate) struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    pub(crate) fn stop(&self) {
        *self.stopped.lock().unwrap_or_else(PoisonError::into_inner) = true;
        self.wake.notify_all();
    }

    /// Wait up to `timeout`; returns whether the signal was raised.
    fn wait(&self, timeout: Duration) -> bool {
        let stopped = self.stopped.lock().unwrap_or_else(PoisonError::into_inner);
        let (stopped, _) = self
            .wake
            .wait_timeout_while(stopped, timeout, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *stopped
    }
}

/// Spawn the once-a-second refresh task.
///
/// Inside a tokio runtime the task runs there and watches `stop`. Outside one
/// a dedicated thread is started instead, woken through the returned signal.
pub(crate) fn spawn(shared: Arc<Shared>, stop: CancellationToken) -> Option<Arc<StopSignal>> {
    match Handle::try_current() {
        Ok(handle) => {
            spawn_task(&handle, shared, stop);
            None
        }
        Err(_) => Some(spawn_thread(shared, stop)),
    }
}

fn spawn_task(handle: &Handle, shared: Arc<Shared>, stop: CancellationToken) {
    handle.spawn(async move {
        loop {
            if let Err(e) = shared.refresh(&stop) {
                log::debug!("progress refresh for '{}' failed: {e}", shared.title);
            }
            tokio::select! {
                biased;

                () = stop.cancelled() => break,
                () = tokio::time::sleep(REFRESH_INTERVAL) => {}
            }
        }
        log::debug!("progress ticker for '{}' stopped", shared.title);
    });
}

fn spawn_thread(shared: Arc<Shared>, stop: CancellationToken) -> Arc<StopSignal> {
    log::debug!(
        "no tokio runtime, refreshing '{}' from a ticker thread",
        shared.title
    );
    let signal = Arc::new(StopSignal::default());
    let waiter = Arc::clone(&signal);
    thread::spawn(move || {
        loop {
            if let Err(e) = shared.refresh(&stop) {
                log::debug!("progress refresh for '{}' failed: {e}", shared.title);
            }
            if waiter.wait(REFRESH_INTERVAL) || stop.is_cancelled() {
                break;
            }
        }
        log::debug!("progress ticker thread for '{}' stopped", shared.title);
    });
    signal
}
