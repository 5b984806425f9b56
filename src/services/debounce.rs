use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A scheduled job, whether its quiet period has already elapsed, and a
/// signal that flips to true once the job has run to completion
struct Pending {
    handle: JoinHandle<()>,
    fired: Arc<AtomicBool>,
    done: watch::Receiver<bool>,
}

/// Runs only the most recently scheduled job, once `delay` has passed
/// without another job being scheduled
///
/// Scheduling cancels the previous job while it is still waiting. A job
/// whose delay already elapsed keeps running; the debouncer cancels timers,
/// not work in flight.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<Pending>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedules `job`, replacing any job that has not fired yet
    pub fn schedule<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let fired = Arc::new(AtomicBool::new(false));
        let task_fired = fired.clone();
        // Dropped without a value when the job is aborted
        let (done_tx, done) = watch::channel(false);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task_fired.store(true, Ordering::SeqCst);
            job.await;
            done_tx.send_replace(true);
        });

        let previous = self
            .pending
            .lock()
            .replace(Pending { handle, fired, done });
        if let Some(previous) = previous {
            Self::cancel_if_waiting(previous);
        }
    }

    /// Drops the pending job if it is still waiting
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            Self::cancel_if_waiting(previous);
        }
    }

    fn cancel_if_waiting(pending: Pending) {
        if !pending.fired.load(Ordering::SeqCst) {
            pending.handle.abort();
            tracing::trace!("Debounced job cancelled before firing");
        }
    }

    /// Waits until the most recently scheduled job has finished
    ///
    /// The job stays in its slot while waiting, so a job scheduled in the
    /// meantime still cancels it; the wait then follows the newer job.
    pub async fn settle(&self) {
        loop {
            let mut done = {
                let pending = self.pending.lock();
                match pending.as_ref() {
                    None => return,
                    Some(pending) if pending.handle.is_finished() || *pending.done.borrow() => {
                        return
                    }
                    Some(pending) => pending.done.clone(),
                }
            };

            let interrupted = done.wait_for(|finished| *finished).await.is_err();
            if interrupted {
                // Aborted or panicked; let the runtime mark the task finished
                tokio::task::yield_now().await;
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
