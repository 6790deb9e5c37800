//! Deployment-job watcher: polls a job's status until it reaches a terminal
//! state, then fires a completion callback exactly once and stops.
//!
//! A fetch failure mid-watch neither changes the stored status nor stops
//! the watcher; a multi-minute deployment must survive network blips. Only
//! an explicit terminal status ends the session.

use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::error::ApiResult;
use crate::state::Observed;
use crate::types::DeployJob;

pub struct JobWatcher {
    task: Option<JoinHandle<()>>,
    active: Arc<AtomicBool>,
    wake: Arc<Notify>,
    job: Observed<Option<DeployJob>>,
}

impl JobWatcher {
    /// Start watching. `fetch` is invoked immediately and then once per
    /// interval (or sooner after a `poke`). `on_terminal` runs exactly once,
    /// on the first poll that observes `complete` or `failed`.
    pub fn watch<F, C>(interval: Duration, fetch: F, on_terminal: C) -> Self
    where
        F: Fn() -> BoxFuture<'static, ApiResult<DeployJob>> + Send + 'static,
        C: FnOnce(DeployJob) + Send + 'static,
    {
        let active = Arc::new(AtomicBool::new(true));
        let wake = Arc::new(Notify::new());
        let job = Observed::new(None);

        let flag = active.clone();
        let wake_rx = wake.clone();
        let job_slot = job.clone();

        let task = tokio::spawn(async move {
            // taking out of the Option is the already-notified flag: a poke
            // racing the final tick cannot fire the callback twice
            let mut on_terminal = Some(on_terminal);
            loop {
                if !flag.load(Ordering::SeqCst) {
                    break;
                }
                match fetch().await {
                    Ok(polled) => {
                        if !flag.load(Ordering::SeqCst) {
                            break;
                        }
                        let terminal = polled.status.is_terminal();
                        log::debug!(
                            "[portalx][job] {} status={} terminal={terminal}",
                            polled.id,
                            polled.status
                        );
                        job_slot.set(Some(polled.clone()));
                        if terminal {
                            if let Some(cb) = on_terminal.take() {
                                cb(polled);
                            }
                            break;
                        }
                    }
                    Err(e) => {
                        log::warn!("[portalx][job] status poll failed (will retry): {e}");
                    }
                }
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = wake_rx.notified() => {
                        log::debug!("[portalx][job] poked, polling now");
                    }
                }
            }
        });

        Self {
            task: Some(task),
            active,
            wake,
            job,
        }
    }

    /// Shared handle to the last observed job state.
    pub fn job(&self) -> Observed<Option<DeployJob>> {
        self.job.clone()
    }

    /// Manual refresh: wake the loop for an immediate re-poll.
    pub fn poke(&self) {
        self.wake.notify_one();
    }

    /// True while the watch loop is live (no terminal status seen yet).
    pub fn is_watching(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Idempotent teardown.
    pub fn stop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Run until the watcher stops on its own (terminal status observed).
    pub async fn wait(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for JobWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
