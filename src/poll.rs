//! Generic fixed-interval polling session.
//!
//! A `Poller` owns at most one live tokio task. The loop invokes its fetch
//! function immediately on start and then once per interval; a failed tick
//! is logged and swallowed so it never halts the loop. Ticks are serialized
//! per session: the loop awaits the in-flight fetch, and a tick that would
//! land while one is still running is delayed rather than queued.

use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct Poller {
    interval: Duration,
    task: Option<JoinHandle<()>>,
    active: Option<Arc<AtomicBool>>,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            task: None,
            active: None,
        }
    }

    /// Start polling. If a session is already live it is stopped first, so
    /// a `Poller` never runs two timers at once.
    pub fn start<F>(&mut self, label: &'static str, mut fetch: F)
    where
        F: FnMut() -> BoxFuture<'static, anyhow::Result<()>> + Send + 'static,
    {
        self.stop();

        let active = Arc::new(AtomicBool::new(true));
        let flag = active.clone();
        let interval = self.interval;

        self.task = Some(tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            log::debug!("[portalx][poll] {label} started, interval={interval:?}");
            loop {
                // first tick completes immediately
                tick.tick().await;
                if !flag.load(Ordering::SeqCst) {
                    break;
                }
                let res = fetch().await;
                // session may have been torn down while the fetch was in flight
                if !flag.load(Ordering::SeqCst) {
                    break;
                }
                if let Err(e) = res {
                    log::warn!("[portalx][poll] {label} tick failed (will retry): {e:#}");
                }
            }
            log::debug!("[portalx][poll] {label} stopped");
        }));
        self.active = Some(active);
    }

    /// Idempotent teardown: safe to call when already stopped.
    pub fn stop(&mut self) {
        if let Some(flag) = self.active.take() {
            flag.store(false, Ordering::SeqCst);
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
