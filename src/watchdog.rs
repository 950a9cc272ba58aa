// Keep-alive watchdog (Section 4.7).
//
// Every `interval`, the watchdog checks an atomic `unanswered` counter. If it
// has reached `max_unanswered`, the watchdog reports expiry so the caller can
// tear the session down. Otherwise it asks the caller to send an
// enquire_link and bumps the counter. Any inbound traffic resets the counter
// to zero via `on_inbound`/`on_enquire_link_response`; `close()` wakes the
// watchdog loop exactly once so it can exit without racing session teardown.
//
// Grounded on the polling state machine in `client::keepalive::KeepAliveManager`,
// generalized here into an owned async task driven by `tokio::time` and
// `tokio::sync::Notify` rather than a caller-polled `should_ping()`.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
pub struct WatchdogConfig {
    /// Interval between enquire_link probes. Default 5 seconds.
    pub interval: Duration,
    /// Unanswered probes tolerated before the watchdog declares expiry. Default 3.
    pub max_unanswered: u32,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_unanswered: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogOutcome {
    /// `unanswered` reached `max_unanswered`; the session should close.
    Expired,
    /// `close()` was called; the loop exited cooperatively.
    ClosedByRequest,
}

/// Tracks unanswered enquire_link probes and signals session expiry.
///
/// Shared between the read loop (which calls `on_inbound`/
/// `on_enquire_link_response`) and the task driving `run` (which sends
/// probes and checks the counter), so state lives behind atomics rather than
/// a mutex.
#[derive(Debug)]
pub struct Watchdog {
    unanswered: AtomicU32,
    shutdown: Notify,
}

impl Watchdog {
    pub fn new() -> Self {
        Self {
            unanswered: AtomicU32::new(0),
            shutdown: Notify::new(),
        }
    }

    /// Any inbound PDU that is not itself an enquire_link response counts as
    /// liveness and resets the counter.
    pub fn on_inbound(&self) {
        self.unanswered.store(0, Ordering::Relaxed);
    }

    /// An enquire_link_resp arrived; resets the counter.
    pub fn on_enquire_link_response(&self) {
        self.unanswered.store(0, Ordering::Relaxed);
    }

    /// Signals the watchdog loop to exit at its next wakeup. Idempotent:
    /// calling this more than once before `run` observes it is harmless.
    pub fn close(&self) {
        self.shutdown.notify_one();
    }

    pub fn unanswered(&self) -> u32 {
        self.unanswered.load(Ordering::Relaxed)
    }

    /// Drives the watchdog loop until expiry or `close()`. `send_probe` is
    /// invoked to emit an enquire_link request; its error type is only
    /// logged, since a probe write failure is just another unanswered probe.
    pub async fn run<F, Fut, E>(&self, config: WatchdogConfig, mut send_probe: F) -> WatchdogOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: std::fmt::Display,
    {
        loop {
            tokio::select! {
                _ = self.shutdown.notified() => {
                    debug!("watchdog closed by request");
                    return WatchdogOutcome::ClosedByRequest;
                }
                _ = tokio::time::sleep(config.interval) => {
                    if self.unanswered.load(Ordering::Relaxed) >= config.max_unanswered {
                        warn!(
                            unanswered = self.unanswered.load(Ordering::Relaxed),
                            max = config.max_unanswered,
                            "keep-alive watchdog expired"
                        );
                        return WatchdogOutcome::Expired;
                    }

                    if let Err(error) = send_probe().await {
                        warn!(%error, "enquire_link probe failed to send");
                    }
                    self.unanswered.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32 as Counter;
    use std::sync::Arc;

    #[tokio::test]
    async fn expires_after_max_unanswered_probes() {
        let watchdog = Watchdog::new();
        let config = WatchdogConfig {
            interval: Duration::from_millis(5),
            max_unanswered: 3,
        };

        let outcome = watchdog
            .run(config, || async { Ok::<(), std::io::Error>(()) })
            .await;

        assert_eq!(outcome, WatchdogOutcome::Expired);
        assert_eq!(watchdog.unanswered(), 3);
    }

    #[tokio::test]
    async fn inbound_traffic_resets_the_counter_and_prevents_expiry() {
        let watchdog = Arc::new(Watchdog::new());
        let probes = Arc::new(Counter::new(0));

        let config = WatchdogConfig {
            interval: Duration::from_millis(5),
            max_unanswered: 3,
        };

        let watchdog_task = Arc::clone(&watchdog);
        let probes_task = Arc::clone(&probes);
        let handle = tokio::spawn(async move {
            watchdog_task
                .run(config, || {
                    let probes = Arc::clone(&probes_task);
                    async move {
                        probes.fetch_add(1, Ordering::Relaxed);
                        Ok::<(), std::io::Error>(())
                    }
                })
                .await
        });

        // Keep resetting the counter for a few intervals, then let it close.
        for _ in 0..5 {
            tokio::time::sleep(Duration::from_millis(3)).await;
            watchdog.on_inbound();
        }
        watchdog.close();

        let outcome = handle.await.unwrap();
        assert_eq!(outcome, WatchdogOutcome::ClosedByRequest);
    }

    #[tokio::test]
    async fn close_before_any_probe_exits_promptly() {
        let watchdog = Watchdog::new();
        watchdog.close();

        let config = WatchdogConfig {
            interval: Duration::from_secs(60),
            max_unanswered: 3,
        };
        let outcome = watchdog
            .run(config, || async { Ok::<(), std::io::Error>(()) })
            .await;
        assert_eq!(outcome, WatchdogOutcome::ClosedByRequest);
    }
}
