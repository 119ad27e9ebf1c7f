use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use quiz_core::time::format_timer_label;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Quiz stopwatch with a once-per-second display tick.
///
/// Elapsed time is measured on the monotonic `tokio` clock. The display label
/// is published on a `watch` channel; an empty string means "hidden".
/// Only one tick task exists at a time.
pub struct Timer {
    origin: Option<Instant>,
    frozen_ms: Option<u64>,
    ticker: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
    display: watch::Sender<String>,
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        let (display, _) = watch::channel(String::new());
        Self {
            origin: None,
            frozen_ms: None,
            ticker: None,
            ticks: Arc::new(AtomicU64::new(0)),
            display,
        }
    }

    /// Record a new origin and start ticking. A running tick is stopped first.
    pub fn start(&mut self) {
        self.halt_ticker();

        let origin = Instant::now();
        self.origin = Some(origin);
        self.frozen_ms = None;
        self.ticks.store(0, Ordering::Relaxed);
        self.display.send_replace(format_timer_label(0));
        self.spawn_ticker(origin);
        debug!("timer started");
    }

    /// Stop ticking and hide the display. The elapsed value is kept.
    pub fn stop(&mut self) {
        if self.frozen_ms.is_none() {
            self.frozen_ms = self.origin.map(elapsed_ms_since);
        }
        self.halt_ticker();
        self.display.send_replace(String::new());
    }

    /// Continue a stopped timer from its original origin.
    ///
    /// No-op if never started or already running.
    pub fn resume(&mut self) {
        let Some(origin) = self.origin else {
            return;
        };
        if self.is_running() {
            return;
        }
        self.frozen_ms = None;
        self.display
            .send_replace(format_timer_label(elapsed_ms_since(origin)));
        self.spawn_ticker(origin);
    }

    /// Stop and forget the origin, as if never started.
    pub fn reset(&mut self) {
        self.stop();
        self.origin = None;
        self.frozen_ms = None;
    }

    /// Milliseconds since `start`, frozen at `stop`; 0 if never started.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        match (self.frozen_ms, self.origin) {
            (Some(frozen), _) => frozen,
            (None, Some(origin)) => elapsed_ms_since(origin),
            (None, None) => 0,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Ticks published since the last `start`.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Current display label; empty when stopped.
    #[must_use]
    pub fn label(&self) -> String {
        self.display.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display.subscribe()
    }

    fn spawn_ticker(&mut self, origin: Instant) {
        let Ok(runtime) = Handle::try_current() else {
            warn!("no async runtime; timer display will not tick");
            return;
        };
        let display = self.display.clone();
        let ticks = Arc::clone(&self.ticks);
        // Ticks land on whole seconds after the origin.
        let first = origin + TICK_INTERVAL * next_whole_second(elapsed_ms_since(origin));
        self.ticker = Some(runtime.spawn(async move {
            let mut interval = time::interval_at(first, TICK_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                ticks.fetch_add(1, Ordering::Relaxed);
                display.send_replace(format_timer_label(elapsed_ms_since(origin)));
            }
        }));
    }

    fn halt_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.halt_ticker();
    }
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("running", &self.is_running())
            .field("elapsed_ms", &self.elapsed_ms())
            .finish_non_exhaustive()
    }
}

fn elapsed_ms_since(origin: Instant) -> u64 {
    u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn next_whole_second(elapsed_ms: u64) -> u32 {
    u32::try_from(elapsed_ms / 1000 + 1).unwrap_or(u32::MAX)
}
