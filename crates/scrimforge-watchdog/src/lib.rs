//! Inactivity watchdog for Scrimforge match rooms.
//!
//! A match room that nobody plays in should not stay open forever. The
//! watchdog holds a single deadline per match: activity pushes it back,
//! play suspends it, and if it ever passes the match controller closes the
//! room.
//!
//! # Lifecycle
//!
//! ```text
//!            reset()                    suspend()
//!   Armed ───────────→ Armed (later)  ───────────→ Suspended
//!     │                                               │
//!     │ deadline passes                     resume()  │
//!     ▼                                               ▼
//!   Fired (stopped)                         Armed (fresh deadline)
//! ```
//!
//! `disarm()` stops the watchdog from any state; a stopped watchdog never
//! fires again and ignores `reset`/`resume`.
//!
//! # Integration
//!
//! The watchdog is designed to sit inside a match actor's `tokio::select!`
//! loop. Because the deadline is a plain value owned by the watchdog and the
//! wait future is rebuilt on every loop iteration, a reset replaces the old
//! deadline outright. There is no separate timer task that could fire late.
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         expired = watchdog.wait_for_deadline() => {
//!             /* announce and close the room */
//!             break;
//!         }
//!     }
//! }
//! ```

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the inactivity watchdog.
#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    /// How long a room may sit idle before it is closed.
    pub timeout: Duration,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
        }
    }
}

impl WatchdogConfig {
    /// Shortest accepted timeout.
    pub const MIN_TIMEOUT: Duration = Duration::from_secs(1);

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Raises a too-short timeout to [`Self::MIN_TIMEOUT`].
    ///
    /// Called automatically by [`InactivityWatchdog::new`].
    pub fn validated(mut self) -> Self {
        if self.timeout < Self::MIN_TIMEOUT {
            warn!(
                timeout_ms = self.timeout.as_millis() as u64,
                "watchdog timeout below minimum, clamping"
            );
            self.timeout = Self::MIN_TIMEOUT;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Expiry info
// ---------------------------------------------------------------------------

/// Returned by [`InactivityWatchdog::wait_for_deadline`] when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchdogExpired {
    /// Time since the last recorded activity.
    pub idle_for: Duration,
    /// How many times the deadline was pushed back before it fired.
    pub resets: u64,
}

// ---------------------------------------------------------------------------
// Watchdog
// ---------------------------------------------------------------------------

/// A single resettable inactivity deadline.
///
/// One per match. Armed on construction.
#[derive(Debug)]
pub struct InactivityWatchdog {
    config: WatchdogConfig,
    /// When the watchdog fires. `None` while suspended or stopped.
    deadline: Option<Instant>,
    last_activity: Instant,
    suspended: bool,
    stopped: bool,
    resets: u64,
}

impl InactivityWatchdog {
    /// Creates an armed watchdog whose first deadline is `now + timeout`.
    pub fn new(config: WatchdogConfig) -> Self {
        let config = config.validated();
        let now = Instant::now();
        debug!(timeout_s = config.timeout.as_secs(), "watchdog armed");
        Self {
            deadline: Some(now + config.timeout),
            last_activity: now,
            suspended: false,
            stopped: false,
            resets: 0,
            config,
        }
    }

    /// Creates a watchdog with the given timeout and default settings.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(WatchdogConfig::with_timeout(timeout))
    }

    /// Records activity and pushes the deadline back to `now + timeout`.
    ///
    /// No-op while suspended (play in progress) or after the watchdog has
    /// stopped.
    pub fn reset(&mut self) {
        if self.stopped || self.suspended {
            return;
        }
        let now = Instant::now();
        self.last_activity = now;
        self.deadline = Some(now + self.config.timeout);
        self.resets += 1;
    }

    /// Cancels the pending deadline until [`resume`](Self::resume).
    ///
    /// Used while a round is being played: a round in progress is never
    /// interrupted. Idempotent.
    pub fn suspend(&mut self) {
        if self.stopped || self.suspended {
            return;
        }
        self.suspended = true;
        self.deadline = None;
        debug!("watchdog suspended");
    }

    /// Schedules a fresh deadline after a suspension. Idempotent.
    pub fn resume(&mut self) {
        if self.stopped || !self.suspended {
            return;
        }
        let now = Instant::now();
        self.suspended = false;
        self.last_activity = now;
        self.deadline = Some(now + self.config.timeout);
        debug!("watchdog resumed");
    }

    /// Stops the watchdog for good.
    pub fn disarm(&mut self) {
        self.stopped = true;
        self.deadline = None;
    }

    /// Waits until the deadline passes.
    ///
    /// Pends forever while suspended or stopped. It never resolves on
    /// its own, but `tokio::select!` still processes other branches.
    /// Cancel-safe: dropping the future leaves the watchdog unchanged.
    /// After it resolves the watchdog is stopped, so it fires at most once.
    pub async fn wait_for_deadline(&mut self) -> WatchdogExpired {
        let Some(deadline) = self.deadline else {
            std::future::pending::<()>().await;
            unreachable!()
        };

        time::sleep_until(deadline).await;

        self.disarm();
        let idle_for = Instant::now().saturating_duration_since(self.last_activity);
        info!(
            idle_s = idle_for.as_secs(),
            resets = self.resets,
            "inactivity deadline passed"
        );
        WatchdogExpired {
            idle_for,
            resets: self.resets,
        }
    }

    /// Whether a deadline is currently pending.
    #[cfg(test)]
    fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[cfg(test)]
    fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Whether the watchdog has fired or been disarmed.
    #[cfg(test)]
    fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Time left until the deadline, if armed.
    #[cfg(test)]
    fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Helpers
    // =========================================================================

    fn five_minutes() -> WatchdogConfig {
        WatchdogConfig::default()
    }

    // =========================================================================
    // WatchdogConfig
    // =========================================================================

    #[test]
    fn test_default_timeout_is_five_minutes() {
        assert_eq!(WatchdogConfig::default().timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_validated_clamps_zero_timeout() {
        let cfg = WatchdogConfig::with_timeout(Duration::ZERO).validated();
        assert_eq!(cfg.timeout, WatchdogConfig::MIN_TIMEOUT);
    }

    // =========================================================================
    // Firing
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_timeout() {
        let start = Instant::now();
        let mut w = InactivityWatchdog::new(five_minutes());
        assert!(w.is_armed());

        let expired = w.wait_for_deadline().await;

        assert_eq!(start.elapsed(), Duration::from_secs(300));
        assert_eq!(expired.idle_for, Duration::from_secs(300));
        assert_eq!(expired.resets, 0);
        assert!(w.is_stopped());
        assert!(!w.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_only_once() {
        let mut w = InactivityWatchdog::with_timeout(Duration::from_secs(10));
        w.wait_for_deadline().await;

        let again = time::timeout(Duration::from_secs(3600), w.wait_for_deadline()).await;
        assert!(again.is_err(), "stopped watchdog must pend forever");
    }

    #[tokio::test(start_paused = true)]
    async fn test_does_not_fire_early() {
        let mut w = InactivityWatchdog::new(five_minutes());
        let early = time::timeout(Duration::from_secs(299), w.wait_for_deadline()).await;
        assert!(early.is_err());
        // The dropped wait left the deadline in place.
        assert!(w.is_armed());
        assert_eq!(w.remaining(), Some(Duration::from_secs(1)));
    }

    // =========================================================================
    // Reset
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_reset_pushes_deadline_back() {
        let start = Instant::now();
        let mut w = InactivityWatchdog::new(five_minutes());

        time::advance(Duration::from_secs(200)).await;
        w.reset();
        let expired = w.wait_for_deadline().await;

        assert_eq!(start.elapsed(), Duration::from_secs(500));
        assert_eq!(expired.resets, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_replaces_deadline_without_stale_fire() {
        let mut w = InactivityWatchdog::with_timeout(Duration::from_secs(60));
        let first = w.deadline.unwrap();

        time::advance(Duration::from_secs(30)).await;
        w.reset();

        // The original deadline passes without anything firing.
        let at_original = time::timeout(
            first.saturating_duration_since(Instant::now()) + Duration::from_secs(1),
            w.wait_for_deadline(),
        )
        .await;
        assert!(at_original.is_err());
        assert!(w.is_armed());
    }

    // =========================================================================
    // Suspend / resume
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_suspend_prevents_firing() {
        let mut w = InactivityWatchdog::with_timeout(Duration::from_secs(60));
        w.suspend();
        assert!(w.is_suspended());
        assert!(!w.is_armed());

        let result = time::timeout(Duration::from_secs(3600), w.wait_for_deadline()).await;
        assert!(result.is_err(), "suspended watchdog should pend");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_while_suspended_is_ignored() {
        let mut w = InactivityWatchdog::with_timeout(Duration::from_secs(60));
        w.suspend();
        w.reset();
        assert!(!w.is_armed());
        assert_eq!(w.resets, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_schedules_fresh_deadline() {
        let mut w = InactivityWatchdog::with_timeout(Duration::from_secs(60));
        time::advance(Duration::from_secs(50)).await;
        w.suspend();
        time::advance(Duration::from_secs(600)).await;

        let resumed_at = Instant::now();
        w.resume();
        w.wait_for_deadline().await;

        assert_eq!(resumed_at.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_suspend_resume_idempotent() {
        let mut w = InactivityWatchdog::new(five_minutes());
        w.suspend();
        w.suspend();
        assert!(w.is_suspended());
        w.resume();
        w.resume();
        assert!(!w.is_suspended());
        assert!(w.is_armed());
    }

    // =========================================================================
    // Disarm
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_disarm_is_final() {
        let mut w = InactivityWatchdog::with_timeout(Duration::from_secs(5));
        w.disarm();
        w.reset();
        w.resume();
        assert!(w.is_stopped());
        assert!(!w.is_armed());

        let result = time::timeout(Duration::from_secs(60), w.wait_for_deadline()).await;
        assert!(result.is_err());
    }
}
