use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::info;

/// Running counters for one trading session. Every HTTP call attempt is
/// recorded as exactly one success or one failure, so
/// `successes + failures == attempts` holds at all times.
#[derive(Debug, Clone)]
pub struct SessionStats {
    started_at: Instant,
    started_at_utc: DateTime<Utc>,
    successes: u64,
    failures: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            started_at_utc: Utc::now(),
            successes: 0,
            failures: 0,
        }
    }

    pub fn record_success(&mut self) {
        self.successes += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn attempts(&self) -> u64 {
        self.successes + self.failures
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Successful transactions per minute over the elapsed session time.
    pub fn tpm(&self) -> f64 {
        self.tpm_at(self.elapsed())
    }

    pub fn tpm_at(&self, elapsed: Duration) -> f64 {
        let minutes = elapsed.as_secs_f64() / 60.0;
        if minutes <= 0.0 {
            return 0.0;
        }
        self.successes as f64 / minutes
    }

    pub fn success_rate(&self) -> f64 {
        if self.attempts() == 0 {
            return 0.0;
        }
        self.successes as f64 / self.attempts() as f64 * 100.0
    }

    pub fn log_summary(&self) {
        let elapsed = self.elapsed();
        info!("=== Final Statistics ===");
        info!(
            "Session started: {}",
            self.started_at_utc.format("%Y-%m-%d %H:%M:%S UTC")
        );
        info!("Duration: {:.1} minutes", elapsed.as_secs_f64() / 60.0);
        info!("Call attempts: {}", self.attempts());
        info!(
            "Successful: {} ({:.1}%)",
            self.successes,
            self.success_rate()
        );
        info!("Failed: {}", self.failures);
        info!("Transactions per minute: {:.1}", self.tpm_at(elapsed));
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
