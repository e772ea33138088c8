//! Progress reporting and cancellation primitives

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vanitas_pattern::{format_count, match_probability_after};

/// Cooperative cancellation flag shared between a search and its owner
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Observed at the next check point.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Periodic progress snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Attempts completed so far
    pub attempts: u64,
    /// Milliseconds since the search started
    pub elapsed_ms: u64,
}

impl ProgressEvent {
    /// Get keys per second
    pub fn keys_per_second(&self) -> f64 {
        if self.elapsed_ms > 0 {
            self.attempts as f64 * 1000.0 / self.elapsed_ms as f64
        } else {
            0.0
        }
    }

    /// Get formatted stats string for a per-attempt match probability
    pub fn format(&self, probability: f64) -> String {
        let kps = self.keys_per_second();
        let prob = match_probability_after(self.attempts, probability);

        // Time until the cumulative probability reaches 50%
        let remaining_for_50 = if prob < 0.5 && probability > 0.0 && kps > 0.0 {
            let keys_needed = 0.5_f64.ln() / (-probability).ln_1p() - self.attempts as f64;
            keys_needed.max(0.0) / kps
        } else {
            0.0
        };

        format!(
            "[{:.2} Kkey/s][Total {}][Prob {:.1}%][50% in {}]",
            kps / 1_000.0,
            format_count(self.attempts as f64),
            prob * 100.0,
            format_seconds(remaining_for_50)
        )
    }
}

fn format_seconds(seconds: f64) -> String {
    if seconds <= 0.0 {
        return "now".to_string();
    }
    if !seconds.is_finite() {
        return "never".to_string();
    }
    if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.0}s", seconds)
    } else if seconds < 3600.0 {
        format!("{:.0}m", seconds / 60.0)
    } else if seconds < 86400.0 {
        format!("{:.1}h", seconds / 3600.0)
    } else if seconds < 86400.0 * 365.0 {
        format!("{:.1}d", seconds / 86400.0)
    } else {
        format!("{:.1}y", seconds / (86400.0 * 365.0))
    }
}
