use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

use crate::metrics::MetricsAccumulator;

pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(2);

/// One WPM sample for the post-session chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub elapsed_seconds: u64,
    pub wpm: u32,
}

impl HistoryPoint {
    pub fn new(elapsed_seconds: u64, wpm: u32) -> Self {
        Self {
            elapsed_seconds,
            wpm,
        }
    }
}

/// Samples WPM at a fixed cadence, measured from the first keystroke.
///
/// Driven by whatever tick the host delivers: ticks before the next due
/// instant are ignored and a late tick yields a single sample.
#[derive(Debug, Clone)]
pub struct HistorySampler {
    interval: Duration,
    next_due: Option<SystemTime>,
    points: Vec<HistoryPoint>,
    stopped: bool,
}

impl HistorySampler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            points: Vec::new(),
            stopped: false,
        }
    }

    pub fn on_tick(&mut self, metrics: &MetricsAccumulator, now: SystemTime) -> Option<HistoryPoint> {
        if self.stopped || self.interval.is_zero() {
            return None;
        }
        let started_at = metrics.started_at?;
        let mut due = self.next_due.unwrap_or(started_at + self.interval);
        if now < due {
            self.next_due = Some(due);
            return None;
        }

        let point = HistoryPoint::new(metrics.elapsed(now).as_secs(), metrics.wpm(now));
        self.points.push(point);

        while due <= now {
            due += self.interval;
        }
        self.next_due = Some(due);

        Some(point)
    }

    /// Permanently disables sampling.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.next_due = None;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn points(&self) -> &[HistoryPoint] {
        &self.points
    }
}

impl Default for HistorySampler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_INTERVAL)
    }
}
