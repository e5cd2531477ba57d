use std::time::{Duration, SystemTime};

/// Keystroke counters and the clock they are measured against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsAccumulator {
    pub correct_keystrokes: u32,
    pub missed_keystrokes: u32,
    pub started_at: Option<SystemTime>,
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the clock on the first counted keystroke; later calls are no-ops.
    /// Returns true when this call started it.
    pub fn start_if_idle(&mut self, now: SystemTime) -> bool {
        if self.started_at.is_none() {
            self.started_at = Some(now);
            true
        } else {
            false
        }
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn record_correct(&mut self) {
        self.correct_keystrokes += 1;
    }

    pub fn record_miss(&mut self) {
        self.missed_keystrokes += 1;
    }

    pub fn total_keystrokes(&self) -> u32 {
        self.correct_keystrokes + self.missed_keystrokes
    }

    /// Time since the first counted keystroke, zero before it or if the
    /// clock went backwards.
    pub fn elapsed(&self, now: SystemTime) -> Duration {
        self.started_at
            .and_then(|start| now.duration_since(start).ok())
            .unwrap_or_default()
    }

    pub fn wpm(&self, now: SystemTime) -> u32 {
        wpm(self.correct_keystrokes, self.elapsed(now))
    }

    pub fn accuracy(&self) -> u32 {
        accuracy(self.correct_keystrokes, self.missed_keystrokes)
    }
}

/// Words per minute with the conventional five keystrokes per word.
pub fn wpm(correct_keystrokes: u32, elapsed: Duration) -> u32 {
    let minutes = elapsed.as_millis() as f64 / 60_000.0;
    if minutes > 0.0 {
        ((correct_keystrokes as f64 / 5.0) / minutes).round() as u32
    } else {
        0
    }
}

/// Percentage of counted keystrokes that were correct, 100 when none were counted.
pub fn accuracy(correct_keystrokes: u32, missed_keystrokes: u32) -> u32 {
    let total = correct_keystrokes + missed_keystrokes;
    if total == 0 {
        return 100;
    }
    ((correct_keystrokes as f64 / total as f64) * 100.0).round() as u32
}
