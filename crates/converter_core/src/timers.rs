use std::time::Duration;

use crate::Generation;

/// Interval between simulated progress increments.
pub const PROGRESS_TICK_INTERVAL: Duration = Duration::from_millis(80);
/// Interval between elapsed-time samples.
pub const ELAPSED_SAMPLE_INTERVAL: Duration = Duration::from_millis(200);
/// The simulator never goes past this on its own.
pub const PROGRESS_CEILING: u8 = 90;
pub const PROGRESS_COMPLETE: u8 = 100;

/// Heuristic progress for a request whose real completion is unknown.
///
/// Ticks are tagged with the generation that started the simulator; ticks from
/// any other generation are ignored, so a late tick from a previous job can
/// never move the current bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressSimulator {
    percent: u8,
    running: Option<Generation>,
}

impl ProgressSimulator {
    pub fn start(&mut self, generation: Generation) {
        self.percent = 0;
        self.running = Some(generation);
    }

    /// Advances by one unit. Returns `true` if the value changed.
    pub fn tick(&mut self, generation: Generation) -> bool {
        if self.running != Some(generation) || self.percent >= PROGRESS_CEILING {
            return false;
        }
        self.percent += 1;
        true
    }

    /// Halts ticking, keeping the current value.
    pub fn stop(&mut self) {
        self.running = None;
    }

    pub fn complete(&mut self) {
        self.running = None;
        self.percent = PROGRESS_COMPLETE;
    }

    pub fn reset(&mut self) {
        self.running = None;
        self.percent = 0;
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn running_generation(&self) -> Option<Generation> {
        self.running
    }
}

/// Wall-clock seconds since a job started, sampled rather than computed live.
///
/// The last sample stays readable after [`ElapsedClock::stop`] so a finished
/// job can report how long it took.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElapsedClock {
    epoch_ms: u64,
    last_sample_ms: u64,
    running: Option<Generation>,
}

impl ElapsedClock {
    pub fn start(&mut self, generation: Generation, epoch_ms: u64) {
        self.epoch_ms = epoch_ms;
        self.last_sample_ms = 0;
        self.running = Some(generation);
    }

    /// Records `now - epoch`. Returns `true` if the displayed value changed.
    pub fn sample(&mut self, generation: Generation, now_ms: u64) -> bool {
        if self.running != Some(generation) {
            return false;
        }
        let before = self.display();
        self.last_sample_ms = now_ms.saturating_sub(self.epoch_ms);
        self.display() != before
    }

    pub fn stop(&mut self) {
        self.running = None;
    }

    pub fn running_generation(&self) -> Option<Generation> {
        self.running
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.last_sample_ms)
    }

    /// Seconds with one decimal place, e.g. `"3.4"`.
    pub fn display(&self) -> String {
        format!("{:.1}", self.last_sample_ms as f64 / 1000.0)
    }
}
