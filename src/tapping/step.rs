//! Host-facing adapter for a tapping step.
//!
//! Translates the step lifecycle callbacks into recorder calls, tracks the
//! countdown, and writes the result into the task result tree.

use crate::config::Config;
use crate::result::{ResultAssembler, TaskResult};
use crate::tapping::recorder::{RecorderError, TapSampleRecorder, TouchOutcome};
use crate::tapping::types::{ButtonIdentifier, Point, TapRegions};
use std::time::Duration;

/// Default countdown for a tapping step.
pub const DEFAULT_TAPPING_DURATION: Duration = Duration::from_secs(30);

/// Default interval between timer ticks.
pub const DEFAULT_TIMER_INTERVAL: Duration = Duration::from_millis(100);

/// One tapping step within a task run.
pub struct TappingStep {
    recorder: TapSampleRecorder,
    duration: Duration,
    timer_interval: Duration,
}

impl TappingStep {
    /// Create a step with the default 30 second countdown.
    pub fn new(identifier: impl Into<String>, step_path: impl Into<String>) -> Self {
        Self {
            recorder: TapSampleRecorder::new(identifier, step_path),
            duration: DEFAULT_TAPPING_DURATION,
            timer_interval: DEFAULT_TIMER_INTERVAL,
        }
    }

    /// Create a step using the durations from the configuration.
    pub fn from_config(
        identifier: impl Into<String>,
        step_path: impl Into<String>,
        config: &Config,
    ) -> Self {
        Self::new(identifier, step_path)
            .with_duration(config.tapping_duration)
            .with_timer_interval(Duration::from_millis(config.timer_interval_ms))
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_timer_interval(mut self, interval: Duration) -> Self {
        self.timer_interval = interval;
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// How often the host should call [`TappingStep::on_timer_tick`].
    pub fn timer_interval(&self) -> Duration {
        self.timer_interval
    }

    pub fn recorder(&self) -> &TapSampleRecorder {
        &self.recorder
    }

    pub fn tap_count(&self) -> u32 {
        self.recorder.tap_count()
    }

    /// The step view is on screen and the targets have their final layout.
    pub fn on_appear(&mut self, regions: TapRegions) {
        self.recorder.set_regions(regions);
    }

    /// A touch began somewhere in the step view.
    pub fn on_touch_down(&mut self, instant: f64, location: Point) -> TouchOutcome {
        let button = self.recorder.regions().hit_test(location);
        self.recorder.on_touch_down(instant, button, location)
    }

    /// A touch began on one of the target buttons.
    pub fn on_button_down(
        &mut self,
        instant: f64,
        button: ButtonIdentifier,
        location: Point,
    ) -> TouchOutcome {
        self.recorder.on_touch_down(instant, button, location)
    }

    /// A touch on one of the target buttons ended, inside or outside it.
    pub fn on_button_up(&mut self, instant: f64, button: ButtonIdentifier) {
        self.recorder.on_touch_up(instant, button);
    }

    /// Seconds left on the countdown after `elapsed` seconds.
    pub fn on_timer_tick(&self, elapsed: f64) -> f64 {
        (self.duration.as_secs_f64() - elapsed).max(0.0)
    }

    /// Write the in-progress result, e.g. right after the session starts.
    ///
    /// Does nothing once the step has finished; the final result is written
    /// only by expiry or abandonment.
    pub fn record_progress(&self, task_result: &mut TaskResult) {
        if self.recorder.is_expired() {
            return;
        }
        ResultAssembler::merge(task_result, self.recorder.snapshot());
    }

    /// The countdown finished after `elapsed` seconds.
    ///
    /// Returns the final tap count.
    pub fn on_timer_expired(
        &mut self,
        elapsed: f64,
        task_result: &mut TaskResult,
    ) -> Result<u32, RecorderError> {
        let result = self.recorder.on_timer_expired(elapsed)?;
        let tap_count = result.tap_count;
        ResultAssembler::merge(task_result, result);
        Ok(tap_count)
    }

    /// The participant left the step before the countdown finished.
    pub fn abandon(&mut self, task_result: &mut TaskResult) -> Result<(), RecorderError> {
        let result = self.recorder.abandon()?;
        ResultAssembler::merge(task_result, result);
        Ok(())
    }
}
