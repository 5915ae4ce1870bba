//! Touch sample capture for the tapping assessment.
//!
//! The recorder turns touch-down/touch-up events into timestamped samples and
//! keeps a running count of taps that alternate between the two targets.
//! Events must be delivered one at a time from the input thread.

use crate::clock::Clock;
use crate::tapping::types::{ButtonIdentifier, Point, TapRegions, TapSample, TappingResult};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Lifecycle of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// Waiting for the first touch on a target
    Idle,
    /// Session clock running, samples being captured
    Recording,
    /// Timer finished or step abandoned; no further input accepted
    Expired,
}

/// What the recorder did with a touch-down event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    /// The event was dropped (before the session started, or after expiry)
    Ignored,
    /// A sample was appended
    Recorded {
        /// This touch armed the session; the host should start its countdown
        session_started: bool,
        /// This touch incremented the tap count
        scored: bool,
    },
}

/// Errors from misusing the recorder API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderError {
    /// The session was already finalized
    AlreadyExpired,
}

impl std::fmt::Display for RecorderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecorderError::AlreadyExpired => write!(f, "Recorder has already expired"),
        }
    }
}

impl std::error::Error for RecorderError {}

/// Captures tap samples for a single tapping step.
pub struct TapSampleRecorder {
    identifier: String,
    step_path: String,
    state: RecorderState,
    clock: Option<Clock>,
    /// Raw instant of the first armed touch
    tapping_start: f64,
    start_date: Option<DateTime<Utc>>,
    regions: TapRegions,
    samples: Vec<TapSample>,
    /// Uptime of the open sample for each target
    open_samples: HashMap<ButtonIdentifier, f64>,
    previous_scored: Option<ButtonIdentifier>,
    tap_count: u32,
    finished: Option<TappingResult>,
}

impl TapSampleRecorder {
    /// Create a recorder for the step with the given identifier and path.
    pub fn new(identifier: impl Into<String>, step_path: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            step_path: step_path.into(),
            state: RecorderState::Idle,
            clock: None,
            tapping_start: 0.0,
            start_date: None,
            regions: TapRegions::default(),
            samples: Vec::new(),
            open_samples: HashMap::new(),
            previous_scored: None,
            tap_count: 0,
            finished: None,
        }
    }

    /// Record the on-screen layout of the targets.
    pub fn set_regions(&mut self, regions: TapRegions) {
        self.regions = regions;
    }

    pub fn regions(&self) -> &TapRegions {
        &self.regions
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_expired(&self) -> bool {
        self.state == RecorderState::Expired
    }

    /// The session clock, once the first touch has armed it.
    pub fn clock(&self) -> Option<&Clock> {
        self.clock.as_ref()
    }

    pub fn tap_count(&self) -> u32 {
        self.tap_count
    }

    pub fn samples(&self) -> &[TapSample] {
        &self.samples
    }

    /// Handle a touch-down on `button` at the raw uptime `instant`.
    ///
    /// The first touch on a target starts the session. Misses are recorded once
    /// the session is running but never scored and never affect alternation.
    pub fn on_touch_down(
        &mut self,
        instant: f64,
        button: ButtonIdentifier,
        location: Point,
    ) -> TouchOutcome {
        let mut session_started = false;
        match self.state {
            RecorderState::Expired => return TouchOutcome::Ignored,
            RecorderState::Idle => {
                if !button.is_target() {
                    return TouchOutcome::Ignored;
                }
                self.start(instant);
                session_started = true;
            }
            RecorderState::Recording => {}
        }

        let Some(clock) = self.clock else {
            return TouchOutcome::Ignored;
        };

        let sample = TapSample {
            uptime: clock.relative_uptime(instant),
            timestamp: instant - self.tapping_start,
            step_path: self.step_path.clone(),
            button_identifier: button,
            location,
            duration: 0.0,
        };
        if button.is_target() {
            self.open_samples.insert(button, sample.uptime);
        }
        self.samples.push(sample);

        let scored = extends_alternation(self.previous_scored, button);
        if scored {
            self.tap_count += 1;
            self.previous_scored = Some(button);
        }

        tracing::debug!(
            "Touch down on {:?} at {:.3}s (scored: {}, count: {})",
            button,
            instant - self.tapping_start,
            scored,
            self.tap_count
        );

        TouchOutcome::Recorded {
            session_started,
            scored,
        }
    }

    /// Handle a touch-up on `button`, back-filling the open sample's duration.
    ///
    /// Stray releases with no open sample are ignored.
    pub fn on_touch_up(&mut self, instant: f64, button: ButtonIdentifier) {
        if self.state != RecorderState::Recording {
            return;
        }
        self.close_sample(button, instant);
    }

    /// Finish the session when the countdown runs out.
    ///
    /// Samples still held down are closed at `start + duration_secs`.
    pub fn on_timer_expired(&mut self, duration_secs: f64) -> Result<TappingResult, RecorderError> {
        if self.state == RecorderState::Expired {
            tracing::error!("Timer expiry delivered to an expired recorder");
            return Err(RecorderError::AlreadyExpired);
        }
        self.state = RecorderState::Expired;

        if let Some(clock) = self.clock {
            let instant = clock.start_system_uptime() + duration_secs;
            self.close_sample(ButtonIdentifier::Left, instant);
            self.close_sample(ButtonIdentifier::Right, instant);
        }

        tracing::info!(
            "Tapping step {} finished: {} taps, {} samples",
            self.identifier,
            self.tap_count,
            self.samples.len()
        );
        Ok(self.finalize())
    }

    /// End the session early.
    ///
    /// Samples still held down are dropped and the tap count is recomputed
    /// over the samples that remain.
    pub fn abandon(&mut self) -> Result<TappingResult, RecorderError> {
        if self.state == RecorderState::Expired {
            return Err(RecorderError::AlreadyExpired);
        }
        self.state = RecorderState::Expired;

        let open: Vec<(ButtonIdentifier, f64)> = self.open_samples.drain().collect();
        self.samples.retain(|s| {
            !open
                .iter()
                .any(|(button, uptime)| s.button_identifier == *button && s.uptime == *uptime)
        });
        self.rescore();

        tracing::info!(
            "Tapping step {} abandoned after {} samples",
            self.identifier,
            self.samples.len()
        );
        Ok(self.finalize())
    }

    /// The current result. Once expired, this is the frozen final result.
    pub fn snapshot(&self) -> TappingResult {
        match &self.finished {
            Some(result) => result.clone(),
            None => self.build_result(self.samples.clone()),
        }
    }

    fn start(&mut self, instant: f64) {
        self.state = RecorderState::Recording;
        self.tapping_start = instant;
        self.clock = Some(Clock::new(instant));
        self.start_date = Some(Utc::now());
        self.tap_count = 0;
        tracing::info!("Tapping step {} started", self.identifier);
    }

    fn close_sample(&mut self, button: ButtonIdentifier, instant: f64) {
        let (Some(uptime), Some(clock)) = (self.open_samples.remove(&button), self.clock) else {
            return;
        };
        if let Some(sample) = self
            .samples
            .iter_mut()
            .rev()
            .find(|s| s.uptime == uptime && s.button_identifier == button)
        {
            sample.duration = clock.relative_uptime(instant) - sample.uptime;
        }
    }

    fn finalize(&mut self) -> TappingResult {
        let result = self.build_result(self.samples.clone());
        self.finished = Some(result.clone());
        result
    }

    fn rescore(&mut self) {
        self.previous_scored = None;
        self.tap_count = 0;
        for sample in &self.samples {
            if extends_alternation(self.previous_scored, sample.button_identifier) {
                self.previous_scored = Some(sample.button_identifier);
                self.tap_count += 1;
            }
        }
    }

    fn build_result(&self, samples: Vec<TapSample>) -> TappingResult {
        let now = Utc::now();
        let mut result = TappingResult::new(self.identifier.clone(), self.start_date.unwrap_or(now));
        result.end_date = now;
        result.button_rect1 = self.regions.left;
        result.button_rect2 = self.regions.right;
        result.step_view_size = self.regions.view_size;
        result.samples = samples;
        result.tap_count = self.tap_count;
        result
    }
}

/// Whether a touch on `button` continues the alternating sequence.
///
/// The first target touch always scores; after that only the other target does.
fn extends_alternation(previous_scored: Option<ButtonIdentifier>, button: ButtonIdentifier) -> bool {
    match previous_scored {
        Some(previous) => previous.alternate() == Some(button),
        None => button.is_target(),
    }
}
