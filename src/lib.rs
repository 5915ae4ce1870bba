//! Motor Control - timing, hand coordination and validation for motor-function
//! assessments.
//!
//! This library holds the platform-independent cores of a set of motor
//! assessments (finger tapping, tremor, walk and balance). The host owns the
//! screens, sensors and timers; it feeds events in and gets results out.
//!
//! # Guarantees
//!
//! - **Session-relative timing**: uptimes are relative to the first accepted touch
//! - **Alternation scoring**: only alternating left/right taps are counted
//! - **One hand order per run**: every step of a run agrees on which hand is first
//! - **Non-blocking validation**: recorded streams are checked off the caller's thread
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Motor Control                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │   Tapping   │──▶│   Result    │◀──│    Hand     │        │
//! │  │  Recorder   │   │  Assembler  │   │ Coordinator │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │         │                 │                 │               │
//! │         ▼                 ▼                 ▼               │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │    Clock    │   │ Task Result │   │ Preference  │        │
//! │  │  (uptime)   │   │    Tree     │   │    Store    │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │                           │                                 │
//! │                           ▼                                 │
//! │                    ┌─────────────┐                          │
//! │                    │   Session   │                          │
//! │                    │  Validator  │                          │
//! │                    └─────────────┘                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use motor_control::tapping::{ButtonIdentifier, Point, TapSampleRecorder};
//!
//! let mut recorder = TapSampleRecorder::new("tapping", "Tapping/left/tapping");
//!
//! recorder.on_touch_down(100.0, ButtonIdentifier::Left, Point::new(10.0, 10.0));
//! recorder.on_touch_up(100.1, ButtonIdentifier::Left);
//! recorder.on_touch_down(100.3, ButtonIdentifier::Right, Point::new(90.0, 10.0));
//! recorder.on_touch_up(100.4, ButtonIdentifier::Right);
//!
//! let result = recorder.on_timer_expired(30.0).unwrap();
//! assert_eq!(result.tap_count, 2);
//! ```

pub mod clock;
pub mod config;
pub mod hand;
pub mod result;
pub mod tapping;
pub mod validation;

// Re-export key types at crate root for convenience
pub use clock::Clock;
pub use config::{Config, ConfigError};
pub use hand::{Hand, HandOrder, HandOrderCoordinator, HandSelection, PreferenceStore};
pub use result::{AncestorChain, ResultAssembler, StepResult, TaskResult};
pub use tapping::{ButtonIdentifier, TapSample, TapSampleRecorder, TappingResult, TappingStep};
pub use validation::{
    spawn_validation, Diagnostic, SessionValidator, TaskIdentifier, ValidationReport,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
