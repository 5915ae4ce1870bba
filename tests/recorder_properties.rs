//! Property tests for the tap sample recorder

use motor_control::tapping::{ButtonIdentifier, Point, TapSampleRecorder};
use proptest::prelude::*;

fn button(index: u8) -> ButtonIdentifier {
    match index % 3 {
        0 => ButtonIdentifier::Left,
        1 => ButtonIdentifier::Right,
        _ => ButtonIdentifier::None,
    }
}

/// Touches as (button, gap before the touch, hold time).
fn touches() -> impl Strategy<Value = Vec<(ButtonIdentifier, f64, f64)>> {
    prop::collection::vec((0u8..3, 0.0f64..0.5, 0.0f64..0.2), 0..60).prop_map(|raw| {
        raw.into_iter()
            .map(|(b, gap, hold)| (button(b), gap, hold))
            .collect()
    })
}

/// Feed the touches in order and return the recorder.
fn replay(touches: &[(ButtonIdentifier, f64, f64)]) -> TapSampleRecorder {
    let mut recorder = TapSampleRecorder::new("tapping", "Tapping/left/tapping");
    let mut now = 1_000.0;
    for &(button, gap, hold) in touches {
        now += gap;
        recorder.on_touch_down(now, button, Point::new(0.0, 0.0));
        recorder.on_touch_up(now + hold, button);
    }
    recorder
}

/// Number of alternating target taps, counting from the first target tap.
fn expected_count(touches: &[(ButtonIdentifier, f64, f64)]) -> u32 {
    let mut previous: Option<ButtonIdentifier> = None;
    let mut count = 0;
    for &(button, _, _) in touches {
        if !button.is_target() {
            continue;
        }
        if previous != Some(button) {
            previous = Some(button);
            count += 1;
        }
    }
    count
}

proptest! {
    #[test]
    fn uptimes_are_monotonic(touches in touches()) {
        let recorder = replay(&touches);
        let samples = recorder.samples();

        if let Some(first) = samples.first() {
            prop_assert_eq!(first.uptime, 0.0);
        }
        for pair in samples.windows(2) {
            prop_assert!(pair[0].uptime <= pair[1].uptime);
        }
    }

    #[test]
    fn session_starts_on_first_target(touches in touches()) {
        let recorder = replay(&touches);
        let leading_misses = touches.iter().take_while(|(b, _, _)| !b.is_target()).count();

        prop_assert_eq!(recorder.samples().len(), touches.len() - leading_misses);
        if let Some(first) = recorder.samples().first() {
            prop_assert!(first.button_identifier.is_target());
        }
    }

    #[test]
    fn tap_count_follows_alternation(touches in touches()) {
        let recorder = replay(&touches);
        prop_assert_eq!(recorder.tap_count(), expected_count(&touches));
    }

    #[test]
    fn expiry_is_final(touches in touches(), duration in 1.0f64..60.0) {
        let mut recorder = replay(&touches);
        let result = recorder.on_timer_expired(duration).unwrap();

        prop_assert_eq!(result.tap_count, expected_count(&touches));
        prop_assert!(result.samples.iter().all(|s| s.duration >= 0.0));
        prop_assert!(recorder.on_timer_expired(duration).is_err());
        prop_assert_eq!(recorder.tap_count(), result.tap_count);
    }
}
