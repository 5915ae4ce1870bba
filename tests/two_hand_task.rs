//! End-to-end run of a two-hand tapping task

use motor_control::hand::{
    continue_prompt, resolve_order, which_hand, ContinuePrompt, Hand, HandOrder,
    HandOrderCoordinator, HandSelection, JsonFilePreferenceStore,
};
use motor_control::result::{AncestorChain, StepResult, TaskResult};
use motor_control::tapping::{Point, Rect, Size, TapRegions, TappingStep};
use motor_control::validation::{
    inspect, spawn_validation, Diagnostic, MissingPart, MotionRecord, SessionValidator,
    MOTION_STREAM_KEY,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

fn test_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("motor-control-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A seed whose coin flip puts the left hand first.
fn left_first_seed() -> u64 {
    (0..1_000)
        .find(|seed| {
            resolve_order(HandSelection::Both, &mut StdRng::seed_from_u64(*seed))
                == HandOrder::both(Hand::Left)
        })
        .unwrap()
}

fn regions() -> TapRegions {
    TapRegions::new(
        Rect::new(20.0, 500.0, 100.0, 100.0),
        Rect::new(200.0, 500.0, 100.0, 100.0),
        Size::new(320.0, 640.0),
    )
}

fn write_motion(dir: &Path, name: &str, span: f64) -> PathBuf {
    let records: Vec<MotionRecord> = (0..=10)
        .map(|i| MotionRecord::at(span * f64::from(i) / 10.0))
        .collect();
    let path = dir.join(format!("{name}_motion.json"));
    std::fs::write(&path, serde_json::to_vec(&records).unwrap()).unwrap();
    path
}

/// Run one hand's tapping section and return its result.
fn run_section(hand: Hand, dir: &Path, motion_span: f64) -> TaskResult {
    let mut section = TaskResult::new(hand.as_str());
    let mut step = TappingStep::new("tapping", format!("Tapping/{}/tapping", hand.as_str()));
    step.on_appear(regions());

    let left = Point::new(50.0, 550.0);
    let right = Point::new(250.0, 550.0);
    let outside = Point::new(160.0, 100.0);

    let mut now = 500.0;
    for location in [left, right, outside, right, left, left, right] {
        step.on_touch_down(now, location);
        step.on_button_up(now + 0.08, step.recorder().regions().hit_test(location));
        now += 0.25;
    }
    step.record_progress(&mut section);
    let tap_count = step.on_timer_expired(30.0, &mut section).unwrap();
    assert_eq!(tap_count, 4);

    let motion = write_motion(dir, hand.as_str(), motion_span);
    section.append_async_result(StepResult::file(MOTION_STREAM_KEY, Some(motion)));
    section
}

#[test]
fn test_two_hand_tapping_run() {
    let dir = test_dir();
    let seed = left_first_seed();
    let mut coordinator =
        HandOrderCoordinator::new(JsonFilePreferenceStore::open(dir.join("preferences.json")));
    let mut root = TaskResult::new("Tapping");

    let order = coordinator.record_selection(
        &mut root,
        HandSelection::Both,
        &mut StdRng::seed_from_u64(seed),
    );
    assert_eq!(order.hands(), &[Hand::Left, Hand::Right]);

    let first = which_hand(&AncestorChain::new("instruction").within(&root));
    assert_eq!(first, Some(Hand::Left));

    let left = run_section(Hand::Left, &dir, 30.0);
    {
        let chain = AncestorChain::new("tapping").within(&left).within(&root);
        assert_eq!(which_hand(&chain), Some(Hand::Left));
    }
    root.append_step_history(StepResult::task(left));
    assert_eq!(
        continue_prompt(&order, Hand::Left),
        ContinuePrompt::ContinueWith(Hand::Right)
    );

    let second = which_hand(&AncestorChain::new("instruction").within(&root));
    assert_eq!(second, Some(Hand::Right));

    let right = run_section(Hand::Right, &dir, 31.5);
    root.append_step_history(StepResult::task(right));
    assert_eq!(continue_prompt(&order, Hand::Right), ContinuePrompt::Finish);
    coordinator.end_run("Tapping");

    let tapping = root
        .find_result("left")
        .and_then(StepResult::as_task)
        .and_then(|section| section.find_result("tapping"))
        .and_then(StepResult::as_tapping)
        .unwrap();
    assert_eq!(tapping.tap_count, 4);
    assert_eq!(tapping.samples.len(), 7);
    assert_eq!(tapping.missed_samples().count(), 1);

    let report = inspect(&SessionValidator::new(), &root, None);
    assert_eq!(report.segments, vec!["left".to_string(), "right".to_string()]);
    assert!(report.is_clean(), "{:?}", report.diagnostics);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_result_survives_json_and_worker() {
    let dir = test_dir();
    let mut coordinator =
        HandOrderCoordinator::new(JsonFilePreferenceStore::open(dir.join("preferences.json")));
    let mut root = TaskResult::new("Tapping");
    coordinator.record_selection(&mut root, HandSelection::Right, &mut StdRng::seed_from_u64(1));
    root.append_step_history(StepResult::task(run_section(Hand::Right, &dir, 45.0)));

    let json = serde_json::to_string_pretty(&root).unwrap();
    let decoded: TaskResult = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, root);

    let receiver = spawn_validation(decoded, Arc::new(SessionValidator::new()), None);
    let report = receiver.recv_timeout(Duration::from_secs(5)).unwrap();

    assert_eq!(report.segments, vec!["right".to_string()]);
    assert!(matches!(
        report.diagnostics.as_slice(),
        [Diagnostic::OutOfBounds { segment, delta, .. }] if segment == "right" && *delta == 45.0
    ));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_hand_section_is_reported() {
    let dir = test_dir();
    let mut coordinator =
        HandOrderCoordinator::new(JsonFilePreferenceStore::open(dir.join("preferences.json")));
    let mut root = TaskResult::new("Tapping");
    coordinator.record_selection(
        &mut root,
        HandSelection::Both,
        &mut StdRng::seed_from_u64(left_first_seed()),
    );
    root.append_step_history(StepResult::task(run_section(Hand::Left, &dir, 30.0)));

    let report = inspect(&SessionValidator::new(), &root, None);
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::Missing {
            segment: "right".to_string(),
            what: MissingPart::Segment,
        }]
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_hand_preference_persists_across_runs() {
    let dir = test_dir();
    let path = dir.join("preferences.json");

    {
        let mut coordinator = HandOrderCoordinator::new(JsonFilePreferenceStore::open(path.clone()));
        assert_eq!(coordinator.initial_selection("Tremor"), HandSelection::Both);
        let mut root = TaskResult::new("Tremor");
        coordinator.record_selection(&mut root, HandSelection::Left, &mut StdRng::seed_from_u64(0));
    }

    let mut coordinator = HandOrderCoordinator::new(JsonFilePreferenceStore::open(path.clone()));
    assert_eq!(coordinator.initial_selection("Tremor"), HandSelection::Left);
    assert_eq!(coordinator.initial_selection("Tapping"), HandSelection::Both);

    coordinator
        .persist_preference("Tremor", HandSelection::Right)
        .unwrap();
    let reopened = HandOrderCoordinator::new(JsonFilePreferenceStore::open(path));
    assert_eq!(reopened.initial_selection("Tremor"), HandSelection::Right);

    let _ = std::fs::remove_dir_all(&dir);
}
